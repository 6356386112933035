//! harmonic - playable terminal front end for the harmonic voice engine
//!
//! Run with: cargo run --bin harmonic
//! Set RUST_LOG=debug for engine logs on stderr.

mod app;
mod keyboard;
mod ui;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    app::run()
}
