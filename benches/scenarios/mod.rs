//! Scenario benchmarks: whole voices, the pool and the engine.

mod voices;

pub use voices::bench_voices;
