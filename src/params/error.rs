use thiserror::Error;

/// Errors from control-thread parameter access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("parameter {id} rejected non-finite value {value}")]
    NonFinite { id: &'static str, value: f32 },
}
