//! Error taxonomy of the explorer core.
//!
//! * [`EvaluationError`] - a custom expression failed to compile, or a function produced a
//!   non-finite value. The draw/compute path never sees it: guarded evaluation substitutes
//!   [`crate::numerical::scalar_function::FALLBACK_VALUE`] instead.
//! * [`PreconditionViolation`] - the caller handed in a degenerate interval, window, viewport or
//!   step. Returned from constructors and entry points, never recovered inside the core.
//! * [`ConfigError`] - a scene document could not be turned into parameters.
//! * [`RenderError`] - the plotting backend failed.
//!
//! Non-convergence of the mean-value solver is deliberately absent: the solver reports it in
//! its result instead.
use crate::numerical::function_registry::FunctionId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("cannot parse expression: {0}")]
    Parse(String),
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    #[error("unknown variable `{0}`, only `x` may be used")]
    UnknownVariable(String),
    #[error("function is not finite at x = {x}")]
    NonFinite { x: f64 },
    #[error("function `{0}` has no antiderivative family")]
    MissingAntiderivative(FunctionId),
    #[error("custom function selected but no expression was given")]
    MissingCustomExpression,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreconditionViolation {
    #[error("degenerate interval [{a}, {b}]: bounds must be finite and distinct")]
    DegenerateInterval { a: f64, b: f64 },
    #[error("reversed interval [{a}, {b}]: lower bound exceeds upper bound")]
    ReversedBounds { a: f64, b: f64 },
    #[error("sampling step {0} must be finite, positive and produce a bounded number of samples")]
    InvalidStep(f64),
    #[error("degenerate domain window on the {axis} axis: [{min}, {max}]")]
    DegenerateWindow { axis: char, min: f64, max: f64 },
    #[error("viewport {width}x{height} cannot hold a padding of {padding}")]
    InvalidViewport { width: f64, height: f64, padding: f64 },
    #[error("sample count must be positive, got {0}")]
    InvalidSampleCount(usize),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("cannot read scene document: {0}")]
    Io(String),
    #[error("cannot parse scene document: {0}")]
    Parse(String),
    #[error("missing key `{key}` in section `{section}`")]
    MissingKey { section: String, key: String },
    #[error("invalid value `{value}` for key `{key}`")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("drawing backend failed: {0}")]
    Backend(String),
    #[error("cannot write output: {0}")]
    Output(String),
}

/// Umbrella error for the facade, the binary and the scene builder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Precondition(#[from] PreconditionViolation),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
