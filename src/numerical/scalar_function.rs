use crate::errors::EvaluationError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::Lambda1D;
use log::{debug, info, warn};

/// Value substituted for any failed or non-finite evaluation on the draw/compute path.
pub const FALLBACK_VALUE: f64 = 0.0;

//////////////////////////////////TRAITS AND IMPLEMENTATIONS/////////////////////////////////

/// A pure mapping from a real number to a real number
pub trait ScalarFunction: Send + Sync {
    /// Evaluate the function at point x. May return NaN or infinity on a domain error.
    fn evaluate(&self, x: f64) -> f64;

    /// Get function name for debugging/logging
    fn name(&self) -> &str {
        "unnamed_function"
    }

    /// Evaluation that reports a non-finite result as an error.
    fn try_evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        let y = self.evaluate(x);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(EvaluationError::NonFinite { x })
        }
    }

    /// Evaluation that never fails: errors become `FALLBACK_VALUE`.
    fn guarded(&self, x: f64) -> f64 {
        match self.try_evaluate(x) {
            Ok(y) => y,
            Err(e) => {
                debug!("{}: {}, using fallback {}", self.name(), e, FALLBACK_VALUE);
                FALLBACK_VALUE
            }
        }
    }
}

/// One member `F(x) + C` of a family of antiderivatives, evaluated for any `C`.
pub trait AntiderivativeFamily: Send + Sync {
    fn evaluate_member(&self, x: f64, c: f64) -> f64;

    fn name(&self) -> &str {
        "unnamed_family"
    }
}

/// Simple function wrapper for closures
pub struct ClosureFunction<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    func: F,
    name: String,
}

impl<F> ClosureFunction<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    pub fn new(func: F, name: &str) -> Self {
        Self {
            func,
            name: name.to_string(),
        }
    }
}

impl<F> ScalarFunction for ClosureFunction<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Closure wrapper for a family `(x, C) -> F(x) + C`
pub struct ClosureFamily<G>
where
    G: Fn(f64, f64) -> f64 + Send + Sync,
{
    func: G,
    name: String,
}

impl<G> ClosureFamily<G>
where
    G: Fn(f64, f64) -> f64 + Send + Sync,
{
    pub fn new(func: G, name: &str) -> Self {
        Self {
            func,
            name: name.to_string(),
        }
    }
}

impl<G> AntiderivativeFamily for ClosureFamily<G>
where
    G: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn evaluate_member(&self, x: f64, c: f64) -> f64 {
        (self.func)(x, c)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The same value everywhere. Stands in for a custom function that failed to compile.
pub struct ConstantFunction {
    value: f64,
    name: String,
}

impl ConstantFunction {
    pub fn new(value: f64, name: &str) -> Self {
        Self {
            value,
            name: name.to_string(),
        }
    }
}

impl ScalarFunction for ConstantFunction {
    fn evaluate(&self, _x: f64) -> f64 {
        self.value
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wraps any function so that `evaluate` is the guarded evaluation of the inner one.
pub struct GuardedFunction<S: ScalarFunction + ?Sized> {
    inner: std::sync::Arc<S>,
}

impl<S: ScalarFunction + ?Sized> GuardedFunction<S> {
    pub fn new(inner: std::sync::Arc<S>) -> Self {
        Self { inner }
    }
}

impl<S: ScalarFunction + ?Sized> ScalarFunction for GuardedFunction<S> {
    fn evaluate(&self, x: f64) -> f64 {
        self.inner.guarded(x)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

////////////////////////EXPRESSION FUNCTIONS//////////////////////////////////////////

/// Custom function compiled from user text
pub struct ExpressionFunction {
    source: String,
    expr: Expr,
    func: Lambda1D,
}

impl ExpressionFunction {
    /// Parse and lambdify `source`; the only free variable allowed is `x`.
    pub fn compile(source: &str) -> Result<Self, EvaluationError> {
        let expr = Expr::parse_expression(source)?;
        let func = expr.lambdify1D()?;
        Ok(Self {
            source: source.to_string(),
            expr,
            func,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expression(&self) -> &Expr {
        &self.expr
    }
}

impl ScalarFunction for ExpressionFunction {
    fn evaluate(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    fn name(&self) -> &str {
        &self.source
    }
}

/// The single place where text becomes a function. Everything downstream only sees
/// `ScalarFunction`, so alternative front ends plug in here.
pub trait ExpressionCompiler: Send + Sync {
    fn compile(&self, text: &str) -> Result<Box<dyn ScalarFunction>, EvaluationError>;
}

/// Default compiler backed by the symbolic parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymbolicCompiler;

impl ExpressionCompiler for SymbolicCompiler {
    fn compile(&self, text: &str) -> Result<Box<dyn ScalarFunction>, EvaluationError> {
        match ExpressionFunction::compile(text) {
            Ok(function) => {
                info!("custom expression `{}` compiled as {}", text, function.expression());
                Ok(Box::new(function))
            }
            Err(e) => {
                warn!("custom expression `{}` rejected: {}", text, e);
                Err(e)
            }
        }
    }
}
