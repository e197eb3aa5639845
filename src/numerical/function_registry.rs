//! # Function Registry
//!
//! Closed catalog of named functions plus a `custom` escape compiled from user text.
//!
//! | id            | f(x)            | F(x) + C                  |
//! |---------------|-----------------|---------------------------|
//! | `quadratic`   | 0.5x² + 1       | x³/6 + x + C              |
//! | `square`      | x²              | x³/3 + C                  |
//! | `cosine`      | cos x           | sin x + C                 |
//! | `exponential` | eˣ              | eˣ + C                    |
//! | `linear`      | 2x + 1          | x² + x + C                |
//! | `parabola`    | 0.3x² − 1       | 0.1x³ − x + C             |
//! | `cubic`       | 0.1x³ − 0.5x    | 0.025x⁴ − 0.25x² + C      |
//! | `sine`        | 2 sin x         | −2 cos x + C              |
//! | `custom`      | user expression | none                      |
//!
//! Antiderivatives are supplied as matched pairs; nothing here differentiates or integrates
//! symbolically.
use crate::errors::EvaluationError;
use crate::numerical::scalar_function::{
    AntiderivativeFamily, ConstantFunction, ExpressionCompiler, FALLBACK_VALUE, GuardedFunction,
    ScalarFunction, SymbolicCompiler,
};
use log::debug;
use std::sync::Arc;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FunctionId {
    Quadratic,
    Square,
    Cosine,
    Exponential,
    Linear,
    Parabola,
    Cubic,
    Sine,
    Custom,
}

impl FunctionId {
    pub fn display_name(self) -> &'static str {
        match self {
            FunctionId::Quadratic => "f(x) = 0.5x² + 1",
            FunctionId::Square => "f(x) = x²",
            FunctionId::Cosine => "f(x) = cos(x)",
            FunctionId::Exponential => "f(x) = eˣ",
            FunctionId::Linear => "f(x) = 2x + 1",
            FunctionId::Parabola => "f(x) = 0.3x² − 1",
            FunctionId::Cubic => "f(x) = 0.1x³ − 0.5x",
            FunctionId::Sine => "f(x) = 2sin(x)",
            FunctionId::Custom => "f(x) = custom",
        }
    }

    pub fn antiderivative_name(self) -> Option<&'static str> {
        match self {
            FunctionId::Quadratic => Some("F(x) = x³/6 + x + C"),
            FunctionId::Square => Some("F(x) = x³/3 + C"),
            FunctionId::Cosine => Some("F(x) = sin(x) + C"),
            FunctionId::Exponential => Some("F(x) = eˣ + C"),
            FunctionId::Linear => Some("F(x) = x² + x + C"),
            FunctionId::Parabola => Some("F(x) = 0.1x³ − x + C"),
            FunctionId::Cubic => Some("F(x) = 0.025x⁴ − 0.25x² + C"),
            FunctionId::Sine => Some("F(x) = −2cos(x) + C"),
            FunctionId::Custom => None,
        }
    }

    /// Built-in definition of `f`; `None` for `custom`.
    pub fn builtin(self) -> Option<fn(f64) -> f64> {
        match self {
            FunctionId::Quadratic => Some(|x| 0.5 * x * x + 1.0),
            FunctionId::Square => Some(|x| x * x),
            FunctionId::Cosine => Some(f64::cos),
            FunctionId::Exponential => Some(f64::exp),
            FunctionId::Linear => Some(|x| 2.0 * x + 1.0),
            FunctionId::Parabola => Some(|x| 0.3 * x * x - 1.0),
            FunctionId::Cubic => Some(|x| 0.1 * x * x * x - 0.5 * x),
            FunctionId::Sine => Some(|x| 2.0 * x.sin()),
            FunctionId::Custom => None,
        }
    }

    /// Built-in family `(x, C) -> F(x) + C`; `None` for `custom`.
    pub fn builtin_family(self) -> Option<fn(f64, f64) -> f64> {
        match self {
            FunctionId::Quadratic => Some(|x, c| x * x * x / 6.0 + x + c),
            FunctionId::Square => Some(|x, c| x * x * x / 3.0 + c),
            FunctionId::Cosine => Some(|x, c| x.sin() + c),
            FunctionId::Exponential => Some(|x, c| x.exp() + c),
            FunctionId::Linear => Some(|x, c| x * x + x + c),
            FunctionId::Parabola => Some(|x, c| 0.1 * x * x * x - x + c),
            FunctionId::Cubic => Some(|x, c| 0.025 * x.powi(4) - 0.25 * x * x + c),
            FunctionId::Sine => Some(|x, c| -2.0 * x.cos() + c),
            FunctionId::Custom => None,
        }
    }
}

/// Entry of `list_functions`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInfo {
    pub id: FunctionId,
    pub display_name: &'static str,
    pub antiderivative_name: Option<&'static str>,
    pub has_custom_expression: bool,
}

struct BuiltinFunction {
    id: FunctionId,
    func: fn(f64) -> f64,
}

impl ScalarFunction for BuiltinFunction {
    fn evaluate(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    fn name(&self) -> &str {
        self.id.as_ref()
    }
}

struct BuiltinFamily {
    id: FunctionId,
    func: fn(f64, f64) -> f64,
}

impl AntiderivativeFamily for BuiltinFamily {
    fn evaluate_member(&self, x: f64, c: f64) -> f64 {
        (self.func)(x, c)
    }

    fn name(&self) -> &str {
        self.id.as_ref()
    }
}

/// Resolves function ids to callables. Holds the current custom expression, compiled once per
/// change of text.
pub struct FunctionRegistry {
    compiler: Arc<dyn ExpressionCompiler>,
    custom_source: Option<String>,
    custom: Option<Result<Arc<dyn ScalarFunction>, EvaluationError>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::with_compiler(Arc::new(SymbolicCompiler))
    }

    pub fn with_compiler(compiler: Arc<dyn ExpressionCompiler>) -> Self {
        Self {
            compiler,
            custom_source: None,
            custom: None,
        }
    }

    pub fn list_functions(&self) -> Vec<FunctionInfo> {
        FunctionId::iter()
            .map(|id| FunctionInfo {
                id,
                display_name: id.display_name(),
                antiderivative_name: id.antiderivative_name(),
                has_custom_expression: id == FunctionId::Custom,
            })
            .collect()
    }

    /// Replaces the custom expression. The compile error is returned for feedback, but the
    /// registry keeps working: the guarded `custom` function then evaluates to the fallback.
    pub fn set_custom_expression(&mut self, text: &str) -> Result<(), EvaluationError> {
        if self.custom_source.as_deref() == Some(text) {
            if let Some(Err(e)) = &self.custom {
                return Err(e.clone());
            }
            return Ok(());
        }
        let compiled = self.compiler.compile(text).map(Arc::from);
        let outcome = compiled.as_ref().map(|_| ()).map_err(Clone::clone);
        self.custom_source = Some(text.to_string());
        self.custom = Some(compiled);
        outcome
    }

    pub fn clear_custom_expression(&mut self) {
        self.custom_source = None;
        self.custom = None;
    }

    pub fn custom_expression(&self) -> Option<&str> {
        self.custom_source.as_deref()
    }

    /// The raw function: non-finite values pass through, a missing or broken custom
    /// expression is an error.
    pub fn try_resolve(&self, id: FunctionId) -> Result<Arc<dyn ScalarFunction>, EvaluationError> {
        match id.builtin() {
            Some(func) => Ok(Arc::new(BuiltinFunction { id, func })),
            None => match &self.custom {
                Some(compiled) => compiled.clone(),
                None => Err(EvaluationError::MissingCustomExpression),
            },
        }
    }

    /// The function as used by the integrator and the solver: never fails, every evaluation is
    /// guarded.
    pub fn resolve(&self, id: FunctionId) -> Arc<dyn ScalarFunction> {
        match self.try_resolve(id) {
            Ok(raw) => Arc::new(GuardedFunction::new(raw)),
            Err(e) => Self::flat(id, e),
        }
    }

    /// The function as drawn: non-finite values pass through so the sampler can leave gaps,
    /// a missing or broken custom expression is a flat line at the fallback value.
    pub fn drawable(&self, id: FunctionId) -> Arc<dyn ScalarFunction> {
        self.try_resolve(id).unwrap_or_else(|e| Self::flat(id, e))
    }

    fn flat(id: FunctionId, e: EvaluationError) -> Arc<dyn ScalarFunction> {
        debug!("{} unavailable ({}), drawing a flat {}", id, e, FALLBACK_VALUE);
        Arc::new(ConstantFunction::new(FALLBACK_VALUE, id.as_ref()))
    }

    /// The antiderivative family. Only drawn, so non-finite members pass through as gaps.
    pub fn family(&self, id: FunctionId) -> Result<Arc<dyn AntiderivativeFamily>, EvaluationError> {
        id.builtin_family()
            .map(|func| Arc::new(BuiltinFamily { id, func }) as Arc<dyn AntiderivativeFamily>)
            .ok_or(EvaluationError::MissingAntiderivative(id))
    }

    pub fn evaluate(&self, id: FunctionId, x: f64) -> Result<f64, EvaluationError> {
        self.try_resolve(id)?.try_evaluate(x)
    }

    pub fn evaluate_family(&self, id: FunctionId, x: f64, c: f64) -> Result<f64, EvaluationError> {
        let y = self.family(id)?.evaluate_member(x, c);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(EvaluationError::NonFinite { x })
        }
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::str::FromStr;

    #[test]
    fn test_ids_round_trip_through_strings() {
        assert_eq!(FunctionId::from_str("quadratic"), Ok(FunctionId::Quadratic));
        assert_eq!(FunctionId::Exponential.to_string(), "exponential");
        assert!(FunctionId::from_str("tangent").is_err());
    }

    #[test]
    fn test_list_functions() {
        let registry = FunctionRegistry::new();
        let list = registry.list_functions();
        assert_eq!(list.len(), 9);
        let custom: Vec<_> = list.iter().filter(|info| info.has_custom_expression).collect();
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].id, FunctionId::Custom);
        assert!(list
            .iter()
            .filter(|info| info.id != FunctionId::Custom)
            .all(|info| info.antiderivative_name.is_some()));
    }

    #[test]
    fn test_builtin_values() {
        let registry = FunctionRegistry::new();
        assert_eq!(registry.evaluate(FunctionId::Quadratic, 2.0), Ok(3.0));
        assert_eq!(registry.evaluate(FunctionId::Linear, 1.0), Ok(3.0));
        assert_relative_eq!(registry.evaluate(FunctionId::Sine, 0.5).unwrap(), 2.0 * 0.5f64.sin());
        assert_eq!(registry.evaluate_family(FunctionId::Square, 3.0, 1.0), Ok(10.0));
        assert_relative_eq!(
            registry.evaluate_family(FunctionId::Cosine, 1.0, -1.0).unwrap(),
            1.0f64.sin() - 1.0
        );
    }

    #[test]
    fn test_families_differentiate_to_their_functions() {
        // central difference of F must match f for every pair in the catalog
        let registry = FunctionRegistry::new();
        let h = 1e-5;
        for id in FunctionId::iter().filter(|id| *id != FunctionId::Custom) {
            for &x in &[-1.5, 0.3, 2.0] {
                let derivative = (registry.evaluate_family(id, x + h, 0.7).unwrap()
                    - registry.evaluate_family(id, x - h, 0.7).unwrap())
                    / (2.0 * h);
                assert_relative_eq!(derivative, registry.evaluate(id, x).unwrap(), epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_family_members_shift_vertically() {
        let registry = FunctionRegistry::new();
        let a = registry.evaluate_family(FunctionId::Exponential, 0.5, 0.0).unwrap();
        let b = registry.evaluate_family(FunctionId::Exponential, 0.5, 2.5).unwrap();
        assert_relative_eq!(b - a, 2.5);
    }

    #[test]
    fn test_custom_without_expression() {
        let registry = FunctionRegistry::new();
        assert_eq!(
            registry.evaluate(FunctionId::Custom, 1.0),
            Err(EvaluationError::MissingCustomExpression)
        );
        assert_eq!(registry.resolve(FunctionId::Custom).evaluate(1.0), FALLBACK_VALUE);
        assert_eq!(
            registry.evaluate_family(FunctionId::Custom, 1.0, 0.0),
            Err(EvaluationError::MissingAntiderivative(FunctionId::Custom))
        );
    }

    #[test]
    fn test_custom_expression_compiles() {
        let mut registry = FunctionRegistry::new();
        registry.set_custom_expression("x^3 - x").unwrap();
        assert_eq!(registry.custom_expression(), Some("x^3 - x"));
        assert_eq!(registry.evaluate(FunctionId::Custom, 2.0), Ok(6.0));
        assert_eq!(registry.resolve(FunctionId::Custom).evaluate(2.0), 6.0);
    }

    #[test]
    fn test_malformed_custom_expression_renders_flat() {
        let mut registry = FunctionRegistry::new();
        let err = registry.set_custom_expression("x^(").unwrap_err();
        assert!(matches!(err, EvaluationError::Parse(_)));
        // asking again with the same text reports the same error without recompiling
        assert_eq!(registry.set_custom_expression("x^("), Err(err));
        let f = registry.resolve(FunctionId::Custom);
        assert_eq!(f.evaluate(-3.0), 0.0);
        assert_eq!(f.evaluate(10.0), 0.0);
    }

    #[test]
    fn test_custom_domain_error_is_guarded() {
        let mut registry = FunctionRegistry::new();
        registry.set_custom_expression("1/x").unwrap();
        assert_eq!(
            registry.evaluate(FunctionId::Custom, 0.0),
            Err(EvaluationError::NonFinite { x: 0.0 })
        );
        assert_eq!(registry.resolve(FunctionId::Custom).evaluate(0.0), FALLBACK_VALUE);
    }

    #[test]
    fn test_guarded_builtin_overflow() {
        let registry = FunctionRegistry::new();
        assert!(registry.evaluate(FunctionId::Exponential, 1000.0).is_err());
        assert_eq!(
            registry.resolve(FunctionId::Exponential).evaluate(1000.0),
            FALLBACK_VALUE
        );
    }

    #[test]
    fn test_drawable_keeps_non_finite_values() {
        let mut registry = FunctionRegistry::new();
        registry.set_custom_expression("1/x").unwrap();
        let f = registry.drawable(FunctionId::Custom);
        assert!(!f.evaluate(0.0).is_finite());
        assert_eq!(f.evaluate(2.0), 0.5);

        assert!(registry.set_custom_expression("x^(").is_err());
        assert_eq!(registry.drawable(FunctionId::Custom).evaluate(1.0), FALLBACK_VALUE);
        let family = registry.family(FunctionId::Exponential).unwrap();
        assert!(!family.evaluate_member(1000.0, 0.0).is_finite());
    }
}
