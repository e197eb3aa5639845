use crate::errors::EvaluationError;
use crate::symbolic::symbolic_engine::Expr;

/// Compiled one-variable function.
pub type Lambda1D = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// The only variable a custom expression may reference.
pub const ARGUMENT: &str = "x";

impl Expr {
    /// LAMBDIFICATION - Converting Symbolic Expressions to Executable Functions

    /// Converts an expression of `x` into an executable Rust closure.
    ///
    /// The closure mirrors the expression tree: every node becomes one boxed closure calling
    /// its children, so no text is interpreted after this point. Constant expressions are
    /// accepted and ignore their argument.
    ///
    /// # Errors
    /// `EvaluationError::UnknownVariable` when the tree references a name other than `x`.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.pow(Expr::Const(2.0)); // x^2
    /// let func = f.lambdify1D()?;
    /// assert_eq!(func(3.0), 9.0);
    /// ```
    pub fn lambdify1D(&self) -> Result<Lambda1D, EvaluationError> {
        if let Some(unknown) = self
            .extract_variables()
            .into_iter()
            .find(|name| name != ARGUMENT)
        {
            return Err(EvaluationError::UnknownVariable(unknown));
        }
        Ok(self.lambdify_tree())
    } // end of lambdify1D

    fn lambdify_tree(&self) -> Lambda1D {
        match self {
            Expr::Var(_) => Box::new(|x| x),
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_tree();
                let rhs_fn = rhs.lambdify_tree();
                Box::new(move |x| lhs_fn(x) + rhs_fn(x))
            }
            Expr::Sub(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_tree();
                let rhs_fn = rhs.lambdify_tree();
                Box::new(move |x| lhs_fn(x) - rhs_fn(x))
            }
            Expr::Mul(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_tree();
                let rhs_fn = rhs.lambdify_tree();
                Box::new(move |x| lhs_fn(x) * rhs_fn(x))
            }
            Expr::Div(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_tree();
                let rhs_fn = rhs.lambdify_tree();
                Box::new(move |x| lhs_fn(x) / rhs_fn(x))
            }
            Expr::Pow(base, exp) => {
                let base_fn = base.lambdify_tree();
                // integer exponents go through powi so negative bases stay defined
                if let Expr::Const(n) = exp.as_ref() {
                    if n.fract() == 0.0 && n.abs() <= i32::MAX as f64 {
                        let n = *n as i32;
                        return Box::new(move |x| base_fn(x).powi(n));
                    }
                }
                let exp_fn = exp.lambdify_tree();
                Box::new(move |x| base_fn(x).powf(exp_fn(x)))
            }
            Expr::Exp(expr) => {
                let expr_fn = expr.lambdify_tree();
                Box::new(move |x| expr_fn(x).exp())
            }
            Expr::Ln(expr) => {
                let expr_fn = expr.lambdify_tree();
                Box::new(move |x| expr_fn(x).ln())
            }
            Expr::sin(expr) => {
                let expr_fn = expr.lambdify_tree();
                Box::new(move |x| expr_fn(x).sin())
            }
            Expr::cos(expr) => {
                let expr_fn = expr.lambdify_tree();
                Box::new(move |x| expr_fn(x).cos())
            }
            Expr::tg(expr) => {
                let expr_fn = expr.lambdify_tree();
                Box::new(move |x| expr_fn(x).tan())
            }
            Expr::arcsin(expr) => {
                let expr_fn = expr.lambdify_tree();
                Box::new(move |x| expr_fn(x).asin())
            }
            Expr::arccos(expr) => {
                let expr_fn = expr.lambdify_tree();
                Box::new(move |x| expr_fn(x).acos())
            }
            Expr::arctg(expr) => {
                let expr_fn = expr.lambdify_tree();
                Box::new(move |x| expr_fn(x).atan())
            }
            Expr::sqrt(expr) => {
                let expr_fn = expr.lambdify_tree();
                Box::new(move |x| expr_fn(x).sqrt())
            }
            Expr::abs(expr) => {
                let expr_fn = expr.lambdify_tree();
                Box::new(move |x| expr_fn(x).abs())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_lambdify1d_single_variable() {
        let func = Expr::var("x").lambdify1D().unwrap();
        assert_eq!(func(5.0), 5.0);
    }

    #[test]
    fn test_lambdify1d_constant() {
        let func = Expr::Const(42.0).lambdify1D().unwrap();
        assert_eq!(func(100.0), 42.0);
    }

    #[test]
    fn test_lambdify1d_polynomial() {
        let x = Expr::var("x");
        let expr = x.clone() * x.clone() + x * Expr::Const(2.0) + Expr::Const(1.0); // x^2 + 2x + 1
        let func = expr.lambdify1D().unwrap();
        assert_eq!(func(3.0), 16.0);
    }

    #[test]
    fn test_lambdify1d_negative_base_integer_power() {
        let expr = Expr::var("x").pow(Expr::Const(3.0));
        let func = expr.lambdify1D().unwrap();
        assert_eq!(func(-2.0), -8.0);
    }

    #[test]
    fn test_lambdify1d_trigonometric() {
        let expr = Expr::sin(Box::new(Expr::var("x")));
        let func = expr.lambdify1D().unwrap();
        assert_relative_eq!(func(0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(func(PI / 2.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lambdify1d_parsed_expression() {
        let func = Expr::parse_expression("sqrt(abs(x)) + ln(exp(2))")
            .unwrap()
            .lambdify1D()
            .unwrap();
        assert_relative_eq!(func(-4.0), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lambdify1d_domain_error_gives_nan() {
        let func = Expr::parse_expression("ln(x)").unwrap().lambdify1D().unwrap();
        assert!(func(-1.0).is_nan());
    }

    #[test]
    fn test_lambdify1d_rejects_other_variables() {
        let expr = Expr::var("x") + Expr::var("y");
        assert_eq!(
            expr.lambdify1D().err(),
            Some(EvaluationError::UnknownVariable("y".to_string()))
        );
    }
}
