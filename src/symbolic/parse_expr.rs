use crate::errors::EvaluationError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{
    brackets_balanced, find_leftmost_power_outside_brackets,
    find_rightmost_product_outside_brackets, find_rightmost_sign_outside_brackets,
    wrapped_in_brackets,
};
use std::f64::consts::{E, PI};
/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use calculus_explorer::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("0.5*x^2 + 1").unwrap();
/// let f = parsed_expression.lambdify1D().unwrap();
/// assert_eq!(f(2.0), 3.0);
/// ```
//                  search recursion diagram
//                "0.5*x^2+sin(x)-1"                |
//                |       left  | right             |
//                |_________________________________|
//                |    split at rightmost +/-       |
//                |_________________________________|
//                | 0.5*x^2+sin(x) |      1         |
//                |_____ \|/_______|________________|
//                |    split at rightmost +/-       |
//                |_________________________________|
//                |   0.5*x^2   |    sin(x)         |
//                |_____ \|/____|_____ \|/__________|
//                | split at *  | function call     |
//                |  0.5 | x^2  |      x            |
//                |______|_\|/__|___________________|
//                |      split at leftmost ^        |
//                  etc...

/// Rewrites accepted alternative spellings into the core grammar:
/// `Math.sin(x)` and `x ** 2` as typed into the browser version of the explorer.
pub fn normalize_input(input: &str) -> String {
    input.replace("Math.", "").replace("**", "^")
}

/// parses the normalized text; operators are searched from the lowest precedence level up:
/// binary `+ -`, then `* /`, then unary sign, then `^`, then function calls and atoms.
pub fn parse_expression_func(input: &str) -> Result<Expr, EvaluationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(EvaluationError::Parse("empty expression".to_string()));
    }
    if !brackets_balanced(input) {
        return Err(EvaluationError::Parse(format!(
            "unbalanced brackets in `{}`",
            input
        )));
    }
    // bracket proceeding: the whole input is one group
    if wrapped_in_brackets(input) {
        return parse_expression_func(&input[1..input.len() - 1]);
    }

    // Handling addition and subtraction
    if let Some((pos, op)) = find_rightmost_sign_outside_brackets(input) {
        let left = parse_expression_func(&input[..pos])?;
        let right = parse_expression_func(&input[pos + 1..])?;
        return Ok(match op {
            '+' => left + right,
            _ => left - right,
        });
    }

    // Handling multiplication and division
    if let Some((pos, op)) = find_rightmost_product_outside_brackets(input) {
        let left = parse_expression_func(&input[..pos])?;
        let right = parse_expression_func(&input[pos + 1..])?;
        return Ok(match op {
            '*' => left * right,
            _ => left / right,
        });
    }

    // unary sign binds weaker than power: -x^2 = -(x^2)
    if let Some(rest) = input.strip_prefix('-') {
        return Ok(parse_expression_func(rest)?.negate());
    }
    if let Some(rest) = input.strip_prefix('+') {
        return parse_expression_func(rest);
    }

    if let Some(pos) = find_leftmost_power_outside_brackets(input) {
        let base = parse_expression_func(&input[..pos])?;
        let exponent = parse_expression_func(&input[pos + 1..])?;
        return Ok(base.pow(exponent));
    }

    // function call: name(argument)
    if let Some(bracket_start) = input.find('(') {
        if input.ends_with(')') {
            let name = input[..bracket_start].trim();
            let argument = parse_expression_func(&input[bracket_start + 1..input.len() - 1])?;
            return Expr::function(name, argument)
                .ok_or_else(|| EvaluationError::UnknownFunction(name.to_string()));
        }
        return Err(EvaluationError::Parse(format!(
            "unexpected text after bracket in `{}`",
            input
        )));
    }

    parse_atom(input)
}

fn parse_atom(input: &str) -> Result<Expr, EvaluationError> {
    if let Ok(value) = input.parse::<f64>() {
        return Ok(Expr::Const(value));
    }
    match input {
        "pi" | "PI" => return Ok(Expr::Const(PI)),
        "e" | "E" => return Ok(Expr::Const(E)),
        _ => {}
    }
    let is_identifier = input
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && input.chars().all(|c| c.is_alphanumeric() || c == '_');
    if is_identifier {
        Ok(Expr::Var(input.to_string()))
    } else {
        Err(EvaluationError::Parse(format!("cannot parse `{}`", input)))
    }
}

impl Expr {
    /// Parses a user-typed expression into a symbolic expression.
    pub fn parse_expression(input: &str) -> Result<Expr, EvaluationError> {
        let normalized = normalize_input(input);
        parse_expression_func(&normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_parse_polynomial_precedence() {
        let parsed = Expr::parse_expression("0.5*x^2 + 1").unwrap();
        let expected = Expr::Const(0.5) * x().pow(Expr::Const(2.0)) + Expr::Const(1.0);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_left_associative_subtraction() {
        let parsed = Expr::parse_expression("x-1-2").unwrap();
        let expected = (x() - Expr::Const(1.0)) - Expr::Const(2.0);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_right_associative_power() {
        let parsed = Expr::parse_expression("x^2^3").unwrap();
        let expected = x().pow(Expr::Const(2.0).pow(Expr::Const(3.0)));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_unary_minus() {
        assert_eq!(
            Expr::parse_expression("-x^2").unwrap(),
            x().pow(Expr::Const(2.0)).negate()
        );
        assert_eq!(
            Expr::parse_expression("x^-1").unwrap(),
            x().pow(Expr::Const(1.0).negate())
        );
        assert_eq!(
            Expr::parse_expression("2*-x").unwrap(),
            Expr::Const(2.0) * x().negate()
        );
    }

    #[test]
    fn test_parse_functions_and_constants() {
        let parsed = Expr::parse_expression("2*sin(pi*x)").unwrap();
        let expected = Expr::Const(2.0) * Expr::sin(Box::new(Expr::Const(PI) * x()));
        assert_eq!(parsed, expected);
        assert_eq!(
            Expr::parse_expression("exp(x)/e").unwrap(),
            Expr::Exp(Box::new(x())) / Expr::Const(E)
        );
    }

    #[test]
    fn test_parse_browser_spellings() {
        assert_eq!(
            Expr::parse_expression("Math.sin(x) + x ** 2").unwrap(),
            Expr::sin(Box::new(x())) + x().pow(Expr::Const(2.0))
        );
    }

    #[test]
    fn test_parse_scientific_literal() {
        assert_eq!(
            Expr::parse_expression("1e-3*x").unwrap(),
            Expr::Const(1e-3) * x()
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Expr::parse_expression(""),
            Err(EvaluationError::Parse(_))
        ));
        assert!(matches!(
            Expr::parse_expression("(x+1"),
            Err(EvaluationError::Parse(_))
        ));
        assert!(matches!(
            Expr::parse_expression("x+"),
            Err(EvaluationError::Parse(_))
        ));
        assert_eq!(
            Expr::parse_expression("gamma(x)"),
            Err(EvaluationError::UnknownFunction("gamma".to_string()))
        );
        assert!(matches!(
            Expr::parse_expression("2x"),
            Err(EvaluationError::Parse(_))
        ));
        assert!(matches!(
            Expr::parse_expression("sin(x)2"),
            Err(EvaluationError::Parse(_))
        ));
    }
}
