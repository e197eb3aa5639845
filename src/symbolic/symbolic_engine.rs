//! # Symbolic Engine Module
//!
//! Expression tree used for user-typed custom functions. An expression is produced by
//! [`crate::symbolic::parse_expr`] and turned into a plain Rust closure by
//! [`crate::symbolic::symbolic_lambdify`]; nothing else in the crate looks inside it.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - only `x` survives compilation
//! - **Constants**: `Const(f64)`
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow`
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tg`, `arcsin`, `arccos`, `arctg`, `sqrt`, `abs`
//!
//! ### Key Methods
//! - `extract_variables()` - sorted, deduplicated variable names
//! - `is_constant()` - true when the tree holds no variable at all
//! - `pow()` / operator overloading for building trees in tests and code
//!
//! Trigonometric variants keep the mathematical notation (`tg`, `arctg`) for tangent and
//! arctangent; the parser accepts the programming spellings too.
#![allow(non_camel_case_types)]

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Core symbolic expression: an abstract syntax tree over one real variable.
///
/// # Examples
/// ```rust, ignore
/// use calculus_explorer::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g. "x")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    /// Tangent function, mathematical notation `tg`
    tg(Box<Expr>),
    arcsin(Box<Expr>),
    arccos(Box<Expr>),
    /// Arctangent function, mathematical notation `arctg`
    arctg(Box<Expr>),
    sqrt(Box<Expr>),
    abs(Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::arcsin(expr) => write!(f, "arcsin({})", expr),
            Expr::arccos(expr) => write!(f, "arccos({})", expr),
            Expr::arctg(expr) => write!(f, "arctg({})", expr),
            Expr::sqrt(expr) => write!(f, "sqrt({})", expr),
            Expr::abs(expr) => write!(f, "abs({})", expr),
        }
    }
}

impl Expr {
    /// Shorthand for `Expr::Var`.
    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    pub fn pow(self, exponent: Expr) -> Expr {
        Expr::Pow(Box::new(self), Box::new(exponent))
    }

    /// Unary minus, written as multiplication by -1 so the tree keeps a single product node kind.
    pub fn negate(self) -> Expr {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }

    /// Builds a one-argument function node from its name. Returns `None` for unknown names.
    pub fn function(name: &str, arg: Expr) -> Option<Expr> {
        let arg = Box::new(arg);
        let expr = match name {
            "exp" => Expr::Exp(arg),
            "ln" | "log" => Expr::Ln(arg),
            "sin" => Expr::sin(arg),
            "cos" => Expr::cos(arg),
            "tg" | "tan" => Expr::tg(arg),
            "arcsin" | "asin" => Expr::arcsin(arg),
            "arccos" | "acos" => Expr::arccos(arg),
            "arctg" | "atan" | "arctan" => Expr::arctg(arg),
            "sqrt" => Expr::sqrt(arg),
            "abs" => Expr::abs(arg),
            _ => return None,
        };
        Some(expr)
    }

    /// Sorted list of the distinct variable names found in the tree.
    pub fn extract_variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    fn collect_variables(&self, vars: &mut Vec<String>) {
        match self {
            Expr::Var(name) => vars.push(name.clone()),
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(vars);
                rhs.collect_variables(vars);
            }
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctg(expr)
            | Expr::sqrt(expr)
            | Expr::abs(expr) => expr.collect_variables(vars),
        }
    }

    pub fn is_constant(&self) -> bool {
        self.extract_variables().is_empty()
    }
}

impl Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::Add(Box::new(self), Box::new(rhs))
    }
}

impl Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::Sub(Box::new(self), Box::new(rhs))
    }
}

impl Mul for Expr {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(Box::new(self), Box::new(rhs))
    }
}

impl Div for Expr {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        Expr::Div(Box::new(self), Box::new(rhs))
    }
}
