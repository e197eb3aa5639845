#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use calculus_explorer::symbolic::symbolic_engine::Expr;
/// let input = "Math.sin(x) + x ** 2";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let parsed_function = parsed_expression.lambdify1D().unwrap();
/// println!("{}, Rust function: {}  \n", input, parsed_function(1.0));
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// expression tree of a custom function of `x`
pub mod symbolic_engine;
///____________________________________________________________________________________________________________________________
/// turns a symbolic expression into a Rust closure
pub mod symbolic_lambdify;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions for bracket parsing and operator scanning
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
