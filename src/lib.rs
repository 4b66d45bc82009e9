#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::float_cmp,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::non_ascii_literal,
    clippy::uninlined_format_args,
    clippy::unused_self
)]

//! Reckoner, a scientific calculator engine for expressions in strings.
//!
//! The entry point is the [`Evaluator`], which evaluates one expression at
//! a time while carrying a little session state: the angle unit, the
//! rounding precision, the last answer and a memory register.
//!
//! ```
//! use reckoner::Evaluator;
//!
//! let mut eval = Evaluator::new();
//! assert_eq!(eval.evaluate("3 + 5 * 2"), Ok(13.0));
//! assert_eq!(eval.evaluate("ans ^ 2"), Ok(169.0));
//! ```
//!
//! The angle unit decides how the circular functions read their arguments,
//! degrees being the default:
//!
//! ```
//! use reckoner::{AngleUnit, Evaluator};
//!
//! let mut eval = Evaluator::new();
//! assert_eq!(eval.evaluate("sin(90)"), Ok(1.0));
//!
//! eval.set_angle_unit(AngleUnit::Radians);
//! assert_eq!(eval.evaluate("sin(pi / 2)"), Ok(1.0));
//! ```
//!
//! Results are rounded to the session precision, while `ans` keeps the
//! exact value:
//!
//! ```
//! use reckoner::Evaluator;
//!
//! let mut eval = Evaluator::new();
//! eval.set_precision(4);
//! assert_eq!(eval.evaluate("2 / 3"), Ok(0.6667));
//! assert_eq!(eval.evaluate("ans * 3"), Ok(2.0));
//! ```
//!
//! # Language definition
//!
//! An expression can contain the following elements:
//!
//! - number literals with an optional fraction and exponent: `42`, `.5`,
//!   `1.5e-3`;
//! - left and right parenthesis;
//! - the binary operators `+`, `-`, `*` (or `×`), `/` (or `÷`), `%` for
//!   remainder and `^` for exponentiation, plus the postfix `²` and leading
//!   signs;
//! - the constants `pi` (or `π`), `e` and `phi` (or `φ`);
//! - function calls with a parenthesized argument: `sqrt`, `cbrt`, `sin`,
//!   `cos`, `tan`, `asin`, `acos`, `atan`, `sinh`, `cosh`, `tanh`, `asinh`,
//!   `acosh`, `atanh`, `floor`, `ceil`, `round`, `abs`, `exp`, `ln`,
//!   `log` and `log10` (both base 10), `log2` and `fact`;
//! - the token `ans`, replaced by the previous answer.
//!
//! Names are case-insensitive and whitespace is ignored. Any other symbol
//! is rejected.
//!
//! `^` binds right to left, `²` applies before `^`, and a leading sign
//! binds tighter than either, so `-2^2` is `4`. The four circular
//! functions `sin`, `cos`, `tan` and their inverses honor the session
//! angle unit; everything else is unit-blind.
//!
//! # Technical details
//!
//! reckoner evaluates in a single recursive-descent pass over the
//! character stream; no syntax tree is built. All arithmetic is `f64`, so
//! `NaN` and the infinities are legitimate results, not errors. Errors are
//! split into [`Error::Syntax`] for malformed input and
//! [`Error::Arithmetic`] for out-of-domain operations such as division by
//! zero.

mod angle;
mod engine;
mod error;
mod funcs;
mod settings;

pub use angle::AngleUnit;
pub use engine::Evaluator;
pub use error::Error;
pub use settings::Settings;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        assert_eq!(Evaluator::new().evaluate("2 + 2"), Ok(4.0));
    }
}
