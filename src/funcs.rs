use std::f64::consts::{E, PI};

use lazy_static::lazy_static;

use crate::error::Error;

/// How a named function interacts with the session angle unit.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FunctionKind {
    /// Unit-independent function of one number
    Plain(fn(f64) -> f64),
    /// Circular function: the argument is converted from the session unit
    /// to radians before the call
    Circular(fn(f64) -> f64),
    /// Inverse circular function: the radian result is converted back to
    /// the session unit after the call
    InverseCircular(fn(f64) -> f64),
    /// Checked factorial, the only entry that can fail
    Factorial,
}

lazy_static! {
    /// Function candidates in match order. A name that is a prefix of
    /// another ("sin" of "sinh", "log" of "log10") comes after it, so a scan
    /// that takes the first hit performs a longest-match lookup.
    pub(crate) static ref FUNCTIONS: Vec<(&'static str, FunctionKind)> = vec![
        ("sinh", FunctionKind::Plain(f64::sinh)),
        ("cosh", FunctionKind::Plain(f64::cosh)),
        ("tanh", FunctionKind::Plain(f64::tanh)),
        ("asinh", FunctionKind::Plain(f64::asinh)),
        ("acosh", FunctionKind::Plain(f64::acosh)),
        ("atanh", FunctionKind::Plain(f64::atanh)),
        ("asin", FunctionKind::InverseCircular(f64::asin)),
        ("acos", FunctionKind::InverseCircular(f64::acos)),
        ("atan", FunctionKind::InverseCircular(f64::atan)),
        ("sin", FunctionKind::Circular(f64::sin)),
        ("cos", FunctionKind::Circular(f64::cos)),
        ("tan", FunctionKind::Circular(f64::tan)),
        ("log10", FunctionKind::Plain(f64::log10)),
        ("log2", FunctionKind::Plain(f64::log2)),
        ("log", FunctionKind::Plain(f64::log10)),
        ("ln", FunctionKind::Plain(f64::ln)),
        ("exp", FunctionKind::Plain(f64::exp)),
        ("sqrt", FunctionKind::Plain(f64::sqrt)),
        ("cbrt", FunctionKind::Plain(f64::cbrt)),
        ("abs", FunctionKind::Plain(f64::abs)),
        ("floor", FunctionKind::Plain(f64::floor)),
        ("ceil", FunctionKind::Plain(f64::ceil)),
        ("round", FunctionKind::Plain(f64::round_ties_even)),
        ("fact", FunctionKind::Factorial),
    ];

    /// Constant candidates, in the same longest-match order.
    pub(crate) static ref CONSTANTS: Vec<(&'static str, f64)> = vec![
        ("phi", (1.0 + 5f64.sqrt()) / 2.0),
        ("pi", PI),
        ("π", PI),
        ("φ", (1.0 + 5f64.sqrt()) / 2.0),
        ("e", E),
    ];
}

/// Factorial over `f64`: the argument is truncated toward zero, negative and
/// `NaN` arguments are rejected, and anything past 170 would overflow `f64`.
pub(crate) fn factorial(arg: f64) -> Result<f64, Error> {
    if arg.is_nan() {
        return Err(Error::Arithmetic("factorial of NaN".into()));
    }
    let n = arg.trunc();
    if n < 0.0 {
        return Err(Error::Arithmetic(format!(
            "factorial of a negative number: {}",
            arg
        )));
    }
    if n > 170.0 {
        return Err(Error::Arithmetic(format!(
            "factorial of {} is too large for a 64-bit float",
            arg
        )));
    }
    let mut product = 1.0;
    for i in 2..=(n as u64) {
        product *= i as f64;
    }
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0 => 1.0 ; "zero")]
    #[test_case(1.0 => 1.0 ; "one")]
    #[test_case(5.0 => 120.0 ; "five")]
    #[test_case(5.9 => 120.0 ; "fraction truncates down")]
    #[test_case(-0.5 => 1.0 ; "small negative truncates to zero")]
    #[test_case(10.0 => 3628800.0 ; "ten")]
    fn factorial_values(arg: f64) -> f64 {
        factorial(arg).unwrap()
    }

    #[test_case(-1.0 ; "negative")]
    #[test_case(171.0 ; "past the overflow threshold")]
    #[test_case(f64::NAN ; "nan")]
    #[test_case(f64::INFINITY ; "infinity")]
    fn factorial_rejects(arg: f64) {
        assert!(matches!(factorial(arg), Err(Error::Arithmetic(_))));
    }

    #[test]
    fn factorial_of_170_is_finite() {
        let value = factorial(170.0).unwrap();
        assert!(value.is_finite());
        assert!(value > 7e306);
    }

    // A shorter name placed before one of its extensions would shadow the
    // longer name forever, so the tables must keep extensions first.
    #[test]
    fn function_order_resolves_longest_match() {
        for (i, (name, _)) in FUNCTIONS.iter().enumerate() {
            for (later, _) in FUNCTIONS.iter().skip(i + 1) {
                assert!(
                    !later.starts_with(name),
                    "'{}' is unreachable behind '{}'",
                    later,
                    name
                );
            }
        }
    }

    #[test]
    fn constant_order_resolves_longest_match() {
        for (i, (name, _)) in CONSTANTS.iter().enumerate() {
            for (later, _) in CONSTANTS.iter().skip(i + 1) {
                assert!(
                    !later.starts_with(name),
                    "'{}' is unreachable behind '{}'",
                    later,
                    name
                );
            }
        }
    }

    #[test]
    fn table_names_are_lowercase() {
        for (name, _) in FUNCTIONS.iter() {
            assert_eq!(*name, name.to_lowercase());
        }
        for (name, _) in CONSTANTS.iter() {
            assert_eq!(*name, name.to_lowercase());
        }
    }
}
