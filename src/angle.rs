use std::f64::consts::PI;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::Error;

/// How the circular trigonometric functions interpret angles.
///
/// The unit applies to the arguments of `sin`, `cos` and `tan` and to the
/// results of `asin`, `acos` and `atan`. Hyperbolic functions take plain
/// numbers and ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnit {
    /// 360 degrees to a full turn, the default
    #[default]
    Degrees,
    /// 2π radians to a full turn
    Radians,
    /// 400 gradians to a full turn
    Gradians,
}

impl AngleUnit {
    /// Convert an angle expressed in this unit to radians.
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            Self::Degrees => angle * PI / 180.0,
            Self::Radians => angle,
            Self::Gradians => angle * PI / 200.0,
        }
    }

    /// Convert an angle expressed in radians to this unit.
    pub fn from_radians(self, radians: f64) -> f64 {
        match self {
            Self::Degrees => radians * 180.0 / PI,
            Self::Radians => radians,
            Self::Gradians => radians * 200.0 / PI,
        }
    }

    /// Short form used on disk and in prompts: `Deg`, `Rad` or `Grad`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Degrees => "Deg",
            Self::Radians => "Rad",
            Self::Gradians => "Grad",
        }
    }
}

impl Display for AngleUnit {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

impl FromStr for AngleUnit {
    type Err = Error;

    /// Parses both the short and the long spelling, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "deg" | "degree" | "degrees" => Ok(Self::Degrees),
            "rad" | "radian" | "radians" => Ok(Self::Radians),
            "grad" | "gradian" | "gradians" => Ok(Self::Gradians),
            _ => Err(Error::Syntax(format!("unknown angle unit '{}'", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(AngleUnit::Degrees, 180.0 ; "degrees")]
    #[test_case(AngleUnit::Radians, PI ; "radians")]
    #[test_case(AngleUnit::Gradians, 200.0 ; "gradians")]
    fn half_turn_is_pi_radians(unit: AngleUnit, half_turn: f64) {
        assert!((unit.to_radians(half_turn) - PI).abs() < 1e-12);
        assert!((unit.from_radians(PI) - half_turn).abs() < 1e-12);
    }

    #[test_case("deg", AngleUnit::Degrees ; "short degrees")]
    #[test_case("DEG", AngleUnit::Degrees ; "uppercase degrees")]
    #[test_case("Degrees", AngleUnit::Degrees ; "long degrees")]
    #[test_case("rad", AngleUnit::Radians ; "short radians")]
    #[test_case("radian", AngleUnit::Radians ; "singular radians")]
    #[test_case("Grad", AngleUnit::Gradians ; "short gradians")]
    #[test_case("gradians", AngleUnit::Gradians ; "long gradians")]
    fn parses(input: &str, expected: AngleUnit) {
        assert_eq!(input.parse::<AngleUnit>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_unit() {
        assert!(matches!(
            "turns".parse::<AngleUnit>(),
            Err(Error::Syntax(_))
        ));
    }

    #[test_case(AngleUnit::Degrees ; "degrees")]
    #[test_case(AngleUnit::Radians ; "radians")]
    #[test_case(AngleUnit::Gradians ; "gradians")]
    fn display_round_trips(unit: AngleUnit) {
        assert_eq!(unit.to_string().parse::<AngleUnit>().unwrap(), unit);
    }

    #[test]
    fn radians_pass_through_unchanged() {
        assert_eq!(AngleUnit::Radians.to_radians(1.25), 1.25);
        assert_eq!(AngleUnit::Radians.from_radians(1.25), 1.25);
    }
}
