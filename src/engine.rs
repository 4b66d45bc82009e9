use crate::angle::AngleUnit;
use crate::error::Error;
use crate::funcs::{self, FunctionKind, CONSTANTS, FUNCTIONS};

/// Nesting levels (parenthesized groups, function arguments, `^` chains)
/// accepted before an expression is rejected as too deep.
const MAX_DEPTH: usize = 256;

/// Rounding digits past this are a no-op for `f64`, so requests are clamped.
const MAX_PRECISION: u32 = 15;

/// A scientific expression evaluator with session state.
///
/// The evaluator keeps four pieces of state between calls: the angle unit
/// used by the circular functions, the rounding precision applied to
/// results, the last answer (substituted for the token `ans`) and an
/// independent memory register. Construction gives degrees, 10 digits and
/// both registers at zero.
///
/// Evaluation itself is stateless: every call to [`evaluate`] scans its
/// input with a fresh cursor. An evaluator is cheap to construct and safe
/// to use from one thread; to evaluate from several threads, give each its
/// own instance or wrap one in a lock.
///
/// [`evaluate`]: Evaluator::evaluate
///
/// # Examples
///
/// ```
/// use reckoner::Evaluator;
///
/// let mut eval = Evaluator::new();
/// assert_eq!(eval.evaluate("3 + 5 * 2"), Ok(13.0));
/// assert_eq!(eval.evaluate("ans ^ 2"), Ok(169.0));
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator {
    angle_unit: AngleUnit,
    precision: u32,
    last_answer: f64,
    memory: f64,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            angle_unit: AngleUnit::Degrees,
            precision: 10,
            last_answer: 0.0,
            memory: 0.0,
        }
    }
}

impl Evaluator {
    /// Create an evaluator with the default session state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate an expression and return the result rounded to the session
    /// precision.
    ///
    /// Whitespace is ignored, names are case-insensitive and the token
    /// `ans` stands for the previous answer. On success the unrounded
    /// result becomes the new `ans`; on error every register keeps its
    /// value. Syntax problems and out-of-domain arithmetic (zero divisors,
    /// factorial misuse) are reported as errors, while `NaN` and the
    /// infinities are ordinary results.
    ///
    /// # Examples
    ///
    /// ```
    /// use reckoner::Evaluator;
    ///
    /// let mut eval = Evaluator::new();
    /// assert_eq!(eval.evaluate("sin(90) + fact(4)"), Ok(25.0));
    /// assert!(eval.evaluate("(2 + 3").is_err());
    /// ```
    pub fn evaluate(&mut self, expression: &str) -> Result<f64, Error> {
        let normalized = self.normalize(expression);
        let value = Parser::new(&normalized, self.angle_unit).run()?;
        self.last_answer = value;
        Ok(round_to(value, self.precision))
    }

    /// Strip whitespace and substitute the last answer for `ans`.
    ///
    /// A non-finite answer renders as `NaN` or `inf`, which the number
    /// parser rejects later with a syntax error.
    fn normalize(&self, expression: &str) -> String {
        let stripped: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
        if stripped.contains("ans") {
            stripped.replace("ans", &self.last_answer.to_string())
        } else {
            stripped
        }
    }

    /// The angle unit used by the circular functions.
    pub fn angle_unit(&self) -> AngleUnit {
        self.angle_unit
    }

    /// Change the angle unit for subsequent evaluations.
    pub fn set_angle_unit(&mut self, unit: AngleUnit) {
        self.angle_unit = unit;
    }

    /// The number of decimal digits results are rounded to.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Change the rounding precision. Values above 15 are clamped.
    pub fn set_precision(&mut self, digits: u32) {
        self.precision = digits.min(MAX_PRECISION);
    }

    /// The unrounded result of the last successful evaluation.
    pub fn last_answer(&self) -> f64 {
        self.last_answer
    }

    /// Round a value to the session precision, the way evaluation results
    /// are rounded before they are returned.
    pub fn round(&self, value: f64) -> f64 {
        round_to(value, self.precision)
    }

    /// The memory register.
    pub fn memory(&self) -> f64 {
        self.memory
    }

    /// Overwrite the memory register.
    pub fn set_memory(&mut self, value: f64) {
        self.memory = value;
    }

    /// Add a value to the memory register.
    pub fn memory_add(&mut self, value: f64) {
        self.memory += value;
    }

    /// Subtract a value from the memory register.
    pub fn memory_subtract(&mut self, value: f64) {
        self.memory -= value;
    }

    /// Reset the memory register to zero.
    pub fn clear_memory(&mut self) {
        self.memory = 0.0;
    }
}

/// Direct operations, bypassing the expression language. The trigonometric
/// ones honor the session angle unit; none of them touch `ans`.
impl Evaluator {
    /// `a + b`
    pub fn add(&self, a: f64, b: f64) -> f64 {
        a + b
    }

    /// `a - b`
    pub fn subtract(&self, a: f64, b: f64) -> f64 {
        a - b
    }

    /// `a * b`
    pub fn multiply(&self, a: f64, b: f64) -> f64 {
        a * b
    }

    /// `a / b`, rejecting a zero divisor.
    pub fn divide(&self, a: f64, b: f64) -> Result<f64, Error> {
        if b == 0.0 {
            return Err(Error::Arithmetic("division by zero".into()));
        }
        Ok(a / b)
    }

    /// `a` raised to `b`.
    pub fn power(&self, a: f64, b: f64) -> f64 {
        a.powf(b)
    }

    /// Square root.
    pub fn sqrt(&self, value: f64) -> f64 {
        value.sqrt()
    }

    /// Sine of an angle in the session unit.
    pub fn sin(&self, angle: f64) -> f64 {
        self.angle_unit.to_radians(angle).sin()
    }

    /// Cosine of an angle in the session unit.
    pub fn cos(&self, angle: f64) -> f64 {
        self.angle_unit.to_radians(angle).cos()
    }

    /// Tangent of an angle in the session unit.
    pub fn tan(&self, angle: f64) -> f64 {
        self.angle_unit.to_radians(angle).tan()
    }

    /// Base-10 logarithm.
    pub fn log(&self, value: f64) -> f64 {
        value.log10()
    }

    /// Natural logarithm.
    pub fn ln(&self, value: f64) -> f64 {
        value.ln()
    }

    /// `e` raised to `value`.
    pub fn exp(&self, value: f64) -> f64 {
        value.exp()
    }
}

/// Round `value` to `digits` decimal digits, ties to even.
///
/// Non-finite values, and values so large that scaling leaves the finite
/// range, are returned unchanged.
fn round_to(value: f64, digits: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(digits as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / scale
}

/// Single-pass cursor over one normalized expression.
///
/// Owns its whole scan state, so it is built fresh for every evaluation and
/// discarded afterwards. Each grammar level is a method; `depth` counts the
/// recursion they perform through `nested`.
struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
    angle_unit: AngleUnit,
}

impl Parser {
    fn new(expression: &str, angle_unit: AngleUnit) -> Parser {
        Parser {
            chars: expression.chars().collect(),
            pos: 0,
            depth: 0,
            angle_unit,
        }
    }

    /// Parse the whole input, rejecting anything left after the expression.
    fn run(mut self) -> Result<f64, Error> {
        let value = self.parse_sum()?;
        match self.peek() {
            None => Ok(value),
            Some('!') => Err(Error::Syntax(
                "factorial is written fact(n), not n!".into(),
            )),
            Some(other) => Err(Error::Syntax(format!(
                "unexpected character '{}' at position {}",
                other, self.pos
            ))),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    /// Consume `c` if it is the next character.
    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Run `production` one structural level deeper, failing instead of
    /// overflowing the call stack on hostile nesting.
    fn nested(&mut self, production: fn(&mut Parser) -> Result<f64, Error>) -> Result<f64, Error> {
        if self.depth == MAX_DEPTH {
            return Err(Error::Syntax(format!(
                "more than {} nested levels",
                MAX_DEPTH
            )));
        }
        self.depth += 1;
        let value = production(self);
        self.depth -= 1;
        value
    }

    /// Sums: left-associative `+` and `-`.
    fn parse_sum(&mut self) -> Result<f64, Error> {
        let mut value = self.parse_product()?;
        loop {
            if self.eat('+') {
                value += self.parse_product()?;
            } else if self.eat('-') {
                value -= self.parse_product()?;
            } else {
                return Ok(value);
            }
        }
    }

    /// Products: left-associative `*`, `×`, `/`, `÷` and `%`.
    fn parse_product(&mut self) -> Result<f64, Error> {
        let mut value = self.parse_power()?;
        loop {
            if self.eat('*') || self.eat('×') {
                value *= self.parse_power()?;
            } else if self.eat('/') || self.eat('÷') {
                let divisor = self.parse_power()?;
                if divisor == 0.0 {
                    return Err(Error::Arithmetic("division by zero".into()));
                }
                value /= divisor;
            } else if self.eat('%') {
                let divisor = self.parse_power()?;
                if divisor == 0.0 {
                    return Err(Error::Arithmetic("modulo by zero".into()));
                }
                value %= divisor;
            } else {
                return Ok(value);
            }
        }
    }

    /// Powers: the postfix square `²` (repeatable), then right-associative
    /// `^` handled by recursing on this same level.
    fn parse_power(&mut self) -> Result<f64, Error> {
        let mut value = self.parse_unary()?;
        while self.eat('²') {
            value *= value;
        }
        if self.eat('^') {
            let exponent = self.nested(Parser::parse_power)?;
            value = value.powf(exponent);
        }
        Ok(value)
    }

    /// Leading signs. A run of `-` and `+` collapses to its parity, and the
    /// sign binds tighter than `^`, so `-2^2` is 4.
    fn parse_unary(&mut self) -> Result<f64, Error> {
        let mut negative = false;
        loop {
            if self.eat('-') {
                negative = !negative;
            } else if !self.eat('+') {
                break;
            }
        }
        let value = self.parse_atom()?;
        Ok(if negative { -value } else { value })
    }

    /// Atoms: a parenthesized group, a function call, a named constant or a
    /// number literal, tried in that order.
    fn parse_atom(&mut self) -> Result<f64, Error> {
        match self.peek() {
            None => Err(Error::Syntax("unexpected end of expression".into())),
            Some('(') => {
                self.bump();
                let value = self.nested(Parser::parse_sum)?;
                if !self.eat(')') {
                    return Err(Error::Syntax("missing closing parenthesis".into()));
                }
                Ok(value)
            }
            Some('!') => Err(Error::Syntax(
                "factorial is written fact(n), not n!".into(),
            )),
            Some(_) => {
                if let Some((name, kind)) = self.match_function() {
                    return self.apply_function(name, kind);
                }
                if let Some(value) = self.match_constant() {
                    return Ok(value);
                }
                self.parse_number()
            }
        }
    }

    /// First function whose name matches at the cursor; consumes the name.
    fn match_function(&mut self) -> Option<(&'static str, FunctionKind)> {
        for &(name, kind) in FUNCTIONS.iter() {
            if let Some(len) = self.match_len(name) {
                self.pos += len;
                return Some((name, kind));
            }
        }
        None
    }

    /// First constant whose name matches at the cursor; consumes the name.
    fn match_constant(&mut self) -> Option<f64> {
        for &(name, value) in CONSTANTS.iter() {
            if let Some(len) = self.match_len(name) {
                self.pos += len;
                return Some(value);
            }
        }
        None
    }

    /// Case-insensitive match of `name` against the input at the cursor,
    /// returning the number of input characters it covers.
    fn match_len(&self, name: &str) -> Option<usize> {
        let mut len = 0;
        for expected in name.chars() {
            let c = *self.chars.get(self.pos + len)?;
            if !c.to_lowercase().eq(expected.to_lowercase()) {
                return None;
            }
            len += 1;
        }
        Some(len)
    }

    /// Parenthesized argument of a matched function, then the call itself.
    fn apply_function(&mut self, name: &str, kind: FunctionKind) -> Result<f64, Error> {
        if !self.eat('(') {
            return Err(Error::Syntax(format!("expected '(' after '{}'", name)));
        }
        let arg = self.nested(Parser::parse_sum)?;
        if !self.eat(')') {
            return Err(Error::Syntax(format!(
                "missing ')' after the argument of '{}'",
                name
            )));
        }
        match kind {
            FunctionKind::Plain(function) => Ok(function(arg)),
            FunctionKind::Circular(function) => Ok(function(self.angle_unit.to_radians(arg))),
            FunctionKind::InverseCircular(function) => {
                Ok(self.angle_unit.from_radians(function(arg)))
            }
            FunctionKind::Factorial => funcs::factorial(arg),
        }
    }

    /// Number literal: digits, an optional fraction and an optional signed
    /// exponent, parsed by `f64::from_str` at the end.
    fn parse_number(&mut self) -> Result<f64, Error> {
        let start = self.pos;
        self.eat_digits();
        if self.eat('.') {
            self.eat_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if !self.eat('+') {
                self.eat('-');
            }
            self.eat_digits();
        }
        if self.pos == start {
            return match self.peek() {
                Some(other) => Err(Error::Syntax(format!(
                    "unexpected character '{}' at position {}",
                    other, self.pos
                ))),
                None => Err(Error::Syntax("unexpected end of expression".into())),
            };
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        literal
            .parse()
            .map_err(|_| Error::Syntax(format!("invalid number '{}'", literal)))
    }

    fn eat_digits(&mut self) {
        while matches!(self.peek(), Some('0'..='9')) {
            self.bump();
        }
    }
}
