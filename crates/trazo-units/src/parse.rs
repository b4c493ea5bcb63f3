//! The dimension grammar scanner and parsers.
//!
//! Two independent dimension parsers (metric and imperial) share
//! one byte-peeking scanner and one trailing-adjustment step. Keeping
//! the grammars separate keeps each trivially testable; the active
//! system picks the parser at the call site.

use crate::{
    FieldKind, UnitError, UnitSystem, METERS_PER_FOOT, METERS_PER_INCH,
    SQUARE_METERS_PER_SQUARE_FOOT,
};

/// Byte-peeking scanner over one input field.
struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.input[self.pos..].starts_with(s.as_bytes()) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ') | Some(b'\t')) {
            self.bump();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn rest(&self) -> String {
        String::from_utf8_lossy(&self.input[self.pos..]).into_owned()
    }

    fn at_digit(&self) -> bool {
        matches!(self.peek(), Some(b'0'..=b'9'))
    }

    /// Scan a signed decimal number.
    fn scan_number(&mut self) -> Result<f64, UnitError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
            self.bump();
        }
        let digits_start = self.pos;
        while self.at_digit() {
            self.bump();
        }
        if self.eat(b'.') {
            while self.at_digit() {
                self.bump();
            }
        }
        if self.pos == digits_start {
            return Err(UnitError::InvalidNumber(self.rest()));
        }
        let text = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| UnitError::InvalidNumber(self.rest()))?;
        text.parse()
            .map_err(|_| UnitError::InvalidNumber(text.to_string()))
    }
}

/// Parse one field's text into an SI value (meters, degrees, square
/// meters).
///
/// On failure the caller must keep the field's last valid value; no
/// partial value ever escapes.
pub fn parse_value(text: &str, kind: FieldKind, system: UnitSystem) -> Result<f64, UnitError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(UnitError::Empty);
    }
    let mut scanner = Scanner::new(trimmed);

    // A leading `=` marks a formula; the grammar after it is the same.
    scanner.eat(b'=');
    scanner.skip_whitespace();

    let base = match kind {
        FieldKind::Angle => scanner.scan_number()?,
        FieldKind::Area => {
            let v = scanner.scan_number()?;
            match system {
                UnitSystem::Metric => v,
                UnitSystem::Imperial => v * SQUARE_METERS_PER_SQUARE_FOOT,
            }
        }
        _ => match system {
            UnitSystem::Metric => scan_metric(&mut scanner)?,
            UnitSystem::Imperial => scan_imperial(&mut scanner)?,
        },
    };

    let value = apply_adjustment(&mut scanner, base)?;

    scanner.skip_whitespace();
    if !scanner.at_end() {
        return Err(UnitError::Trailing(scanner.rest()));
    }
    Ok(value)
}

/// Metric dimension: `NUMBER` with an optional `mm|cm|dm|m` suffix;
/// bare numbers are meters.
fn scan_metric(s: &mut Scanner) -> Result<f64, UnitError> {
    let v = s.scan_number()?;
    // Longest suffix first so "mm" is not read as "m" + trailing.
    let factor = if s.eat_str("mm") {
        1e-3
    } else if s.eat_str("cm") {
        1e-2
    } else if s.eat_str("dm") {
        1e-1
    } else if s.eat_str("m") {
        1.0
    } else {
        1.0
    };
    Ok(v * factor)
}

/// Imperial dimension: `F'`, `F'-I"`, `F' I"`, `I"`, `a/b"`, with the
/// inches term optionally a whole-plus-fraction (`6 1/2"`). A bare
/// number is feet (construction drafting convention).
fn scan_imperial(s: &mut Scanner) -> Result<f64, UnitError> {
    let first = s.scan_number()?;

    if s.eat(b'\'') {
        // Feet, optionally followed by a hyphen- or space-separated
        // inches term.
        s.skip_whitespace();
        let separated = s.eat(b'-');
        s.skip_whitespace();
        let inches = if s.at_digit() {
            scan_inches(s)?
        } else if separated {
            return Err(UnitError::InvalidNumber(s.rest()));
        } else {
            0.0
        };
        let total_inches = if first.is_sign_negative() {
            -(first.abs() * 12.0 + inches)
        } else {
            first * 12.0 + inches
        };
        return Ok(total_inches * METERS_PER_INCH);
    }

    if s.eat(b'"') {
        return Ok(first * METERS_PER_INCH);
    }

    if s.eat(b'/') {
        let denominator = s.scan_number()?;
        if denominator == 0.0 {
            return Err(UnitError::ZeroDenominator);
        }
        s.eat(b'"');
        return Ok(first / denominator * METERS_PER_INCH);
    }

    Ok(first * METERS_PER_FOOT)
}

/// Inches term: `I`, `a/b`, or `I a/b`, with an optional closing `"`.
fn scan_inches(s: &mut Scanner) -> Result<f64, UnitError> {
    let first = s.scan_number()?;

    if s.eat(b'/') {
        let denominator = s.scan_number()?;
        if denominator == 0.0 {
            return Err(UnitError::ZeroDenominator);
        }
        s.eat(b'"');
        return Ok(first / denominator);
    }

    // Possible whole-plus-fraction: "6 1/2".
    let save = s.pos;
    s.skip_whitespace();
    if s.pos > save && s.at_digit() {
        let numerator = s.scan_number()?;
        if s.eat(b'/') {
            let denominator = s.scan_number()?;
            if denominator == 0.0 {
                return Err(UnitError::ZeroDenominator);
            }
            s.eat(b'"');
            return Ok(first + numerator / denominator);
        }
        // Not a fraction after all; leave the extra number to the
        // trailing check.
        return Err(UnitError::InvalidFraction(s.rest()));
    }
    s.pos = save;

    s.eat(b'"');
    Ok(first)
}

/// Optional trailing adjustment: `+ - * /` and a plain number,
/// applied after the dimension resolved to SI.
fn apply_adjustment(s: &mut Scanner, value: f64) -> Result<f64, UnitError> {
    s.skip_whitespace();
    let op = match s.peek() {
        Some(op @ (b'+' | b'-' | b'*' | b'/')) => op,
        _ => return Ok(value),
    };
    s.bump();
    s.skip_whitespace();
    let operand = s.scan_number()?;
    match op {
        b'+' => Ok(value + operand),
        b'-' => Ok(value - operand),
        b'*' => Ok(value * operand),
        _ => {
            if operand == 0.0 {
                Err(UnitError::ZeroDenominator)
            } else {
                Ok(value / operand)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(text: &str) -> Result<f64, UnitError> {
        parse_value(text, FieldKind::Distance, UnitSystem::Metric)
    }

    fn imperial(text: &str) -> Result<f64, UnitError> {
        parse_value(text, FieldKind::Distance, UnitSystem::Imperial)
    }

    #[test]
    fn test_metric_bare_is_meters() {
        assert!((metric("2.5").unwrap() - 2.5).abs() < 1e-12);
        assert!((metric("-1.25").unwrap() + 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_metric_suffixes() {
        assert!((metric("250mm").unwrap() - 0.25).abs() < 1e-12);
        assert!((metric("25cm").unwrap() - 0.25).abs() < 1e-12);
        assert!((metric("2.5dm").unwrap() - 0.25).abs() < 1e-12);
        assert!((metric("0.25m").unwrap() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_imperial_feet_inches() {
        // 2'-6" is 0.762 m.
        assert!((imperial("2'-6\"").unwrap() - 0.762).abs() < 1e-9);
        assert!((imperial("2' 6\"").unwrap() - 0.762).abs() < 1e-9);
        assert!((imperial("2'").unwrap() - 0.6096).abs() < 1e-9);
    }

    #[test]
    fn test_imperial_inches_and_fractions() {
        assert!((imperial("6\"").unwrap() - 0.1524).abs() < 1e-9);
        assert!((imperial("1/2\"").unwrap() - 0.0127).abs() < 1e-9);
        assert!((imperial("6 1/2\"").unwrap() - 6.5 * METERS_PER_INCH).abs() < 1e-9);
        assert!((imperial("2'-6 1/2\"").unwrap() - 30.5 * METERS_PER_INCH).abs() < 1e-9);
    }

    #[test]
    fn test_imperial_bare_is_feet() {
        assert!((imperial("3").unwrap() - 0.9144).abs() < 1e-9);
        assert!((imperial("-2").unwrap() + 0.6096).abs() < 1e-9);
    }

    #[test]
    fn test_negative_feet_carry_inches() {
        assert!((imperial("-2'-6\"").unwrap() + 0.762).abs() < 1e-9);
    }

    #[test]
    fn test_adjustments() {
        assert!((metric("3+0.5").unwrap() - 3.5).abs() < 1e-12);
        assert!((metric("=2*2").unwrap() - 4.0).abs() < 1e-12);
        assert!((metric("10 / 4").unwrap() - 2.5).abs() < 1e-12);
        // Imperial: adjustment applies after SI resolution.
        assert!((imperial("2'-6\"+0.5").unwrap() - 1.262).abs() < 1e-9);
    }

    #[test]
    fn test_angle_is_plain_degrees() {
        for system in [UnitSystem::Metric, UnitSystem::Imperial] {
            assert!((parse_value("45", FieldKind::Angle, system).unwrap() - 45.0).abs() < 1e-12);
            assert!(
                (parse_value("=30+15", FieldKind::Angle, system).unwrap() - 45.0).abs() < 1e-12
            );
        }
    }

    #[test]
    fn test_area_units_follow_system() {
        assert!((parse_value("2", FieldKind::Area, UnitSystem::Metric).unwrap() - 2.0).abs()
            < 1e-12);
        let imperial_area = parse_value("2", FieldKind::Area, UnitSystem::Imperial).unwrap();
        assert!((imperial_area - 2.0 * SQUARE_METERS_PER_SQUARE_FOOT).abs() < 1e-12);
    }

    #[test]
    fn test_rejections() {
        assert_eq!(metric(""), Err(UnitError::Empty));
        assert_eq!(metric("   "), Err(UnitError::Empty));
        assert!(matches!(metric("abc"), Err(UnitError::InvalidNumber(_))));
        assert!(matches!(metric("2meters"), Err(UnitError::Trailing(_))));
        assert_eq!(imperial("1/0\""), Err(UnitError::ZeroDenominator));
        assert_eq!(metric("4/0"), Err(UnitError::ZeroDenominator));
        assert!(matches!(imperial("2'-"), Err(UnitError::InvalidNumber(_))));
    }

    #[test]
    fn test_division_adjustment_still_works_in_imperial() {
        // "10/4" in imperial is a fraction of an inch, not an
        // adjustment; the fraction form wins.
        assert!((imperial("10/4").unwrap() - 2.5 * METERS_PER_INCH).abs() < 1e-9);
    }
}
