use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

/// Display and parse rule for a stepper value.
///
/// The default mirrors a plain decimal formatter: integers only, at least one
/// integer digit, `,` grouping.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub allows_floats: bool,
    pub min_fraction_digits: usize,
    pub max_fraction_digits: usize,
    pub min_integer_digits: usize,
    pub grouping: bool,
    pub grouping_separator: char,
    pub decimal_separator: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::integer()
    }
}

static NUMBER_RE: OnceLock<Regex> = OnceLock::new();

// Input is normalised to `.` as decimal separator before matching.
fn number_re() -> &'static Regex {
    NUMBER_RE.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)$").expect("static number pattern compiles")
    })
}

impl NumberFormat {
    pub fn integer() -> Self {
        Self {
            allows_floats: false,
            min_fraction_digits: 0,
            max_fraction_digits: 0,
            min_integer_digits: 1,
            grouping: true,
            grouping_separator: ',',
            decimal_separator: '.',
        }
    }

    /// Fixed precision: always `digits` fraction digits.
    pub fn decimal(digits: usize) -> Self {
        Self {
            allows_floats: true,
            min_fraction_digits: digits,
            max_fraction_digits: digits,
            ..Self::integer()
        }
    }

    #[allow(dead_code)]
    pub fn with_grouping(mut self, grouping: bool) -> Self {
        self.grouping = grouping;
        self
    }

    fn fraction_digits(&self) -> usize {
        if self.allows_floats {
            self.max_fraction_digits
        } else {
            0
        }
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return String::new();
        }
        if value.is_infinite() {
            return if value > 0.0 { "∞".into() } else { "-∞".into() };
        }
        let digits = self.fraction_digits();
        let rounded = if digits == 0 {
            value.round_ties_even()
        } else {
            value
        };
        let raw = format!("{rounded:.digits$}");
        let (negative, body) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.as_str()),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));

        let mut frac = frac_part.to_string();
        let keep = self.min_fraction_digits.min(digits);
        while frac.len() > keep && frac.ends_with('0') {
            frac.pop();
        }

        let mut int_digits = int_part.to_string();
        while int_digits.len() < self.min_integer_digits {
            int_digits.insert(0, '0');
        }

        let is_zero = int_digits.chars().chain(frac.chars()).all(|c| c == '0');
        let mut out = String::new();
        if negative && !is_zero {
            out.push('-');
        }
        if self.grouping {
            out.push_str(&group_digits(&int_digits, self.grouping_separator));
        } else {
            out.push_str(&int_digits);
        }
        if !frac.is_empty() {
            out.push(self.decimal_separator);
            out.push_str(&frac);
        }
        out
    }

    /// Parses user-typed text. Returns `None` for anything that is not a
    /// finite number this format accepts.
    pub fn parse(&self, text: &str) -> Option<f64> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let mut normalized = String::with_capacity(trimmed.len());
        for ch in trimmed.chars() {
            if self.grouping && ch == self.grouping_separator {
                continue;
            }
            if ch == self.decimal_separator {
                normalized.push('.');
            } else if ch == '.' {
                return None;
            } else {
                normalized.push(ch);
            }
        }
        if !number_re().is_match(&normalized) {
            return None;
        }
        if !self.allows_floats {
            if let Some((_, frac)) = normalized.split_once('.') {
                if frac.chars().any(|c| c != '0') {
                    return None;
                }
            }
        }
        normalized.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

fn group_digits(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_is_grouped_integer() {
        let f = NumberFormat::default();
        assert_eq!(f.format(0.0), "0");
        assert_eq!(f.format(1234567.0), "1,234,567");
        assert_eq!(f.format(-1234.0), "-1,234");
        assert_eq!(f.format(2.5), "2");
        assert_eq!(f.format(3.5), "4");
        assert_eq!(f.format(-0.4), "0");
    }

    #[test]
    fn decimal_format_keeps_fixed_precision() {
        let f = NumberFormat::decimal(2);
        assert_eq!(f.format(1.5), "1.50");
        assert_eq!(f.format(1000.0), "1,000.00");
        assert_eq!(f.format(-0.001), "0.00");
    }

    #[test]
    fn trailing_zeros_trim_down_to_minimum() {
        let f = NumberFormat {
            allows_floats: true,
            min_fraction_digits: 1,
            max_fraction_digits: 3,
            ..NumberFormat::integer()
        };
        assert_eq!(f.format(2.0), "2.0");
        assert_eq!(f.format(2.125), "2.125");
        assert_eq!(f.format(2.25), "2.25");
    }

    #[test]
    fn integer_digits_are_padded_and_infinities_render() {
        let f = NumberFormat {
            min_integer_digits: 3,
            ..NumberFormat::integer().with_grouping(false)
        };
        assert_eq!(f.format(7.0), "007");
        assert_eq!(f.format(f64::INFINITY), "∞");
        assert_eq!(f.format(f64::NEG_INFINITY), "-∞");
    }

    #[test]
    fn parse_accepts_signs_grouping_and_whitespace() {
        let f = NumberFormat::default();
        assert_eq!(f.parse("42"), Some(42.0));
        assert_eq!(f.parse("  -7 "), Some(-7.0));
        assert_eq!(f.parse("+3"), Some(3.0));
        assert_eq!(f.parse("1,234"), Some(1234.0));
        assert_eq!(f.parse("5.0"), Some(5.0));
    }

    #[test]
    fn parse_rejects_garbage_and_fractions_for_integers() {
        let f = NumberFormat::default();
        assert_eq!(f.parse(""), None);
        assert_eq!(f.parse("   "), None);
        assert_eq!(f.parse("abc"), None);
        assert_eq!(f.parse("1.5"), None);
        assert_eq!(f.parse("1e3"), None);
        assert_eq!(f.parse("--1"), None);
    }

    #[test]
    fn parse_honours_custom_separators() {
        let f = NumberFormat {
            allows_floats: true,
            max_fraction_digits: 2,
            grouping_separator: '.',
            decimal_separator: ',',
            ..NumberFormat::integer()
        };
        assert_eq!(f.parse("1.234,5"), Some(1234.5));
        assert_eq!(f.format(1234.5), "1.234,5");

        let no_grouping = NumberFormat {
            decimal_separator: ',',
            ..NumberFormat::decimal(1).with_grouping(false)
        };
        assert_eq!(no_grouping.parse("2,5"), Some(2.5));
        assert_eq!(no_grouping.parse("2.5"), None);
    }
}
