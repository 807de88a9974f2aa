use serde::Deserialize;

use super::AreaUnit;

/// Fraction digits needed to print any finite f64 exactly
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Digit grouping and decimal separators for labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NumberFormat {
    pub group: char,
    pub decimal: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            group: ',',
            decimal: '.',
        }
    }
}

impl NumberFormat {
    /// Separators for a language tag such as `de`, `fr-CA` or `en_GB`
    ///
    /// Only the primary language subtag is considered; unknown languages
    /// use the English separators.
    pub fn for_locale(tag: &str) -> Self {
        let lang = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        let (group, decimal) = match lang.as_str() {
            "de" | "es" | "it" | "nl" | "pt" | "da" | "id" | "tr" | "el" | "sl" | "hr" => {
                ('.', ',')
            }
            "fr" | "cs" | "sk" | "pl" | "ru" | "uk" | "hu" | "fi" | "sv" | "nb" | "bg" => {
                ('\u{a0}', ',')
            }
            _ => (',', '.'),
        };

        Self { group, decimal }
    }

    /// Format a number with magnitude-dependent precision
    ///
    /// At most 0 fraction digits from one million up, 1 from a thousand, 2
    /// from one, 4 below that. Ties round half away from zero on the exact
    /// binary value. Trailing fraction zeros are dropped. NaN formats as an
    /// empty string.
    pub fn format(&self, num: f64) -> String {
        if num.is_nan() {
            return String::new();
        }
        if num.is_infinite() {
            return if num > 0.0 { "∞" } else { "-∞" }.to_string();
        }

        let (int_part, frac_part) = round_half_away(num.abs(), max_fraction_digits(num));
        let frac_part = frac_part.trim_end_matches('0');

        let mut out = String::with_capacity(int_part.len() * 4 / 3 + frac_part.len() + 2);
        if num.is_sign_negative() {
            out.push('-');
        }
        for (i, digit) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                out.push(self.group);
            }
            out.push(digit);
        }
        if !frac_part.is_empty() {
            out.push(self.decimal);
            out.push_str(frac_part);
        }
        out
    }

    /// Convert a hectare value and format it with the unit suffix
    ///
    /// NaN areas are shown as zero.
    pub fn format_area(&self, hectares: f64, unit: AreaUnit) -> String {
        let hectares = if hectares.is_nan() { 0.0 } else { hectares };
        format!("{} {}", self.format(unit.from_hectares(hectares)), unit.symbol())
    }
}

/// Maximum fraction digits shown for a value of this magnitude
pub fn max_fraction_digits(num: f64) -> usize {
    if num >= 1e6 {
        0
    } else if num >= 1e3 {
        1
    } else if num >= 1.0 {
        2
    } else {
        4
    }
}

/// Integer and fraction digits of a non-negative value rounded to `digits`
/// fraction digits, halves going up
///
/// The exact decimal expansion is printed first so the digit after the cut
/// alone decides the rounding.
fn round_half_away(abs: f64, digits: usize) -> (String, String) {
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, abs);
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let round_up = frac_part.as_bytes().get(digits).is_some_and(|&d| d >= b'5');

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(digits))
        .collect();
    if round_up {
        let mut carry = true;
        for digit in kept.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let (int_digits, frac_digits) = kept.split_at(kept.len() - digits);
    (
        int_digits.iter().map(|&d| char::from(d)).collect(),
        frac_digits.iter().map(|&d| char::from(d)).collect(),
    )
}

/// Format with the default (English) separators
pub fn format_number(num: f64) -> String {
    NumberFormat::default().format(num)
}

/// Format a hectare value in `unit` with the default separators
pub fn format_area(hectares: f64, unit: AreaUnit) -> String {
    NumberFormat::default().format_area(hectares, unit)
}
