use crate::config::Config;

/// How the integer part of a number is split into groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitGrouping {
    /// `1,234,567`
    Western,
    /// Last three digits, then pairs: `12,34,567`.
    Indian,
}

/// Locale-aware number formatting preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub grouping: DigitGrouping,
    pub max_fraction_digits: u8,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::for_tag("en-IN")
    }
}

impl LocaleConfig {
    /// Resolves a language tag to formatting rules. Unknown tags fall back to
    /// Western grouping with `.` decimals.
    pub fn for_tag(tag: &str) -> Self {
        let grouping = if tag.eq_ignore_ascii_case("en-IN") || tag.eq_ignore_ascii_case("hi-IN")
        {
            DigitGrouping::Indian
        } else {
            DigitGrouping::Western
        };
        Self {
            language_tag: tag.to_string(),
            decimal_separator: '.',
            grouping_separator: ',',
            grouping,
            max_fraction_digits: 3,
        }
    }
}

/// Formats amounts as `<symbol><grouped number>` for a fixed locale.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyFormatter {
    symbol: String,
    locale: LocaleConfig,
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new("₹", LocaleConfig::default())
    }
}

impl CurrencyFormatter {
    pub fn new(symbol: impl Into<String>, locale: LocaleConfig) -> Self {
        Self {
            symbol: symbol.into(),
            locale,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.currency_symbol.clone(),
            LocaleConfig::for_tag(&config.locale),
        )
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn locale(&self) -> &LocaleConfig {
        &self.locale
    }

    /// Symbol prefix followed by the locale number; the sign sits after the
    /// symbol (`₹-1,200`).
    pub fn format(&self, amount: f64) -> String {
        format!("{}{}", self.symbol, format_number(&self.locale, amount))
    }
}

/// Shorthand for the default rupee/en-IN formatter.
pub fn format_currency(amount: f64) -> String {
    CurrencyFormatter::default().format(amount)
}

/// Renders a number with grouping and up to `max_fraction_digits` decimals,
/// trailing zeros dropped. Rounding is half away from zero on the shortest
/// decimal form of `value`, so `1.0625` becomes `1.063`.
pub fn format_number(locale: &LocaleConfig, value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let (int_part, frac_part) =
        round_decimal(&value.abs().to_string(), locale.max_fraction_digits as usize);

    let is_zero = int_part.chars().all(|ch| ch == '0') && frac_part.is_empty();
    let mut body = String::new();
    if value.is_sign_negative() && !is_zero {
        body.push('-');
    }
    body.push_str(&group_digits(&int_part, locale.grouping, locale.grouping_separator));
    if !frac_part.is_empty() {
        body.push(locale.decimal_separator);
        body.push_str(&frac_part);
    }
    body
}

/// Splits a plain decimal string into integer and fraction digits, rounding
/// the fraction half-up to `digits` places and dropping trailing zeros.
fn round_decimal(decimal: &str, digits: usize) -> (String, String) {
    let (int_part, frac_part) = decimal.split_once('.').unwrap_or((decimal, ""));
    if frac_part.len() <= digits {
        return (
            int_part.to_string(),
            frac_part.trim_end_matches('0').to_string(),
        );
    }

    let round_up = frac_part[digits..].starts_with(['5', '6', '7', '8', '9']);
    let mut kept: Vec<char> = int_part
        .chars()
        .chain(frac_part.chars().take(digits))
        .collect();
    if round_up {
        let mut idx = kept.len();
        loop {
            if idx == 0 {
                kept.insert(0, '1');
                break;
            }
            idx -= 1;
            if kept[idx] == '9' {
                kept[idx] = '0';
            } else {
                kept[idx] = char::from(kept[idx] as u8 + 1);
                break;
            }
        }
    }

    let split = kept.len() - digits;
    let frac: String = kept[split..].iter().collect();
    (
        kept[..split].iter().collect(),
        frac.trim_end_matches('0').to_string(),
    )
}

fn group_digits(digits: &str, grouping: DigitGrouping, separator: char) -> String {
    let chars: Vec<char> = digits.chars().collect();
    if chars.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = chars.split_at(chars.len() - 3);
    let step = match grouping {
        DigitGrouping::Western => 3,
        DigitGrouping::Indian => 2,
    };

    let mut groups: Vec<String> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(step);
        groups.push(head[start..end].iter().collect());
        end = start;
    }
    groups.reverse();

    let mut out = groups.join(&separator.to_string());
    out.push(separator);
    out.extend(tail.iter());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indian_grouping_splits_pairs_after_thousands() {
        assert_eq!(format_currency(1234567.0), "₹12,34,567");
        assert_eq!(format_currency(100000.0), "₹1,00,000");
        assert_eq!(format_currency(999.0), "₹999");
        assert_eq!(format_currency(1000.0), "₹1,000");
    }

    #[test]
    fn fraction_digits_are_trimmed_and_capped() {
        assert_eq!(format_currency(10.5), "₹10.5");
        assert_eq!(format_currency(10.0), "₹10");
        assert_eq!(format_currency(1.23456), "₹1.235");
        assert_eq!(format_currency(1.0625), "₹1.063");
        assert_eq!(format_currency(2.0005), "₹2.001");
        assert_eq!(format_currency(12345.6785), "₹12,345.679");
        assert_eq!(format_currency(-2.0005), "₹-2.001");
    }

    #[test]
    fn rounding_carries_into_the_integer_part() {
        assert_eq!(format_currency(9.9995), "₹10");
        assert_eq!(format_currency(99999.9999), "₹1,00,000");
        assert_eq!(format_currency(0.0005), "₹0.001");
    }

    #[test]
    fn negative_values_keep_symbol_first() {
        assert_eq!(format_currency(-100.0), "₹-100");
        assert_eq!(format_currency(-123456.75), "₹-1,23,456.75");
    }

    #[test]
    fn zero_never_shows_a_sign() {
        assert_eq!(format_currency(0.0), "₹0");
        assert_eq!(format_currency(-0.0), "₹0");
        assert_eq!(format_currency(-0.0001), "₹0");
    }

    #[test]
    fn western_locale_groups_by_three() {
        let formatter = CurrencyFormatter::new("$", LocaleConfig::for_tag("en-US"));
        assert_eq!(formatter.format(1234567.5), "$1,234,567.5");
    }
}
