//! Display formatting for amounts, ratios and long labels.

use std::fmt;

/// Thousands separator of the fr-FR locale (narrow no-break space)
pub const GROUP_SEPARATOR: char = '\u{202F}';
/// Separator between the amount and the currency symbol (no-break space)
pub const CURRENCY_SEPARATOR: char = '\u{00A0}';

/// Loss ratio above which a result is flagged as severe (percent)
pub const SEVERE_LOSS_RATIO: f64 = 20.0;

/// Round to cents with exact half cents going away from zero.
///
/// A double lies exactly on a half cent only when it is an odd multiple of
/// 1/8; every other value is already rounded correctly by `{:.2}`.
fn round_half_cents(x: f64) -> f64 {
    let eighths = x * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        (x * 100.0).round() / 100.0
    } else {
        x
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// Format an amount in euros the way the fr-FR locale does:
/// `1234.5` becomes `1 234,50 €`.
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        return format!("NaN{}€", CURRENCY_SEPARATOR);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    if amount.is_infinite() {
        return format!("{}∞{}€", sign, CURRENCY_SEPARATOR);
    }

    let fixed = format!("{:.2}", round_half_cents(amount.abs()));
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!(
        "{}{},{}{}€",
        sign,
        group_thousands(int_part),
        frac_part,
        CURRENCY_SEPARATOR
    )
}

/// Cut `text` to `max_len` characters and append `...` when it is longer
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let head: String = text.chars().take(max_len).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Maximum loss as a percentage of portfolio value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LossRatio {
    Percent(f64),
    /// Portfolio value is zero or an input is not finite
    Undefined,
}

impl LossRatio {
    pub fn compute(max_loss: f64, portfolio_value: f64) -> Self {
        if portfolio_value == 0.0 {
            return Self::Undefined;
        }
        let ratio = max_loss / portfolio_value * 100.0;
        if ratio.is_finite() {
            Self::Percent(ratio)
        } else {
            Self::Undefined
        }
    }

    pub fn is_severe(&self) -> bool {
        matches!(self, Self::Percent(p) if *p > SEVERE_LOSS_RATIO)
    }

    /// Text colour class of the ratio in the results panel
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Undefined => "text-gray-500",
            _ if self.is_severe() => "text-red-600",
            _ => "text-green-600",
        }
    }
}

impl fmt::Display for LossRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "{:.2}%", round_half_cents(*p)),
            Self::Undefined => f.write_str("N/A"),
        }
    }
}
