//! Rate resolution and conversion arithmetic.
//!
//! All rates are units of currency per 1 USD, so converting between two
//! currencies goes through a USD amount first.

use crate::store::DateRateRecord;

/// Currency every stored rate is quoted against.
pub const BASE_CURRENCY: &str = "USD";

/// Currency codes are matched case-insensitively by uppercasing.
pub fn normalize_code(code: &str) -> String {
    code.to_uppercase()
}

/// Stored rate for `code` on this date.
///
/// A rate of exactly zero cannot be used as a divisor and is reported the
/// same as a missing currency. So is any rate stored as something other than
/// a JSON number.
pub fn lookup_rate(record: &DateRateRecord, code: &str) -> Option<f64> {
    record
        .rate(code)
        .filter(|rate| *rate != 0.0 && !rate.is_nan())
}

/// Like [`lookup_rate`], but the base currency always resolves to 1.0.
pub fn resolve_rate(record: &DateRateRecord, code: &str) -> Option<f64> {
    if code == BASE_CURRENCY {
        Some(1.0)
    } else {
        lookup_rate(record, code)
    }
}

/// USD amount expressed in a currency quoted at `rate`.
pub fn from_usd(amount: f64, rate: f64) -> f64 {
    amount * rate
}

/// Convert through USD: `amount / from_rate * to_rate`.
pub fn convert_between(amount: f64, from_rate: f64, to_rate: f64) -> f64 {
    let usd_value = amount / from_rate;
    usd_value * to_rate
}

/// Parse an amount path segment.
///
/// Lenient on purpose: surrounding whitespace is ignored, an empty value is
/// zero, `0x`/`0o`/`0b` prefixes and `Infinity` are accepted, and anything
/// else that does not parse becomes NaN instead of an error.
pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|v| v as f64)
                .unwrap_or(f64::NAN);
        }
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // f64::from_str also takes "inf"/"nan" spellings, which are not amounts.
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return f64::NAN;
    }

    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Format with exactly two decimals.
///
/// Exact binary ties (multiples of 1/8 with an odd numerator) round away from
/// zero. Non-finite values print as `NaN`, `Infinity` and `-Infinity`.
pub fn format_amount(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    let eighths = magnitude * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        // Whole and fractional parts are both exact here, and the fraction is
        // at most 7/8 so the cents never carry.
        let whole = magnitude.trunc();
        let cents = (magnitude.fract() * 100.0 + 0.5).floor();
        return format!("{sign}{whole:.0}.{cents:02.0}");
    }

    format!("{sign}{magnitude:.2}")
}
