//! Compact human-readable number formatting.
//!
//! Output only depends on the arguments (Rust `format!` is locale-free), so
//! strings are stable across machines and safe to assert on in tests.
//!
//! Rules, in priority order:
//!
//! 1. missing / non-finite → `N/A`
//! 2. percent units (or percent-type series) → one decimal + `%`, scale ignored
//! 3. index units → one decimal, no suffix
//! 4. everything else → `value × 10^unit_scale` with a `T`/`B`/`M`/`K` suffix,
//!    `$` prefix for currency units
//!
//! Deltas of percent-type series are percentage points (`+0.2pp`), never `%`.

const NA: &str = "N/A";

const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitClass {
    Percent,
    Index,
    Amount { currency: bool },
}

fn classify(unit: Option<&str>, is_percent_type: bool) -> UnitClass {
    let unit = unit.unwrap_or("").to_ascii_lowercase();
    if is_percent_type || unit.contains("percent") {
        UnitClass::Percent
    } else if unit.contains("index") {
        UnitClass::Index
    } else {
        let currency = unit.contains("dollar") || unit.contains("usd") || unit.contains('$');
        UnitClass::Amount { currency }
    }
}

/// Format a level value.
///
/// `format_magnitude(Some(1234567.0), None, Some(0), false)` → `"1.23M"`.
pub fn format_magnitude(
    value: Option<f64>,
    unit: Option<&str>,
    unit_scale: Option<i32>,
    is_percent_type: bool,
) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return NA.to_string();
    };

    match classify(unit, is_percent_type) {
        UnitClass::Percent => format!("{}%", one_decimal(v, false)),
        UnitClass::Index => group_thousands(&one_decimal(v, false)),
        UnitClass::Amount { currency } => amount(scaled(v, unit_scale), currency, false),
    }
}

/// Format an absolute change between two levels of the same series.
///
/// Always signed: `+0.2pp` for percent-type series, `+1.4` for indexes,
/// `-$1.5B` for currency amounts.
pub fn format_delta(
    delta: Option<f64>,
    unit: Option<&str>,
    unit_scale: Option<i32>,
    is_percent_type: bool,
) -> String {
    let Some(d) = delta.filter(|v| v.is_finite()) else {
        return NA.to_string();
    };

    match classify(unit, is_percent_type) {
        UnitClass::Percent => format!("{}pp", one_decimal(d, true)),
        UnitClass::Index => one_decimal(d, true),
        UnitClass::Amount { currency } => amount(scaled(d, unit_scale), currency, true),
    }
}

/// Format a relative change in percent: `+2.1%`.
pub fn format_pct_change(pct: Option<f64>) -> String {
    match pct.filter(|v| v.is_finite()) {
        Some(p) => format!("{}%", one_decimal(p, true)),
        None => NA.to_string(),
    }
}

fn scaled(v: f64, unit_scale: Option<i32>) -> f64 {
    v * 10f64.powi(unit_scale.unwrap_or(0))
}

fn amount(v: f64, currency: bool, signed: bool) -> String {
    if !v.is_finite() {
        return NA.to_string();
    }
    let plus = if signed { "+" } else { "" };
    let dollar = if currency { "$" } else { "" };
    let body = amount_body(v.abs());

    // Rounding can produce "-0" for tiny negatives.
    if body == "0" {
        return format!("{plus}{dollar}0");
    }
    let sign = if v < 0.0 { "-" } else { plus };
    format!("{sign}{dollar}{body}")
}

/// Suffixed body of a non-negative amount.
///
/// The suffix is chosen from the raw value, then bumped one step up when
/// rounding the quotient reaches 1000 (`999_999` → `1M`, not `1000K`).
fn amount_body(abs: f64) -> String {
    let mut idx = SUFFIXES.iter().position(|(threshold, _)| abs >= *threshold);
    loop {
        match idx {
            Some(i) => {
                let (threshold, suffix) = SUFFIXES[i];
                let quotient = abs / threshold;
                if i > 0 && rounds_to_thousand(quotient) {
                    idx = Some(i - 1);
                    continue;
                }
                return format!("{}{suffix}", trim_decimals(quotient));
            }
            None => {
                if rounds_to_thousand(abs) {
                    idx = Some(SUFFIXES.len() - 1);
                    continue;
                }
                return group_thousands(&trim_decimals(abs));
            }
        }
    }
}

fn rounds_to_thousand(v: f64) -> bool {
    format!("{v:.2}").parse::<f64>().unwrap_or(v) >= 1000.0
}

/// One decimal, with `-0.0` folded into `0.0` (or `+0.0` when signed).
fn one_decimal(v: f64, signed: bool) -> String {
    let s = if signed { format!("{v:+.1}") } else { format!("{v:.1}") };
    match s.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => {
            if signed {
                format!("+{rest}")
            } else {
                rest.to_string()
            }
        }
        _ => s,
    }
}

/// Two decimals with trailing zeros (and a dangling point) removed.
fn trim_decimals(v: f64) -> String {
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Insert `,` separators into the integer part of a plain decimal string.
fn group_thousands(s: &str) -> String {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int, frac) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
