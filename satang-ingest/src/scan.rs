//! Token helpers shared by the issuer parsers: amount, date and clock
//! tokens, plus keyword scans over the core lexicons.

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;

use satang_core::keywords::{CHANNEL_KEYWORDS, DEPOSIT_KEYWORDS, WITHDRAWAL_KEYWORDS};

/// Compile a known-good pattern; a malformed pattern yields no matches
/// rather than a panic.
pub(crate) fn regex(pattern: &str) -> Option<Regex> {
    Regex::new(pattern).ok()
}

/// First capture group of `pattern` in `text`.
pub fn capture1(text: &str, pattern: &str) -> Option<String> {
    let re = regex(pattern)?;
    let caps = re.captures(text)?;
    Some(caps.get(1)?.as_str().to_string())
}

/// First and second capture groups of `pattern` in `text`.
pub fn capture2(text: &str, pattern: &str) -> Option<(String, String)> {
    let re = regex(pattern)?;
    let caps = re.captures(text)?;
    Some((
        caps.get(1)?.as_str().to_string(),
        caps.get(2)?.as_str().to_string(),
    ))
}

/// Parse a grouped-thousands amount like "8,400.00" into an exact decimal.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// All amount tokens on a line, in order of appearance.
pub fn find_amounts(line: &str) -> Vec<Decimal> {
    let Some(re) = regex(r"[\d,]+\.\d{2}") else {
        return Vec::new();
    };
    re.find_iter(line)
        .filter_map(|m| parse_amount(m.as_str()))
        .collect()
}

/// Parse a two-digit-year date like "01-11-25" or "01/04/24". Two-digit
/// years are read as 20xx.
pub fn parse_dmy_short(s: &str, sep: char) -> Option<NaiveDate> {
    let mut it = s.trim().split(sep);
    let day: u32 = it.next()?.parse().ok()?;
    let month: u32 = it.next()?.parse().ok()?;
    let year: i32 = it.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(2000 + year, month, day)
}

/// Parse a full date like "01/04/2024".
pub fn parse_dmy_full(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()
}

/// Parse a clock token like "19:20".
pub fn parse_clock(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}

/// True when the line contains any of the given phrases verbatim.
pub fn contains_any(line: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| line.contains(kw))
}

/// Keyword classification for free-text lines, returned as
/// `(is_withdrawal, is_deposit)`. A deposit keyword overrides a
/// withdrawal keyword so refund and correction lines land as credits.
pub fn classify(line: &str) -> (bool, bool) {
    let deposit = contains_any(line, DEPOSIT_KEYWORDS);
    let withdrawal = contains_any(line, WITHDRAWAL_KEYWORDS) && !deposit;
    (withdrawal, deposit)
}

/// Ordered, case-insensitive channel lookup; the first table entry found
/// on the line wins and its canonical spelling is returned.
pub fn find_channel(line: &str) -> Option<String> {
    let lower = line.to_lowercase();
    CHANNEL_KEYWORDS
        .iter()
        .find(|kw| lower.contains(&kw.to_lowercase()))
        .map(|kw| (*kw).to_string())
}
