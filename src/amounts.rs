use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

const NUMBER_PATTERN: &str = r"-?(?:\d[\d,]*(?:\.\d+)?|\.\d+)";

fn number_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NUMBER_PATTERN).ok()).as_ref()
}

/// Map Arabic-Indic and Extended Arabic-Indic digits plus the Arabic decimal
/// and thousands separators onto their ASCII forms.
fn normalize_digits(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            '\u{066B}' => '.',
            '\u{066C}' => ',',
            _ => c,
        })
        .collect()
}

/// Read an amount out of free text as entered ("1,250.00 SAR", "٣٥٠", "$12").
///
/// Commas are thousands separators. Returns `None` when the text holds no
/// number or more than one, so ambiguous input is stored as missing rather
/// than guessed.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let text = normalize_digits(raw.trim());
    if text.is_empty() {
        return None;
    }
    let re = number_re()?;
    let mut found = re.find_iter(&text);
    let first = found.next()?;
    if found.next().is_some() {
        return None;
    }
    let mut digits = first.as_str().replace(',', "");
    // ".5" and "-.5" need a leading zero.
    if let Some(pos) = digits.find('.') {
        if digits[..pos].trim_start_matches('-').is_empty() {
            digits.insert(pos, '0');
        }
    }
    Decimal::from_str(&digits).ok()
}

/// Canonical text of a stored amount, used by the free-text search: trailing
/// zeros dropped, always with a fractional part (`100.0`, `12.5`).
pub fn amount_text(value: Decimal) -> String {
    let s = value.normalize().to_string();
    if s.contains('.') {
        s
    } else {
        format!("{s}.0")
    }
}
