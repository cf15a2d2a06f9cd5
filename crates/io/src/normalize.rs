// Shared field normalization for both source formats.

use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// Extract the canonical 10-digit tax identifier from a raw cell.
/// Returns an empty string when no 10-digit run is present; empty ids are
/// data, not errors, and the engine lets them match each other.
pub fn extract_tax_id(raw: &str) -> String {
    static TAX_ID: OnceLock<Regex> = OnceLock::new();
    let re = TAX_ID.get_or_init(|| Regex::new(r"\d{10}").unwrap());
    re.find(raw).map(|m| m.as_str().to_string()).unwrap_or_default()
}

/// Parse a money amount into integer cents without going through floats.
///
/// Bank exports use a decimal comma (`1234,56`); invoice exports may use a
/// dot. The last `,` or `.` is the decimal separator when it is followed by
/// one or two digits; a longer tail means it was a grouping separator.
pub fn parse_amount_cents(raw: &str) -> Option<i64> {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();
    if compact.is_empty() {
        return None;
    }

    let (negative, body) = match compact.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, compact.as_str()),
    };

    let sep = body.rfind(|c| c == ',' || c == '.');
    let (int_part, frac_part) = match sep {
        Some(i) if body.len() - i - 1 <= 2 => (&body[..i], &body[i + 1..]),
        _ => (body, ""),
    };

    let digits: String = int_part.chars().filter(|c| *c != ',' && *c != '.').collect();
    if digits.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !digits.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let whole: i64 = if digits.is_empty() { 0 } else { digits.parse().ok()? };
    let frac: i64 = match frac_part.len() {
        0 => 0,
        1 => frac_part.parse::<i64>().ok()? * 10,
        _ => frac_part.parse().ok()?,
    };

    let cents = whole.checked_mul(100)?.checked_add(frac)?;
    Some(if negative { -cents } else { cents })
}

/// Convert an Excel 1900-system serial day number to a calendar date.
/// Epoch 1899-12-30, matching how workbook readers expose cached serials.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if serial < 1.0 {
        return None;
    }
    let days = serial.floor() as i64;
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_signed(chrono::Duration::days(days))
}

/// Read file and convert to UTF-8 if needed. The bank's statement exports
/// predate UTF-8; Windows-1254 covers the Azeri/Turkish code page they use.
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1254.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_id_extraction() {
        assert_eq!(extract_tax_id("1234567890"), "1234567890");
        assert_eq!(extract_tax_id("VOEN: 1234567890 / branch 2"), "1234567890");
        assert_eq!(extract_tax_id("no digits here"), "");
        assert_eq!(extract_tax_id("123456789"), "");
        // A longer run still yields the first ten digits.
        assert_eq!(extract_tax_id("123456789012"), "1234567890");
    }

    #[test]
    fn amounts_with_decimal_comma() {
        assert_eq!(parse_amount_cents("1234,56"), Some(123_456));
        assert_eq!(parse_amount_cents("0,5"), Some(50));
        assert_eq!(parse_amount_cents("700"), Some(70_000));
        assert_eq!(parse_amount_cents("-12,30"), Some(-1_230));
    }

    #[test]
    fn amounts_with_grouping_separators() {
        assert_eq!(parse_amount_cents("1.234,56"), Some(123_456));
        assert_eq!(parse_amount_cents("1,234.56"), Some(123_456));
        assert_eq!(parse_amount_cents("1 234,56"), Some(123_456));
        // Three-digit tail is grouping, not a decimal part.
        assert_eq!(parse_amount_cents("1.234"), Some(123_400));
    }

    #[test]
    fn garbage_amounts_are_rejected() {
        assert_eq!(parse_amount_cents(""), None);
        assert_eq!(parse_amount_cents("   "), None);
        assert_eq!(parse_amount_cents("n/a"), None);
        assert_eq!(parse_amount_cents("12,3x"), None);
    }

    #[test]
    fn excel_serials() {
        // 45292 = 2024-01-01 in the 1900 date system.
        assert_eq!(
            excel_serial_to_date(45292.0),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(
            excel_serial_to_date(45292.75),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(excel_serial_to_date(0.0), None);
    }

    #[test]
    fn legacy_encoding_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.txt");
        // "ödəniş" fragment in Windows-1254: 0xF6 is ö.
        std::fs::write(&path, [0xF6, b'd', b'e', b'm', b'e']).unwrap();
        let decoded = read_file_as_utf8(&path).unwrap();
        assert_eq!(decoded, "ödeme");
    }
}
