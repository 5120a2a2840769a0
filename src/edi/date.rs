//! EDI date formatting.

use crate::error::ParseError;

/// Rewrite an 8-digit `YYYYMMDD` date as `YYYY-MM-DD`.
///
/// Fixed-width slicing only; no calendar check, so `20231332` becomes
/// `2023-13-32`.
pub fn format_edi_date(raw: &str) -> Result<String, ParseError> {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::MalformedDate(raw.to_string()));
    }
    Ok(format!("{}-{}-{}", &raw[..4], &raw[4..6], &raw[6..8]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_yyyymmdd() {
        assert_eq!(format_edi_date("20240115").unwrap(), "2024-01-15");
    }

    #[test]
    fn no_calendar_validation() {
        assert_eq!(format_edi_date("20231332").unwrap(), "2023-13-32");
    }

    #[test]
    fn rejects_wrong_width() {
        assert!(matches!(
            format_edi_date("240115"),
            Err(ParseError::MalformedDate(v)) if v == "240115"
        ));
        assert!(format_edi_date("2024011500").is_err());
        assert!(format_edi_date("").is_err());
    }

    #[test]
    fn rejects_non_digits() {
        assert!(format_edi_date("2024-1-1").is_err());
        assert!(format_edi_date("2024011\u{e9}").is_err());
    }
}
