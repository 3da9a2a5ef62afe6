//! CSV export helpers
//!
//! The exported fields are form input and therefore attacker-chosen:
//! everything textual is quoted and embedded quotes doubled.

use chrono::Utc;

/// Quote a field for CSV embedding
pub fn csv_field(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', "\"\""))
}

/// Attachment filename for an export, dated with the current day
pub fn export_filename(scope: &str) -> String {
    format!("{}-export-{}.csv", scope, Utc::now().format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_field() {
        assert_eq!(csv_field("hello"), "\"hello\"");
    }

    #[test]
    fn test_quotes_are_doubled() {
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_commas_and_newlines_stay_inside_quotes() {
        assert_eq!(csv_field("a,b\nc"), "\"a,b\nc\"");
    }

    #[test]
    fn test_filename_shape() {
        let name = export_filename("waitlist");
        assert!(name.starts_with("waitlist-export-"));
        assert!(name.ends_with(".csv"));
    }
}
