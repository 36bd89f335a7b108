//! Scanned code payloads.

use crate::books::BookId;

/// Resolve a scanned QR payload to a catalog id.
///
/// Printed labels encode the bare id; surrounding whitespace from the scanner
/// is ignored. Blank payloads and payloads spanning several lines are not ids.
pub fn book_id_from_payload(payload: &str) -> Option<BookId> {
    let payload = payload.trim();

    if payload.is_empty() || payload.chars().any(char::is_whitespace) {
        return None;
    }

    Some(BookId::new(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_id_is_accepted() {
        assert_eq!(
            book_id_from_payload("66f1c0ffee"),
            Some(BookId::from("66f1c0ffee"))
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            book_id_from_payload("  66f1c0ffee\n"),
            Some(BookId::from("66f1c0ffee"))
        );
    }

    #[test]
    fn blank_payload_is_rejected() {
        assert_eq!(book_id_from_payload("   "), None);
    }

    #[test]
    fn free_text_is_rejected() {
        assert_eq!(book_id_from_payload("hello world"), None);
    }
}
