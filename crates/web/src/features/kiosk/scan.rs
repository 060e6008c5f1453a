use std::sync::OnceLock;

use regex::Regex;

fn qr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"participant/(\d+)/qr").expect("valid pattern"))
}

/// Pulls a participant identifier out of whatever the kiosk scanner read.
///
/// start.gg QR badges decode to a profile URL containing
/// `participant/{id}/qr`; a manually typed identifier is accepted when it is
/// all digits. Anything else is rejected rather than guessed at.
pub fn extract_participant_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    if let Some(captures) = qr_pattern().captures(trimmed) {
        return Some(captures[1].to_string());
    }

    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Some(trimmed.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_badge_url() {
        let raw = "https://www.start.gg/user/abc123/participant/4507632/qr";
        assert_eq!(extract_participant_id(raw).as_deref(), Some("4507632"));
    }

    #[test]
    fn accepts_bare_digits() {
        assert_eq!(extract_participant_id("4507632").as_deref(), Some("4507632"));
        assert_eq!(extract_participant_id("  1024 \n").as_deref(), Some("1024"));
    }

    #[test]
    fn url_form_wins_over_digit_form() {
        // The path segment id, not some other number in the URL.
        let raw = "https://start.gg/t/99/participant/42/qr?v=7";
        assert_eq!(extract_participant_id(raw).as_deref(), Some("42"));
    }

    #[test]
    fn rejects_everything_else() {
        assert!(extract_participant_id("").is_none());
        assert!(extract_participant_id("   ").is_none());
        assert!(extract_participant_id("hello world").is_none());
        assert!(extract_participant_id("12a34").is_none());
        assert!(extract_participant_id("https://start.gg/user/abc").is_none());
        assert!(extract_participant_id("participant//qr").is_none());
    }
}
