//! Rejection of text that can never be a heading or title.

use once_cell::sync::Lazy;
use regex::Regex;

/// Patterns for page furniture, form labels and boilerplate.
///
/// Every pattern is anchored at the start of the text, so an address inside
/// a sentence is not junk but a bare `@handle.tld` is.
static JUNK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Page markers
        r"(?i)^(page|p\.)\s*\d+\s*$",
        // Bare numbers
        r"^\d+$",
        // URLs
        r"(?i)^(www\.|http|https)",
        // E-mail addresses
        r"(?i)^@\w+\.\w+",
        // Lone bullets
        r"^\s*[•\-]\s*$",
        // Form-field labels
        r"(?i)^(date|signature|for|time|address|rsvp|phone|email)[\s:]*$",
        // Form boilerplate
        r"(?i)^(closed|parents|please|hope)[\s\w]*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("junk pattern is valid"))
    .collect()
});

/// Check the static pattern table only.
pub fn matches_pattern(text: &str) -> bool {
    JUNK_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Check whether trimmed text is junk by pattern or by shape.
pub fn is_junk(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || matches_pattern(text) {
        return true;
    }

    let len = text.chars().count();
    let half = len / 2;
    len < 2
        || text.matches('_').count() > half
        || text.matches('-').count() > half
        || (len > 50 && !text.contains(' '))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_markers() {
        assert!(is_junk("Page 3"));
        assert!(is_junk("page 12 "));
        assert!(is_junk("p. 4"));
        assert!(is_junk("P.7"));
        assert!(!is_junk("Page layout basics"));
    }

    #[test]
    fn test_numbers_urls_emails() {
        assert!(is_junk("42"));
        assert!(is_junk("www.example.com"));
        assert!(is_junk("https://example.com/about"));
        assert!(!is_junk("42 Ways to Win"));
    }

    #[test]
    fn test_email_pattern_only_at_start() {
        assert!(is_junk("@handle.com"));
        assert!(is_junk("@Birdwatch.org"));
        assert!(!is_junk("Contact jane@example.org today"));
        assert!(!is_junk("jane@example.org"));
    }

    #[test]
    fn test_bullets_and_form_labels() {
        assert!(is_junk("•"));
        assert!(is_junk(" - "));
        assert!(is_junk("Date:"));
        assert!(is_junk("SIGNATURE"));
        assert!(is_junk("RSVP :"));
        assert!(!is_junk("Date of Birth Requirements"));
    }

    #[test]
    fn test_boilerplate_prefixes() {
        assert!(is_junk("Please bring your own lunch"));
        assert!(is_junk("Closed on Sundays"));
        assert!(is_junk("hope to see you there"));
        // Punctuation outside [\s\w] breaks the match.
        assert!(!is_junk("Please note: the venue changed."));
    }

    #[test]
    fn test_shape_rules() {
        assert!(is_junk(""));
        assert!(is_junk("   "));
        assert!(is_junk("A"));
        assert!(is_junk("Name: ________"));
        assert!(is_junk("-----x-----"));
        assert!(is_junk(&"a".repeat(51)));
        assert!(!is_junk(&"a".repeat(50)));
        assert!(!is_junk("Introduction"));
    }

    #[test]
    fn test_pattern_table_excludes_shape_rules() {
        assert!(matches_pattern("Page 3"));
        assert!(!matches_pattern("________"));
    }
}
