use chrono::{DateTime, Local, Utc};

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Case-insensitive substring check for the notes filter
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Format a server timestamp in local time for display
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%b %d, %Y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
        assert_eq!(truncate("Hello", 2), "He");
    }

    #[test]
    fn test_truncate_multibyte() {
        // Must not split in the middle of a code point
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Grocery List", "grocery"));
        assert!(contains_ignore_case("grocery list", "LIST"));
        assert!(!contains_ignore_case("Grocery List", "milk"));
        assert!(contains_ignore_case("anything", ""));
    }
}
