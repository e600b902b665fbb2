use std::net::IpAddr;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for registered usernames. Must start with a letter or underscore
    /// and contain only alphanumerics, underscores and single spaces.
    /// - Valid: "john_doe", "user123", "_admin", "Jane Doe"
    /// - Invalid: "123user", "-user", "user-name", " user"
    pub static ref USERNAME_REGEX: Regex =
        Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*(?: [a-zA-Z0-9_]+)*$").unwrap();
}

/// Characters a page title may never contain.
const FORBIDDEN_TITLE_CHARS: &[char] = &['#', '<', '>', '[', ']', '{', '}', '|'];

/// Length of a string in Unicode codepoints, not bytes. Text caps are
/// specified in codepoints so multibyte input is not penalized.
pub fn codepoint_len(s: &str) -> usize {
    s.chars().count()
}

/// Whether the reported-user string is an IP literal (v4 or v6). IP literals
/// become anonymous identities without a directory lookup.
pub fn is_ip_literal(s: &str) -> bool {
    s.parse::<IpAddr>().is_ok()
}

/// Whether a string parses as a page title: non-empty after trimming and free
/// of link/markup metacharacters.
pub fn is_valid_title(title: &str) -> bool {
    let trimmed = title.trim();
    !trimmed.is_empty() && !trimmed.chars().any(|c| FORBIDDEN_TITLE_CHARS.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codepoint_len_counts_codepoints_not_bytes() {
        assert_eq!(codepoint_len(""), 0);
        assert_eq!(codepoint_len("abc"), 3);
        // 3 codepoints, 9 bytes
        assert_eq!(codepoint_len("日本語"), 3);
    }

    #[test]
    fn test_is_ip_literal() {
        assert!(is_ip_literal("192.168.0.1"));
        assert!(is_ip_literal("::1"));
        assert!(is_ip_literal("2001:db8::ff00:42:8329"));
        assert!(!is_ip_literal("Alice"));
        assert!(!is_ip_literal("192.168.0"));
        assert!(!is_ip_literal(""));
    }

    #[test]
    fn test_is_valid_title() {
        assert!(is_valid_title("Main Page"));
        assert!(is_valid_title("Talk:Weather"));
        assert!(!is_valid_title(""));
        assert!(!is_valid_title("   "));
        assert!(!is_valid_title("Bad|Title"));
        assert!(!is_valid_title("<script>"));
        assert!(!is_valid_title("A#B"));
    }

    #[test]
    fn test_username_regex() {
        assert!(USERNAME_REGEX.is_match("john_doe"));
        assert!(USERNAME_REGEX.is_match("user123"));
        assert!(USERNAME_REGEX.is_match("_admin"));
        assert!(USERNAME_REGEX.is_match("Jane Doe"));
        assert!(!USERNAME_REGEX.is_match("123user"));
        assert!(!USERNAME_REGEX.is_match("-user"));
        assert!(!USERNAME_REGEX.is_match(""));
    }
}
