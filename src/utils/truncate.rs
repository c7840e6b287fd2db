//! Truncation Utilities
//!
//! Keeps service bodies quoted in logs and error messages to a bounded size,
//! preserving prefix and suffix on UTF-8 boundaries.

pub fn truncate_text(content: &str, max_bytes: usize) -> String {
    if content.len() <= max_bytes {
        return content.to_string();
    }

    if max_bytes == 0 {
        return format!("... [{} bytes truncated] ...", content.len());
    }

    let half = max_bytes / 2;
    let mut prefix_end = 0;
    for (idx, c) in content.char_indices() {
        let char_end = idx + c.len_utf8();
        if char_end > half {
            break;
        }
        prefix_end = char_end;
    }

    let suffix_target = content.len().saturating_sub(half);
    let mut suffix_start = content.len();
    for (idx, _) in content.char_indices().rev() {
        if idx < suffix_target {
            break;
        }
        suffix_start = idx;
    }
    let suffix_start = suffix_start.max(prefix_end);

    let prefix = &content[..prefix_end];
    let suffix = &content[suffix_start..];
    let truncated = content.len() - (prefix.len() + suffix.len());

    format!("{} ... [{} bytes truncated] ... {}", prefix, truncated, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(truncate_text("{\"detail\": \"x\"}", 64), "{\"detail\": \"x\"}");
    }

    #[test]
    fn test_keeps_both_ends() {
        let body = format!("<html>{}</html>", "a".repeat(500));
        let out = truncate_text(&body, 20);
        assert!(out.starts_with("<html>aaaa"));
        assert!(out.ends_with("aaa</html>"));
        assert!(out.contains("bytes truncated"));
    }

    #[test]
    fn test_respects_char_boundaries() {
        let body = "é".repeat(50);
        let out = truncate_text(&body, 7);
        assert_eq!(out, "é ... [96 bytes truncated] ... é");
    }
}
