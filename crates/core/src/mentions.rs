//! `@username` mention extraction from post content.

/// Maximum number of mention candidates processed per post.
///
/// Bounds the notification fan-out a single post can trigger.
pub const MAX_MENTIONS_PER_POST: usize = 10;

/// Extract at-mention candidates from raw post content.
///
/// A mention is an `@` at a word boundary followed by one or more
/// alphanumerics or underscores. Candidates are case-folded, de-duplicated
/// preserving first occurrence, and capped at `cap`.
///
/// `user@example.com` is not a mention: the `@` is preceded by an
/// alphanumeric character.
pub fn extract_mentions(content: &str, cap: usize) -> Vec<String> {
    let bytes = content.as_bytes();
    let len = bytes.len();
    let mut mentions: Vec<String> = Vec::new();
    let mut i = 0;

    while i < len && mentions.len() < cap {
        if bytes[i] == b'@' {
            let at_boundary = i == 0 || !bytes[i - 1].is_ascii_alphanumeric();
            if at_boundary {
                let start = i + 1;
                let mut end = start;
                while end < len && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                    end += 1;
                }
                if end > start {
                    let candidate = content[start..end].to_lowercase();
                    if !mentions.contains(&candidate) {
                        mentions.push(candidate);
                    }
                }
                i = end;
                continue;
            }
        }
        i += 1;
    }

    mentions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
