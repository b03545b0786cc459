//! Topic slug generation and content previews.
//!
//! Slugs are generated once at topic creation and never change on later
//! title edits, so external links stay stable. Uniqueness comes from a
//! creation-time suffix rather than a read-before-write existence check.

use crate::types::Timestamp;

/// Maximum length of the title-derived part of a slug, in characters.
pub const MAX_SLUG_LEN: usize = 80;

/// Maximum length of a stored content preview, in characters.
pub const PREVIEW_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Transliteration
// ---------------------------------------------------------------------------

/// Transliterate a single Cyrillic character to its Latin form.
///
/// Follows the Bulgarian streamlined romanization system. Characters outside
/// the table are returned as-is and handled by the slug charset filter.
fn transliterate(c: char) -> &'static str {
    match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sht",
        'ъ' => "a",
        'ь' => "y",
        'ю' => "yu",
        'я' => "ya",
        _ => "",
    }
}

// ---------------------------------------------------------------------------
// Slug generation
// ---------------------------------------------------------------------------

/// Generate the title-derived part of a slug.
///
/// Lowercases, transliterates Cyrillic to a Latin-safe charset, maps every
/// other non-alphanumeric character to a hyphen, collapses consecutive
/// hyphens, trims leading/trailing hyphens, and truncates to [`MAX_SLUG_LEN`].
pub fn slugify(title: &str) -> String {
    let mut mapped = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            mapped.push(c);
        } else if c.is_alphabetic() {
            let latin = transliterate(c);
            if latin.is_empty() {
                mapped.push('-');
            } else {
                mapped.push_str(latin);
            }
        } else {
            mapped.push('-');
        }
    }

    // Collapse consecutive hyphens.
    let mut result = String::with_capacity(mapped.len());
    let mut prev_hyphen = false;
    for c in mapped.chars() {
        if c == '-' {
            if !prev_hyphen {
                result.push('-');
            }
            prev_hyphen = true;
        } else {
            result.push(c);
            prev_hyphen = false;
        }
    }

    let trimmed = result.trim_matches('-');
    trimmed.chars().take(MAX_SLUG_LEN).collect()
}

/// Encode a non-negative integer in base36 (`0-9a-z`).
fn base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).expect("base36 digits are ASCII")
}

/// Generate a globally unique slug for a topic created at `created_at`.
///
/// The uniquifying suffix is the creation instant in base36 milliseconds,
/// so two topics with identical titles still get distinct slugs without any
/// existence check. Two creations within the same millisecond can collide;
/// the unique index on the slug column surfaces that as a conflict.
pub fn unique_slug(title: &str, created_at: Timestamp) -> String {
    let base = slugify(title);
    let suffix = base36(created_at.timestamp_millis().max(0) as u64);
    if base.is_empty() {
        suffix
    } else {
        format!("{base}-{suffix}")
    }
}

// ---------------------------------------------------------------------------
// Previews
// ---------------------------------------------------------------------------

/// Build the stored preview of a topic's content.
///
/// Newlines and other whitespace runs are flattened to single spaces and the
/// result is truncated to [`PREVIEW_LEN`] characters. Stored alongside the
/// full content so list reads never re-truncate.
pub fn preview(content: &str) -> String {
    let flattened: String = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= PREVIEW_LEN {
        return flattened;
    }
    let cut: String = flattened.chars().take(PREVIEW_LEN).collect();
    format!("{}...", cut.trim_end())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
