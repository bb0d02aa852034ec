//! Storage keys and post identifiers.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Hex characters of a v4 uuid used to tag image keys.
pub const IMAGE_TAG_LEN: usize = 10;

/// Longest key accepted by S3-compatible stores.
pub const MAX_KEY_LEN: usize = 1024;

/// Longest sanitized file name, in bytes, that goes into a key.
pub const MAX_FILE_NAME_LEN: usize = 200;

/// Extensions longer than this are treated as part of the stem.
const MAX_EXTENSION_LEN: usize = 16;

const FALLBACK_FILE_NAME: &str = "upload";

/// Fresh opaque post identifier. Never derived from user input.
pub fn post_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Key for a post body: `<timestamp>-<filename>`.
///
/// The timestamp is RFC 3339 UTC with milliseconds and `:`/`.` swapped for
/// `-`, so lexical key order follows creation order.
pub fn content_key(file_name: &str, at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{stamp}-{}", sanitize_file_name(file_name))
}

/// Key for a header or standalone image: `<random>-<filename>`.
pub fn image_key(file_name: &str) -> String {
    format!(
        "{}-{}",
        &Uuid::new_v4().simple().to_string()[..IMAGE_TAG_LEN],
        sanitize_file_name(file_name)
    )
}

/// Reduce a client-supplied filename to a single safe path segment of at
/// most [`MAX_FILE_NAME_LEN`] bytes.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_whitespace() || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => FALLBACK_FILE_NAME.to_string(),
        _ => truncate_file_name(cleaned),
    }
}

/// Shorten the stem so the whole name fits, keeping a short extension.
fn truncate_file_name(name: String) -> String {
    if name.len() <= MAX_FILE_NAME_LEN {
        return name;
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() <= MAX_EXTENSION_LEN => {
            (stem, Some(ext))
        }
        _ => (name.as_str(), None),
    };

    let budget = MAX_FILE_NAME_LEN - ext.map_or(0, |ext| ext.len() + 1);
    let mut end = budget.min(stem.len());
    while !stem.is_char_boundary(end) {
        end -= 1;
    }

    match ext {
        Some(ext) => format!("{}.{ext}", &stem[..end]),
        None => stem[..end].to_string(),
    }
}

/// Whether a key read back from the metadata store is safe to hand to the
/// content store.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && !key.starts_with('/')
        && !key.contains('\\')
        && !key.chars().any(char::is_control)
        && !key.split('/').any(|segment| segment == "..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn test_content_key_starts_with_sanitized_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let key = content_key("notes.md", at);
        assert_eq!(key, "2024-03-09T14-05-07-000Z-notes.md");
    }

    #[test]
    fn test_content_keys_sort_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert!(content_key("z.md", earlier) < content_key("a.md", later));
    }

    #[test]
    fn test_image_key_has_random_prefix() {
        let key = image_key("cover.png");
        let (tag, name) = key.split_at(IMAGE_TAG_LEN);
        assert_eq!(name, "-cover.png");
        assert!(tag.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_ne!(image_key("cover.png"), image_key("cover.png"));
    }

    #[test]
    fn test_post_ids_are_unique_and_url_safe() {
        let ids: HashSet<String> = (0..1000).map(|_| post_id()).collect();
        assert_eq!(ids.len(), 1000);
        for id in &ids {
            assert_eq!(id.len(), 32);
            assert!(id.bytes().all(|b| b.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\my post.md"), "my_post.md");
        assert_eq!(sanitize_file_name("  "), "upload");
        assert_eq!(sanitize_file_name("dir/.."), "upload");
        assert_eq!(sanitize_file_name("plain.md"), "plain.md");
    }

    #[test]
    fn test_long_file_names_are_truncated_keeping_extension() {
        let name = format!("{}.md", "a".repeat(1100));
        let cleaned = sanitize_file_name(&name);
        assert_eq!(cleaned.len(), MAX_FILE_NAME_LEN);
        assert!(cleaned.ends_with("aaa.md"));

        let no_ext = sanitize_file_name(&"b".repeat(1100));
        assert_eq!(no_ext.len(), MAX_FILE_NAME_LEN);

        // Multi-byte characters are never split.
        let wide = sanitize_file_name(&format!("{}.png", "é".repeat(600)));
        assert!(wide.len() <= MAX_FILE_NAME_LEN);
        assert!(wide.ends_with(".png"));

        assert!(is_valid_key(&content_key(&name, Utc::now())));
        assert!(is_valid_key(&image_key(&name)));
    }

    #[test]
    fn test_generated_keys_are_valid() {
        assert!(is_valid_key(&content_key("a b.md", Utc::now())));
        assert!(is_valid_key(&image_key("../x.png")));
    }

    #[test]
    fn test_is_valid_key_rejects_unsafe_keys() {
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("/absolute"));
        assert!(!is_valid_key("a/../b"));
        assert!(!is_valid_key("back\\slash"));
        assert!(!is_valid_key("bell\u{7}"));
        assert!(!is_valid_key(&"k".repeat(MAX_KEY_LEN + 1)));
        assert!(is_valid_key("images/2024/cover.png"));
    }
}
