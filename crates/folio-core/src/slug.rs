//! URL slugs derived from post titles.

use std::collections::HashSet;

/// Turn a title into a URL-safe slug made of `[a-z0-9-]`.
///
/// Whitespace runs and path separators become a single hyphen, `&`, `@` and
/// `%` are spelled out, everything else outside the alphabet is dropped.
/// The result never starts or ends with a hyphen and may be empty.
pub fn normalize(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());

    for c in title.trim().to_lowercase().chars() {
        match c {
            'a'..='z' | '0'..='9' => slug.push(c),
            '-' | '/' | '\\' => push_hyphen(&mut slug),
            '&' => slug.push_str("and"),
            '@' => slug.push_str("at"),
            '%' => slug.push_str("percent"),
            c if c.is_whitespace() => push_hyphen(&mut slug),
            _ => {}
        }
    }

    slug.trim_matches('-').to_string()
}

fn push_hyphen(slug: &mut String) {
    if !slug.ends_with('-') {
        slug.push('-');
    }
}

/// Pick `base` if it is free, otherwise the first of `base-1`, `base-2`, ...
/// that does not appear in `existing`.
///
/// `existing` has to be the current set of slugs; a stale snapshot only moves
/// the collision to the store's unique constraint.
pub fn resolve<S: AsRef<str>>(base: &str, existing: &[S]) -> String {
    let taken: HashSet<&str> = existing.iter().map(AsRef::as_ref).collect();

    if !taken.contains(base) {
        return base.to_string();
    }

    let mut n: u64 = 1;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_table() {
        let cases = [
            (
                "Hello, World! / Foo & Bar @ 50%",
                "hello-world-foo-and-bar-at-50percent",
            ),
            ("My First Post", "my-first-post"),
            ("  padded   title  ", "padded-title"),
            ("a\\b/c", "a-b-c"),
            ("What? #1 Hit!", "what-1-hit"),
            ("--dashes--everywhere--", "dashes-everywhere"),
            ("Café au lait", "caf-au-lait"),
            ("tabs\tand\nnewlines", "tabs-and-newlines"),
            ("!!!", ""),
            ("", ""),
        ];

        for (title, expected) in cases {
            assert_eq!(normalize(title), expected, "title: {title:?}");
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let titles = [
            "Hello, World! / Foo & Bar @ 50%",
            "Rust & You: 100% Safe?",
            "  __under_scores__ and CAPS ",
            "email me @ home / work",
            "a - b -- c",
            "ünïcödé ~ títle",
        ];

        for title in titles {
            let once = normalize(title);
            assert_eq!(normalize(&once), once, "title: {title:?}");
        }
    }

    #[test]
    fn test_resolve_free_slug_is_unchanged() {
        let existing: [&str; 0] = [];
        assert_eq!(resolve("x", &existing), "x");
        assert_eq!(resolve("post", &["other"]), "post");
    }

    #[test]
    fn test_resolve_appends_smallest_free_suffix() {
        assert_eq!(resolve("post", &["post"]), "post-1");
        assert_eq!(resolve("post", &["post", "post-1"]), "post-2");
        assert_eq!(resolve("post", &["post", "post-2"]), "post-1");
        assert_eq!(
            resolve("post", &["post-1", "post", "post-3", "post-2"]),
            "post-4"
        );
    }

    #[test]
    fn test_resolve_accepts_owned_strings() {
        let existing = vec!["news".to_string(), "news-1".to_string()];
        assert_eq!(resolve("news", &existing), "news-2");
    }
}
