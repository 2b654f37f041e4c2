//! Slug derivation for content the CMS does not slug itself.
//!
//! Album slugs are never stored. They are recomputed from the album name on
//! every read, by the same function at link-generation and link-resolution
//! time. Two names that derive to the same slug are indistinguishable by
//! URL; resolution returns the first one in listed order.

use std::borrow::Cow;

/// Derive a URL-safe slug from free text.
///
/// Lower-cases, trims, collapses every run of non-alphanumeric characters
/// into a single hyphen, and drops leading and trailing hyphens. Letters
/// outside ASCII are kept (and percent-encoded by whoever builds the URL).
///
/// # Example
///
/// ```
/// use folio_content::derive_slug;
///
/// assert_eq!(derive_slug("Summer Wedding!"), "summer-wedding");
/// assert_eq!(derive_slug(" A  B "), "a-b");
/// assert_eq!(derive_slug(&derive_slug("Summer Wedding!")), "summer-wedding");
/// ```
pub fn derive_slug(text: &str) -> String {
    let trimmed = text.trim();
    let mut slug = String::with_capacity(trimmed.len());
    let mut pending_dash = false;

    // Per-char lowering: no context rules such as the Greek final sigma.
    for ch in trimmed.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Slug for the album at `index`, falling back to `album-{index}` when the
/// name derives to nothing (blank or punctuation-only names).
pub fn album_slug(name: &str, index: usize) -> String {
    let slug = derive_slug(name);
    if slug.is_empty() {
        format!("album-{index}")
    } else {
        slug
    }
}

/// Whether an incoming path segment addresses `candidate_slug`.
///
/// Accepts the raw segment, its percent-decoded form, and the slug derived
/// from the decoded form, so a link built from the encoded album name still
/// resolves.
pub fn segment_matches(candidate_slug: &str, raw_segment: &str) -> bool {
    if candidate_slug == raw_segment {
        return true;
    }
    let decoded = urlencoding::decode(raw_segment).unwrap_or(Cow::Borrowed(raw_segment));
    candidate_slug == decoded || candidate_slug == derive_slug(&decoded)
}

/// Positions of every item whose slug matches `raw_segment`, in listed order.
pub fn matching_positions<T, S>(items: &[T], raw_segment: &str, slug_of: S) -> Vec<usize>
where
    S: Fn(usize, &T) -> String,
{
    items
        .iter()
        .enumerate()
        .filter(|(index, item)| segment_matches(&slug_of(*index, item), raw_segment))
        .map(|(index, _)| index)
        .collect()
}

/// Find the first item whose slug matches `raw_segment`.
///
/// `slug_of` receives each item's position and the item. Returns the
/// position and the item; first match in listed order wins on collisions.
pub fn find_by_segment<'a, T, S>(
    items: &'a [T],
    raw_segment: &str,
    slug_of: S,
) -> Option<(usize, &'a T)>
where
    S: Fn(usize, &T) -> String,
{
    let positions = matching_positions(items, raw_segment, slug_of);
    match positions.as_slice() {
        [] => {
            log::debug!(
                "no slug match for segment '{raw_segment}' among {} candidates",
                items.len()
            );
            None
        }
        [first, rest @ ..] => {
            if !rest.is_empty() {
                log::debug!(
                    "segment '{raw_segment}' matches items at {positions:?}; using position {first}"
                );
            }
            items.get(*first).map(|item| (*first, item))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ------------------------------------------------------------------------
    // derive_slug
    // ------------------------------------------------------------------------

    #[test]
    fn test_derive_slug_examples() {
        assert_eq!(derive_slug("Summer Wedding!"), "summer-wedding");
        assert_eq!(derive_slug(" A  B "), "a-b");
        assert_eq!(derive_slug("--Pre-Shoot__Kandy--"), "pre-shoot-kandy");
        assert_eq!(derive_slug("Café Moments"), "café-moments");
        assert_eq!(derive_slug("2024 / Family"), "2024-family");
    }

    #[test]
    fn test_derive_slug_empty_inputs() {
        assert_eq!(derive_slug(""), "");
        assert_eq!(derive_slug("   "), "");
        assert_eq!(derive_slug("!!!"), "");
    }

    #[test]
    fn test_derive_slug_greek_final_sigma() {
        assert_eq!(derive_slug("ΟΔΟΣ"), "οδοσ");
        assert_eq!(derive_slug("ΟΔΟΣ"), derive_slug("οδοσ"));
        assert!(segment_matches(&derive_slug("οδοσ"), "ΟΔΟΣ"));
    }

    #[test]
    fn test_album_slug_fallback() {
        assert_eq!(album_slug("Engagement", 0), "engagement");
        assert_eq!(album_slug("", 3), "album-3");
        assert_eq!(album_slug("***", 1), "album-1");
    }

    // ------------------------------------------------------------------------
    // segment matching
    // ------------------------------------------------------------------------

    #[test]
    fn test_segment_matches_derived_slug() {
        assert!(segment_matches("summer-wedding", "summer-wedding"));
    }

    #[test]
    fn test_segment_matches_percent_encoded_name() {
        let slug = derive_slug("Summer Wedding!");
        assert!(segment_matches(&slug, "Summer%20Wedding%21"));
    }

    #[test]
    fn test_segment_matches_encoded_non_ascii_slug() {
        let slug = derive_slug("Café Moments");
        let encoded = urlencoding::encode(&slug).into_owned();
        assert_ne!(encoded, slug);
        assert!(segment_matches(&slug, &encoded));
    }

    #[test]
    fn test_segment_matches_literal_undecodable() {
        // Not valid UTF-8 once decoded; only the literal form can match.
        assert!(segment_matches("%ff", "%ff"));
        assert!(!segment_matches("other", "%ff"));
    }

    #[test]
    fn test_segment_rejects_other_slug() {
        assert!(!segment_matches("winter-wedding", "summer-wedding"));
    }

    // ------------------------------------------------------------------------
    // find_by_segment
    // ------------------------------------------------------------------------

    #[test]
    fn test_find_by_segment_first_match_wins() {
        let names = ["Summer Wedding", "summer wedding!", "Autumn"];
        let (index, name) =
            find_by_segment(&names, "summer-wedding", |i, n| album_slug(n, i)).unwrap();
        assert_eq!(index, 0);
        assert_eq!(*name, "Summer Wedding");
    }

    #[test]
    fn test_find_by_segment_index_fallback() {
        let names = ["Autumn", "!!!"];
        let (index, _) = find_by_segment(&names, "album-1", |i, n| album_slug(n, i)).unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn test_find_by_segment_miss() {
        let names = ["Autumn"];
        assert!(find_by_segment(&names, "spring", |i, n| album_slug(n, i)).is_none());
    }

    #[test]
    fn test_matching_positions_reports_collisions() {
        let names = ["Summer Wedding", "Autumn", "summer wedding!"];
        let positions = matching_positions(&names, "summer-wedding", |i, n| album_slug(n, i));
        assert_eq!(positions, vec![0, 2]);
        assert!(matching_positions(&names, "spring", |i, n| album_slug(n, i)).is_empty());
    }

    // ------------------------------------------------------------------------
    // properties
    // ------------------------------------------------------------------------

    /// Upper-case `ch` only when that maps to one char that lowers back to
    /// `ch`'s own lower case, so both strings share a per-char lowering.
    fn upper_if_reversible(ch: char) -> char {
        let mut upper = ch.to_uppercase();
        match (upper.next(), upper.next()) {
            (Some(u), None) if u.to_lowercase().eq(ch.to_lowercase()) => u,
            _ => ch,
        }
    }

    proptest! {
        #[test]
        fn prop_derive_slug_idempotent(text in "[a-zA-Z0-9 !?.,'&_/-]{0,40}") {
            let once = derive_slug(&text);
            prop_assert_eq!(derive_slug(&once), once);
        }

        #[test]
        fn prop_derive_slug_case_and_whitespace_insensitive(text in "[a-zA-Z0-9 ]{0,40}") {
            let padded = format!("  {}  ", text.to_uppercase().replace(' ', "   "));
            prop_assert_eq!(derive_slug(&padded), derive_slug(&text));
        }

        #[test]
        fn prop_derive_slug_unicode_idempotent(text in "\\PC{0,40}") {
            let once = derive_slug(&text);
            prop_assert_eq!(derive_slug(&once), once);
        }

        #[test]
        fn prop_derive_slug_unicode_case_insensitive(text in "\\PC{0,40}") {
            let upper: String = text.chars().map(upper_if_reversible).collect();
            prop_assert_eq!(derive_slug(&upper), derive_slug(&text));
        }

        #[test]
        fn prop_derive_slug_shape(text in "\\PC{0,40}") {
            let slug = derive_slug(&text);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn prop_derived_slug_always_matches_itself(text in "[a-zA-Z0-9 é]{1,40}") {
            let slug = derive_slug(&text);
            prop_assert!(segment_matches(&slug, &slug));
            let encoded = urlencoding::encode(&slug).into_owned();
            prop_assert!(segment_matches(&slug, &encoded));
        }
    }
}
