//! Naming-convention helpers.
//!
//! Native class names carry an optional one-letter type-category prefix
//! (`APawn`, `UObject`, `FVector`). Callers type either spelling, so
//! ancestry matching treats the prefix as optional on both sides.

pub use crate::object_path::module_segment;

/// Default type-category prefix letters.
pub const TYPE_PREFIXES: &[char] = &['A', 'U', 'F', 'I', 'P'];

/// Whether `name` starts with a prefix letter followed by an uppercase letter.
///
/// `PPawn` has a prefix; `Pawn` does not.
pub fn has_prefix(name: &str, prefixes: &[char]) -> bool {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) => prefixes.contains(&first) && second.is_ascii_uppercase(),
        _ => false,
    }
}

/// Drop one leading type-category prefix, if present.
///
/// ```rust
/// use classbridge_core::naming::{strip_prefix, TYPE_PREFIXES};
///
/// assert_eq!(strip_prefix("APawn", TYPE_PREFIXES), "Pawn");
/// assert_eq!(strip_prefix("Pawn", TYPE_PREFIXES), "Pawn");
/// ```
pub fn strip_prefix<'a>(name: &'a str, prefixes: &[char]) -> &'a str {
    match name.chars().next() {
        Some(first) if has_prefix(name, prefixes) => &name[first.len_utf8()..],
        _ => name,
    }
}

/// Compare a class name against a filter with the prefix optional on both sides.
pub fn names_equivalent(candidate: &str, filter: &str, prefixes: &[char]) -> bool {
    let bare_candidate = strip_prefix(candidate, prefixes);
    let bare_filter = strip_prefix(filter, prefixes);
    candidate == filter
        || bare_candidate == filter
        || candidate == bare_filter
        || bare_candidate == bare_filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_needs_an_uppercase_follower() {
        assert!(has_prefix("APawn", TYPE_PREFIXES));
        assert!(has_prefix("PPawn", TYPE_PREFIXES));
        assert!(!has_prefix("Pawn", TYPE_PREFIXES));
        assert!(!has_prefix("Actor", TYPE_PREFIXES));
        assert!(!has_prefix("A", TYPE_PREFIXES));
        assert!(!has_prefix("BPawn", TYPE_PREFIXES));
    }

    #[test]
    fn three_spellings_are_equivalent() {
        for candidate in ["Pawn", "PPawn", "APawn"] {
            assert!(
                names_equivalent(candidate, "Pawn", TYPE_PREFIXES),
                "{} should match Pawn",
                candidate
            );
        }
        assert!(names_equivalent("Pawn", "APawn", TYPE_PREFIXES));
        assert!(!names_equivalent("Pawnshop", "Pawn", TYPE_PREFIXES));
        assert!(!names_equivalent("DefaultPawn", "Pawn", TYPE_PREFIXES));
    }

    #[test]
    fn custom_prefix_sets() {
        assert!(names_equivalent("XHero", "Hero", &['X']));
        assert!(!names_equivalent("AHero", "Hero", &['X']));
    }

    #[test]
    fn multibyte_prefix_letters() {
        assert_eq!(strip_prefix("ÄPawn", &['Ä']), "Pawn");
        assert!(names_equivalent("ÄPawn", "Pawn", &['Ä']));
        assert!(names_equivalent("Pawn", "ÄPawn", &['Ä']));
        assert_eq!(strip_prefix("Äpfel", &['Ä']), "Äpfel");
    }
}
