//! Placeholder parser for `((variable))` syntax
//!
//! Only a string that is *entirely* one placeholder is a reference. There is
//! no substring interpolation and no escape syntax:
//!
//! ```text
//! placeholder := "((" segment ( "." segment )* "))"
//! segment     := one or more chars other than whitespace, '.', '(' and ')'
//! ```
//!
//! Strings without the `((...))` shape, or whose interior itself contains
//! `((` or `))`, are literals. Strings with the shape but an invalid interior
//! are malformed and reported, never passed through.

use keel_domain::{DomainError, Reference};

/// Opening delimiter of a placeholder.
pub const OPEN: &str = "((";

/// Closing delimiter of a placeholder.
pub const CLOSE: &str = "))";

/// Classification of a single string leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// Not a placeholder; keep the string as is.
    Literal,
    /// A well-formed placeholder.
    Reference(Reference),
    /// Placeholder-shaped but invalid inside the delimiters.
    Malformed {
        /// Why the interior was rejected.
        reason: String,
    },
}

/// Classifies a string as a literal, a reference or a malformed placeholder.
///
/// # Examples
///
/// ```
/// use keel_application::variables::parser::{parse_placeholder, Placeholder};
///
/// match parse_placeholder("((cred.username))") {
///     Placeholder::Reference(reference) => {
///         assert_eq!(reference.name(), "cred");
///         assert_eq!(reference.path(), ["username".to_string()]);
///     }
///     other => panic!("unexpected {other:?}"),
/// }
///
/// assert_eq!(parse_placeholder("https://((host))/x"), Placeholder::Literal);
/// ```
#[must_use]
pub fn parse_placeholder(input: &str) -> Placeholder {
    let Some(inner) = input
        .strip_prefix(OPEN)
        .and_then(|rest| rest.strip_suffix(CLOSE))
    else {
        return Placeholder::Literal;
    };

    // "((a)) and ((b))" has the outer shape but is two placeholders in prose.
    if inner.contains(OPEN) || inner.contains(CLOSE) {
        return Placeholder::Literal;
    }

    let mut segments = inner.split('.');
    let name = segments.next().unwrap_or_default();

    match Reference::try_new(name, segments) {
        Ok(reference) => Placeholder::Reference(reference),
        Err(DomainError::InvalidReference(reason)) => Placeholder::Malformed { reason },
        Err(other) => Placeholder::Malformed {
            reason: other.to_string(),
        },
    }
}

/// Returns the reference if `input` is exactly one well-formed placeholder.
#[must_use]
pub fn parse_reference(input: &str) -> Option<Reference> {
    match parse_placeholder(input) {
        Placeholder::Reference(reference) => Some(reference),
        Placeholder::Literal | Placeholder::Malformed { .. } => None,
    }
}

/// Returns true if `input` is exactly one well-formed placeholder.
#[must_use]
pub fn is_placeholder(input: &str) -> bool {
    parse_reference(input).is_some()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reference(input: &str) -> Reference {
        match parse_placeholder(input) {
            Placeholder::Reference(reference) => reference,
            other => panic!("expected reference for {input:?}, got {other:?}"),
        }
    }

    fn assert_malformed(input: &str) {
        assert!(
            matches!(parse_placeholder(input), Placeholder::Malformed { .. }),
            "expected {input:?} to be malformed"
        );
    }

    #[test]
    fn test_parse_simple_reference() {
        let parsed = reference("((name))");
        assert_eq!(parsed.name(), "name");
        assert!(parsed.path().is_empty());
    }

    #[test]
    fn test_parse_field_path() {
        let parsed = reference("((cred.field1.field2))");
        assert_eq!(parsed.name(), "cred");
        assert_eq!(parsed.path(), ["field1".to_string(), "field2".to_string()]);
    }

    #[test]
    fn test_names_with_punctuation() {
        assert_eq!(reference("((my-var_2))").name(), "my-var_2");
        assert_eq!(reference("((team/secret))").name(), "team/secret");
    }

    #[test]
    fn test_plain_strings_are_literals() {
        assert_eq!(parse_placeholder("Hello, World!"), Placeholder::Literal);
        assert_eq!(parse_placeholder(""), Placeholder::Literal);
        assert_eq!(parse_placeholder("(name)"), Placeholder::Literal);
    }

    #[test]
    fn test_partial_matches_are_literals() {
        assert_eq!(parse_placeholder("Bearer ((token))"), Placeholder::Literal);
        assert_eq!(parse_placeholder("((token)) suffix"), Placeholder::Literal);
        assert_eq!(parse_placeholder("((unclosed"), Placeholder::Literal);
        assert_eq!(parse_placeholder("unopened))"), Placeholder::Literal);
        assert_eq!(parse_placeholder("(("), Placeholder::Literal);
    }

    #[test]
    fn test_multiple_placeholders_are_literal() {
        assert_eq!(parse_placeholder("((a)) and ((b))"), Placeholder::Literal);
        assert_eq!(parse_placeholder("((a))((b))"), Placeholder::Literal);
    }

    #[test]
    fn test_empty_segments_are_malformed() {
        assert_malformed("(())");
        assert_malformed("((.field))");
        assert_malformed("((name.))");
        assert_malformed("((a..b))");
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        assert_malformed("(( name ))");
        assert_malformed("((name ))");
        assert_malformed("((na me))");
    }

    #[test]
    fn test_stray_parenthesis_is_malformed() {
        assert_malformed("((a)))");
        assert_malformed("(((a))");
    }

    #[test]
    fn test_is_placeholder() {
        assert!(is_placeholder("((x))"));
        assert!(!is_placeholder("x"));
        assert!(!is_placeholder("(())"));
    }

    #[test]
    fn test_parse_reference_display_round_trip() {
        let input = "((cred.a.b))";
        assert_eq!(parse_reference(input).map(|r| r.to_string()), Some(input.to_string()));
    }
}
