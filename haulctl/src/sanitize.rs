//! Input sanitization for client-supplied text.
//!
//! Free-text fields (names, origins, notes, image paths) are stored with all
//! HTML stripped. Credentials are exempt: they only get whitespace trimming,
//! since entity-escaping a password before hashing would corrupt it.

use std::collections::HashSet;

use ammonia::Builder;

/// Strip all HTML tags from a free-text field before storage.
pub fn clean_text(input: &str) -> String {
    let mut builder = Builder::default();
    builder.tags(HashSet::new());
    builder.clean(input).to_string()
}

/// Same as [`clean_text`] but passes `None` through.
pub fn clean_opt(input: Option<String>) -> Option<String> {
    input.map(|s| clean_text(&s))
}

/// Sanitizer for credential fields: trim only, never strip or escape.
pub fn trim_credential(input: &str) -> String {
    input.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags() {
        assert_eq!(clean_text("<b>Acme</b> Bank"), "Acme Bank");
        assert_eq!(clean_text("<script>alert(1)</script>Tehran"), "Tehran");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(clean_text("Acme Bank"), "Acme Bank");
        assert_eq!(clean_text("1234567890123456"), "1234567890123456");
    }

    #[test]
    fn none_passes_through() {
        assert_eq!(clean_opt(None), None);
        assert_eq!(clean_opt(Some("<i>x</i>".into())), Some("x".into()));
    }

    #[test]
    fn credentials_are_only_trimmed() {
        assert_eq!(trim_credential("  s3cret<pass>  "), "s3cret<pass>");
    }
}
