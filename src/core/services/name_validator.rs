use std::sync::LazyLock;

use regex::Regex;

use crate::core::errors::NameError;

/// Longest accepted application or environment name.
///
/// Matches the 64-character name limit of the remote service: one leading
/// alphanumeric followed by at most 63 more characters.
pub const MAX_NAME_LEN: usize = 64;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_\-]{1,63}$").expect("name pattern is a valid regex")
});

/// Check an application or environment folder name.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(NameError {
            name: name.to_string(),
            max_len: MAX_NAME_LEN,
        })
    }
}

/// Template-safe identifier: the name with `_` and `-` removed.
pub fn normalized_name(name: &str) -> String {
    name.chars().filter(|c| !matches!(c, '_' | '-')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_conventional_names() {
        for name in ["sales", "sales_backend", "pre-prod", "prod", "a1", "9lives"] {
            assert!(validate_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn accepts_longest_name() {
        let name = format!("a{}", "b".repeat(63));
        assert_eq!(name.len(), MAX_NAME_LEN);
        assert!(validate_name(&name).is_ok());
    }

    #[test]
    fn rejects_names_over_limit() {
        let name = "1more-than-64-characters-56789-123456789-123456789-123456789_1234";
        assert_eq!(name.len(), 65);
        let err = validate_name(name).unwrap_err();
        assert_eq!(err.name, name);
        assert_eq!(err.max_len, 64);
    }

    #[test]
    fn rejects_bad_first_character() {
        assert!(validate_name("-starting-with-a-dash").is_err());
        assert!(validate_name("_starting-with-an-underscore").is_err());
    }

    #[test]
    fn rejects_special_characters() {
        for name in [
            "with_@_being-invalid",
            "with some spaces",
            "sales_and_$s",
            "test_with_a_#tag",
            "sales_and=s",
            "test_with_a_*",
            "dotted.name",
        ] {
            assert!(validate_name(name).is_err(), "{name} should be invalid");
        }
    }

    #[test]
    fn rejects_single_character_names() {
        assert!(validate_name("a").is_err());
        assert!(validate_name("").is_err());
    }

    #[test]
    fn normalized_name_strips_only_separators() {
        assert_eq!(normalized_name("sales_backend"), "salesbackend");
        assert_eq!(normalized_name("pre-prod"), "preprod");
        assert_eq!(normalized_name("sales_api-ms"), "salesapims");
        assert_eq!(normalized_name("Retail2"), "Retail2");
    }
}
