//! YAML (and JSON) config parsing.

use keel_domain::ConfigValue;

use super::SerializationError;

/// Parses a YAML or JSON document into a configuration tree.
///
/// # Errors
///
/// Returns `SerializationError::Yaml` if the document is not valid YAML or
/// uses a construct `ConfigValue` cannot hold (such as a non-string key).
pub fn parse_config(bytes: &[u8]) -> Result<ConfigValue, SerializationError> {
    Ok(serde_yaml::from_slice(bytes)?)
}

/// Parses a YAML or JSON document held in a string.
///
/// # Errors
///
/// See [`parse_config`].
pub fn parse_config_str(text: &str) -> Result<ConfigValue, SerializationError> {
    Ok(serde_yaml::from_str(text)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parses_yaml_resource_source() {
        let yaml = b"\
uri: https://example.com/repo.git
branch: ((branch))
private_key: ((git.private_key))
depth: 1
";
        let value = parse_config(yaml).expect("parses");

        assert_eq!(
            value,
            ConfigValue::from(json!({
                "uri": "https://example.com/repo.git",
                "branch": "((branch))",
                "private_key": "((git.private_key))",
                "depth": 1,
            }))
        );
    }

    #[test]
    fn test_parses_json_documents() {
        let value = parse_config_str(r#"{"params": ["((a))", 2.5, null]}"#).expect("parses");
        assert_eq!(value, ConfigValue::from(json!({"params": ["((a))", 2.5, null]})));
    }

    #[test]
    fn test_scalar_documents_are_allowed() {
        assert_eq!(parse_config_str("((token))").expect("parses"), ConfigValue::from("((token))"));
        assert_eq!(parse_config_str("true").expect("parses"), ConfigValue::Bool(true));
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let result = parse_config_str("key: [unterminated");
        assert!(matches!(result, Err(SerializationError::Yaml(_))));
    }
}
