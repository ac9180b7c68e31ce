// ABOUTME: Custom serde deserializers for charm option values.
// ABOUTME: The host reports unset string options as empty strings or nulls.

use serde::Deserialize;

/// Treat `null`, `""` and whitespace-only strings as an unset option.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}
