// ABOUTME: Container image reference parsing.
// ABOUTME: Accepts nginx, nginx:1.27 and registry.example.com:5000/team/nginx:tag.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: {0}")]
    InvalidChar(char),

    #[error("image reference has an empty tag: {0}")]
    EmptyTag(String),
}

/// A pullable image reference. The tag is optional; the runtime applies its
/// own default when it is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    repository: String,
    tag: Option<String>,
}

impl ImageRef {
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageRefError::Empty);
        }

        if let Some(c) = input
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '/' | ':' | '.' | '-' | '_'))
        {
            return Err(ParseImageRefError::InvalidChar(c));
        }

        // A colon followed by a slash belongs to a registry port, not a tag
        match input.rsplit_once(':') {
            Some((_, after)) if after.contains('/') => Ok(Self {
                repository: input.to_string(),
                tag: None,
            }),
            Some((_, "")) => Err(ParseImageRefError::EmptyTag(input.to_string())),
            Some((before, after)) => Ok(Self {
                repository: before.to_string(),
                tag: Some(after.to_string()),
            }),
            None => Ok(Self {
                repository: input.to_string(),
                tag: None,
            }),
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

impl Default for ImageRef {
    fn default() -> Self {
        Self {
            repository: "nginx".to_string(),
            tag: None,
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repository)?;
        if let Some(ref tag) = self.tag {
            write!(f, ":{}", tag)?;
        }
        Ok(())
    }
}

impl FromStr for ImageRef {
    type Err = ParseImageRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_has_no_tag() {
        let image = ImageRef::parse("nginx").unwrap();
        assert_eq!(image.repository(), "nginx");
        assert_eq!(image.tag(), None);
        assert_eq!(image.to_string(), "nginx");
    }

    #[test]
    fn registry_port_is_not_a_tag() {
        let image = ImageRef::parse("registry.local:5000/web/nginx").unwrap();
        assert_eq!(image.repository(), "registry.local:5000/web/nginx");
        assert_eq!(image.tag(), None);

        let tagged = ImageRef::parse("registry.local:5000/web/nginx:1.27").unwrap();
        assert_eq!(tagged.repository(), "registry.local:5000/web/nginx");
        assert_eq!(tagged.tag(), Some("1.27"));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(ImageRef::parse("  "), Err(ParseImageRefError::Empty));
        assert_eq!(
            ImageRef::parse("nginx latest"),
            Err(ParseImageRefError::InvalidChar(' '))
        );
        assert!(matches!(
            ImageRef::parse("nginx:"),
            Err(ParseImageRefError::EmptyTag(_))
        ));
    }
}
