// src/models/tag.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Category a post can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Question,
    Reflection,
    Testimony,
    #[serde(rename = "Prayer Request")]
    PrayerRequest,
    Other,
}

impl Tag {
    pub const ALL: [Tag; 5] = [
        Tag::Question,
        Tag::Reflection,
        Tag::Testimony,
        Tag::PrayerRequest,
        Tag::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Question => "Question",
            Tag::Reflection => "Reflection",
            Tag::Testimony => "Testimony",
            Tag::PrayerRequest => "Prayer Request",
            Tag::Other => "Other",
        }
    }

    /// Parses an optional form value where the empty string means "no tag".
    pub fn parse_optional(raw: &str) -> Result<Option<Tag>, UnknownTag> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown tag '{}'", self.0)
    }
}

impl std::error::Error for UnknownTag {}

impl FromStr for Tag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// Reads a stored tag column. Null, empty and unrecognised values all become
/// `None`; the last case is logged since it means another writer used a
/// category this forum does not know.
pub fn deserialize_stored<'de, D>(deserializer: D) -> Result<Option<Tag>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| match Tag::parse_optional(&raw) {
        Ok(tag) => tag,
        Err(err) => {
            tracing::warn!("Ignoring stored tag: {}", err);
            None
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_display_names() {
        assert_eq!("Prayer Request".parse::<Tag>(), Ok(Tag::PrayerRequest));
        assert_eq!("Testimony".parse::<Tag>(), Ok(Tag::Testimony));
        assert!("testimony".parse::<Tag>().is_err());
    }

    #[test]
    fn empty_form_value_means_no_tag() {
        assert_eq!(Tag::parse_optional(""), Ok(None));
        assert_eq!(Tag::parse_optional("  "), Ok(None));
        assert_eq!(Tag::parse_optional("Other"), Ok(Some(Tag::Other)));
        assert!(Tag::parse_optional("Tactics").is_err());
    }

    #[test]
    fn serializes_with_display_names() {
        assert_eq!(
            serde_json::to_string(&Tag::PrayerRequest).unwrap(),
            "\"Prayer Request\""
        );
    }
}
