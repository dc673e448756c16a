//! Column descriptors.
//!
//! A column carries an optional hashtag, a set of attributes, an optional
//! human-readable header and the position it had when the source was parsed.
//! Tags and attributes are stored lowercase without their `#`/`+` prefixes
//! except for the tag itself, which keeps its leading `#`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Sign of an attribute inside a tag spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttributeSign {
    Include,
    Exclude,
}

/// Returns true if `value` is a valid HXL token (letter followed by letters, digits or `_`).
pub fn is_token(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic() && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Split a tag spec such as `#sector+cluster-code` into its lowercase tag
/// (without `#`) and signed attributes.
///
/// `require_hash` controls whether the leading `#` is mandatory, and
/// `allow_wildcard` whether `*` is accepted as the tag.
pub(crate) fn split_tagspec(
    spec: &str,
    require_hash: bool,
    allow_wildcard: bool,
) -> Option<(String, Vec<(AttributeSign, String)>)> {
    let trimmed = spec.trim();
    let body = match trimmed.strip_prefix('#') {
        Some(rest) => rest,
        None if require_hash => return None,
        None => trimmed,
    };

    let mut tag_end = body.len();
    for (idx, ch) in body.char_indices() {
        if ch == '+' || ch == '-' {
            tag_end = idx;
            break;
        }
    }
    let tag = body[..tag_end].trim();
    if !(is_token(tag) || (allow_wildcard && tag == "*")) {
        return None;
    }

    let mut attributes = Vec::new();
    let mut rest = &body[tag_end..];
    while let Some(sign_char) = rest.chars().next() {
        let sign = match sign_char {
            '+' => AttributeSign::Include,
            '-' => AttributeSign::Exclude,
            _ => return None,
        };
        rest = &rest[1..];
        let end = rest.find(['+', '-']).unwrap_or(rest.len());
        let attribute = rest[..end].trim();
        if !is_token(attribute) {
            return None;
        }
        attributes.push((sign, attribute.to_lowercase()));
        rest = &rest[end..];
    }

    Some((tag.to_lowercase(), attributes))
}

/// Immutable description of a single column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Canonical hashtag including the leading `#`, or `None` for untagged columns.
    pub tag: Option<String>,
    /// Attribute tokens without the `+` prefix.
    pub attributes: BTreeSet<String>,
    /// Human-readable header text.
    pub header: Option<String>,
    /// 0-based position assigned when the source was parsed.
    pub column_number: Option<usize>,
}

impl Column {
    /// Parse a tag spec such as `#adm1+code+v_pcode`.
    ///
    /// Attributes may only be added (`+`); a malformed token is an error.
    pub fn parse(spec: &str) -> Result<Self> {
        let (tag, attributes) = split_tagspec(spec, true, false)
            .ok_or_else(|| ModelError::InvalidTagSpec(spec.to_string()))?;
        if attributes
            .iter()
            .any(|(sign, _)| *sign == AttributeSign::Exclude)
        {
            return Err(ModelError::InvalidTagSpec(spec.to_string()));
        }
        Ok(Self {
            tag: Some(format!("#{tag}")),
            attributes: attributes.into_iter().map(|(_, name)| name).collect(),
            header: None,
            column_number: None,
        })
    }

    /// Parse a tag spec and attach header text.
    pub fn parse_with_header(spec: &str, header: Option<&str>) -> Result<Self> {
        Ok(Self::parse(spec)?.with_header(header))
    }

    /// A column without a hashtag.
    pub fn untagged(header: Option<&str>) -> Self {
        Self::default().with_header(header)
    }

    #[must_use]
    pub fn with_header(mut self, header: Option<&str>) -> Self {
        self.header = header
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_column_number(mut self, column_number: usize) -> Self {
        self.column_number = Some(column_number);
        self
    }

    pub fn is_tagged(&self) -> bool {
        self.tag.is_some()
    }

    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes
            .contains(attribute.trim_start_matches('+').to_lowercase().as_str())
    }

    /// Tag plus attributes in sorted order, e.g. `#sector+cluster+es`.
    pub fn display_tag(&self) -> Option<String> {
        let tag = self.tag.as_ref()?;
        let mut out = tag.clone();
        for attribute in &self.attributes {
            out.push('+');
            out.push_str(attribute);
        }
        Some(out)
    }

    /// Same tag and the same attribute set, ignoring header and position.
    pub fn is_attribute_equal(&self, other: &Column) -> bool {
        self.tag == other.tag && self.attributes == other.attributes
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.display_tag(), &self.header) {
            (Some(tag), _) => f.write_str(&tag),
            (None, Some(header)) => f.write_str(header),
            (None, None) => Ok(()),
        }
    }
}

impl FromStr for Column {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
