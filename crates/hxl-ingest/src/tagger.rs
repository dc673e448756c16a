//! Add hashtags to untagged raw rows by matching header text.

use std::sync::LazyLock;

use hxl_model::Column;
use regex::Regex;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::tagged::HASHTAG_SCAN_ROWS;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("Invalid non-word regex"));

/// Lowercase, alphanumeric only, single spaces.
fn normalize_header(raw: &str) -> String {
    NON_WORD.replace_all(raw.trim(), " ").trim().to_lowercase()
}

/// One `Header text#tag` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    /// Normalised substring matched against header cells.
    pub header: String,
    /// Display tag written into the hashtag row.
    pub tag: String,
}

impl TagSpec {
    pub fn new(header: &str, tag: &str) -> Result<Self> {
        let column = Column::parse(tag)?;
        Ok(Self {
            header: normalize_header(header),
            tag: column.display_tag().unwrap_or_default(),
        })
    }

    /// Parse `Organisation#org+impl`; the tag starts at the last `#`.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = || IngestError::InvalidTagSpec(spec.to_string());
        let split = spec.rfind('#').ok_or_else(invalid)?;
        let (header, tag) = spec.split_at(split);
        if header.trim().is_empty() {
            return Err(invalid());
        }
        Self::new(header, tag).map_err(|_| invalid())
    }
}

/// Inserts a hashtag row below the first header row that matches enough specs.
#[derive(Debug, Clone)]
pub struct Tagger {
    specs: Vec<TagSpec>,
}

impl Tagger {
    pub fn new(specs: Vec<TagSpec>) -> Self {
        Self { specs }
    }

    /// Tags for `row`, or `None` if fewer than half the specs matched.
    fn try_tag_row(&self, row: &[String]) -> Option<Vec<String>> {
        let mut matched = 0usize;
        let tags: Vec<String> = row
            .iter()
            .map(|cell| {
                let cell = normalize_header(cell);
                match self
                    .specs
                    .iter()
                    .find(|spec| !spec.header.is_empty() && cell.contains(&spec.header))
                {
                    Some(spec) => {
                        matched += 1;
                        spec.tag.clone()
                    }
                    None => String::new(),
                }
            })
            .collect();
        (matched > 0 && matched as f64 / self.specs.len() as f64 >= 0.5).then_some(tags)
    }

    /// Return `raw` with a hashtag row inserted after the matched header row.
    pub fn tag_rows(&self, mut raw: Vec<Vec<String>>) -> Result<Vec<Vec<String>>> {
        let scanned = raw.len().min(HASHTAG_SCAN_ROWS);
        let found = raw
            .iter()
            .take(HASHTAG_SCAN_ROWS)
            .enumerate()
            .find_map(|(idx, row)| self.try_tag_row(row).map(|tags| (idx, tags)));
        let (header_index, tags) = found.ok_or(IngestError::TaggingFailed { scanned })?;
        debug!(header_row = header_index, "header row tagged");
        raw.insert(header_index + 1, tags);
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn parses_specs() {
        let spec = TagSpec::parse("Organi#org+impl").unwrap();
        assert_eq!(spec.header, "organi");
        assert_eq!(spec.tag, "#org+impl");
        assert!(TagSpec::parse("no tag").is_err());
        assert!(TagSpec::parse("#org").is_err());
        assert!(TagSpec::parse("Org#bad tag").is_err());
    }

    #[test]
    fn tags_matching_header_row() {
        let tagger = Tagger::new(vec![
            TagSpec::parse("cluster#sector").unwrap(),
            TagSpec::parse("organi#org").unwrap(),
        ]);
        let tagged = tagger
            .tag_rows(raw(&[
                &["Title"],
                &["Organisation name", "Cluster/Sector", "Notes"],
                &["WFP", "Food", "x"],
            ]))
            .unwrap();
        assert_eq!(tagged[2], ["#org", "#sector", ""]);
        assert_eq!(tagged.len(), 4);
    }

    #[test]
    fn fails_without_match() {
        let tagger = Tagger::new(vec![TagSpec::parse("cluster#sector").unwrap()]);
        assert!(matches!(
            tagger.tag_rows(raw(&[&["a", "b"]])),
            Err(IngestError::TaggingFailed { .. })
        ));
    }
}
