use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Ordered list of managed attachment paths.
///
/// Persisted as a single comma-joined string; the empty string means no attachments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentList(Vec<PathBuf>);

impl AttachmentList {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self(paths)
    }

    /// Split a stored `file_path` value. Empty segments are dropped.
    pub fn parse(joined: &str) -> Self {
        Self(
            joined
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect(),
        )
    }

    pub fn to_joined(&self) -> String {
        self.0
            .iter()
            .map(|p| p.to_string_lossy())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<PathBuf>> for AttachmentList {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self(paths)
    }
}

/// A competitive-exam posting as stored in the `concorsi` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamPosting {
    pub id: i64,
    /// `ente`
    pub institution: String,
    /// `descrizione`
    pub description: String,
    /// `scadenza`, expected as `YYYY-MM-DD` but stored verbatim
    pub deadline: String,
    pub link: String,
    /// `nota`
    pub note: String,
    pub attachments: AttachmentList,
}

/// Insert payload: everything but the generated id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewExamPosting {
    pub institution: String,
    pub description: String,
    pub deadline: String,
    pub link: String,
    pub note: String,
    pub attachments: AttachmentList,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_is_empty() {
        assert!(AttachmentList::parse("").is_empty());
        assert_eq!(AttachmentList::default().to_joined(), "");
    }

    #[test]
    fn test_parse_preserves_order() {
        let list = AttachmentList::parse("bandi_pdf/2_b.pdf,bandi_pdf/1_a.pdf");
        assert_eq!(
            list.paths(),
            &[
                PathBuf::from("bandi_pdf/2_b.pdf"),
                PathBuf::from("bandi_pdf/1_a.pdf")
            ]
        );
        assert_eq!(list.to_joined(), "bandi_pdf/2_b.pdf,bandi_pdf/1_a.pdf");
    }

    #[test]
    fn test_parse_skips_blank_segments() {
        let list = AttachmentList::parse("a.pdf,,b.pdf,");
        assert_eq!(list.len(), 2);
    }
}
