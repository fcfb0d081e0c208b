use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod catalog;
pub mod client;
pub mod config_file;
pub mod done;
pub mod facet;
pub mod filter;
pub mod search;
pub mod storage;
pub mod upload;

// Re-export for convenience
pub use catalog::{CatalogScope, CourseIndex, LoadState, PaperCatalog};
pub use client::{HttpPapersService, PapersService, RawResponse};
pub use done::DoneSet;
pub use facet::Facet;
pub use filter::{AllFacetCounts, FacetCounts, FilterSelection, count_by_facet_value, facet_counts};
pub use search::{MAX_MATCHES, match_courses};
pub use storage::{FileStore, KeyValueStore, MemoryStore, ThemePreference};
pub use upload::{ExamType, Term, UploadForm, UploadReceipt};

/// Papers service used when running against a local backend.
pub const LOCAL_API_BASE: &str = "http://localhost:8080";

/// Papers service used by the deployed site.
pub const DEPLOYED_API_BASE: &str = "https://deadsimplepapers-production.up.railway.app";

/// Placeholder shown where a paper carries no course code.
pub const NO_CODE_PLACEHOLDER: &str = "\u{2014}";

#[derive(Error, Debug)]
pub enum PapersError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid upload: {0}")]
    InvalidUpload(String),
    /// Upload refused by the server; the payload is the user-facing message.
    #[error("{0}")]
    Rejected(String),
    #[error("config error: {0}")]
    Config(String),
}

/// A previous-year exam paper as listed by the papers service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    /// Unique storage key, also used as the done-set identifier.
    pub filename: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub course_title: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub course_code: Option<String>,
    #[serde(default)]
    pub slot: String,
    #[serde(default, alias = "type")]
    pub exam_type: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub semester_name: String,
}

impl Paper {
    /// Course code for display, or the placeholder when absent.
    pub fn code_label(&self) -> &str {
        self.course_code.as_deref().unwrap_or(NO_CODE_PLACEHOLDER)
    }
}

/// A course entry from the course index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_title: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub course_code: Option<String>,
    #[serde(default)]
    pub paper_count: u32,
}

/// Format a year token as an academic-year range: `"2024"` becomes `"2024-25"`.
/// Anything that is not a plain integer is returned unchanged.
pub fn format_year(year: &str) -> String {
    match year.trim().parse::<i64>().ok().and_then(|y| Some((y, y.checked_add(1)?))) {
        Some((y, next)) => format!("{}-{:02}", y, next.rem_euclid(100)),
        None => year.to_string(),
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Token {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Token>::deserialize(deserializer)? {
        Some(Token::Text(s)) => s,
        Some(Token::Int(n)) => n.to_string(),
        Some(Token::Float(n)) => n.to_string(),
        None => String::new(),
    })
}

/// Resolved runtime configuration shared by the binaries.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
    /// Directory holding client-local state (done-set, theme).
    pub data_dir: PathBuf,
    /// Where downloaded papers are written.
    pub download_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEPLOYED_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
            data_dir: storage::default_data_dir(),
            download_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_accepts_legacy_type_key_and_numeric_year() {
        let json = r#"{"filename":"a.pdf","course_code":"","slot":"A1","type":"CAT1","semester_name":2024}"#;
        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.exam_type, "CAT1");
        assert_eq!(paper.semester_name, "2024");
        assert_eq!(paper.course_code, None);
        assert_eq!(paper.code_label(), "\u{2014}");
    }

    #[test]
    fn paper_missing_fields_default_to_empty() {
        let paper: Paper = serde_json::from_str(r#"{"filename":"x.pdf"}"#).unwrap();
        assert_eq!(paper.slot, "");
        assert_eq!(paper.exam_type, "");
        assert_eq!(paper.semester_name, "");
        assert_eq!(paper.course_title, None);
    }

    #[test]
    fn course_code_kept_when_present() {
        let course: Course = serde_json::from_str(
            r#"{"course_title":"Operating Systems","course_code":"BCSE303L","paper_count":7}"#,
        )
        .unwrap();
        assert_eq!(course.course_code.as_deref(), Some("BCSE303L"));
        assert_eq!(course.paper_count, 7);
    }

    #[test]
    fn format_year_ranges() {
        assert_eq!(format_year("2024"), "2024-25");
        assert_eq!(format_year("2099"), "2099-00");
        assert_eq!(format_year("Fallsem"), "Fallsem");
        assert_eq!(format_year(""), "");
        assert_eq!(format_year("9223372036854775807"), "9223372036854775807");
    }

    #[test]
    fn huge_numeric_year_renders_unchanged() {
        let paper: Paper =
            serde_json::from_str(r#"{"filename":"a.pdf","semester_name":9223372036854775807}"#)
                .unwrap();
        assert_eq!(format_year(&paper.semester_name), "9223372036854775807");
    }
}
