//! Per-navigation snapshots of the course index and paper catalog.

use crate::client::PapersService;
use crate::search;
use crate::{Course, Paper, PapersError};

/// Which papers a course page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogScope {
    All,
    Course(String),
}

impl CatalogScope {
    /// Build from the `course_title` navigation parameter; absent or empty
    /// means all papers.
    pub fn from_param(course_title: Option<&str>) -> Self {
        match course_title.map(str::trim) {
            Some(title) if !title.is_empty() => Self::Course(title.to_string()),
            _ => Self::All,
        }
    }

    pub fn course_title(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Course(title) => Some(title),
        }
    }

    /// Page heading.
    pub fn title(&self) -> &str {
        self.course_title().unwrap_or("All Papers")
    }
}

/// Load lifecycle of a page's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    /// Load failed; the message is shown in place of the list.
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> LoadState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// All papers for one scope, replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperCatalog {
    pub scope: CatalogScope,
    pub papers: Vec<Paper>,
}

impl PaperCatalog {
    pub fn empty(scope: CatalogScope) -> Self {
        Self {
            scope,
            papers: Vec::new(),
        }
    }

    pub async fn load(
        service: &dyn PapersService,
        scope: CatalogScope,
    ) -> Result<Self, PapersError> {
        let papers = service.papers(scope.course_title()).await?;
        tracing::debug!(scope = scope.title(), count = papers.len(), "loaded paper catalog");
        Ok(Self { scope, papers })
    }

    /// Page subtitle: the first paper's course code when it has one, else a
    /// count. One course's papers are assumed to share a code.
    pub fn subtitle(&self) -> String {
        match self.papers.first().and_then(|p| p.course_code.as_deref()) {
            Some(code) => code.to_string(),
            None => format!("{} papers available", self.papers.len()),
        }
    }
}

/// The course list used by the home search box and the command palette.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseIndex {
    pub courses: Vec<Course>,
}

impl CourseIndex {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    pub async fn load(service: &dyn PapersService) -> Result<Self, PapersError> {
        let courses = service.courses().await?;
        tracing::debug!(count = courses.len(), "loaded course index");
        Ok(Self { courses })
    }

    pub fn search(&self, query: &str) -> Vec<&Course> {
        search::match_courses(&self.courses, query)
    }

    pub fn search_indices(&self, query: &str) -> Vec<usize> {
        search::matched_indices(&self.courses, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(filename: &str, code: Option<&str>) -> Paper {
        Paper {
            filename: filename.into(),
            course_title: None,
            course_code: code.map(Into::into),
            slot: "A1".into(),
            exam_type: "cat1".into(),
            semester_name: "2024".into(),
        }
    }

    #[test]
    fn scope_from_param() {
        assert_eq!(CatalogScope::from_param(None), CatalogScope::All);
        assert_eq!(CatalogScope::from_param(Some("  ")), CatalogScope::All);
        let scope = CatalogScope::from_param(Some("Operating Systems"));
        assert_eq!(scope.course_title(), Some("Operating Systems"));
        assert_eq!(scope.title(), "Operating Systems");
        assert_eq!(CatalogScope::All.title(), "All Papers");
    }

    #[test]
    fn subtitle_uses_first_paper_code() {
        let catalog = PaperCatalog {
            scope: CatalogScope::All,
            papers: vec![paper("a.pdf", Some("BCSE303L")), paper("b.pdf", Some("OTHER"))],
        };
        assert_eq!(catalog.subtitle(), "BCSE303L");
    }

    #[test]
    fn subtitle_falls_back_to_count() {
        let catalog = PaperCatalog {
            scope: CatalogScope::All,
            papers: vec![paper("a.pdf", None), paper("b.pdf", Some("X"))],
        };
        assert_eq!(catalog.subtitle(), "2 papers available");
        assert_eq!(
            PaperCatalog::empty(CatalogScope::All).subtitle(),
            "0 papers available"
        );
    }

    #[test]
    fn load_state_accessors() {
        let state: LoadState<u8> = LoadState::Failed("boom".into());
        assert_eq!(state.error(), Some("boom"));
        assert!(!state.is_loaded());
        assert_eq!(LoadState::Loaded(3).loaded(), Some(&3));
        assert!(LoadState::<u8>::Loading.is_loading());
        assert_eq!(LoadState::<u8>::default(), LoadState::Idle);
    }
}
