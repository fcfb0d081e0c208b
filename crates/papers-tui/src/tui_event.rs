use std::path::PathBuf;

use papers_core::{CatalogScope, Course, PaperCatalog, UploadForm, UploadReceipt};

/// Commands sent from the TUI to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    /// Fetch the course index.
    LoadCourses { request_id: u64 },
    /// Fetch the papers for one scope.
    LoadPapers {
        request_id: u64,
        scope: CatalogScope,
    },
    /// Save a stored paper into the download directory.
    Download { filename: String },
    /// Submit a new paper.
    Upload { form: UploadForm },
}

/// Events flowing from the backend task to the TUI. Failures carry the
/// user-facing message.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    CoursesLoaded {
        request_id: u64,
        result: Result<Vec<Course>, String>,
    },
    PapersLoaded {
        request_id: u64,
        result: Result<PaperCatalog, String>,
    },
    DownloadFinished {
        filename: String,
        result: Result<PathBuf, String>,
    },
    UploadFinished {
        result: Result<UploadReceipt, String>,
    },
}
