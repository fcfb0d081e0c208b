use papers_core::{CourseIndex, LoadState};

use super::{App, Screen};
use crate::tui_event::BackendEvent;

impl App {
    /// Process a backend event and update model state.
    ///
    /// Load results answering anything but the latest request for their page
    /// are dropped without touching state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::CoursesLoaded { request_id, result } => {
                if request_id != self.home.request_id {
                    tracing::debug!(request_id, "dropping stale course index");
                    return;
                }
                let refreshing = std::mem::take(&mut self.home.refreshing);
                match result {
                    Ok(courses) => {
                        self.home.courses = LoadState::Loaded(CourseIndex::new(courses));
                        let len = self.home.matches().len();
                        self.home.cursor = self.home.cursor.min(len.saturating_sub(1));
                    }
                    Err(e) if refreshing => {
                        tracing::warn!(error = %e, "course index refresh failed, keeping snapshot");
                        self.set_error(format!("Could not refresh courses: {e}"));
                    }
                    Err(e) => {
                        self.home.courses = LoadState::Failed(e);
                    }
                }
            }
            BackendEvent::PapersLoaded { request_id, result } => {
                if self.screen != Screen::Course || request_id != self.course.request_id {
                    tracing::debug!(request_id, "dropping stale paper catalog");
                    return;
                }
                let refreshing = std::mem::take(&mut self.course.refreshing);
                match result {
                    Ok(catalog) if refreshing => self.course.replace_loaded(catalog),
                    Ok(catalog) => self.course.set_loaded(catalog),
                    Err(e) if refreshing => {
                        tracing::warn!(error = %e, "paper catalog refresh failed, keeping snapshot");
                        self.set_error(format!("Could not refresh papers: {e}"));
                    }
                    Err(e) => self.course.set_failed(e),
                }
            }
            BackendEvent::DownloadFinished { filename, result } => match result {
                Ok(path) => self.set_status(format!("Saved {}", path.display())),
                Err(e) => self.set_error(format!("Download of {filename} failed: {e}")),
            },
            BackendEvent::UploadFinished { result } => {
                self.upload.submitting = false;
                match result {
                    Ok(receipt) => {
                        self.upload.reset();
                        self.set_status(receipt.message);
                        self.load_courses();
                        if self.screen == Screen::Course {
                            self.load_papers();
                        }
                    }
                    Err(e) => {
                        self.set_error(format!("Upload failed: {e}"));
                        self.upload.error = Some(e);
                    }
                }
            }
        }
    }
}
