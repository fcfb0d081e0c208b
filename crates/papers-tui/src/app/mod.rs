mod backend;
mod update;
mod util;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc;

use papers_core::storage::save_theme;
use papers_core::{CatalogScope, DoneSet, KeyValueStore, LoadState};

use crate::model::course::CourseState;
use crate::model::home::HomeState;
use crate::model::palette::PaletteState;
use crate::model::upload::UploadState;
use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Which screen is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Course,
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    TextInput,
}

/// One-line message in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    pub home: HomeState,
    pub course: CourseState,
    pub palette: PaletteState,
    pub upload: UploadState,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub done: DoneSet<Box<dyn KeyValueStore>>,
    /// Papers service base URL, for copyable download links.
    pub base_url: String,
    pub status: Option<StatusLine>,
    pub tick: usize,
    pub should_quit: bool,
    pub confirm_quit: bool,
    pub show_help: bool,
    /// Height of the visible list area (set on resize, used for page up/down).
    pub visible_rows: usize,
    /// Channel to send commands to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
    /// Last list area rendered (for mouse click to row mapping).
    pub last_list_area: Option<Rect>,
    /// First item shown in the last rendered list.
    pub list_offset: usize,
    next_request_id: u64,
}

impl App {
    pub fn new(theme: Theme, store: Box<dyn KeyValueStore>, base_url: impl Into<String>) -> Self {
        Self {
            screen: Screen::Home,
            home: HomeState::default(),
            course: CourseState::new(CatalogScope::All),
            palette: PaletteState::default(),
            upload: UploadState::default(),
            input_mode: InputMode::Normal,
            theme,
            done: DoneSet::new(store),
            base_url: base_url.into(),
            status: None,
            tick: 0,
            should_quit: false,
            confirm_quit: false,
            show_help: false,
            visible_rows: 20,
            backend_cmd_tx: None,
            last_list_area: None,
            list_offset: 0,
            next_request_id: 0,
        }
    }

    fn send(&self, cmd: BackendCommand) {
        if let Some(tx) = &self.backend_cmd_tx
            && tx.send(cmd).is_err()
        {
            tracing::error!("backend listener is gone");
        }
    }

    fn next_request_id(&mut self) -> u64 {
        self.next_request_id += 1;
        self.next_request_id
    }

    /// Fetch the course index for Home and the palette. A loaded index stays
    /// searchable until the new one arrives.
    pub fn load_courses(&mut self) {
        let request_id = self.next_request_id();
        self.home.request_id = request_id;
        if self.home.courses.is_loaded() {
            self.home.refreshing = true;
        } else {
            self.home.courses = LoadState::Loading;
        }
        self.send(BackendCommand::LoadCourses { request_id });
    }

    /// Fetch the current Course screen's catalog. A loaded catalog stays on
    /// screen, filters included, until the new one arrives.
    pub fn load_papers(&mut self) {
        let request_id = self.next_request_id();
        self.course.request_id = request_id;
        if self.course.catalog.is_loaded() {
            self.course.refreshing = true;
        } else {
            self.course.catalog = LoadState::Loading;
            self.course.recompute();
        }
        self.send(BackendCommand::LoadPapers {
            request_id,
            scope: self.course.scope.clone(),
        });
    }

    /// Navigate to a Course screen, discarding the previous one.
    pub fn open_course(&mut self, scope: CatalogScope) {
        tracing::info!(scope = scope.title(), "opening course page");
        self.course = CourseState::new(scope);
        self.screen = Screen::Course;
        self.input_mode = InputMode::Normal;
        self.list_offset = 0;
        self.load_papers();
    }

    pub fn go_home(&mut self) {
        self.screen = Screen::Home;
        self.input_mode = InputMode::Normal;
        self.list_offset = 0;
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            is_error: true,
        });
    }

    /// Flip the done mark on the selected paper. The visible list and the
    /// facet counts are left exactly as they are.
    fn toggle_done_selected(&mut self) {
        let Some(filename) = self.course.selected_paper().map(|p| p.filename.clone()) else {
            return;
        };
        if let Err(e) = self.done.toggle(&filename) {
            tracing::warn!(filename, error = %e, "failed to persist done state");
            self.set_error(format!("Could not save done state: {e}"));
        }
    }

    fn toggle_theme(&mut self) {
        let preference = self.theme.preference.toggled();
        self.theme = Theme::from_preference(preference);
        if let Err(e) = save_theme(self.done.store_mut(), preference) {
            tracing::warn!(error = %e, "failed to persist theme");
        }
    }

    fn download_selected(&mut self) {
        let Some(filename) = self.course.selected_paper().map(|p| p.filename.clone()) else {
            return;
        };
        self.set_status(format!("Downloading {filename}..."));
        self.send(BackendCommand::Download { filename });
    }

    fn copy_selected_url(&mut self) {
        let Some(filename) = self.course.selected_paper().map(|p| p.filename.clone()) else {
            return;
        };
        let url = papers_core::client::download_url(&self.base_url, &filename);
        util::osc52_copy(&url);
        self.set_status(format!("Copied link to {filename}"));
    }

    fn submit_upload(&mut self) {
        if self.upload.submitting {
            return;
        }
        let form = self.upload.to_form();
        if let Err(e) = form.validate() {
            self.upload.error = Some(e.to_string());
            return;
        }
        self.upload.submitting = true;
        self.upload.error = None;
        self.send(BackendCommand::Upload { form });
    }

    // update() is in update.rs
    // handle_backend_event() is in backend.rs

    /// Render the current screen.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();
        let [body_area, footer_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

        match self.screen {
            Screen::Home => crate::view::home::render_in(f, self, body_area),
            Screen::Course => crate::view::course::render_in(f, self, body_area),
        }

        self.render_footer(f, footer_area);

        if self.palette.open {
            crate::view::palette::render(f, self);
        }

        if self.upload.active {
            crate::view::upload::render(f, self);
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }

        if self.confirm_quit {
            crate::view::quit_confirm::render(f, &self.theme);
        }
    }

    fn render_footer(&self, f: &mut ratatui::Frame, area: Rect) {
        let theme = &self.theme;
        let hints = match (self.screen, &self.input_mode) {
            (_, InputMode::TextInput) => " Enter:save  Esc:cancel",
            _ if self.palette.open => " type to search  \u{2191}\u{2193}:select  Enter:open  Esc:close",
            _ if self.upload.active => " j/k:field  Enter:edit/submit  Esc:close",
            (Screen::Home, InputMode::Search) => " type to search  \u{2191}\u{2193}:select  Enter:open  Esc:done",
            (Screen::Course, InputMode::Search) => " type to search  Enter:open  Esc:close",
            (Screen::Home, InputMode::Normal) => {
                " /:search  Enter:open  A:all papers  ^K:palette  u:upload  t:theme  ?:help  q:quit"
            }
            (Screen::Course, InputMode::Normal) => {
                " Tab:pane  Space:toggle  x:clear  Enter:download  y:copy link  r:reload  Esc:home  ?:help"
            }
        };

        let line = match &self.status {
            Some(status) => {
                let color = if status.is_error {
                    theme.error
                } else {
                    theme.success
                };
                Line::from(vec![
                    Span::styled(format!(" {}", status.text), Style::default().fg(color)),
                    Span::styled("  |", theme.footer_style()),
                    Span::styled(hints, theme.footer_style()),
                ])
            }
            None => Line::from(Span::styled(hints, theme.footer_style())),
        };
        f.render_widget(Paragraph::new(line), area);
    }
}
