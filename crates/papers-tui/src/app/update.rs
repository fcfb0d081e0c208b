use papers_core::CatalogScope;

use super::util::{self, clicked_row};
use super::{App, InputMode, Screen};
use crate::action::Action;
use crate::model::course::Pane;
use crate::model::home::selected_with;
use crate::model::upload::UploadField;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::ForceQuit => {
                self.should_quit = true;
                return true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return false;
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(6);
                return false;
            }
            _ => {}
        }

        // Quit confirmation modal: q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack => {
                    self.confirm_quit = false;
                }
                _ => {}
            }
            return false;
        }

        if self.upload.active {
            self.update_upload(action);
            return false;
        }

        if self.palette.open {
            self.update_palette(action);
            return false;
        }

        if self.show_help {
            if matches!(
                action,
                Action::ToggleHelp | Action::NavigateBack | Action::Quit
            ) {
                self.show_help = false;
            }
            return false;
        }

        if self.screen == Screen::Home && self.input_mode == InputMode::Search {
            self.update_home_search(action);
            return false;
        }

        // Global keys
        match action {
            Action::Quit => {
                self.confirm_quit = true;
                return false;
            }
            Action::ToggleHelp => {
                self.show_help = true;
                return false;
            }
            Action::ToggleTheme => {
                self.toggle_theme();
                return false;
            }
            Action::OpenPalette => {
                self.palette.open();
                self.input_mode = InputMode::Search;
                return false;
            }
            Action::OpenUpload => {
                let title = match self.screen {
                    Screen::Course => self.course.scope.course_title().map(str::to_string),
                    Screen::Home => None,
                };
                self.upload.open(title.as_deref());
                self.input_mode = InputMode::Normal;
                return false;
            }
            Action::OpenAllPapers => {
                self.open_course(CatalogScope::All);
                return false;
            }
            _ => {}
        }

        match self.screen {
            Screen::Home => self.update_home(action),
            Screen::Course => self.update_course(action),
        }
        false
    }

    fn update_home(&mut self, action: Action) {
        match action {
            Action::StartSearch => {
                self.input_mode = InputMode::Search;
            }
            Action::MoveDown => self.home.move_cursor(1),
            Action::MoveUp => self.home.move_cursor(-1),
            Action::GoTop => self.home.cursor = 0,
            Action::GoBottom => self.home.move_cursor(isize::MAX),
            Action::DrillIn => self.open_selected_course(),
            Action::Reload => self.load_courses(),
            Action::ClickAt(x, y) => {
                if let Some(row) = self
                    .last_list_area
                    .and_then(|area| clicked_row(area, 0, x, y))
                    && row < self.home.matches().len()
                {
                    self.home.cursor = row;
                    self.open_selected_course();
                }
            }
            _ => {}
        }
    }

    fn update_home_search(&mut self, action: Action) {
        match action {
            Action::SearchInput(c) => self.home.push_char(c),
            Action::SearchBackspace => self.home.backspace(),
            Action::MoveDown => self.home.move_cursor(1),
            Action::MoveUp => self.home.move_cursor(-1),
            Action::SearchConfirm => self.open_selected_course(),
            Action::SearchCancel => self.input_mode = InputMode::Normal,
            Action::OpenPalette => {
                self.palette.open();
            }
            _ => {}
        }
    }

    fn open_selected_course(&mut self) {
        let title = self.home.selected().map(|c| c.course_title.clone());
        if let Some(title) = title {
            self.open_course(CatalogScope::Course(title));
        }
    }

    fn update_course(&mut self, action: Action) {
        let page = self.visible_rows.max(1) as isize;
        match action {
            Action::NavigateBack => self.go_home(),
            Action::SwitchPane => self.course.switch_pane(),
            Action::MoveDown => self.course.move_vertical(1),
            Action::MoveUp => self.course.move_vertical(-1),
            Action::MoveLeft => self.course.move_horizontal(-1),
            Action::MoveRight => self.course.move_horizontal(1),
            Action::PageDown => self.course.move_vertical(page),
            Action::PageUp => self.course.move_vertical(-page),
            Action::GoTop => self.course.move_vertical(isize::MIN),
            Action::GoBottom => self.course.move_vertical(isize::MAX),
            Action::Toggle => match self.course.focus {
                Pane::Filters => {
                    self.course.toggle_chip();
                }
                Pane::Papers => self.toggle_done_selected(),
            },
            Action::DrillIn => match self.course.focus {
                Pane::Filters => {
                    self.course.toggle_chip();
                }
                Pane::Papers => self.download_selected(),
            },
            Action::ClearFilters => self.course.clear_filters(),
            Action::CopyUrl => self.copy_selected_url(),
            Action::Reload => self.load_papers(),
            Action::ClickAt(x, y) => {
                if let Some(row) = self
                    .last_list_area
                    .and_then(|area| clicked_row(area, 1, x, y))
                {
                    let index = self.list_offset + row;
                    if index < self.course.visible.len() {
                        self.course.focus = Pane::Papers;
                        self.course.paper_cursor = index;
                    }
                }
            }
            _ => {}
        }
    }

    fn update_palette(&mut self, action: Action) {
        match action {
            Action::SearchInput(c) => {
                self.palette.query.push(c);
                self.palette.cursor = 0;
            }
            Action::SearchBackspace => {
                self.palette.query.pop();
                self.palette.cursor = 0;
            }
            Action::MoveDown | Action::MoveUp => {
                let delta = if action == Action::MoveDown { 1 } else { -1 };
                let len = crate::model::home::match_with(&self.home.courses, &self.palette.query).len();
                self.palette.cursor = crate::model::home::step(self.palette.cursor, delta, len);
            }
            Action::SearchConfirm => {
                let title = selected_with(&self.home.courses, &self.palette.query, self.palette.cursor)
                    .map(|c| c.course_title.clone());
                if let Some(title) = title {
                    self.close_palette();
                    self.open_course(CatalogScope::Course(title));
                }
            }
            Action::SearchCancel | Action::NavigateBack | Action::OpenPalette => self.close_palette(),
            Action::ClickAt(x, y) if !self.palette.contains(x, y) => self.close_palette(),
            _ => {}
        }
    }

    fn close_palette(&mut self) {
        self.palette.close();
        self.input_mode = InputMode::Normal;
    }

    fn update_upload(&mut self, action: Action) {
        if self.upload.editing {
            let upload = &mut self.upload;
            match action {
                Action::SearchInput(c) => {
                    util::insert_char(&mut upload.edit_buffer, &mut upload.edit_cursor, c)
                }
                Action::SearchBackspace => {
                    util::backspace(&mut upload.edit_buffer, &mut upload.edit_cursor)
                }
                Action::DeleteForward => {
                    util::delete_forward(&mut upload.edit_buffer, upload.edit_cursor)
                }
                Action::CursorLeft => util::cursor_left(&upload.edit_buffer, &mut upload.edit_cursor),
                Action::CursorRight => {
                    util::cursor_right(&upload.edit_buffer, &mut upload.edit_cursor)
                }
                Action::CursorHome => upload.edit_cursor = 0,
                Action::CursorEnd => upload.edit_cursor = upload.edit_buffer.len(),
                Action::SearchConfirm => {
                    upload.commit_edit();
                    self.input_mode = InputMode::Normal;
                }
                Action::SearchCancel => {
                    upload.cancel_edit();
                    self.input_mode = InputMode::Normal;
                }
                _ => {}
            }
            return;
        }

        let last = UploadField::ALL.len() - 1;
        match action {
            Action::Quit => self.confirm_quit = true,
            Action::NavigateBack => self.upload.active = false,
            Action::MoveDown | Action::SwitchPane => {
                self.upload.cursor = (self.upload.cursor + 1).min(last);
            }
            Action::MoveUp => {
                self.upload.cursor = self.upload.cursor.saturating_sub(1);
            }
            Action::MoveLeft | Action::MoveRight | Action::Toggle => self.upload.cycle(),
            Action::DrillIn => match self.upload.field() {
                UploadField::Submit => self.submit_upload(),
                UploadField::Semester | UploadField::ExamType => self.upload.cycle(),
                _ => {
                    self.upload.begin_edit();
                    self.input_mode = InputMode::TextInput;
                }
            },
            _ => {}
        }
    }
}
