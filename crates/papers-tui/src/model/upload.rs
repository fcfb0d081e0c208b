use std::path::PathBuf;

use papers_core::{ExamType, Term, UploadForm};

/// Rows of the upload dialog, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadField {
    CourseTitle,
    CourseCode,
    Year,
    Semester,
    ExamType,
    Slot,
    File,
    Submit,
}

impl UploadField {
    pub const ALL: [UploadField; 8] = [
        UploadField::CourseTitle,
        UploadField::CourseCode,
        UploadField::Year,
        UploadField::Semester,
        UploadField::ExamType,
        UploadField::Slot,
        UploadField::File,
        UploadField::Submit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::CourseTitle => "Course title",
            Self::CourseCode => "Course code",
            Self::Year => "Year",
            Self::Semester => "Semester",
            Self::ExamType => "Exam type",
            Self::Slot => "Slot",
            Self::File => "File",
            Self::Submit => "Submit",
        }
    }

    /// Free-text fields open an edit buffer; the rest cycle or act.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            Self::CourseTitle | Self::CourseCode | Self::Year | Self::Slot | Self::File
        )
    }
}

/// State for the upload modal.
#[derive(Debug, Clone, Default)]
pub struct UploadState {
    pub active: bool,
    pub course_title: String,
    pub course_code: String,
    pub year: String,
    pub semester: Option<Term>,
    pub exam_type: Option<ExamType>,
    pub slot: String,
    pub file: String,
    pub cursor: usize,
    pub editing: bool,
    pub edit_buffer: String,
    /// Byte offset of the cursor within `edit_buffer`.
    pub edit_cursor: usize,
    /// A submit is in flight; further submits are ignored until it returns.
    pub submitting: bool,
    /// Message from the last failed submit, shown under the form.
    pub error: Option<String>,
}

impl UploadState {
    /// Open the dialog, pre-filling the course title when a course is shown.
    /// Fields kept from an earlier failed attempt are left as they were.
    pub fn open(&mut self, course_title: Option<&str>) {
        self.active = true;
        self.cursor = 0;
        self.editing = false;
        if self.course_title.is_empty()
            && let Some(title) = course_title
        {
            self.course_title = title.to_string();
        }
    }

    /// Clear every field after a successful submit.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn field(&self) -> UploadField {
        UploadField::ALL[self.cursor.min(UploadField::ALL.len() - 1)]
    }

    /// Text shown for a field row.
    pub fn value(&self, field: UploadField) -> String {
        match field {
            UploadField::CourseTitle => self.course_title.clone(),
            UploadField::CourseCode => self.course_code.clone(),
            UploadField::Year => self.year.clone(),
            UploadField::Semester => self
                .semester
                .map(|t| t.to_string())
                .unwrap_or_else(|| "(none)".to_string()),
            UploadField::ExamType => self
                .exam_type
                .map(|t| t.to_string())
                .unwrap_or_else(|| "(none)".to_string()),
            UploadField::Slot => self.slot.clone(),
            UploadField::File => self.file.clone(),
            UploadField::Submit => String::new(),
        }
    }

    fn text_mut(&mut self, field: UploadField) -> Option<&mut String> {
        match field {
            UploadField::CourseTitle => Some(&mut self.course_title),
            UploadField::CourseCode => Some(&mut self.course_code),
            UploadField::Year => Some(&mut self.year),
            UploadField::Slot => Some(&mut self.slot),
            UploadField::File => Some(&mut self.file),
            UploadField::Semester | UploadField::ExamType | UploadField::Submit => None,
        }
    }

    /// Start editing the text field under the cursor.
    pub fn begin_edit(&mut self) {
        let field = self.field();
        if field.is_text() {
            self.edit_buffer = self.value(field);
            self.edit_cursor = self.edit_buffer.len();
            self.editing = true;
        }
    }

    pub fn commit_edit(&mut self) {
        let field = self.field();
        let buffer = std::mem::take(&mut self.edit_buffer);
        if let Some(target) = self.text_mut(field) {
            *target = buffer;
        }
        self.editing = false;
        self.edit_cursor = 0;
    }

    pub fn cancel_edit(&mut self) {
        self.edit_buffer.clear();
        self.edit_cursor = 0;
        self.editing = false;
    }

    /// Advance the enum field under the cursor; unset starts at the first
    /// value.
    pub fn cycle(&mut self) {
        match self.field() {
            UploadField::Semester => {
                self.semester = Some(self.semester.map_or(Term::Fallsem, Term::next));
            }
            UploadField::ExamType => {
                self.exam_type = Some(self.exam_type.map_or(ExamType::Cat1, ExamType::next));
            }
            _ => {}
        }
    }

    pub fn to_form(&self) -> UploadForm {
        let file = self.file.trim();
        UploadForm {
            course_title: self.course_title.clone(),
            course_code: self.course_code.clone(),
            year: self.year.clone(),
            semester_name: self.semester,
            exam_type: self.exam_type,
            slot: self.slot.clone(),
            file: (!file.is_empty()).then(|| expand_home(file)),
        }
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
