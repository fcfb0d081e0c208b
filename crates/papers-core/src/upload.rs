//! Packaging and submitting a new paper to the papers service.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::PapersError;
use crate::client::{PapersService, RawResponse, UploadRequest, download_file_name};

/// Message shown when the server accepts an upload without saying anything.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Upload successful!";

/// Academic term an uploaded paper was sat in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Fallsem,
    Wintersem,
    Summersem,
}

impl Term {
    pub const ALL: [Term; 3] = [Term::Fallsem, Term::Wintersem, Term::Summersem];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fallsem => "Fallsem",
            Self::Wintersem => "Wintersem",
            Self::Summersem => "Summersem",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Fallsem => Self::Wintersem,
            Self::Wintersem => Self::Summersem,
            Self::Summersem => Self::Fallsem,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Term {
    type Err = PapersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Term::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PapersError::InvalidUpload(format!("unknown semester: {s}")))
    }
}

/// Exam category of an uploaded paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamType {
    Cat1,
    Cat2,
    Fat,
}

impl ExamType {
    pub const ALL: [ExamType; 3] = [ExamType::Cat1, ExamType::Cat2, ExamType::Fat];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cat1 => "cat1",
            Self::Cat2 => "cat2",
            Self::Fat => "fat",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Cat1 => Self::Cat2,
            Self::Cat2 => Self::Fat,
            Self::Fat => Self::Cat1,
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamType {
    type Err = PapersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExamType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PapersError::InvalidUpload(format!("unknown exam type: {s}")))
    }
}

/// Everything the upload surface collects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub course_title: String,
    pub course_code: String,
    pub year: String,
    pub semester_name: Option<Term>,
    pub exam_type: Option<ExamType>,
    pub slot: String,
    pub file: Option<PathBuf>,
}

impl UploadForm {
    /// Client-side checks; the server validates again.
    pub fn validate(&self) -> Result<(), PapersError> {
        if self.course_title.trim().is_empty() {
            return Err(PapersError::InvalidUpload(
                "course title is required".to_string(),
            ));
        }
        match &self.file {
            None => Err(PapersError::InvalidUpload("a file is required".to_string())),
            Some(path) if !path.is_file() => Err(PapersError::InvalidUpload(format!(
                "file not found: {}",
                path.display()
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Multipart text fields, in form order. Unset optional fields are sent
    /// empty.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("course_title", self.course_title.trim().to_string()),
            ("course_code", self.course_code.trim().to_string()),
            ("year", self.year.trim().to_string()),
            (
                "semester_name",
                self.semester_name.map(|t| t.to_string()).unwrap_or_default(),
            ),
            (
                "exam_type",
                self.exam_type.map(|t| t.to_string()).unwrap_or_default(),
            ),
            ("slot", self.slot.trim().to_string()),
        ]
    }

    /// Validate and read the file into an [`UploadRequest`].
    pub async fn to_request(&self) -> Result<UploadRequest, PapersError> {
        self.validate()?;
        let Some(path) = self.file.as_ref() else {
            return Err(PapersError::InvalidUpload("a file is required".to_string()));
        };
        let file_bytes = tokio::fs::read(path).await?;
        let file_name = download_file_name(&path.to_string_lossy());
        Ok(UploadRequest {
            fields: self.fields(),
            file_name,
            file_bytes,
        })
    }
}

/// Accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponseBody {
    message: Option<String>,
}

/// Turn a raw upload response into a receipt or a user-facing rejection.
///
/// The body may or may not be JSON. On failure the message is the server's
/// `message` field, else the raw body, else the bare status.
pub fn interpret_response(response: &RawResponse) -> Result<UploadReceipt, PapersError> {
    let server_message = serde_json::from_str::<UploadResponseBody>(&response.body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    if response.is_success() {
        return Ok(UploadReceipt {
            message: server_message.unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
        });
    }

    let message = server_message
        .or_else(|| Some(response.body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| format!("HTTP {}", response.status));
    Err(PapersError::Rejected(message))
}

/// Submit `form`. Transport failures come back as their own error text; any
/// non-2xx status comes back as [`PapersError::Rejected`].
pub async fn submit(
    service: &dyn PapersService,
    form: &UploadForm,
) -> Result<UploadReceipt, PapersError> {
    let request = form.to_request().await?;
    tracing::info!(
        course = %form.course_title,
        file = %request.file_name,
        bytes = request.file_bytes.len(),
        "submitting upload"
    );
    let response = service.upload(request).await?;
    let outcome = interpret_response(&response);
    if let Err(e) = &outcome {
        tracing::warn!(status = response.status, error = %e, "upload rejected");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn payload_too_large_surfaces_raw_text() {
        let err = interpret_response(&raw(413, "Payload too large")).unwrap_err();
        assert_eq!(err.to_string(), "Payload too large");
    }

    #[test]
    fn json_message_preferred_on_failure() {
        let err = interpret_response(&raw(400, r#"{"message":"course name is required"}"#))
            .unwrap_err();
        assert_eq!(err.to_string(), "course name is required");
    }

    #[test]
    fn empty_failure_body_falls_back_to_status() {
        let err = interpret_response(&raw(502, "  ")).unwrap_err();
        assert_eq!(err.to_string(), "HTTP 502");
    }

    #[test]
    fn success_message_or_default() {
        let ok = interpret_response(&raw(
            200,
            r#"{"success":true,"message":"Paper uploaded! It will be reviewed before appearing."}"#,
        ))
        .unwrap();
        assert_eq!(
            ok.message,
            "Paper uploaded! It will be reviewed before appearing."
        );
        let plain = interpret_response(&raw(200, "ok")).unwrap();
        assert_eq!(plain.message, DEFAULT_SUCCESS_MESSAGE);
    }

    #[test]
    fn validation_requires_title_and_file() {
        let mut form = UploadForm::default();
        assert!(matches!(form.validate(), Err(PapersError::InvalidUpload(_))));
        form.course_title = "Operating Systems".into();
        assert!(matches!(form.validate(), Err(PapersError::InvalidUpload(_))));
        form.file = Some(PathBuf::from("/definitely/not/here.pdf"));
        assert!(form.validate().is_err());

        let file = tempfile::NamedTempFile::new().unwrap();
        form.file = Some(file.path().to_path_buf());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn fields_are_trimmed_and_enums_serialized() {
        let form = UploadForm {
            course_title: " Operating Systems ".into(),
            course_code: "BCSE303L".into(),
            year: "2024".into(),
            semester_name: Some(Term::Wintersem),
            exam_type: Some(ExamType::Fat),
            slot: "B2".into(),
            file: None,
        };
        let fields = form.fields();
        assert_eq!(fields[0], ("course_title", "Operating Systems".to_string()));
        assert_eq!(fields[3], ("semester_name", "Wintersem".to_string()));
        assert_eq!(fields[4], ("exam_type", "fat".to_string()));
    }

    #[test]
    fn enums_parse_and_cycle() {
        assert_eq!("fallsem".parse::<Term>().unwrap(), Term::Fallsem);
        assert_eq!("CAT2".parse::<ExamType>().unwrap(), ExamType::Cat2);
        assert!("midterm".parse::<ExamType>().is_err());
        assert_eq!(Term::Summersem.next(), Term::Fallsem);
        assert_eq!(ExamType::Fat.next(), ExamType::Cat1);
    }
}
