use bytes::Bytes;
use reqwest::multipart::{Form, Part};

use crate::{ApiError, FailureKind};

/// Multipart field the backend reads the CV from.
pub const CV_FIELD_NAME: &str = "fichier_cv";
pub const PDF_MIME: &str = "application/pdf";

/// One request's worth of CV payload.
///
/// A multipart `Form` is consumed when sent, so every upload call owns its
/// own `CvUpload` and turns it into a fresh form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvUpload {
    file_name: String,
    bytes: Bytes,
}

impl CvUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn into_form(self) -> Result<Form, ApiError> {
        let part = Part::bytes(self.bytes.to_vec())
            .file_name(self.file_name)
            .mime_str(PDF_MIME)
            .map_err(|err| ApiError::new(FailureKind::InvalidRequest, err.to_string()))?;
        Ok(Form::new().part(CV_FIELD_NAME, part))
    }
}
