//! Multipart request bodies.
//!
//! A `reqwest::multipart::Form` is consumed when sent, so the interceptor
//! cannot resend one. [`MultipartBody`] keeps the parts as plain data and
//! builds a fresh form for every attempt.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::Serialize;

use crate::error::ApiError;

/// A file to upload.
#[derive(Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a file from disk.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Upload` if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self { file_name, bytes })
    }
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Text fields and files of a multipart request, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    fields: Vec<(String, String)>,
    files: Vec<(String, Upload)>,
}

impl MultipartBody {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    #[must_use]
    pub fn text(mut self, name: &str, value: impl ToString) -> Self {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a text field only when `value` is present.
    #[must_use]
    pub fn text_opt(self, name: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.text(name, value),
            None => self,
        }
    }

    /// Add a field holding `value` encoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Parse` if `value` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(self, name: &str, value: &T) -> Result<Self, ApiError> {
        let encoded = serde_json::to_string(value)?;
        Ok(self.text(name, encoded))
    }

    /// Add one file part per upload, all under `name`.
    #[must_use]
    pub fn files(mut self, name: &str, uploads: &[Upload]) -> Self {
        self.files
            .extend(uploads.iter().map(|upload| (name.to_string(), upload.clone())));
        self
    }

    /// Value of the first text field called `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Number of file parts.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Build a new form from the stored parts.
    pub(crate) fn to_form(&self) -> Form {
        let form = self
            .fields
            .iter()
            .fold(Form::new(), |form, (name, value)| form.text(name.clone(), value.clone()));
        self.files.iter().fold(form, |form, (name, upload)| {
            form.part(
                name.clone(),
                Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone()),
            )
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_keep_order_and_skip_missing() {
        let body = MultipartBody::new()
            .text("name", "Flagship")
            .text_opt("map_url", None::<String>)
            .text("is_active", true)
            .json("opening_hours", &serde_json::json!({"monday": "10-8"}))
            .unwrap();

        assert_eq!(body.field("name"), Some("Flagship"));
        assert_eq!(body.field("is_active"), Some("true"));
        assert_eq!(body.field("opening_hours"), Some(r#"{"monday":"10-8"}"#));
        assert!(body.field("map_url").is_none());
    }

    #[test]
    fn test_files_share_a_field_name() {
        let uploads = [
            Upload::new("a.jpg", vec![1, 2, 3]),
            Upload::new("b.jpg", vec![4]),
        ];
        let body = MultipartBody::new().files("images", &uploads);
        assert_eq!(body.file_count(), 2);
    }

    #[test]
    fn test_upload_debug_hides_bytes() {
        let upload = Upload::new("a.jpg", vec![0; 1024]);
        assert_eq!(format!("{upload:?}"), r#"Upload { file_name: "a.jpg", len: 1024 }"#);
    }

    #[tokio::test]
    async fn test_upload_from_missing_path_fails() {
        let err = Upload::from_path("/definitely/not/here.jpg").await.unwrap_err();
        assert!(matches!(err, ApiError::Upload(_)));
    }
}
