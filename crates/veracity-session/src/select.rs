//! File-selection events and MIME validation.

use crate::error::UploadError;

/// MIME types accepted for upload.
///
/// `image/jpg` is not a registered type but is emitted by some hosts,
/// so it is accepted alongside the standard `image/jpeg`.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// One file carried by a selection event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Filename as reported by the host.
    pub name: String,
    /// MIME type as reported by the host.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Create a selected file from its parts.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// A file-selection event carrying zero or more files.
///
/// Only the first file is ever used; hosts that allow multi-select
/// still get single-file behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    files: Vec<SelectedFile>,
}

impl FileSelection {
    /// Create a selection event from a list of files.
    #[must_use]
    pub fn new(files: Vec<SelectedFile>) -> Self {
        Self { files }
    }

    /// Create a selection event carrying a single file.
    #[must_use]
    pub fn single(file: SelectedFile) -> Self {
        Self { files: vec![file] }
    }

    /// A selection event with no files (e.g. a cancelled picker).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Extract and validate the first file of a selection event.
///
/// # Errors
///
/// Returns [`UploadError::NoFileSelected`] if the selection is empty.
/// Returns [`UploadError::UnsupportedFileType`] if the first file's
/// MIME type is not in [`ACCEPTED_MIME_TYPES`].
pub fn validate(selection: FileSelection) -> Result<SelectedFile, UploadError> {
    let Some(file) = selection.files.into_iter().next() else {
        return Err(UploadError::NoFileSelected);
    };

    if !is_accepted(&file.content_type) {
        return Err(UploadError::UnsupportedFileType {
            content_type: file.content_type,
        });
    }

    Ok(file)
}

/// Check whether a MIME type is in the accepted set.
fn is_accepted(content_type: &str) -> bool {
    ACCEPTED_MIME_TYPES
        .iter()
        .any(|a| a.eq_ignore_ascii_case(content_type))
}
