//! Multipart form encoding shared by every form-posting endpoint.

use crate::{Attachment, Error, Result};
use reqwest::multipart::{Form, Part};

/// A payload Mailgun accepts as `multipart/form-data`.
pub(crate) trait FormEncode {
    /// Text fields in wire order. Names may repeat.
    fn fields(&self) -> Result<Vec<(&'static str, String)>>;

    /// File parts with their field names.
    fn files(&self) -> Vec<(&'static str, &Attachment)> {
        Vec::new()
    }
}

/// Build the multipart body for a payload.
pub(crate) fn to_multipart(payload: &impl FormEncode) -> Result<Form> {
    let mut form = Form::new();
    for (name, value) in payload.fields()? {
        form = form.text(name, value);
    }
    for (name, file) in payload.files() {
        let mut part = Part::bytes(file.data().to_vec()).file_name(file.filename().to_string());
        if let Some(content_type) = file.content_type() {
            part = part
                .mime_str(content_type)
                .map_err(|e| Error::EncodingProblem(format!("{}: {e}", file.filename())))?;
        }
        form = form.part(name, part);
    }
    Ok(form)
}
