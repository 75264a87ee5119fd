//! Object URL preview handles.

use boltzmann_core::{PreviewRef, WorkflowError, WorkflowResult};
use web_sys::{File, Url};

/// A `blob:` URL pointing at a selected file, revoked on drop.
#[derive(Debug)]
pub struct ObjectUrl {
    url: String,
}

impl ObjectUrl {
    pub fn from_file(file: &File) -> WorkflowResult<Self> {
        Url::create_object_url_with_blob(file)
            .map(|url| Self { url })
            .map_err(|e| WorkflowError::Browser(format!("Failed to create preview: {:?}", e)))
    }
}

impl PreviewRef for ObjectUrl {
    fn src(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        match Url::revoke_object_url(&self.url) {
            Ok(()) => log::debug!("Revoked preview {}", self.url),
            Err(e) => log::warn!("Could not revoke preview {}: {:?}", self.url, e),
        }
    }
}
