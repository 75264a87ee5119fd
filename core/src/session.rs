//! Session value object and its read-only snapshot.
//!
//! [`UploadSession`] is only mutated through [`crate::Workflow`]; UI layers
//! render a [`SessionSnapshot`].

use serde::{Deserialize, Serialize};

use crate::error::{Failure, Stage};
use crate::models::Digit;

// =============================================================================
// Preview handle
// =============================================================================

/// A locally decoded image reference, used for display only.
///
/// Implementors release whatever backs the preview (object URL, temp
/// file...) in `Drop`; the session drops the previous handle as soon as a
/// new one replaces it.
pub trait PreviewRef {
    /// Something an `<img src>` or a terminal can show.
    fn src(&self) -> &str;
}

impl PreviewRef for String {
    fn src(&self) -> &str {
        self
    }
}

// =============================================================================
// Session
// =============================================================================

/// Transient client-side state for one upload/predict interaction.
#[derive(Debug)]
pub struct UploadSession<P> {
    pub(crate) preview: Option<P>,
    pub(crate) remote_asset_url: Option<String>,
    pub(crate) predicted_label: Option<Digit>,
    pub(crate) uploaded: bool,
    pub(crate) is_uploading: bool,
    pub(crate) is_predicting: bool,
    pub(crate) failure: Option<Failure>,
}

impl<P> Default for UploadSession<P> {
    fn default() -> Self {
        Self {
            preview: None,
            remote_asset_url: None,
            predicted_label: None,
            uploaded: false,
            is_uploading: false,
            is_predicting: false,
            failure: None,
        }
    }
}

impl<P: PreviewRef> UploadSession<P> {
    pub fn preview(&self) -> Option<&P> {
        self.preview.as_ref()
    }

    pub fn remote_asset_url(&self) -> Option<&str> {
        self.remote_asset_url.as_deref()
    }

    pub fn predicted_label(&self) -> Option<Digit> {
        self.predicted_label
    }

    /// An image has been selected (not necessarily hosted yet).
    pub fn uploaded(&self) -> bool {
        self.uploaded
    }

    pub fn is_uploading(&self) -> bool {
        self.is_uploading
    }

    pub fn is_predicting(&self) -> bool {
        self.is_predicting
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// True for the state a fresh page load starts in.
    pub fn is_empty(&self) -> bool {
        self.preview.is_none()
            && self.remote_asset_url.is_none()
            && self.predicted_label.is_none()
            && !self.uploaded
            && !self.is_uploading
            && !self.is_predicting
            && self.failure.is_none()
    }

    pub fn phase(&self) -> Phase {
        if !self.uploaded {
            return Phase::Empty;
        }
        if self.is_uploading {
            return Phase::Uploading;
        }
        if self.is_predicting {
            return Phase::Predicting;
        }
        if self.predicted_label.is_some() {
            return Phase::Predicted;
        }
        match self.failure.as_ref().map(|f| f.stage) {
            Some(Stage::Upload) => Phase::UploadFailed,
            Some(Stage::Prediction) => Phase::PredictionFailed,
            None => Phase::Uploaded {
                has_url: self.remote_asset_url.is_some(),
            },
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            preview_src: self.preview.as_ref().map(|p| p.src().to_string()),
            remote_asset_url: self.remote_asset_url.clone(),
            predicted_label: self.predicted_label,
            uploaded: self.uploaded,
            is_uploading: self.is_uploading,
            is_predicting: self.is_predicting,
            failure: self.failure.clone(),
            phase: self.phase(),
        }
    }
}

// =============================================================================
// Phase
// =============================================================================

/// Where the session sits in the upload/predict state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Empty,
    Uploading,
    Uploaded { has_url: bool },
    UploadFailed,
    Predicting,
    Predicted,
    PredictionFailed,
}

// =============================================================================
// Snapshot
// =============================================================================

/// Owned, comparable view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub preview_src: Option<String>,
    pub remote_asset_url: Option<String>,
    pub predicted_label: Option<Digit>,
    pub uploaded: bool,
    pub is_uploading: bool,
    pub is_predicting: bool,
    pub failure: Option<Failure>,
    pub phase: Phase,
}

impl SessionSnapshot {
    /// The predict action would actually issue a request.
    pub fn can_predict(&self) -> bool {
        self.remote_asset_url.is_some() && !self.is_predicting
    }

    /// The predict button is offered until a label is known.
    pub fn shows_predict_button(&self) -> bool {
        self.uploaded && self.predicted_label.is_none()
    }

    /// "Change Image" is offered once anything has been selected or predicted.
    pub fn shows_change_button(&self) -> bool {
        self.uploaded || self.predicted_label.is_some()
    }

    pub fn predict_button_label(&self) -> &'static str {
        if self.is_predicting {
            "Processing..."
        } else if self.is_uploading {
            "Uploading..."
        } else {
            "Get Predicted Result"
        }
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        UploadSession::<String>::default().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> UploadSession<String> {
        UploadSession::default()
    }

    #[test]
    fn test_default_is_empty() {
        let s = session();
        assert!(s.is_empty());
        assert_eq!(s.phase(), Phase::Empty);
        assert_eq!(s.snapshot(), SessionSnapshot::default());
    }

    #[test]
    fn test_phase_precedence() {
        let mut s = session();
        s.uploaded = true;
        s.preview = Some("blob:1".into());
        assert_eq!(s.phase(), Phase::Uploaded { has_url: false });

        s.is_uploading = true;
        assert_eq!(s.phase(), Phase::Uploading);

        s.is_uploading = false;
        s.failure = Some(Failure {
            stage: Stage::Upload,
            message: "boom".into(),
            timed_out: false,
        });
        assert_eq!(s.phase(), Phase::UploadFailed);

        s.failure = None;
        s.remote_asset_url = Some("https://host/x.png".into());
        s.predicted_label = Digit::new(0);
        assert_eq!(s.phase(), Phase::Predicted);
    }

    #[test]
    fn test_zero_label_hides_predict_button() {
        let mut s = session();
        s.uploaded = true;
        s.remote_asset_url = Some("https://host/x.png".into());
        s.predicted_label = Digit::new(0);

        let snap = s.snapshot();
        assert!(!snap.shows_predict_button());
        assert!(snap.shows_change_button());
    }

    #[test]
    fn test_button_labels() {
        let mut snap = SessionSnapshot::default();
        assert_eq!(snap.predict_button_label(), "Get Predicted Result");
        assert!(!snap.can_predict());

        snap.remote_asset_url = Some("https://host/x.png".into());
        assert!(snap.can_predict());

        snap.is_predicting = true;
        assert_eq!(snap.predict_button_label(), "Processing...");
        assert!(!snap.can_predict());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut s = session();
        s.uploaded = true;
        s.remote_asset_url = Some("https://host/x.png".into());
        s.predicted_label = Digit::new(7);

        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["predicted_label"], 7);
        assert_eq!(json["phase"]["phase"], "predicted");
    }
}
