//! The upload/predict state machine.
//!
//! ```text
//! Empty ──select──▶ Uploading ──ok──▶ Uploaded(url) ──predict──▶ Predicting ──ok──▶ Predicted
//!                       │                                          │
//!                       └──err──▶ UploadFailed                     └──err──▶ PredictionFailed
//!
//! reset: any ──▶ Empty          select: any ──▶ Uploading
//! ```
//!
//! Every `select_image` and `reset` opens a new generation. Network results
//! carry the [`Ticket`] of the generation they were issued under and are
//! dropped if that generation is gone.

use crate::error::{Failure, Stage, WorkflowResult};
use crate::models::Digit;
use crate::session::{PreviewRef, SessionSnapshot, UploadSession};

/// Generation tag handed out when a request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// What happened to a network result handed back to the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The result was written into the session.
    Applied,
    /// The session moved on since the request was issued; result dropped.
    Stale,
}

/// Owns the single active [`UploadSession`].
#[derive(Debug)]
pub struct Workflow<P> {
    session: UploadSession<P>,
    generation: u64,
}

impl<P> Default for Workflow<P> {
    fn default() -> Self {
        Self {
            session: UploadSession::default(),
            generation: 0,
        }
    }
}

impl<P: PreviewRef> Workflow<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &UploadSession<P> {
        &self.session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    fn next_generation(&mut self) -> Ticket {
        self.generation += 1;
        Ticket {
            generation: self.generation,
        }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    /// Install a freshly selected image and start the upload step.
    ///
    /// The previous preview handle is dropped here, before the caller
    /// starts transmitting the new file.
    pub fn select_image(&mut self, preview: P) -> Ticket {
        let ticket = self.next_generation();
        let session = &mut self.session;
        session.preview = Some(preview);
        session.remote_asset_url = None;
        session.predicted_label = None;
        session.failure = None;
        session.uploaded = true;
        session.is_uploading = true;
        session.is_predicting = false;
        log::debug!("Image selected (generation {})", ticket.generation);
        ticket
    }

    /// Record the asset host's answer for the upload issued under `ticket`.
    pub fn finish_upload(&mut self, ticket: Ticket, result: WorkflowResult<String>) -> Settled {
        if !self.is_current(ticket) {
            log::debug!("Dropping stale upload result (generation {})", ticket.generation);
            return Settled::Stale;
        }
        let session = &mut self.session;
        session.is_uploading = false;
        match result {
            Ok(url) => {
                log::info!("Image hosted at {}", url);
                session.remote_asset_url = Some(url);
            }
            Err(e) => {
                log::error!("Error uploading image: {}", e);
                session.failure = Some(Failure::new(Stage::Upload, &e));
            }
        }
        Settled::Applied
    }

    /// Start the prediction step.
    ///
    /// Returns `None` without touching the session when there is no durable
    /// URL yet or a prediction is already in flight.
    pub fn begin_prediction(&mut self) -> Option<(Ticket, String)> {
        if self.session.is_predicting {
            log::debug!("Prediction already in flight");
            return None;
        }
        let url = self.session.remote_asset_url.clone()?;
        self.session.is_predicting = true;
        self.session.failure = None;
        Some((
            Ticket {
                generation: self.generation,
            },
            url,
        ))
    }

    /// Record the predictor's answer for the request issued under `ticket`.
    pub fn finish_prediction(&mut self, ticket: Ticket, result: WorkflowResult<Digit>) -> Settled {
        if !self.is_current(ticket) {
            log::debug!("Dropping stale prediction (generation {})", ticket.generation);
            return Settled::Stale;
        }
        let session = &mut self.session;
        session.is_predicting = false;
        match result {
            Ok(digit) => {
                log::info!("Predicted digit: {}", digit);
                session.predicted_label = Some(digit);
            }
            Err(e) => {
                log::error!("Error during prediction: {}", e);
                session.failure = Some(Failure::new(Stage::Prediction, &e));
            }
        }
        Settled::Applied
    }

    /// Return to the empty state, releasing the preview handle.
    ///
    /// Requests already on the wire are not cancelled; their results come
    /// back with an outdated ticket and are dropped.
    pub fn reset(&mut self) {
        self.next_generation();
        self.session = UploadSession::default();
        log::debug!("Session reset (generation {})", self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkflowError;
    use crate::session::Phase;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Preview that records when it is released.
    struct TrackedPreview {
        src: String,
        released: Rc<RefCell<Vec<String>>>,
    }

    impl PreviewRef for TrackedPreview {
        fn src(&self) -> &str {
            &self.src
        }
    }

    impl Drop for TrackedPreview {
        fn drop(&mut self) {
            self.released.borrow_mut().push(self.src.clone());
        }
    }

    fn uploaded_workflow(url: &str) -> Workflow<String> {
        let mut wf = Workflow::new();
        let ticket = wf.select_image("blob:digit7".to_string());
        assert_eq!(wf.finish_upload(ticket, Ok(url.to_string())), Settled::Applied);
        wf
    }

    #[test]
    fn test_select_marks_uploaded_before_response() {
        let mut wf: Workflow<String> = Workflow::new();
        wf.select_image("blob:digit7".to_string());

        let snap = wf.snapshot();
        assert_eq!(snap.preview_src.as_deref(), Some("blob:digit7"));
        assert!(snap.uploaded);
        assert!(snap.remote_asset_url.is_none());
        assert_eq!(snap.phase, Phase::Uploading);
    }

    #[test]
    fn test_happy_path() {
        let mut wf = uploaded_workflow("https://host/x.png");
        assert_eq!(wf.snapshot().phase, Phase::Uploaded { has_url: true });

        let (ticket, url) = wf.begin_prediction().unwrap();
        assert_eq!(url, "https://host/x.png");
        assert!(wf.session().is_predicting());

        wf.finish_prediction(ticket, Ok(Digit::new(7).unwrap()));
        assert_eq!(wf.session().predicted_label(), Digit::new(7));
        assert!(!wf.session().is_predicting());
        assert_eq!(wf.snapshot().phase, Phase::Predicted);
    }

    #[test]
    fn test_predict_without_url_is_noop() {
        let mut wf: Workflow<String> = Workflow::new();
        assert!(wf.begin_prediction().is_none());

        wf.select_image("blob:a".to_string());
        assert!(wf.begin_prediction().is_none());
        assert!(!wf.session().is_predicting());
    }

    #[test]
    fn test_predict_refuses_reentry() {
        let mut wf = uploaded_workflow("https://host/x.png");
        assert!(wf.begin_prediction().is_some());
        assert!(wf.begin_prediction().is_none());
    }

    #[test]
    fn test_upload_failure_is_recorded() {
        let mut wf: Workflow<String> = Workflow::new();
        let ticket = wf.select_image("blob:a".to_string());
        wf.finish_upload(
            ticket,
            Err(WorkflowError::Status {
                code: 500,
                body: "oops".into(),
            }),
        );

        let s = wf.session();
        assert!(s.uploaded());
        assert!(s.remote_asset_url().is_none());
        assert_eq!(s.failure().map(|f| f.stage), Some(Stage::Upload));
        assert_eq!(s.phase(), Phase::UploadFailed);
    }

    #[test]
    fn test_prediction_failure_clears_flag() {
        let mut wf = uploaded_workflow("https://host/x.png");
        let (ticket, _) = wf.begin_prediction().unwrap();
        wf.finish_prediction(ticket, Err(WorkflowError::Timeout));

        let s = wf.session();
        assert!(!s.is_predicting());
        assert!(s.predicted_label().is_none());
        assert!(s.failure().unwrap().timed_out);
        assert_eq!(s.phase(), Phase::PredictionFailed);

        // retry clears the previous failure
        assert!(wf.begin_prediction().is_some());
        assert!(wf.session().failure().is_none());
    }

    #[test]
    fn test_reset_always_yields_empty() {
        let mut wf = uploaded_workflow("https://host/x.png");
        wf.begin_prediction();
        wf.reset();
        assert!(wf.session().is_empty());

        let mut wf: Workflow<String> = Workflow::new();
        wf.reset();
        assert!(wf.session().is_empty());
    }

    #[test]
    fn test_stale_prediction_after_reset_is_dropped() {
        let mut wf = uploaded_workflow("https://host/x.png");
        let (ticket, _) = wf.begin_prediction().unwrap();
        wf.reset();

        let settled = wf.finish_prediction(ticket, Ok(Digit::new(3).unwrap()));
        assert_eq!(settled, Settled::Stale);
        assert!(wf.session().is_empty());
    }

    #[test]
    fn test_stale_upload_after_reselect_is_dropped() {
        let mut wf: Workflow<String> = Workflow::new();
        let first = wf.select_image("blob:first".to_string());
        let second = wf.select_image("blob:second".to_string());

        assert_eq!(wf.finish_upload(first, Ok("https://host/first.png".into())), Settled::Stale);
        assert!(wf.session().remote_asset_url().is_none());

        wf.finish_upload(second, Ok("https://host/second.png".into()));
        assert_eq!(wf.session().remote_asset_url(), Some("https://host/second.png"));
    }

    #[test]
    fn test_previews_are_released() {
        let released = Rc::new(RefCell::new(Vec::new()));
        let preview = |src: &str| TrackedPreview {
            src: src.to_string(),
            released: Rc::clone(&released),
        };

        let mut wf = Workflow::new();
        wf.select_image(preview("blob:1"));
        assert!(released.borrow().is_empty());

        wf.select_image(preview("blob:2"));
        assert_eq!(*released.borrow(), vec!["blob:1".to_string()]);

        wf.reset();
        assert_eq!(*released.borrow(), vec!["blob:1".to_string(), "blob:2".to_string()]);
    }
}
