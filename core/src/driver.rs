//! Async glue between a [`Workflow`], where it is stored, and the services.
//!
//! The workflow itself is synchronous. These helpers borrow it only for the
//! short synchronous sections around each await, so a reset can run while a
//! request is on the wire.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::WorkflowResult;
use crate::models::Digit;
use crate::session::PreviewRef;
use crate::workflow::{Settled, Workflow};

// =============================================================================
// Seams
// =============================================================================

/// Shared, interior-mutable home of the active workflow.
pub trait SessionStore {
    type Preview: PreviewRef;

    /// Run `f` against the workflow. `None` means the workflow no longer
    /// exists (e.g. the owning view was torn down).
    fn with_workflow<R>(&self, f: impl FnOnce(&mut Workflow<Self::Preview>) -> R) -> Option<R>;
}

impl<P: PreviewRef> SessionStore for Rc<RefCell<Workflow<P>>> {
    type Preview = P;

    fn with_workflow<R>(&self, f: impl FnOnce(&mut Workflow<P>) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

impl<P: PreviewRef> SessionStore for Arc<Mutex<Workflow<P>>> {
    type Preview = P;

    fn with_workflow<R>(&self, f: impl FnOnce(&mut Workflow<P>) -> R) -> Option<R> {
        let mut guard = self.lock().unwrap_or_else(PoisonError::into_inner);
        Some(f(&mut guard))
    }
}

/// The two external collaborators.
#[allow(async_fn_in_trait)]
pub trait DigitService {
    /// Whatever the platform hands us for a selected file.
    type Image;

    /// Upload the image and return its durable URL.
    async fn upload_image(&self, image: Self::Image) -> WorkflowResult<String>;

    /// Ask the predictor which digit the hosted image shows.
    async fn predict_digit(&self, asset_url: &str) -> WorkflowResult<Digit>;
}

// =============================================================================
// Drivers
// =============================================================================

/// Select an image and upload it.
///
/// The session shows the preview and `uploaded = true` before the upload
/// request is issued.
pub async fn select_and_upload<S, H>(
    store: &S,
    service: &H,
    preview: S::Preview,
    image: H::Image,
) -> Settled
where
    S: SessionStore,
    H: DigitService,
{
    let Some(ticket) = store.with_workflow(|wf| wf.select_image(preview)) else {
        return Settled::Stale;
    };

    let result = service.upload_image(image).await;

    store
        .with_workflow(|wf| wf.finish_upload(ticket, result))
        .unwrap_or(Settled::Stale)
}

/// Request a prediction for the hosted image.
///
/// Returns `None` when there was nothing to do (no durable URL yet, or a
/// prediction already running); no request is issued in that case.
pub async fn request_prediction<S, H>(store: &S, service: &H) -> Option<Settled>
where
    S: SessionStore,
    H: DigitService,
{
    let (ticket, url) = store.with_workflow(|wf| wf.begin_prediction()).flatten()?;

    let result = service.predict_digit(&url).await;

    Some(
        store
            .with_workflow(|wf| wf.finish_prediction(ticket, result))
            .unwrap_or(Settled::Stale),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Stage, WorkflowError};
    use futures::executor::block_on;
    use std::cell::Cell;

    type Store = Rc<RefCell<Workflow<String>>>;

    /// Scripted service. `on_predict` runs while the request is "in flight".
    struct ScriptedService {
        upload: WorkflowResult<String>,
        predict: WorkflowResult<Digit>,
        predict_calls: Cell<usize>,
        on_predict: Option<Box<dyn Fn()>>,
    }

    impl ScriptedService {
        fn new(upload: WorkflowResult<String>, predict: WorkflowResult<Digit>) -> Self {
            Self {
                upload,
                predict,
                predict_calls: Cell::new(0),
                on_predict: None,
            }
        }
    }

    impl DigitService for ScriptedService {
        type Image = &'static str;

        async fn upload_image(&self, _image: &'static str) -> WorkflowResult<String> {
            self.upload.clone()
        }

        async fn predict_digit(&self, _asset_url: &str) -> WorkflowResult<Digit> {
            self.predict_calls.set(self.predict_calls.get() + 1);
            if let Some(hook) = &self.on_predict {
                hook();
            }
            self.predict.clone()
        }
    }

    fn store() -> Store {
        Rc::new(RefCell::new(Workflow::new()))
    }

    #[test]
    fn test_digit7_scenario() {
        let store = store();
        let service = ScriptedService::new(Ok("https://host/x.png".into()), Ok(Digit::new(7).unwrap()));

        let settled = block_on(select_and_upload(&store, &service, "blob:digit7".into(), "digit7.png"));
        assert_eq!(settled, Settled::Applied);
        assert_eq!(store.borrow().session().remote_asset_url(), Some("https://host/x.png"));

        let settled = block_on(request_prediction(&store, &service));
        assert_eq!(settled, Some(Settled::Applied));

        let snap = store.borrow().snapshot();
        assert_eq!(snap.predicted_label, Digit::new(7));
        assert!(!snap.is_predicting);
    }

    #[test]
    fn test_prediction_without_url_issues_no_request() {
        let store = store();
        let service = ScriptedService::new(
            Err(WorkflowError::Status {
                code: 500,
                body: "Internal Server Error".into(),
            }),
            Ok(Digit::new(1).unwrap()),
        );

        assert_eq!(block_on(request_prediction(&store, &service)), None);

        block_on(select_and_upload(&store, &service, "blob:a".into(), "a.png"));
        assert_eq!(block_on(request_prediction(&store, &service)), None);
        assert_eq!(service.predict_calls.get(), 0);

        let s = store.borrow();
        assert!(s.session().uploaded());
        assert_eq!(s.session().failure().map(|f| f.stage), Some(Stage::Upload));
    }

    #[test]
    fn test_in_flight_flag_visible_during_request() {
        let store = store();
        let seen = Rc::new(Cell::new(false));
        let mut service = ScriptedService::new(Ok("https://host/x.png".into()), Err(WorkflowError::Timeout));
        let (probe, flag) = (store.clone(), Rc::clone(&seen));
        service.on_predict = Some(Box::new(move || flag.set(probe.borrow().session().is_predicting())));

        block_on(select_and_upload(&store, &service, "blob:a".into(), "a.png"));
        block_on(request_prediction(&store, &service));

        assert!(seen.get());
        let s = store.borrow();
        assert!(!s.session().is_predicting());
        assert!(s.session().predicted_label().is_none());
    }

    #[test]
    fn test_reset_mid_prediction_discards_late_response() {
        let store = store();
        let mut service = ScriptedService::new(Ok("https://host/x.png".into()), Ok(Digit::new(7).unwrap()));
        let probe = store.clone();
        service.on_predict = Some(Box::new(move || probe.borrow_mut().reset()));

        block_on(select_and_upload(&store, &service, "blob:a".into(), "a.png"));
        let settled = block_on(request_prediction(&store, &service));

        assert_eq!(settled, Some(Settled::Stale));
        assert!(store.borrow().session().is_empty());
    }

    #[test]
    fn test_arc_mutex_store() {
        let store = Arc::new(Mutex::new(Workflow::<String>::new()));
        let service = ScriptedService::new(Ok("https://host/y.png".into()), Ok(Digit::new(4).unwrap()));

        block_on(select_and_upload(&store, &service, "blob:y".into(), "y.png"));
        block_on(request_prediction(&store, &service));

        let label = store.with_workflow(|wf| wf.session().predicted_label()).flatten();
        assert_eq!(label, Digit::new(4));
    }
}
