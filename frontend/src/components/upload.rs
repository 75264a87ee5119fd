//! Digit upload + prediction component.
//!
//! Owns one workflow session. The view only reads snapshots; every
//! mutation goes through the workflow (select, predict, reset).

use boltzmann_core::{request_prediction, select_and_upload, DigitService, SessionStore, Settled};
use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlInputElement};

use crate::services::{BrowserService, ObjectUrl, SignalStore};
use crate::{service_config, FILE_INPUT_ID};

// =============================================================================
// Handlers
// =============================================================================

/// A file was picked: show it and upload it.
pub async fn on_image_picked<S, H>(store: &S, service: &H, preview: S::Preview, image: H::Image) -> Settled
where
    S: SessionStore,
    H: DigitService,
{
    select_and_upload(store, service, preview, image).await
}

/// "Get Predicted Result" was clicked.
pub async fn on_predict_clicked<S, H>(store: &S, service: &H) -> Option<Settled>
where
    S: SessionStore,
    H: DigitService,
{
    let settled = request_prediction(store, service).await;
    if settled.is_none() {
        log::warn!("⚠️ No hosted image yet, prediction skipped");
    }
    settled
}

/// "Change Image" was clicked: back to an empty session.
pub fn on_change_image_clicked<S: SessionStore>(store: &S) {
    log::info!("🔄 Change image - session reset");
    store.with_workflow(|wf| wf.reset());
}

// =============================================================================
// Component
// =============================================================================

#[component]
pub fn UploadPredictSection() -> impl IntoView {
    let store = SignalStore::new();
    let snapshot = store.snapshot();
    let service = store_value(BrowserService::new(service_config()));

    // File selection handler
    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // lets the same file be picked again after "Change Image"
        input.set_value("");

        let preview = match ObjectUrl::from_file(&file) {
            Ok(preview) => preview,
            Err(e) => {
                log::error!("❌ {}", e);
                return;
            }
        };

        let service = service.get_value();
        spawn_local(async move {
            on_image_picked(&store, &service, preview, file).await;
        });
    };

    let on_predict = move |_| {
        let service = service.get_value();
        spawn_local(async move {
            on_predict_clicked(&store, &service).await;
        });
    };

    let on_change_image = move |_| on_change_image_clicked(&store);

    // Reopen the file picker when the preview is clicked
    let trigger_file_input = move |_| {
        if let Some(window) = web_sys::window() {
            if let Some(document) = window.document() {
                if let Some(input) = document.get_element_by_id(FILE_INPUT_ID) {
                    if let Some(html_input) = input.dyn_ref::<HtmlInputElement>() {
                        html_input.click();
                    }
                }
            }
        }
    };

    view! {
        <section class="card">
            <h2 class="section-title">"Upload Digit Image"</h2>
            <p class="section-hint">
                "Upload an image of a digit, and we'll use a pre-trained model to predict the digit for you."
            </p>

            <input
                type="file"
                id=FILE_INPUT_ID
                class="hidden"
                on:change=on_file_change
            />

            <div class="upload-zone">
                <Show
                    when=move || snapshot.with(|s| s.uploaded)
                    fallback=|| view! {
                        <label for=FILE_INPUT_ID class="upload-label">
                            <span>"Click to upload image"</span>
                        </label>
                    }
                >
                    <div class="preview" on:click=trigger_file_input>
                        <img
                            src=move || snapshot.with(|s| s.preview_src.clone().unwrap_or_default())
                            alt="Uploaded Preview"
                            class="preview-image"
                        />
                    </div>
                </Show>
            </div>

            <Show when=move || snapshot.with(|s| s.failure.is_some())>
                <div class="error-message">
                    {move || snapshot.with(|s| s.failure.as_ref().map(ToString::to_string).unwrap_or_default())}
                </div>
            </Show>

            <Show when=move || snapshot.with(|s| s.shows_predict_button())>
                <div class="actions">
                    <button
                        class="btn btn-primary"
                        class:btn-busy=move || snapshot.with(|s| s.is_predicting)
                        disabled=move || snapshot.with(|s| !s.can_predict())
                        on:click=on_predict
                    >
                        {move || snapshot.with(|s| s.predict_button_label())}
                    </button>
                </div>
            </Show>

            {move || snapshot.with(|s| s.predicted_label).map(|digit| view! {
                <div class="result">
                    <div class="result-panel">"Predicted Digit: " {digit.value()}</div>
                </div>
            })}

            <Show when=move || snapshot.with(|s| s.shows_change_button())>
                <div class="actions">
                    <button class="btn btn-secondary" on:click=on_change_image>
                        "Change Image"
                    </button>
                </div>
            </Show>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boltzmann_core::{Digit, Phase, Workflow, WorkflowResult};
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type Store = Rc<RefCell<Workflow<String>>>;

    #[derive(Default)]
    struct CountingService {
        uploads: Cell<usize>,
        predictions: Cell<usize>,
    }

    impl DigitService for CountingService {
        type Image = ();

        async fn upload_image(&self, _image: ()) -> WorkflowResult<String> {
            self.uploads.set(self.uploads.get() + 1);
            Ok("https://host/digit7.png".to_string())
        }

        async fn predict_digit(&self, _asset_url: &str) -> WorkflowResult<Digit> {
            self.predictions.set(self.predictions.get() + 1);
            Ok(Digit::new(7).unwrap())
        }
    }

    #[test]
    fn test_controls_drive_the_workflow() {
        let store: Store = Rc::new(RefCell::new(Workflow::new()));
        let service = CountingService::default();

        assert_eq!(block_on(on_predict_clicked(&store, &service)), None);
        assert_eq!(service.predictions.get(), 0);

        let settled = block_on(on_image_picked(&store, &service, "blob:a".to_string(), ()));
        assert_eq!(settled, Settled::Applied);
        assert_eq!(service.uploads.get(), 1);
        assert_eq!(store.borrow().snapshot().phase, Phase::Uploaded { has_url: true });

        let settled = block_on(on_predict_clicked(&store, &service));
        assert_eq!(settled, Some(Settled::Applied));
        assert_eq!(service.predictions.get(), 1);
        assert_eq!(store.borrow().snapshot().predicted_label, Digit::new(7));

        on_change_image_clicked(&store);
        assert!(store.borrow().session().is_empty());
        assert_eq!(store.borrow().snapshot().phase, Phase::Empty);
    }
}
