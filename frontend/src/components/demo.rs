//! Demo page: the upload/predict section and a way back.

use leptos::*;
use leptos_router::A;

use super::UploadPredictSection;

#[component]
pub fn DemoPage() -> impl IntoView {
    view! {
        <div class="page">
            <div class="container">
                <UploadPredictSection/>

                <div class="actions">
                    <A href="/" class="btn btn-back">"Back to Home"</A>
                </div>
            </div>
        </div>
    }
}
