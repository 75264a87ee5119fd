//! Home page: explainer sections and the way into the demo.

use leptos::*;
use leptos_router::use_navigate;

use super::{BmSection, Hero, ProjectIntro, RbmSection};

#[component]
pub fn HomePage() -> impl IntoView {
    let navigate = use_navigate();

    view! {
        <div class="page">
            <div class="container">
                <Hero/>
                <BmSection/>
                <RbmSection/>
                <ProjectIntro/>

                <div class="actions mt-24">
                    <button
                        class="btn btn-primary btn-large"
                        on:click=move |_| navigate("/demo", Default::default())
                    >
                        "See Demo"
                    </button>
                </div>
            </div>
        </div>
    }
}
