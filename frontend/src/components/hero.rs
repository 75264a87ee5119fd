//! Page title

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"Boltzmann Machines & RBM"</h1>
        </div>
    }
}
