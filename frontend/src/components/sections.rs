//! Static explainer sections shown on the home page.

use leptos::*;

const BM_DIAGRAM: &str = "https://upload.wikimedia.org/wikipedia/commons/7/7a/Boltzmannexamplev1.png";
const RBM_DIAGRAM: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/e/e8/Restricted_Boltzmann_machine.svg/1920px-Restricted_Boltzmann_machine.svg.png";

#[component]
fn Diagram(src: &'static str, alt: &'static str) -> impl IntoView {
    view! {
        <div class="diagram">
            <img src=src alt=alt width="500" height="300"/>
        </div>
    }
}

#[component]
pub fn BmSection() -> impl IntoView {
    view! {
        <section class="explainer">
            <h2 class="section-title">"What is a Boltzmann Machine?"</h2>
            <p class="section-text">
                "A Boltzmann Machine is a type of stochastic neural network that learns probability distributions over its inputs. "
                "It consists of a network of nodes (neurons) connected by weighted edges. The model is used in unsupervised learning "
                "and is known for its ability to learn deep representations."
            </p>

            <Diagram src=BM_DIAGRAM alt="Boltzmann Machine Architecture"/>

            <p class="section-text">
                "The architecture consists of visible and hidden units, where each unit is connected to every other unit. "
                "The goal is to minimize the system's energy function to find an optimal distribution for the input data."
            </p>
        </section>
    }
}

#[component]
pub fn RbmSection() -> impl IntoView {
    view! {
        <section class="explainer">
            <h2 class="section-title">"What is a Restricted Boltzmann Machine?"</h2>
            <p class="section-text">
                "A Restricted Boltzmann Machine (RBM) is a simplified version of the Boltzmann Machine where connections exist only between layers (no intra-layer connections). "
                "It is commonly used for dimensionality reduction, classification, and generative models."
            </p>

            <Diagram src=RBM_DIAGRAM alt="RBM Architecture"/>

            <p class="section-text">
                "RBMs have a visible layer and a hidden layer, and they learn by adjusting the weights through a contrastive divergence algorithm. "
                "They are widely used in recommendation systems, image reconstruction, and feature extraction."
            </p>
        </section>
    }
}

#[component]
pub fn ProjectIntro() -> impl IntoView {
    view! {
        <section class="explainer">
            <h2 class="section-title">"Project Introduction"</h2>
            <p class="section-text">
                "In this project, we use a " <strong>"Restricted Boltzmann Machine (RBM)"</strong>
                " to learn patterns from the " <strong>"MNIST dataset"</strong>
                " and reconstruct images. We also classify them using a "
                <strong>"Support Vector Machine (SVM)"</strong> "."
            </p>
            <p class="section-text mt-16">
                "The RBM learns an unsupervised representation of digit images, reducing the dimensionality "
                "and extracting meaningful features. Using these features, we train an SVM for classification."
            </p>
        </section>
    }
}
