use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-brain"></i>{" Brain Stroke Detection"}</h1>
            <p class="subtitle">{"Upload an MRI/CT image, and let AI predict if it shows signs of a stroke or is normal."}</p>
        </header>
    }
}
