use super::super::App;
use yew::prelude::*;

/// Transient notification shown after a prediction; auto-dismissed by the
/// toast timeout in the main component.
pub fn render_toast(app: &App) -> Html {
    match &app.toast {
        Some(message) => html! { <div id="toast" class="show">{ message }</div> },
        None => html! { <div id="toast"></div> },
    }
}
