use super::super::{App, Msg};
use super::utils::debounce;
use yew::prelude::*;

pub fn render_preview_area(app: &App, ctx: &Context<App>) -> Html {
    let Some(file_data) = &app.file else {
        return html! {};
    };

    let link = ctx.link().clone();

    html! {
        <div id="preview-container">
            <img
                id="image-preview"
                src={file_data.preview_url.to_string()}
                alt="Uploaded Image"
            />
            <p class="preview-caption">{ file_data.file.name() }</p>
            <div class="button-container">
                <button
                    class="predict-btn remove"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::RemoveFile)
                    })}
                >
                    <i class="fa-solid fa-trash"></i>{" Remove"}
                </button>
                <button
                    class="predict-btn"
                    disabled={app.loading}
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Predict)
                    })}
                >
                    { render_predict_button_content(app) }
                </button>
            </div>
        </div>
    }
}

fn render_predict_button_content(app: &App) -> Html {
    if app.loading {
        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Predicting..."}</> }
    } else {
        html! { <><i class="fa-solid fa-magnifying-glass"></i>{" Predict"}</> }
    }
}
