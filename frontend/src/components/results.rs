use super::super::App;
use yew::prelude::*;

pub fn render_results(app: &App) -> Html {
    let Some(result) = &app.result else {
        return html! {};
    };

    let is_stroke = result.verdict.is_stroke();
    let percentage = result.probability * 100.0;

    html! {
        <div class={classes!("results-container", if is_stroke { "stroke-detected" } else { "normal" })}>
            <h2>
                {
                    if is_stroke {
                        html! { <><i class="fa-solid fa-triangle-exclamation"></i>{" Prediction: Stroke Detected"}</> }
                    } else {
                        html! { <><i class="fa-solid fa-circle-check"></i>{" Prediction: Normal"}</> }
                    }
                }
            </h2>
            <h5 class={if is_stroke { "advisory danger" } else { "advisory safe" }}>
                { &result.advisory }
            </h5>
            <div class="confidence-meter">
                <div class="meter-label">{"Model output:"}</div>
                <div class="meter">
                    <div class="meter-fill" style={format!("width: {}%", percentage)}></div>
                </div>
                <div class="meter-value">{ format!("{:.1}%", percentage) }</div>
            </div>
        </div>
    }
}
