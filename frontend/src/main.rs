mod components;

use components::header::render_header;
use components::preview_area::render_preview_area;
use components::results::render_results;
use components::toast::render_toast;
use components::upload_section::render_upload_section;
use components::utils::{extract_image_file, render_error_message};
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use shared::InferenceResponse;
use wasm_bindgen_futures::spawn_local;
use web_sys::DragEvent;
use yew::prelude::*;

const TOAST_DURATION_MS: u32 = 3000;

pub struct FileData {
    pub file: GlooFile,
    pub preview_url: ObjectUrl,
}

pub enum Msg {
    // File operations
    FileSelected(GlooFile),
    RemoveFile,

    // Prediction
    Predict,
    PredictionResult(InferenceResponse),

    // UI states
    SetError(Option<String>),
    SetDragging(bool),
    DismissToast,

    // Input events
    HandleDrop(DragEvent),
}

pub struct App {
    pub file: Option<FileData>,
    pub result: Option<InferenceResponse>,
    pub loading: bool,
    pub error: Option<String>,
    pub is_dragging: bool,
    pub toast: Option<String>,
    toast_timeout: Option<Timeout>,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            file: None,
            result: None,
            loading: false,
            error: None,
            is_dragging: false,
            toast: None,
            toast_timeout: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileSelected(file) => {
                let preview_url = ObjectUrl::from(file.clone());
                self.file = Some(FileData { file, preview_url });
                self.result = None;
                self.error = None;
                true
            }
            Msg::RemoveFile => {
                self.file = None;
                self.result = None;
                self.error = None;
                true
            }
            Msg::Predict => self.handle_predict(ctx),
            Msg::PredictionResult(response) => self.handle_prediction_result(ctx, response),
            Msg::SetError(error) => {
                self.error = error;
                self.loading = false;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::DismissToast => {
                self.toast = None;
                self.toast_timeout = None;
                true
            }
            Msg::HandleDrop(event) => self.handle_drop(ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }

                <main class="main-content">
                    { render_upload_section(self, ctx) }
                    { render_preview_area(self, ctx) }
                    { render_error_message(self) }
                    { render_results(self) }
                </main>

                { render_toast(self) }

                <footer class="app-footer">
                    <p>{"Made with ❤ for health awareness."}</p>
                </footer>
            </div>
        }
    }
}

impl App {
    fn handle_predict(&mut self, ctx: &Context<Self>) -> bool {
        let Some(file_data) = &self.file else {
            ctx.link()
                .send_message(Msg::SetError(Some("No image selected for prediction.".into())));
            return false;
        };

        self.loading = true;
        self.error = None;
        self.send_inference_request(ctx, file_data.file.clone());
        true
    }

    fn handle_prediction_result(
        &mut self,
        ctx: &Context<Self>,
        response: InferenceResponse,
    ) -> bool {
        self.loading = false;
        self.toast = Some(response.verdict.toast_message().to_string());

        let link = ctx.link().clone();
        self.toast_timeout = Some(Timeout::new(TOAST_DURATION_MS, move || {
            link.send_message(Msg::DismissToast);
        }));

        self.result = Some(response);
        true
    }

    fn handle_drop(&mut self, ctx: &Context<Self>, event: DragEvent) -> bool {
        event.prevent_default();
        self.is_dragging = false;

        if let Some(data_transfer) = event.data_transfer() {
            if let Some(file_list) = data_transfer.files() {
                match extract_image_file(&file_list) {
                    Some(file) => ctx.link().send_message(Msg::FileSelected(file)),
                    None => ctx.link().send_message(Msg::SetError(Some(
                        "Only JPG and PNG images are supported.".into(),
                    ))),
                }
            }
        }

        true
    }

    fn send_inference_request(&self, ctx: &Context<Self>, file: GlooFile) {
        spawn_local({
            let link = ctx.link().clone();

            async move {
                let form_data = web_sys::FormData::new().unwrap();
                form_data.append_with_blob("image", file.as_ref()).unwrap();

                let request = Request::post("/api/inference")
                    .body(form_data)
                    .expect("Failed to build request.");

                match request.send().await {
                    Ok(response) if response.ok() => {
                        match response.json::<InferenceResponse>().await {
                            Ok(result) => link.send_message(Msg::PredictionResult(result)),
                            Err(e) => link.send_message(Msg::SetError(Some(format!(
                                "Failed to parse response: {}",
                                e
                            )))),
                        }
                    }
                    Ok(response) => {
                        let status = response.status();
                        let body = response.text().await.unwrap_or_default();
                        link.send_message(Msg::SetError(Some(format!(
                            "Server error: {} - {}",
                            status, body
                        ))));
                    }
                    Err(e) => {
                        link.send_message(Msg::SetError(Some(format!("Network error: {}", e))))
                    }
                }
            }
        });
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<App>::new().render();
}
