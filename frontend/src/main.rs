mod api;
mod components;

use components::camera::CameraView;
use components::handlers;
use gloo_events::EventListener;
use gloo_file::File as GlooFile;
use shared::{EncodedImage, RequestToken, Session, SessionState, SkinAnalysis};
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

use api::ApiError;

enum Msg {
    // Capture
    StartCapture,
    CancelCapture,
    FrameCaptured(EncodedImage),

    // File input
    FilesAdded(Vec<GlooFile>),
    FileRead(Result<String, String>),

    // Analysis
    AnalysisFinished(RequestToken, Result<SkinAnalysis, ApiError>),
    Reset,

    // UI states
    SetNotice(Option<String>),
    SetDragging(bool),

    // Input events
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

struct App {
    session: Session,
    notice: Option<String>,
    is_dragging: bool,
    reading_file: bool,
    paste_listener: Option<EventListener>,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut app = Self {
            session: Session::new(),
            notice: None,
            is_dragging: false,
            reading_file: false,
            paste_listener: None,
        };

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            app.paste_listener = Some(listener);
        }

        app
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::StartCapture => handlers::handle_start_capture(self),
            Msg::CancelCapture => handlers::handle_cancel_capture(self),
            Msg::FrameCaptured(image) => handlers::handle_frame_captured(self, ctx, image),

            Msg::FilesAdded(files) => handlers::handle_files_added(self, ctx, files),
            Msg::FileRead(result) => handlers::handle_file_read(self, ctx, result),

            Msg::AnalysisFinished(token, result) => {
                handlers::handle_analysis_finished(self, token, result)
            }
            Msg::Reset => handlers::handle_reset(self),

            Msg::SetNotice(notice) => {
                self.notice = notice;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }

            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();

        let content = match self.session.state() {
            SessionState::Idle => components::landing::render_landing(self, ctx),
            SessionState::Capturing => html! {
                <div class="capture-section">
                    { components::capture_guide::render_capture_guide() }
                    <CameraView
                        on_capture={link.callback(Msg::FrameCaptured)}
                        on_cancel={link.callback(|_| Msg::CancelCapture)}
                    />
                </div>
            },
            SessionState::Analyzing { image, .. } => components::status::render_analyzing(image),
            SessionState::Completed { image, result } => {
                components::report::render_report(image, result, link)
            }
            SessionState::Error { message } => components::status::render_error(message, link),
        };

        html! {
            <div class={classes!("container", format!("phase-{}", self.session.phase()))}>
                { components::header::render_header(link) }

                <main class="main-content">
                    { content }
                </main>

                { components::header::render_footer() }
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<App>::new().render();
}
