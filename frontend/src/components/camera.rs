//! Live selfie preview backed by `getUserMedia`.
//!
//! The component owns its `MediaStream` exclusively. Tracks are stopped when a
//! frame is captured and again on teardown; `CameraLifecycle` makes the second
//! call a no-op. A stream granted after the component is gone is stopped as
//! soon as it arrives.

use js_sys::{Object, Reflect};
use shared::camera::{
    CAPTURE_MIME, FACING_MODE, IDEAL_RESOLUTION, JPEG_QUALITY, MIRROR_CAPTURE, preview_style,
};
use shared::{CAMERA_UNAVAILABLE_MESSAGE, CameraLifecycle, EncodedImage};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CameraViewProps {
    pub on_capture: Callback<EncodedImage>,
    pub on_cancel: Callback<()>,
}

pub enum CameraMsg {
    StreamAcquired(MediaStream),
    PlaybackStarted,
    Unavailable(String),
    Capture,
}

pub struct CameraView {
    video_ref: NodeRef,
    canvas_ref: NodeRef,
    lifecycle: CameraLifecycle,
    stream: Option<MediaStream>,
    alive: Rc<Cell<bool>>,
}

impl Component for CameraView {
    type Message = CameraMsg;
    type Properties = CameraViewProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            video_ref: NodeRef::default(),
            canvas_ref: NodeRef::default(),
            lifecycle: CameraLifecycle::new(),
            stream: None,
            alive: Rc::new(Cell::new(true)),
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if !first_render {
            return;
        }

        let link = ctx.link().clone();
        let alive = Rc::clone(&self.alive);
        spawn_local(async move {
            match acquire_stream().await {
                Ok(stream) if alive.get() => link.send_message(CameraMsg::StreamAcquired(stream)),
                Ok(stream) => {
                    log::debug!("Camera granted after teardown, stopping it");
                    stop_tracks(&stream);
                }
                Err(err) => {
                    log::error!("Camera access error: {:?}", err);
                    link.send_message(CameraMsg::Unavailable(CAMERA_UNAVAILABLE_MESSAGE.into()));
                }
            }
        });
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            CameraMsg::StreamAcquired(stream) => self.attach(ctx, stream),
            CameraMsg::PlaybackStarted => {
                self.lifecycle.mark_playing();
                true
            }
            CameraMsg::Unavailable(message) => {
                self.lifecycle.mark_unavailable(message);
                true
            }
            CameraMsg::Capture => self.capture(ctx),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let on_cancel = ctx.props().on_cancel.reform(|_: MouseEvent| ());

        if let Some(message) = self.lifecycle.unavailable_message() {
            return html! {
                <div class="camera-frame camera-unavailable">
                    <i class="fa-solid fa-video-slash fa-3x"></i>
                    <p>{ message }</p>
                    <button class="analyze-btn secondary" onclick={on_cancel}>{"Go Back"}</button>
                </div>
            };
        }

        let ready = self.lifecycle.can_capture();

        html! {
            <div class="camera-frame">
                <video
                    ref={self.video_ref.clone()}
                    class={classes!("camera-preview", ready.then_some("ready"))}
                    style={preview_style()}
                    autoplay=true
                    playsinline=true
                    muted=true
                />
                <canvas ref={self.canvas_ref.clone()} style="display: none;" />

                <div class="face-guide">
                    <div class="face-oval">
                        <span>{"Center Face Here"}</span>
                    </div>
                </div>

                <div class="camera-controls">
                    <button class="icon-btn" title="Cancel" onclick={on_cancel}>
                        <i class="fa-solid fa-xmark"></i>
                    </button>
                    <button
                        class="shutter-btn"
                        title="Capture"
                        disabled={!ready}
                        onclick={ctx.link().callback(|_| CameraMsg::Capture)}
                    >
                        <span class="shutter-inner"></span>
                    </button>
                    <div class="spacer"></div>
                </div>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.alive.set(false);
        self.release();
    }
}

impl CameraView {
    fn attach(&mut self, ctx: &Context<Self>, stream: MediaStream) -> bool {
        if !self.lifecycle.accept_stream() {
            stop_tracks(&stream);
            return false;
        }

        let Some(video) = self.video_ref.cast::<HtmlVideoElement>() else {
            self.stream = Some(stream);
            self.lifecycle.mark_unavailable(CAMERA_UNAVAILABLE_MESSAGE);
            return true;
        };

        video.set_src_object(Some(&stream));
        self.stream = Some(stream);

        let link = ctx.link().clone();
        match video.play() {
            Ok(promise) => spawn_local(async move {
                match JsFuture::from(promise).await {
                    Ok(_) => link.send_message(CameraMsg::PlaybackStarted),
                    Err(err) => {
                        log::error!("Camera playback failed: {:?}", err);
                        link.send_message(CameraMsg::Unavailable(CAMERA_UNAVAILABLE_MESSAGE.into()));
                    }
                }
            }),
            Err(err) => {
                log::error!("Camera playback failed: {:?}", err);
                self.lifecycle.mark_unavailable(CAMERA_UNAVAILABLE_MESSAGE);
            }
        }
        true
    }

    fn capture(&mut self, ctx: &Context<Self>) -> bool {
        if !self.lifecycle.can_capture() {
            log::warn!("Capture requested before the camera was ready");
            return false;
        }

        let (Some(video), Some(canvas)) = (
            self.video_ref.cast::<HtmlVideoElement>(),
            self.canvas_ref.cast::<HtmlCanvasElement>(),
        ) else {
            return false;
        };

        let data_url = match grab_frame(&video, &canvas) {
            Ok(data_url) => data_url,
            Err(err) => {
                log::error!("Frame capture failed: {:?}", err);
                return false;
            }
        };

        match EncodedImage::parse(data_url) {
            Ok(image) => {
                self.release();
                ctx.props().on_capture.emit(image);
                true
            }
            Err(e) => {
                log::error!("Canvas produced an unusable frame: {}", e);
                false
            }
        }
    }

    fn release(&mut self) {
        let stream = self.stream.take();
        if self.lifecycle.release() {
            if let Some(stream) = stream {
                log::debug!("Stopping camera tracks");
                stop_tracks(&stream);
            }
        }
        if let Some(video) = self.video_ref.cast::<HtmlVideoElement>() {
            video.set_src_object(None);
        }
    }
}

fn ideal(value: u32) -> Result<Object, JsValue> {
    let constraint = Object::new();
    Reflect::set(&constraint, &"ideal".into(), &JsValue::from(value))?;
    Ok(constraint)
}

fn video_constraints() -> Result<Object, JsValue> {
    let video = Object::new();
    Reflect::set(&video, &"facingMode".into(), &FACING_MODE.into())?;
    Reflect::set(&video, &"width".into(), &ideal(IDEAL_RESOLUTION)?.into())?;
    Reflect::set(&video, &"height".into(), &ideal(IDEAL_RESOLUTION)?.into())?;
    Ok(video)
}

async fn acquire_stream() -> Result<MediaStream, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let devices = window.navigator().media_devices()?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video_constraints()?.into());
    constraints.set_audio(&JsValue::FALSE);

    let promise = devices.get_user_media_with_constraints(&constraints)?;
    let stream = JsFuture::from(promise).await?;
    stream.dyn_into::<MediaStream>()
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

/// Draws the current frame at the stream's native resolution and encodes it.
fn grab_frame(video: &HtmlVideoElement, canvas: &HtmlCanvasElement) -> Result<String, JsValue> {
    let (width, height) = (video.video_width(), video.video_height());
    if width == 0 || height == 0 {
        return Err(JsValue::from_str("video has no frame yet"));
    }

    canvas.set_width(width);
    canvas.set_height(height);

    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    if MIRROR_CAPTURE {
        context.translate(width as f64, 0.0)?;
        context.scale(-1.0, 1.0)?;
    }
    context.draw_image_with_html_video_element_and_dw_and_dh(
        video,
        0.0,
        0.0,
        width as f64,
        height as f64,
    )?;

    canvas.to_data_url_with_type_and_encoder_options(CAPTURE_MIME, &JsValue::from_f64(JPEG_QUALITY))
}
