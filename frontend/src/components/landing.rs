use super::super::{App, Msg};
use super::utils::{debounce, partition_image_files, render_notice};
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_landing(app: &App, ctx: &Context<App>) -> Html {
    let link = ctx.link().clone();

    html! {
        <div class="landing">
            <div class="hero">
                <span class="badge">{"Skin Intelligence"}</span>
                <h1>
                    {"Reveal the truth about your "}
                    <span class="accent">{"skin's needs."}</span>
                </h1>
                <p class="subtitle">
                    {"Take a simple selfie to get an expert-level analysis of your skin health and discover if you need a professional treatment today."}
                </p>
            </div>

            <div class="button-container">
                <button
                    id="scan-button"
                    class="analyze-btn"
                    disabled={app.reading_file}
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::StartCapture)
                    })}
                >
                    <i class="fa-solid fa-camera"></i>{" Scan My Face"}
                </button>
                { render_file_input_area(app, ctx) }
            </div>

            { render_notice(&app.notice) }
        </div>
    }
}

fn render_file_input_area(app: &App, ctx: &Context<App>) -> Html {
    let link = ctx.link();
    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let (images, _skipped) = input
            .files()
            .as_ref()
            .map(partition_image_files)
            .unwrap_or_default();

        input.set_value("");

        if !images.is_empty() {
            Msg::FilesAdded(images)
        } else {
            Msg::SetNotice(Some("No valid image file selected.".into()))
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(|_| {
        let input = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("file-input"));
        if let Some(input) = input {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept="image/*"
                style="display: none;"
                onchange={handle_change}
            />

            <button
                id="upload-button"
                class="analyze-btn secondary"
                disabled={app.reading_file}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                {
                    if app.reading_file {
                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Reading..."}</> }
                    } else {
                        html! { <><i class="fa-solid fa-upload"></i>{" Upload Photo"}</> }
                    }
                }
            </button>

            <div
                id="drop-zone"
                class={classes!("upload-area", app.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Or drag & drop a selfie here, or paste one"}</p>
                    <p class="file-types">{"Supported formats: JPG, PNG, WEBP"}</p>
                </div>
            </div>
        </>
    }
}
