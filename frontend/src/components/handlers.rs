use super::super::{App, Msg};
use super::utils::partition_image_files;
use crate::api::{self, ApiError};
use gloo_file::File as GlooFile;
use shared::image::{MAX_UPLOAD_BYTES, exceeds_upload_limit};
use shared::{
    ANALYSIS_FAILED_MESSAGE, EncodedImage, Outcome, RequestToken, SessionPhase, SkinAnalysis,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent, FileList};
use yew::prelude::*;

pub fn handle_start_capture(app: &mut App) -> bool {
    if app.reading_file {
        log::debug!("Ignoring capture request while a file is being read");
        return false;
    }
    match app.session.start_capture() {
        Ok(()) => {
            app.notice = None;
            true
        }
        Err(e) => {
            log::warn!("{}", e);
            false
        }
    }
}

pub fn handle_cancel_capture(app: &mut App) -> bool {
    match app.session.cancel_capture() {
        Ok(()) => true,
        Err(e) => {
            log::warn!("{}", e);
            false
        }
    }
}

pub fn handle_frame_captured(app: &mut App, ctx: &Context<App>, image: EncodedImage) -> bool {
    start_analysis(app, ctx, image)
}

pub fn handle_files_added(app: &mut App, ctx: &Context<App>, files: Vec<GlooFile>) -> bool {
    if app.session.phase() != SessionPhase::Idle || app.reading_file {
        log::debug!("Ignoring file selection in phase {}", app.session.phase());
        return false;
    }

    let Some(file) = files.into_iter().next() else {
        return false;
    };

    if exceeds_upload_limit(file.size()) {
        log::warn!("Rejected {} ({} bytes): too large", file.name(), file.size());
        app.notice = Some(format!(
            "That photo is too large. Please choose one under {} MB.",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        ));
        return true;
    }

    app.reading_file = true;
    app.notice = None;
    log::info!("Reading {} ({} bytes)", file.name(), file.size());

    let link = ctx.link().clone();
    spawn_local(async move {
        let result = gloo_file::futures::read_as_data_url(&file)
            .await
            .map_err(|e| e.to_string());
        link.send_message(Msg::FileRead(result));
    });

    true
}

pub fn handle_file_read(app: &mut App, ctx: &Context<App>, result: Result<String, String>) -> bool {
    app.reading_file = false;

    if app.session.phase() != SessionPhase::Idle {
        log::debug!("Dropping file read result in phase {}", app.session.phase());
        return false;
    }

    let data_url = match result {
        Ok(data_url) => data_url,
        Err(e) => {
            log::error!("Failed to read file: {}", e);
            app.notice = Some("Could not read that file. Please choose another photo.".into());
            return true;
        }
    };

    match EncodedImage::parse(data_url) {
        Ok(image) => start_analysis(app, ctx, image),
        Err(e) => {
            log::warn!("Rejected upload: {}", e);
            app.notice = Some("That file is not a supported image.".into());
            true
        }
    }
}

fn start_analysis(app: &mut App, ctx: &Context<App>, image: EncodedImage) -> bool {
    match app.session.begin_analysis(image.clone()) {
        Ok(token) => {
            log::info!("Analysis {} started", token);
            send_analysis_request(ctx, token, image);
            true
        }
        Err(e) => {
            log::warn!("Ignoring image: {}", e);
            false
        }
    }
}

pub fn send_analysis_request(ctx: &Context<App>, token: RequestToken, image: EncodedImage) {
    spawn_local({
        let link = ctx.link().clone();

        async move {
            let result = api::request_analysis(&image).await;
            link.send_message(Msg::AnalysisFinished(token, result));
        }
    });
}

pub fn handle_analysis_finished(
    app: &mut App,
    token: RequestToken,
    result: Result<SkinAnalysis, ApiError>,
) -> bool {
    let outcome = match result {
        Ok(analysis) => app.session.complete(token, analysis),
        Err(e) => {
            log::error!("Analysis {} failed: {}", token, e);
            app.session.fail(token, ANALYSIS_FAILED_MESSAGE)
        }
    };

    match outcome {
        Outcome::Applied => true,
        Outcome::Stale => {
            log::debug!("Discarded stale response for {}", token);
            false
        }
    }
}

pub fn handle_reset(app: &mut App) -> bool {
    app.session.reset();
    app.notice = None;
    app.is_dragging = false;
    true
}

pub fn handle_drop(app: &mut App, ctx: &Context<App>, event: DragEvent) -> bool {
    event.prevent_default();
    app.is_dragging = false;

    if let Some(data_transfer) = event.data_transfer() {
        if let Some(file_list) = data_transfer.files() {
            process_file_list(ctx, file_list);
        }
    }

    true
}

pub fn handle_paste(app: &mut App, ctx: &Context<App>, event: ClipboardEvent) -> bool {
    if app.session.phase() != SessionPhase::Idle {
        return false;
    }
    if let Some(data_transfer) = event.clipboard_data() {
        if let Some(file_list) = data_transfer.files() {
            if file_list.length() > 0 {
                event.prevent_default();
                process_file_list(ctx, file_list);
                return true;
            }
        }
    }
    false
}

pub fn process_file_list(ctx: &Context<App>, file_list: FileList) {
    let (images, skipped) = partition_image_files(&file_list);

    for name in &skipped {
        log::warn!("Skipping non-image file: {}", name);
    }

    if !images.is_empty() {
        ctx.link().send_message(Msg::FilesAdded(images));
    } else if let Some(name) = skipped.first() {
        ctx.link()
            .send_message(Msg::SetNotice(Some(format!("Skipped non-image file: {}", name))));
    }
}
