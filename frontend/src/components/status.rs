use super::super::{App, Msg};
use shared::EncodedImage;
use yew::html::Scope;
use yew::prelude::*;

pub fn render_analyzing(image: &EncodedImage) -> Html {
    html! {
        <div class="analyzing">
            <div class="scan-ring">
                <img src={image.to_string()} alt="Processing" class="scan-thumbnail" />
                <div class="scan-line"></div>
            </div>
            <h3>{"Analyzing Your Skin..."}</h3>
            <p class="subtitle">
                {"Examining your pores, texture, and hydration levels..."}
            </p>
            <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
        </div>
    }
}

pub fn render_error(message: &str, link: &Scope<App>) -> Html {
    html! {
        <div class="analysis-error">
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation fa-2x"></i>
                <h2>{"Analysis Interrupted"}</h2>
                <p>{ message.to_string() }</p>
            </div>
            <button class="analyze-btn" onclick={link.callback(|_| Msg::Reset)}>
                {"Try Again"}
            </button>
        </div>
    }
}
