use super::super::{App, Msg};
use yew::html::Scope;
use yew::prelude::*;

/// Renders the application header; the logo starts over.
pub fn render_header(link: &Scope<App>) -> Html {
    html! {
        <header class="app-header">
            <div class="logo" title="Start over" onclick={link.callback(|_| Msg::Reset)}>
                <i class="fa-solid fa-circle-half-stroke"></i>
                <span class="brand">{"GlowCheck"}<span class="accent">{"AI"}</span></span>
            </div>
        </header>
    }
}

pub fn render_footer() -> Html {
    html! {
        <footer class="app-footer">
            <p>{"GlowCheck AI | Powered by Gemini visual intelligence"}</p>
            <p class="disclaimer">{"Not a medical diagnostic tool."}</p>
        </footer>
    }
}
