use yew::prelude::*;

const TIPS: [(&str, &str, &str); 3] = [
    (
        "fa-sun",
        "Natural Lighting",
        "Face a window for soft, direct light. Avoid harsh overhead bulbs that create deep shadows.",
    ),
    (
        "fa-user",
        "Clean Canvas",
        "Remove glasses and pull back your hair. Bare, clean skin allows for the most precise pore analysis.",
    ),
    (
        "fa-up-down-left-right",
        "Still & Level",
        "Hold your device at eye level and keep perfectly still until the capture is complete.",
    ),
];

/// Framing advice shown above the live preview.
pub fn render_capture_guide() -> Html {
    html! {
        <header class="capture-guide">
            <h2>{"Optimize Your Scan"}</h2>
            <p class="subtitle">
                {"AI analysis is most accurate when your skin is clearly visible. Follow these 3 simple rules:"}
            </p>
            <div class="tips">
                { for TIPS.iter().enumerate().map(|(i, (icon, title, text))| html! {
                    <div class="tip" key={i.to_string()}>
                        <i class={classes!("fa-solid", *icon)}></i>
                        <h4>{ *title }</h4>
                        <p>{ *text }</p>
                        <span class="tip-number">{ (i + 1).to_string() }</span>
                    </div>
                })}
            </div>
        </header>
    }
}
