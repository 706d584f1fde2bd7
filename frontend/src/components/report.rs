use super::super::{App, Msg};
use shared::{EncodedImage, SkinAnalysis};
use yew::html::Scope;
use yew::prelude::*;

pub fn render_report(image: &EncodedImage, analysis: &SkinAnalysis, link: &Scope<App>) -> Html {
    let urgency = analysis.urgency();

    html! {
        <div class={classes!("results-container", analysis.should_get_facial.then_some("treatment"))}>
            <div class="report-profile">
                <div class="report-image">
                    <img src={image.to_string()} alt="Analyzed face" />
                    <div class={classes!("urgency-badge", format!("urgency-{}", urgency))}>
                        { format!("Score: {}/10", analysis.urgency_score) }
                    </div>
                </div>
                <button class="link-btn" onclick={link.callback(|_| Msg::Reset)}>
                    <i class="fa-solid fa-rotate-left"></i>{" Start New Analysis"}
                </button>
            </div>

            <div class="report-details">
                <div class="result-header">
                    <h2>{"Your Skin Report"}</h2>
                    <span class="headline">{ analysis.headline() }</span>
                </div>

                <section class="observation">
                    <h3>{"Professional Observation"}</h3>
                    <p class="reasoning">{ format!("\"{}\"", analysis.reasoning) }</p>
                </section>

                <div class="report-grid">
                    <section class="concerns">
                        <h3>{"Detected Concerns"}</h3>
                        {
                            if analysis.skin_concerns.is_empty() {
                                html! { <p class="no-results-message">{"No visible concerns detected."}</p> }
                            } else {
                                html! {
                                    <ul>
                                        { for analysis.skin_concerns.iter().map(|concern| html! {
                                            <li>{ concern.clone() }</li>
                                        })}
                                    </ul>
                                }
                            }
                        }
                    </section>

                    <section class="treatment">
                        <h3>{"Prescribed Facial"}</h3>
                        <div class="treatment-name">{ analysis.recommended_treatment.clone() }</div>
                        <p>{"Targeted specifically for your current skin state."}</p>
                    </section>
                </div>

                <section class="home-care">
                    <h3>{"Daily Home Care Tips"}</h3>
                    <ol>
                        { for analysis.home_care_tips.iter().map(|tip| html! {
                            <li>{ tip.clone() }</li>
                        })}
                    </ol>
                </section>
            </div>
        </div>
    }
}
