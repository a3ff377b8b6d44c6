/// Reusable UI components

use patternfly_yew::prelude::{Alert, AlertType};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatusToastProps {
    pub message: String,
    pub visible: bool,
}

/// Inline confirmation that fades out through a CSS opacity transition
#[function_component(StatusToast)]
pub fn status_toast(props: &StatusToastProps) -> Html {
    let class = classes!("status-toast", props.visible.then_some("visible"));

    html! {
        <div id="status-msg" {class} aria-live="polite">
            if !props.message.is_empty() {
                <Alert r#type={AlertType::Success} title={props.message.clone()} inline={true}>
                </Alert>
            }
        </div>
    }
}
