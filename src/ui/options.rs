/// Options page: copy format and paste behavior

use crate::browser::{BrowserI18n, BrowserStorage};
use crate::host::Localizer;
use crate::settings::{CopyFormat, PasteBehavior, Settings, SettingsPatch, SettingsStore};
use crate::ui::components::StatusToast;
use patternfly_yew::prelude::Spinner;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::platform::time::sleep;
use yew::prelude::*;

/// How long the saved confirmation stays visible
pub const STATUS_FADE: Duration = Duration::from_secs(2);

pub const SAVED_KEY: &str = "saved";
const SAVED_FALLBACK: &str = "Saved";

/// The two settings controls on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CopyFormat,
    PasteBehavior,
}

impl Field {
    pub fn element_id(self) -> &'static str {
        match self {
            Field::CopyFormat => "copy-format",
            Field::PasteBehavior => "paste-behavior",
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            Field::CopyFormat => "copyFormatLabel",
            Field::PasteBehavior => "pasteBehaviorLabel",
        }
    }

    /// `(value, message key)` for every choice of this control
    pub fn choices(self) -> Vec<(&'static str, &'static str)> {
        match self {
            Field::CopyFormat => CopyFormat::ALL
                .into_iter()
                .map(|format| (format.as_str(), copy_format_label_key(format)))
                .collect(),
            Field::PasteBehavior => PasteBehavior::ALL
                .into_iter()
                .map(|behavior| (behavior.as_str(), paste_behavior_label_key(behavior)))
                .collect(),
        }
    }

    pub fn current_value(self, settings: &Settings) -> &'static str {
        match self {
            Field::CopyFormat => settings.copy_format.as_str(),
            Field::PasteBehavior => settings.paste_behavior.as_str(),
        }
    }

    /// Patch for a control's new value; `None` for values we do not know
    pub fn patch_for(self, value: &str) -> Option<SettingsPatch> {
        match self {
            Field::CopyFormat => value.parse().ok().map(SettingsPatch::copy_format),
            Field::PasteBehavior => value.parse().ok().map(SettingsPatch::paste_behavior),
        }
    }
}

fn copy_format_label_key(format: CopyFormat) -> &'static str {
    match format {
        CopyFormat::Text => "formatText",
        CopyFormat::Markdown => "formatMarkdown",
        CopyFormat::Html => "formatHtml",
    }
}

fn paste_behavior_label_key(behavior: PasteBehavior) -> &'static str {
    match behavior {
        PasteBehavior::Current => "behaviorCurrent",
        PasteBehavior::New => "behaviorNew",
    }
}

/// Localized saved message, with a plain fallback when the key is missing
pub fn saved_message(i18n: &impl Localizer) -> String {
    let message = i18n.message(SAVED_KEY);
    if message.is_empty() || message == SAVED_KEY {
        SAVED_FALLBACK.to_string()
    } else {
        message
    }
}

/// Status toast state; each show gets a generation so only the newest fade hides it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Toast {
    pub message: String,
    pub visible: bool,
    pub generation: u64,
}

pub enum ToastAction {
    Show { message: String, generation: u64 },
    Hide { generation: u64 },
}

impl Reducible for Toast {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            ToastAction::Show {
                message,
                generation,
            } => Rc::new(Toast {
                message,
                visible: true,
                generation,
            }),
            ToastAction::Hide { generation } if generation == self.generation => Rc::new(Toast {
                visible: false,
                ..(*self).clone()
            }),
            ToastAction::Hide { .. } => self,
        }
    }
}

#[derive(Properties, PartialEq)]
struct SelectFieldProps {
    field: Field,
    selected: &'static str,
    onsave: Callback<SettingsPatch>,
}

#[function_component(SelectField)]
fn select_field(props: &SelectFieldProps) -> Html {
    let field = props.field;
    let onchange = {
        let onsave = props.onsave.clone();
        Callback::from(move |e: Event| {
            let Some(select) = e.target_dyn_into::<HtmlSelectElement>() else {
                return;
            };
            match field.patch_for(&select.value()) {
                Some(patch) => onsave.emit(patch),
                None => log::warn!("Unknown value {} for {}", select.value(), field.element_id()),
            }
        })
    };

    html! {
        <div class="option-row">
            <label for={field.element_id()}>{BrowserI18n.message(field.label_key())}</label>
            <select id={field.element_id()} {onchange}>
                {for field.choices().into_iter().map(|(value, label_key)| html! {
                    <option {value} selected={value == props.selected}>
                        {BrowserI18n.message(label_key)}
                    </option>
                })}
            </select>
        </div>
    }
}

#[function_component(OptionsPage)]
pub fn options_page() -> Html {
    let settings = use_state(|| None::<Settings>);
    let toast = use_reducer(Toast::default);
    let toast_counter = use_mut_ref(|| 0u64);

    // Load settings on mount
    {
        let settings = settings.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let loaded = SettingsStore::new(BrowserStorage).get().await;
                settings.set(Some(loaded));
            });
            || ()
        });
    }

    let on_save = {
        let toast = toast.clone();
        let toast_counter = toast_counter.clone();

        Callback::from(move |patch: SettingsPatch| {
            let toast = toast.clone();
            let toast_counter = toast_counter.clone();

            spawn_local(async move {
                if let Err(e) = SettingsStore::new(BrowserStorage).set(patch).await {
                    log::error!("Failed to save settings: {}", e);
                    return;
                }

                let generation = {
                    let mut counter = toast_counter.borrow_mut();
                    *counter += 1;
                    *counter
                };
                toast.dispatch(ToastAction::Show {
                    message: saved_message(&BrowserI18n),
                    generation,
                });

                sleep(STATUS_FADE).await;
                toast.dispatch(ToastAction::Hide { generation });
            });
        })
    };

    html! {
        <div class="options-page">
            <h1>{BrowserI18n.message("optionsTitle")}</h1>
            {match &*settings {
                None => html! { <Spinner /> },
                Some(current) => html! {
                    <>
                        <SelectField
                            field={Field::CopyFormat}
                            selected={Field::CopyFormat.current_value(current)}
                            onsave={on_save.clone()}
                        />
                        <SelectField
                            field={Field::PasteBehavior}
                            selected={Field::PasteBehavior.current_value(current)}
                            onsave={on_save.clone()}
                        />
                    </>
                },
            }}
            <StatusToast message={toast.message.clone()} visible={toast.visible} />
        </div>
    }
}
