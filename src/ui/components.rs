/// Reusable UI components for the popup

use crate::domain::DomainGroup;
use crate::tab_data::InactivityThreshold;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Human-readable age of a tab, e.g. "3d ago", "2h ago", "15m ago".
pub fn format_last_accessed(last_accessed: f64, now: f64) -> String {
    let diff = (now - last_accessed).max(0.0);
    let minutes = (diff / 60_000.0).floor() as u64;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{days}d ago")
    } else if hours > 0 {
        format!("{hours}h ago")
    } else {
        format!("{minutes}m ago")
    }
}

#[derive(Properties, PartialEq)]
pub struct NumberInputProps {
    pub value: u32,
    pub min: u32,
    pub max: u32,
    pub label: String,
    pub onchange: Callback<u32>,
}

/// Numeric stepper for the threshold editor: a number input flanked by
/// decrement/increment buttons, always clamped to min..=max.
#[function_component(NumberInput)]
pub fn number_input(props: &NumberInputProps) -> Html {
    let oninput = {
        let onchange = props.onchange.clone();
        let min = props.min;
        let max = props.max;
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                if let Ok(parsed) = input.value().parse::<u32>() {
                    onchange.emit(parsed.clamp(min, max));
                }
            }
        })
    };

    let on_decrement = {
        let onchange = props.onchange.clone();
        let value = props.value;
        let min = props.min;
        Callback::from(move |_| {
            if value > min {
                onchange.emit(value - 1);
            }
        })
    };

    let on_increment = {
        let onchange = props.onchange.clone();
        let value = props.value;
        let max = props.max;
        Callback::from(move |_| {
            if value < max {
                onchange.emit(value + 1);
            }
        })
    };

    html! {
        <div class="number-input">
            <label class="number-input-label">{&props.label}</label>
            <div class="number-input-controls">
                <button class="number-input-step" onclick={on_decrement}>{"−"}</button>
                <input
                    type="number"
                    class="number-input-field"
                    value={props.value.to_string()}
                    min={props.min.to_string()}
                    max={props.max.to_string()}
                    oninput={oninput}
                />
                <button class="number-input-step" onclick={on_increment}>{"+"}</button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct DomainGroupCardProps {
    pub group: DomainGroup,
    /// Snapshot of "now" taken when the collection was loaded, so every
    /// row renders against the same clock.
    pub now: f64,
    pub on_remove: Callback<i32>,
}

/// One collapsible group of inactive tabs sharing a domain.
#[function_component(DomainGroupCard)]
pub fn domain_group_card(props: &DomainGroupCardProps) -> Html {
    let is_expanded = use_state(|| true);

    let on_toggle = {
        let is_expanded = is_expanded.clone();
        Callback::from(move |_| {
            is_expanded.set(!*is_expanded);
        })
    };

    html! {
        <div class="domain-group">
            <button class="domain-group-header" onclick={on_toggle}>
                <span>{format!("{} ({})", props.group.domain, props.group.tabs.len())}</span>
                <span class="domain-group-chevron">
                    {if *is_expanded { "▲" } else { "▼" }}
                </span>
            </button>
            if *is_expanded {
                <div class="domain-group-tabs">
                    {for props.group.tabs.iter().map(|tab| {
                        let on_remove = {
                            let on_remove = props.on_remove.clone();
                            let id = tab.id;
                            Callback::from(move |_| on_remove.emit(id))
                        };
                        html! {
                            <div class="tab-row" key={tab.id}>
                                if !tab.tab_favicon.is_empty() {
                                    <img src={tab.tab_favicon.clone()} alt="" class="tab-favicon" />
                                }
                                <span class="tab-title">{&tab.title}</span>
                                <span class="tab-age">
                                    {format_last_accessed(tab.last_accessed, props.now)}
                                </span>
                                <button class="tab-close" onclick={on_remove}>{"✕"}</button>
                            </div>
                        }
                    })}
                </div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SettingsPanelProps {
    pub threshold: InactivityThreshold,
    pub on_back: Callback<()>,
    pub on_submit: Callback<InactivityThreshold>,
}

/// Threshold editor: hours/minutes steppers with a submit button that is
/// disabled while the entered threshold is zero.
#[function_component(SettingsPanel)]
pub fn settings_panel(props: &SettingsPanelProps) -> Html {
    let hours = use_state(|| props.threshold.hours);
    let minutes = use_state(|| props.threshold.minutes);

    let is_zero = *hours == 0 && *minutes == 0;

    let on_back = {
        let on_back = props.on_back.clone();
        Callback::from(move |_| on_back.emit(()))
    };

    let on_submit = {
        let on_submit = props.on_submit.clone();
        let hours = hours.clone();
        let minutes = minutes.clone();
        Callback::from(move |_| {
            if let Some(threshold) = InactivityThreshold::new(*hours, *minutes) {
                on_submit.emit(threshold);
            }
        })
    };

    let on_hours = {
        let hours = hours.clone();
        Callback::from(move |value: u32| hours.set(value))
    };
    let on_minutes = {
        let minutes = minutes.clone();
        Callback::from(move |value: u32| minutes.set(value))
    };

    html! {
        <div class="settings-panel">
            <button class="settings-back" onclick={on_back}>{"← Back to Tabs"}</button>
            <h2 class="settings-title">{"Inactivity Threshold"}</h2>
            <div class="settings-inputs">
                <NumberInput value={*hours} min={0} max={23} label={"Hours"} onchange={on_hours} />
                <NumberInput value={*minutes} min={0} max={59} label={"Minutes"} onchange={on_minutes} />
            </div>
            <button class="settings-submit" onclick={on_submit} disabled={is_zero}>
                {"Set Threshold"}
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: f64 = 1_700_000_000_000.0;

    #[test]
    fn test_format_last_accessed_minutes() {
        assert_eq!(format_last_accessed(NOW, NOW), "0m ago");
        assert_eq!(format_last_accessed(NOW - 900_000.0, NOW), "15m ago");
    }

    #[test]
    fn test_format_last_accessed_hours() {
        assert_eq!(format_last_accessed(NOW - 3_600_000.0, NOW), "1h ago");
        assert_eq!(format_last_accessed(NOW - 7_200_000.0, NOW), "2h ago");
    }

    #[test]
    fn test_format_last_accessed_days() {
        assert_eq!(format_last_accessed(NOW - 172_800_000.0, NOW), "2d ago");
    }

    #[test]
    fn test_format_last_accessed_future_timestamp_clamps() {
        // Clock skew between host and popup should not render garbage.
        assert_eq!(format_last_accessed(NOW + 60_000.0, NOW), "0m ago");
    }
}
