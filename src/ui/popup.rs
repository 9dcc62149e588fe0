/// Popup UI for Tab Habit Tracker
///
/// Runs the load pipeline on open (threshold, then the chunked tab
/// collection, then the focused-tab query), classifies in the render
/// pass, and translates user actions into host close calls with an eager
/// write-through so the next open never reads a stale collection.

use crate::classify::classify;
use crate::domain::group_by_domain;
use crate::storage;
use crate::tab_data::{HostTab, InactivityThreshold, TabRecord};
use crate::ui::components::{DomainGroupCard, SettingsPanel};
use patternfly_yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/js/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryTabs(filter: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn closeTab(tab_id: i32) -> Result<(), JsValue>;
}

#[derive(Clone, PartialEq)]
enum ViewState {
    Loading,
    Idle,
    Error(String),
}

#[derive(Clone, PartialEq)]
enum Page {
    Tabs,
    Settings,
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| ViewState::Loading);
    let tabs = use_state(Vec::<TabRecord>::new);
    let threshold = use_state(InactivityThreshold::default);
    let focused = use_state(Vec::<i32>::new);
    let loaded_at = use_state(|| 0.0_f64);
    let page = use_state(|| Page::Tabs);

    // Load pipeline on mount
    {
        let state = state.clone();
        let tabs = tabs.clone();
        let threshold = threshold.clone();
        let focused = focused.clone();
        let loaded_at = loaded_at.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match load_popup_data().await {
                    Ok((stored_threshold, stored_tabs, focused_ids)) => {
                        threshold.set(stored_threshold);
                        tabs.set(stored_tabs);
                        focused.set(focused_ids);
                        loaded_at.set(js_sys::Date::now());
                        state.set(ViewState::Idle);
                    }
                    Err(e) => {
                        state.set(ViewState::Error(format!("Failed to load: {}", e)));
                    }
                }
            });
            || ()
        });
    }

    // Close one tab: host close call plus eager write-through
    let on_remove_tab = {
        let tabs = tabs.clone();
        let state = state.clone();

        Callback::from(move |id: i32| {
            let remaining: Vec<TabRecord> =
                tabs.iter().filter(|t| t.id != id).cloned().collect();
            tabs.set(remaining.clone());

            let state = state.clone();
            spawn_local(async move {
                if let Err(e) = closeTab(id).await {
                    log::warn!("Close request for tab {id} failed: {e:?}");
                }
                if let Err(e) = storage::save_tabs(&remaining).await {
                    state.set(ViewState::Error(format!("Failed to save: {}", e)));
                }
            });
        })
    };

    // Close every inactive tab; a zero-inactive collection is a no-op
    let on_remove_all_inactive = {
        let tabs = tabs.clone();
        let threshold = threshold.clone();
        let focused = focused.clone();
        let loaded_at = loaded_at.clone();
        let state = state.clone();

        Callback::from(move |_| {
            let classified = classify(&tabs, *threshold, *loaded_at, &focused);
            if classified.inactive.is_empty() {
                return;
            }

            tabs.set(classified.active.clone());

            let state = state.clone();
            spawn_local(async move {
                // Sequential closes: awaiting each call keeps the host from
                // throttling away part of a rapid-fire burst.
                for tab in &classified.inactive {
                    if let Err(e) = closeTab(tab.id).await {
                        log::warn!("Close request for tab {} failed: {e:?}", tab.id);
                    }
                }
                if let Err(e) = storage::save_tabs(&classified.active).await {
                    state.set(ViewState::Error(format!("Failed to save: {}", e)));
                }
            });
        })
    };

    // Persist a new threshold; reclassification happens in the render pass
    let on_submit_threshold = {
        let threshold = threshold.clone();
        let page = page.clone();
        let state = state.clone();

        Callback::from(move |new_threshold: InactivityThreshold| {
            threshold.set(new_threshold);
            page.set(Page::Tabs);

            let state = state.clone();
            spawn_local(async move {
                if let Err(e) = storage::save_threshold(new_threshold).await {
                    state.set(ViewState::Error(format!("Failed to save: {}", e)));
                }
            });
        })
    };

    let on_open_settings = {
        let page = page.clone();
        Callback::from(move |_| page.set(Page::Settings))
    };
    let on_close_settings = {
        let page = page.clone();
        Callback::from(move |_: ()| page.set(Page::Tabs))
    };

    // Classification is derived on every render, never cached: a threshold
    // change reclassifies the already-loaded records without a re-fetch.
    let classified = classify(&tabs, *threshold, *loaded_at, &focused);
    let groups = group_by_domain(&classified.inactive);
    let has_inactive = !classified.inactive.is_empty();

    html! {
        <div class="popup">
            <h1 class="popup-title">{"Tab Habit Tracker"}</h1>

            {match &*state {
                ViewState::Loading => html! {
                    <div class="loading-center">
                        <Spinner />
                        <p class="loading-text">{"Loading tabs..."}</p>
                    </div>
                },
                ViewState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                ViewState::Idle => match &*page {
                    Page::Settings => html! {
                        <SettingsPanel
                            threshold={*threshold}
                            on_back={on_close_settings}
                            on_submit={on_submit_threshold}
                        />
                    },
                    Page::Tabs => html! {
                        <>
                            <div class="tab-list">
                                if has_inactive {
                                    {for groups.iter().map(|group| html! {
                                        <DomainGroupCard
                                            key={group.domain.clone()}
                                            group={group.clone()}
                                            now={*loaded_at}
                                            on_remove={on_remove_tab.clone()}
                                        />
                                    })}
                                } else {
                                    <p class="empty-state">{"No inactive tabs"}</p>
                                }
                            </div>

                            <div class="summary-card">
                                <div class="summary-row">
                                    <span>{"Active tabs"}</span>
                                    <span class="summary-value">{classified.active.len()}</span>
                                </div>
                                <div class="summary-row">
                                    <span>{"Inactive tabs"}</span>
                                    <span class="summary-value">{classified.inactive.len()}</span>
                                </div>
                                <div class="summary-row">
                                    <span>{"Productivity score"}</span>
                                    <span class="summary-value">{format!("{}%", classified.score)}</span>
                                </div>
                            </div>

                            <div class="action-row">
                                <Button
                                    onclick={on_remove_all_inactive}
                                    disabled={!has_inactive}
                                    variant={ButtonVariant::Danger}
                                    block={true}
                                >
                                    {"Remove All"}
                                </Button>
                                <Button
                                    onclick={on_open_settings}
                                    variant={ButtonVariant::Secondary}
                                    block={true}
                                >
                                    {"Settings"}
                                </Button>
                            </div>
                        </>
                    },
                },
            }}
        </div>
    }
}

// Helper functions

async fn load_popup_data()
-> Result<(InactivityThreshold, Vec<TabRecord>, Vec<i32>), String> {
    let threshold = storage::load_threshold().await?;
    let tabs = storage::load_tabs().await?;
    let focused = fetch_focused_ids().await?;
    Ok((threshold, tabs, focused))
}

/// Ids of the currently focused tab(s); being focused always counts as
/// active, whatever `lastAccessed` says.
async fn fetch_focused_ids() -> Result<Vec<i32>, String> {
    let filter = serde_wasm_bindgen::to_value(&serde_json::json!({ "active": true }))
        .map_err(|e| format!("Failed to serialize query: {:?}", e))?;

    let payload = queryTabs(filter)
        .await
        .map_err(|e| format!("Failed to query focused tabs: {:?}", e))?;

    let focused: Vec<HostTab> = serde_wasm_bindgen::from_value(payload)
        .map_err(|e| format!("Failed to parse focused tabs: {:?}", e))?;

    Ok(focused.iter().filter_map(|t| t.id).collect())
}
