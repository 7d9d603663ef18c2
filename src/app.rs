//! Main Application Component
//!
//! The bootstrap treats this module as an opaque entry point: an async
//! [`load`] stage followed by a mountable [`App`] component. Everything
//! behind that surface belongs to the console itself, not the bootstrap.

use gloo_storage::Storage;
use leptos::prelude::*;
use leptos_meta::*;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

const SETTINGS_KEY: &str = "nimbus:settings";

/// Persisted UI settings, restored before the app mounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub theme: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
        }
    }
}

impl AppSettings {
    /// Restore persisted settings, falling back to defaults.
    pub fn restore() -> Self {
        gloo_storage::LocalStorage::get(SETTINGS_KEY).unwrap_or_default()
    }

    pub fn store(&self) {
        let _ = gloo_storage::LocalStorage::set(SETTINGS_KEY, self);
    }
}

/// Asynchronous load stage for the application entry point.
///
/// Yields one event-loop turn before touching storage so the bootstrap
/// regains control first, then resolves the settings the root component
/// is constructed with. Failures here surface as startup failures.
pub async fn load() -> Result<AppSettings, JsValue> {
    gloo_timers::future::TimeoutFuture::new(0).await;
    Ok(AppSettings::restore())
}

/// Main application component
#[component]
pub fn App(settings: AppSettings) -> impl IntoView {
    provide_meta_context();

    let initial_dark = settings.theme != "light";
    let (is_dark, set_dark) = signal(initial_dark);

    // Apply theme class to html element and persist the choice
    Effect::new(move |_| {
        let dark = is_dark.get();
        gloo_console::log!("Theme changed: dark =", dark);
        if let Some(window) = web_sys::window() {
            if let Some(document) = window.document() {
                if let Some(html) = document.document_element() {
                    let class_list = html.class_list();
                    if dark {
                        let _ = class_list.add_1("dark");
                    } else {
                        let _ = class_list.remove_1("dark");
                    }
                }
            }
        }
        AppSettings {
            theme: if dark { "dark".into() } else { "light".into() },
        }
        .store();
    });

    view! {
        <Title text="Nimbus Console" />
        <Meta name="viewport" content="width=device-width, initial-scale=1" />
        <Stylesheet id="nimbus" href="/nimbus.css" />

        <main class="shell">
            <header class="shell-header">
                <h1>"Nimbus Console"</h1>
                <button
                    class="theme-toggle"
                    on:click=move |_| set_dark.update(|dark| *dark = !*dark)
                >
                    {move || if is_dark.get() { "Light mode" } else { "Dark mode" }}
                </button>
            </header>
            <section class="shell-body">
                <p>"Console loaded. Connect a workspace to begin."</p>
            </section>
        </main>
    }
}
