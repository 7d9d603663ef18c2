//! Bootstrap: mount lifecycle and global failure handlers.
//!
//! The page carries a single mount point (`#root`). This module owns the
//! one live binding between the app and that element, registers the
//! window-level error and rejection listeners, and drives the async
//! load-and-mount sequence. Replacing a mounted app never unmounts the old
//! instance synchronously: release is pushed to the next event-loop turn so
//! it cannot run inside the framework's own render pass.

pub mod fallback;

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::mount::mount_to;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{ErrorEvent, HtmlElement, PromiseRejectionEvent};

use crate::app::{self, App, AppSettings};
use fallback::render_failure;

/// Id of the element the application mounts into.
pub const ROOT_ELEMENT_ID: &str = "root";

/// An active binding between a component tree and the page root.
///
/// Type-erased so the slot does not carry the mounted view's state type.
/// The wrapped release action runs exactly once, always on a later
/// event-loop turn than the call that scheduled it.
pub struct MountHandle {
    release: Box<dyn FnOnce()>,
}

impl MountHandle {
    /// Wrap a release action. The bootstrap wraps a leptos unmount handle;
    /// tests wrap probes.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Box::new(release),
        }
    }

    /// Schedule this handle's release on the next event-loop turn.
    ///
    /// Never releases synchronously: the caller may be inside the
    /// framework's render/commit cycle, where unmounting is unsafe.
    pub fn release_deferred(self) {
        Timeout::new(0, move || {
            tracing::debug!("releasing superseded mount");
            (self.release)();
        })
        .forget();
    }
}

/// Owner of the at-most-one live [`MountHandle`].
#[derive(Default)]
pub struct MountSlot {
    current: Option<MountHandle>,
}

/// The slot as shared between the failure handlers and the mounter. WASM
/// is single-threaded; `RefCell` is enough, and the failure path borrows
/// with `try_borrow_mut` so re-entrancy degrades to a swallowed error.
pub type SharedMountSlot = Rc<RefCell<MountSlot>>;

impl MountSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedMountSlot {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Whether an application is currently mounted.
    pub fn is_mounted(&self) -> bool {
        self.current.is_some()
    }

    /// Store `next` as the live handle. Any previous handle is released on
    /// the next event-loop turn; the replacement itself is synchronous, so
    /// the two bindings briefly coexist.
    pub fn install(&mut self, next: MountHandle) {
        if let Some(previous) = self.current.replace(next) {
            previous.release_deferred();
        }
    }

    /// Drop the live handle, if any, releasing it on the next turn.
    pub fn clear(&mut self) {
        if let Some(previous) = self.current.take() {
            previous.release_deferred();
        }
    }
}

/// Look up the page root element. `None` means the page carries no mount
/// point, in which case everything downstream is a no-op.
pub fn page_root() -> Option<HtmlElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(ROOT_ELEMENT_ID)?
        .dyn_into()
        .ok()
}

/// Register the window-level `error` and `unhandledrejection` listeners.
///
/// Must run before any load is attempted so that even a failure during
/// bootstrap itself ends up on the diagnostic panel instead of a blank
/// page. The listener closures are leaked; they live as long as the page.
pub fn install_global_handlers(slot: &SharedMountSlot) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let error_slot = slot.clone();
    let on_error = Closure::<dyn FnMut(ErrorEvent)>::new(move |event: ErrorEvent| {
        render_failure(&error_slot, "Frontend error", &error_value(&event));
    });
    let _ = window.add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref());
    on_error.forget();

    let rejection_slot = slot.clone();
    let on_rejection =
        Closure::<dyn FnMut(PromiseRejectionEvent)>::new(move |event: PromiseRejectionEvent| {
            render_failure(
                &rejection_slot,
                "Unhandled promise rejection",
                &event.reason(),
            );
        });
    let _ = window
        .add_event_listener_with_callback("unhandledrejection", on_rejection.as_ref().unchecked_ref());
    on_rejection.forget();
}

/// Best error value an `error` event carries: the structured error when
/// present, else the message string, else the raw event.
fn error_value(event: &ErrorEvent) -> JsValue {
    let error = event.error();
    if !error.is_undefined() && !error.is_null() {
        return error;
    }
    let message = event.message();
    if !message.is_empty() {
        return JsValue::from_str(&message);
    }
    JsValue::from(event.clone())
}

/// Load and mount the application; on any failure, show the diagnostic
/// panel instead. This is the whole happy path of the bootstrap.
pub async fn start(slot: SharedMountSlot) {
    start_with_loader(slot, app::load()).await;
}

/// [`start`] with the load stage injected, so failing loads can be driven
/// from tests.
pub async fn start_with_loader<F>(slot: SharedMountSlot, loader: F)
where
    F: Future<Output = Result<AppSettings, JsValue>>,
{
    if let Err(cause) = mount_app(&slot, loader).await {
        tracing::error!("failed to start UI: {cause:?}");
        render_failure(&slot, "Failed to start UI", &cause);
    }
}

async fn mount_app<F>(slot: &SharedMountSlot, loader: F) -> Result<(), JsValue>
where
    F: Future<Output = Result<AppSettings, JsValue>>,
{
    let settings = loader.await?;

    let Some(root) = page_root() else {
        // No mount point on this page; nothing to mount into.
        return Ok(());
    };

    let handle = mount_to(root, move || view! { <App settings/> });

    // Install synchronously; a superseded handle is released a turn later.
    slot.try_borrow_mut()
        .map_err(|_| JsValue::from_str("mount slot is busy"))?
        .install(MountHandle::new(move || drop(handle)));

    tracing::info!("application mounted");
    Ok(())
}
