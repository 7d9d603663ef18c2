//! Last-line-of-defense diagnostic panel.
//!
//! Everything here is best-effort. A failure while rendering the failure
//! screen is swallowed, never re-reported; the alternative is a blank page
//! with nothing to debug from.

use wasm_bindgen::{JsCast, JsValue};

use super::{page_root, SharedMountSlot};

/// Render the diagnostic panel, replacing whatever is in the page root.
///
/// Silent no-op when the root element is missing; silent on any internal
/// failure. This routine must never crash.
pub fn render_failure(slot: &SharedMountSlot, title: &str, cause: &JsValue) {
    tracing::error!("{title}: {cause:?}");

    let Some(root) = page_root() else {
        return;
    };

    // Get the app out of the way first. Release is deferred, so it cannot
    // land inside a render pass that may be failing right now. A busy slot
    // only skips the clear; the panel still renders.
    if let Ok(mut slot) = slot.try_borrow_mut() {
        slot.clear();
    }

    root.set_inner_html(&panel_markup(title, &describe_failure(cause)));
}

/// Human-readable form of an arbitrary thrown value.
///
/// Structured errors keep their name, message and stack; everything else
/// falls back to its JavaScript string conversion.
pub fn describe_failure(cause: &JsValue) -> String {
    if let Some(error) = cause.dyn_ref::<js_sys::Error>() {
        let name = String::from(error.name());
        let message = String::from(error.message());
        let stack = js_sys::Reflect::get(error.as_ref(), &JsValue::from_str("stack"))
            .ok()
            .and_then(|value| value.as_string())
            .unwrap_or_default();
        return format!("{name}: {message}\n\n{stack}");
    }

    if let Some(text) = cause.as_string() {
        text
    } else if let Some(truth) = cause.as_bool() {
        truth.to_string()
    } else if let Some(number) = cause.as_f64() {
        number.to_string()
    } else if cause.is_undefined() {
        "undefined".to_string()
    } else if cause.is_null() {
        "null".to_string()
    } else if let Some(object) = cause.dyn_ref::<js_sys::Object>() {
        String::from(object.to_string())
    } else {
        format!("{cause:?}")
    }
}

/// Escape a message for embedding as text content. `<` is the one that
/// matters for markup injection; `&` and `>` come along for correctness.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Fixed-layout panel: full-viewport centered flex over a dark background,
/// a bordered blurred card with the bold title, the preformatted message,
/// and a hint pointing at the devtools console.
fn panel_markup(title: &str, message: &str) -> String {
    format!(
        concat!(
            "<div style=\"min-height:100vh;display:flex;align-items:center;",
            "justify-content:center;background:#0b0e14;color:#e6e6e6;",
            "padding:2rem;box-sizing:border-box;\">",
            "<div style=\"max-width:48rem;width:100%;padding:1.5rem;",
            "border:1px solid #3b4261;border-radius:0.75rem;",
            "background:rgba(21,25,35,0.85);backdrop-filter:blur(6px);\">",
            "<div style=\"font-weight:700;font-size:1.125rem;",
            "margin-bottom:0.75rem;\">{title}</div>",
            "<pre style=\"white-space:pre-wrap;word-break:break-word;margin:0;",
            "font-family:ui-monospace,monospace;font-size:0.875rem;",
            "color:#c0caf5;\">{message}</pre>",
            "<div style=\"margin-top:1rem;font-size:0.8rem;color:#8089a8;\">",
            "Open the browser devtools console for more detail.</div>",
            "</div></div>",
        ),
        title = escape_text(title),
        message = escape_text(message),
    )
}

#[cfg(test)]
mod tests {
    use super::{escape_text, panel_markup};

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_text("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert!(!escape_text("<script>alert(1)</script>").contains('<'));
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(escape_text("manual reject"), "manual reject");
    }

    #[test]
    fn panel_embeds_title_and_message_escaped() {
        let markup = panel_markup("Frontend error", "<img> bad & worse");
        assert!(markup.contains("Frontend error"));
        assert!(markup.contains("&lt;img&gt; bad &amp; worse"));
        assert!(!markup.contains("<img>"));
    }
}
