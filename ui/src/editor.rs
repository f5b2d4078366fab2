//! Rich-text editor over a `contenteditable` element.
//!
//! The browser owns the editing surface; this component bridges it to a
//! `Signal<String>` of HTML through `document::eval`:
//!
//! - on mount, the element is seeded with the signal's HTML and an `input`
//!   listener streams edits back via `dioxus.send`;
//! - external writes to the signal (prefill for edit mode, reset after post)
//!   are pushed down, guarded against echo loops by `last_pushed`;
//! - toolbar buttons run `document.execCommand` against the focused editor and
//!   send the resulting HTML back.
//!
//! The image button opens a file picker; the chosen file is read and
//! base64-encoded client-side, uploaded, and the returned url inserted at the
//! caret. A failed upload alerts and leaves the content untouched.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::dom::{alert, js_string_escape};

/// Simple counter for unique editor ids.
static EDITOR_COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// Guess the mime type the way browsers label image files.
fn mime_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(str::to_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

const TOOLBAR: &[(&str, &str, &str)] = &[
    ("bold", "B", "Bold"),
    ("italic", "I", "Italic"),
    ("underline", "U", "Underline"),
    ("strikeThrough", "S", "Strikethrough"),
    ("insertOrderedList", "1.", "Ordered list"),
    ("insertUnorderedList", "\u{2022}", "Bullet list"),
];

#[component]
pub fn RichTextEditor(
    content: Signal<String>,
    #[props(default = false)] disabled: bool,
    #[props(default = "Write something...".to_string())] placeholder: String,
) -> Element {
    let auth = use_auth();
    let editor_id = use_signal(|| {
        let n = EDITOR_COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        format!("rte-{n}")
    });
    let file_input_id = use_signal(|| format!("{}-file", editor_id.peek()));
    // Last HTML we know the DOM holds, to avoid push/receive echo loops.
    let mut last_pushed = use_signal(String::new);

    // ── Seed the element and wire the input listener once ──
    use_effect(move || {
        let eid = editor_id.peek().clone();
        let initial = content.peek().clone();
        last_pushed.set(initial.clone());
        let js = format!(
            r#"(function() {{
                var el = document.getElementById({eid_js});
                if (!el || el._wired) return;
                el._wired = true;
                el.innerHTML = {html_js};
                el.addEventListener('input', function() {{
                    dioxus.send(el.innerHTML);
                }});
            }})();"#,
            eid_js = js_string_escape(&eid),
            html_js = js_string_escape(&initial),
        );
        spawn(async move {
            let mut eval = document::eval(&js);
            while let Ok(html) = eval.recv::<String>().await {
                last_pushed.set(html.clone());
                content.set(html);
            }
        });
    });

    // ── Push external signal writes down into the DOM ──
    use_effect(move || {
        let html = content();
        if html == *last_pushed.peek() {
            return;
        }
        last_pushed.set(html.clone());
        let js = format!(
            r#"(function() {{
                var el = document.getElementById({eid_js});
                if (el && el.innerHTML !== {html_js}) el.innerHTML = {html_js};
            }})();"#,
            eid_js = js_string_escape(&editor_id.peek()),
            html_js = js_string_escape(&html),
        );
        document::eval(&js);
    });

    // Run an execCommand against the focused editor and sync the result back.
    let run_command = move |command: String, argument: Option<String>| {
        let arg_js = match &argument {
            Some(arg) => js_string_escape(arg),
            None => "null".to_string(),
        };
        let js = format!(
            r#"(function() {{
                var el = document.getElementById({eid_js});
                if (!el) return;
                el.focus();
                document.execCommand({cmd_js}, false, {arg_js});
                dioxus.send(el.innerHTML);
            }})();"#,
            eid_js = js_string_escape(&editor_id.peek()),
            cmd_js = js_string_escape(&command),
        );
        spawn(async move {
            let mut eval = document::eval(&js);
            if let Ok(html) = eval.recv::<String>().await {
                last_pushed.set(html.clone());
                content.set(html);
            }
        });
    };

    let pick_image = move |_| {
        let js = format!(
            "var el = document.getElementById({}); if (el) el.click();",
            js_string_escape(&file_input_id.peek()),
        );
        document::eval(&js);
    };

    let upload_image = move |evt: FormEvent| {
        spawn(async move {
            let Some(file_engine) = evt.files() else {
                return;
            };
            let Some(name) = file_engine.files().into_iter().next() else {
                return;
            };
            let Some(bytes) = file_engine.read_file(&name).await else {
                alert("Could not read the selected file");
                return;
            };
            let client = auth.peek().client();
            let encoded = STANDARD.encode(&bytes);
            match client.upload_image(mime_for(&name), &encoded).await {
                Ok(created) => {
                    run_command("insertImage".to_string(), Some(created.url));
                }
                Err(e) => {
                    tracing::warn!("image upload failed: {e}");
                    alert("Image upload failed (login required)");
                }
            }
        });
    };

    rsx! {
        div { class: "rte",
            if !disabled {
                div { class: "rte-toolbar",
                    for (command, label, title) in TOOLBAR.iter().copied() {
                        button {
                            r#type: "button",
                            title: "{title}",
                            onmousedown: move |evt| evt.prevent_default(),
                            onclick: move |_| run_command(command.to_string(), None),
                            "{label}"
                        }
                    }
                    button {
                        r#type: "button",
                        title: "Blockquote",
                        onmousedown: move |evt| evt.prevent_default(),
                        onclick: move |_| {
                            run_command("formatBlock".to_string(), Some("blockquote".to_string()))
                        },
                        "\u{275d}"
                    }
                    button {
                        r#type: "button",
                        title: "Insert image",
                        onmousedown: move |evt| evt.prevent_default(),
                        onclick: pick_image,
                        "\u{1f5bc}"
                    }
                }
            }
            div {
                id: "{editor_id}",
                class: "rte-surface",
                contenteditable: if disabled { "false" } else { "true" },
                "data-placeholder": "{placeholder}",
            }
            input {
                id: "{file_input_id}",
                r#type: "file",
                accept: "image/*",
                style: "display: none",
                onchange: upload_image,
            }
        }
    }
}
