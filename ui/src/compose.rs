//! The compose modal, shared by create, edit and read-only view.
//!
//! One modal serves all three flows; [`ComposeMode`] decides what is
//! prefilled, whether the fields accept input, and which request the Post
//! button sends. The kind is fixed by the panel that opened the modal and is
//! never editable.

use api::{Entry, EntryKind, EntryPatch, NewEntry};
use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::editor::RichTextEditor;
use crate::modal::ModalOverlay;

/// What the modal was opened for.
#[derive(Debug, Clone, PartialEq)]
pub enum ComposeMode {
    Create { kind: EntryKind },
    Edit { entry: Entry },
    View { entry: Entry },
}

impl ComposeMode {
    pub fn kind(&self) -> EntryKind {
        match self {
            ComposeMode::Create { kind } => *kind,
            ComposeMode::Edit { entry } | ComposeMode::View { entry } => entry.kind,
        }
    }

    fn read_only(&self) -> bool {
        matches!(self, ComposeMode::View { .. })
    }

    fn initial_title(&self) -> String {
        match self {
            ComposeMode::Create { .. } => String::new(),
            ComposeMode::Edit { entry } | ComposeMode::View { entry } => {
                entry.title.clone().unwrap_or_default()
            }
        }
    }

    fn initial_body(&self) -> String {
        match self {
            ComposeMode::Create { .. } => String::new(),
            ComposeMode::Edit { entry } | ComposeMode::View { entry } => entry.body.clone(),
        }
    }
}

#[component]
pub fn ComposeModal(
    mode: ComposeMode,
    on_close: EventHandler<()>,
    /// Fired with the entry's kind after a successful create or edit, so the
    /// owning panel can re-fetch.
    on_saved: EventHandler<EntryKind>,
) -> Element {
    let auth = use_auth();
    let mut title = use_signal(|| mode.initial_title());
    let body = use_signal(|| mode.initial_body());
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let read_only = mode.read_only();
    let creating = matches!(mode, ComposeMode::Create { .. });
    // Selectable while creating, fixed afterwards.
    let mut kind_sel = use_signal(|| mode.kind());

    let submit_mode = mode.clone();
    let submit = move |_| {
        let mode = submit_mode.clone();
        spawn(async move {
            busy.set(true);
            error.set(None);
            let client = auth.peek().client();
            let result = match &mode {
                ComposeMode::Create { .. } => {
                    let new = NewEntry {
                        kind: *kind_sel.peek(),
                        title: Some(title.peek().clone()).filter(|t| !t.is_empty()),
                        body: body.peek().clone(),
                    };
                    client.create_entry(&new).await
                }
                ComposeMode::Edit { entry } => {
                    // The title always travels (an empty one clears it); the
                    // body only when there is something to say.
                    let patch = EntryPatch {
                        title: Some(title.peek().clone()),
                        body: Some(body.peek().clone()).filter(|b| !b.is_empty()),
                    };
                    client.edit_entry(&entry.id, &patch).await
                }
                ComposeMode::View { .. } => unreachable!("view mode has no submit button"),
            };
            match result {
                Ok(saved) => {
                    on_saved.call(saved.kind);
                    on_close.call(());
                }
                Err(e) => {
                    tracing::warn!("saving entry failed: {e}");
                    error.set(Some(e.to_string()));
                }
            }
            busy.set(false);
        });
    };

    let busy_label = match &mode {
        ComposeMode::Edit { .. } => "Saving...",
        _ => "Posting...",
    };
    let idle_label = match &mode {
        ComposeMode::Edit { .. } => "Save",
        _ => "Post",
    };

    let kind = kind_sel();
    let heading = match &mode {
        ComposeMode::Create { .. } => format!("New {kind}"),
        ComposeMode::Edit { .. } => format!("Edit {kind}"),
        ComposeMode::View { entry } => entry
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| kind.heading().to_string()),
    };

    rsx! {
        ModalOverlay { on_close,
            div { class: "compose",
                h2 { class: "compose-heading", "{heading}" }
                if creating {
                    select {
                        class: "compose-kind",
                        onchange: move |evt: FormEvent| {
                            if let Ok(picked) = evt.value().parse::<EntryKind>() {
                                kind_sel.set(picked);
                            }
                        },
                        for option_kind in EntryKind::ALL {
                            option {
                                value: "{option_kind}",
                                selected: option_kind == kind,
                                "{option_kind.heading()}"
                            }
                        }
                    }
                }
                if !read_only {
                    input {
                        class: "compose-title",
                        placeholder: "Title (optional)",
                        value: title(),
                        oninput: move |evt: FormEvent| title.set(evt.value()),
                    }
                }
                RichTextEditor {
                    content: body,
                    disabled: read_only,
                    placeholder: format!("Write a {kind}..."),
                }
                if let Some(message) = error() {
                    div { class: "compose-error", "{message}" }
                }
                div { class: "compose-actions",
                    button { onclick: move |_| on_close.call(()), "Close" }
                    if !read_only {
                        button {
                            class: "primary",
                            disabled: busy(),
                            onclick: submit,
                            if busy() { "{busy_label}" } else { "{idle_label}" }
                        }
                    }
                }
            }
        }
    }
}
