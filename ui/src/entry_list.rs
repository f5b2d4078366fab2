//! Paginated per-kind entry list.
//!
//! Each panel owns its own page state. Collapsed it shows the first page of
//! `limit` entries; "View more" fetches the next page and appends, "View less"
//! truncates back. The list re-fetches from page zero whenever the search
//! query or the panel's refresh counter changes.

use api::{Entry, EntryKind, ListQuery};
use chrono::{DateTime, Local, Utc};
use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::dom::{alert, confirm};

/// Entries shown per page in a panel.
pub const PANEL_LIMIT: usize = 3;

/// Characters of stripped body text shown in a card preview.
const PREVIEW_CHARS: usize = 220;

/// Callbacks a panel raises into the page-level compose modal.
#[derive(Clone, Copy, PartialEq)]
pub struct EntryActions {
    pub on_view: EventHandler<Entry>,
    pub on_edit: EventHandler<Entry>,
}

/// Drop markup from a sanitized HTML body, leaving readable text.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// First `PREVIEW_CHARS` characters of the text, with a trailing ellipsis when
/// truncated.
fn preview(html: &str) -> String {
    let text = strip_tags(html);
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// "edited ..." suffix for entries touched after creation. Writes that land
/// within the same second as creation don't count.
fn edited_label(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Option<String> {
    if (updated_at - created_at).num_seconds() > 1 {
        Some(format!("edited {}", format_date(updated_at)))
    } else {
        None
    }
}

fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%b %-d, %Y").to_string()
}

/// Label for the expand/collapse control, or `None` when there is nothing
/// more to show.
fn toggle_label(page: usize, last_full: bool) -> Option<&'static str> {
    if page > 0 {
        Some("View less")
    } else if last_full {
        Some("View more")
    } else {
        None
    }
}

#[component]
pub fn EntryList(
    kind: EntryKind,
    query: ReadOnlySignal<String>,
    refresh: ReadOnlySignal<u32>,
    actions: EntryActions,
    #[props(default = PANEL_LIMIT)] limit: usize,
) -> Element {
    let auth = use_auth();
    let mut items = use_signal(Vec::<Entry>::new);
    let mut page = use_signal(|| 0usize);
    // Whether the most recent fetch came back full, i.e. more may exist.
    let mut last_full = use_signal(|| false);
    let mut loading = use_signal(|| false);
    let mut failed = use_signal(|| false);

    let load = move |target_page: usize| {
        let q = query.peek().clone();
        spawn(async move {
            loading.set(true);
            let client = auth.peek().client();
            let request = ListQuery::for_kind(kind, target_page as u32, limit as u32).with_query(q);
            match client.list_entries(&request).await {
                Ok(fetched) => {
                    failed.set(false);
                    last_full.set(fetched.len() >= limit);
                    if target_page == 0 {
                        items.set(fetched);
                    } else {
                        items.write().extend(fetched);
                    }
                    page.set(target_page);
                }
                Err(e) => {
                    tracing::warn!("listing {kind} entries failed: {e}");
                    failed.set(true);
                }
            }
            loading.set(false);
        });
    };

    // Query changes and refresh bumps both restart from the first page.
    use_effect(move || {
        let _ = query();
        let _ = refresh();
        load(0);
    });

    // Collapsing re-fetches the first page instead of truncating locally, so
    // cards created or deleted elsewhere while expanded never linger.
    let toggle = move |_| {
        if page() > 0 {
            load(0);
        } else {
            load(1);
        }
    };

    let delete = move |entry: Entry| {
        if !confirm("Delete this entry?") {
            return;
        }
        spawn(async move {
            let client = auth.peek().client();
            match client.delete_entry(&entry.id).await {
                Ok(_) => items.write().retain(|e| e.id != entry.id),
                Err(e) => {
                    tracing::warn!("delete failed: {e}");
                    alert("Could not delete the entry");
                }
            }
        });
    };

    rsx! {
        div { class: "entry-list",
            if loading() && items().is_empty() {
                p { class: "entry-empty", "Loading..." }
            } else if failed() {
                p { class: "entry-error", "Failed to load." }
            } else if items().is_empty() {
                p { class: "entry-empty", "No entries yet." }
            }
            for entry in items() {
                EntryCard {
                    key: "{entry.id}",
                    entry: entry.clone(),
                    mine: auth().owns(&entry.owner_name),
                    on_view: actions.on_view,
                    on_edit: actions.on_edit,
                    on_delete: delete,
                }
            }
            if let Some(label) = toggle_label(page(), last_full()) {
                button {
                    class: "view-more",
                    disabled: loading(),
                    onclick: toggle,
                    "{label}"
                }
            }
        }
    }
}

#[component]
fn EntryCard(
    entry: Entry,
    mine: bool,
    on_view: EventHandler<Entry>,
    on_edit: EventHandler<Entry>,
    on_delete: EventHandler<Entry>,
) -> Element {
    let text = preview(&entry.body);
    let view = entry.clone();
    let edit = entry.clone();
    let remove = entry.clone();

    rsx! {
        article { class: "entry-card",
            if let Some(title) = entry.title.as_deref().filter(|t| !t.is_empty()) {
                h3 { class: "entry-title", "{title}" }
            }
            div { class: "entry-meta",
                "by {entry.owner_name} \u{b7} {format_date(entry.created_at)}"
                if let Some(edited) = edited_label(entry.created_at, entry.updated_at) {
                    " \u{b7} {edited}"
                }
            }
            p { class: "entry-preview", "{text}" }
            div { class: "entry-actions",
                button { onclick: move |_| on_view.call(view.clone()), "View" }
                if mine {
                    button { onclick: move |_| on_edit.call(edit.clone()), "Edit" }
                    button {
                        class: "danger",
                        onclick: move |_| on_delete.call(remove.clone()),
                        "Delete"
                    }
                }
            }
        }
    }
}
