//! Single-page web front end.
//!
//! The whole site is one view: a navbar with search and auth, three panels
//! (one per entry kind) and a compose modal shared by create, edit and view.
//! Each panel carries a refresh counter; saving an entry bumps the counter for
//! that entry's kind so only the affected panel re-fetches.

use api::EntryKind;
use dioxus::prelude::*;
use ui::{use_auth, AuthProvider, ComposeModal, ComposeMode, EntryActions, EntryList, Navbar};

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        AuthProvider {
            Home {}
        }
    }
}

#[component]
fn Home() -> Element {
    let mut query = use_signal(String::new);
    let mut compose = use_signal(|| None::<ComposeMode>);
    let mut thought_refresh = use_signal(|| 0u32);
    let mut learning_refresh = use_signal(|| 0u32);
    let mut note_refresh = use_signal(|| 0u32);

    let mut bump = move |kind: EntryKind| match kind {
        EntryKind::Thought => thought_refresh += 1,
        EntryKind::Learning => learning_refresh += 1,
        EntryKind::Note => note_refresh += 1,
    };

    rsx! {
        Navbar {
            on_search: move |q: String| query.set(q),
        }
        main { class: "panels",
            KindPanel {
                kind: EntryKind::Thought,
                query,
                refresh: thought_refresh,
                compose,
            }
            KindPanel {
                kind: EntryKind::Learning,
                query,
                refresh: learning_refresh,
                compose,
            }
            KindPanel {
                kind: EntryKind::Note,
                query,
                refresh: note_refresh,
                compose,
            }
        }
        if let Some(mode) = compose() {
            ComposeModal {
                mode,
                on_close: move |_| compose.set(None),
                on_saved: move |kind| bump(kind),
            }
        }
    }
}

/// One column of the home page: heading, a compose button for signed-in
/// visitors and the paginated list for this kind.
#[component]
fn KindPanel(
    kind: EntryKind,
    query: ReadOnlySignal<String>,
    refresh: ReadOnlySignal<u32>,
    compose: Signal<Option<ComposeMode>>,
) -> Element {
    let auth = use_auth();
    let mut compose_signal = compose;
    let actions = EntryActions {
        on_view: EventHandler::new(move |entry| {
            compose_signal.set(Some(ComposeMode::View { entry }))
        }),
        on_edit: EventHandler::new(move |entry| {
            compose_signal.set(Some(ComposeMode::Edit { entry }))
        }),
    };

    rsx! {
        section { class: "panel",
            div { class: "panel-head",
                h2 { "{kind.heading()}" }
                if auth().session.is_some() {
                    button {
                        class: "new-entry",
                        onclick: move |_| compose_signal.set(Some(ComposeMode::Create { kind })),
                        "+ New"
                    }
                }
            }
            EntryList { kind, query, refresh, actions }
        }
    }
}
