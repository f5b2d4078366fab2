//! Debounced site-wide search input.

use dioxus::prelude::*;

use crate::dom::sleep_ms;

/// Delay between the last keystroke and the search firing.
const DEBOUNCE_MS: u32 = 300;

/// Text input that emits `on_search` with the trimmed query once typing pauses.
/// Every emission resets the lists to page 0.
#[component]
pub fn SearchBox(on_search: EventHandler<String>) -> Element {
    let mut text = use_signal(String::new);
    // Monotonic counter; only the latest keystroke's sleeper fires.
    let mut generation = use_signal(|| 0u32);

    let oninput = move |evt: FormEvent| {
        text.set(evt.value());
        let current = generation() + 1;
        generation.set(current);
        spawn(async move {
            sleep_ms(DEBOUNCE_MS).await;
            if generation() == current {
                on_search.call(text().trim().to_string());
            }
        });
    };

    rsx! {
        input {
            id: "header-search",
            class: "header-search",
            placeholder: "Search entries...",
            value: text(),
            oninput: oninput,
        }
    }
}
