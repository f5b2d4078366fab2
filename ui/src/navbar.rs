use dioxus::prelude::*;

use crate::auth::AuthControls;
use crate::search::SearchBox;

/// Site header: brand, the debounced search box and the auth controls.
#[component]
pub fn Navbar(on_search: EventHandler<String>) -> Element {
    rsx! {
        header { class: "navbar",
            div { class: "brand", "inkpost" }
            SearchBox { on_search }
            div { class: "navbar-auth", AuthControls {} }
        }
    }
}
