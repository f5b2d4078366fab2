//! Authentication context and navbar controls.
//!
//! The remembered [`Session`] is loaded from browser storage once, wrapped in an
//! [`AuthState`] signal, and provided via context so components receive identity
//! explicitly instead of reading storage ad hoc.

use api::{Client, Session};
use dioxus::prelude::*;

/// Identity state for the application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
}

impl AuthState {
    pub fn username(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.username.as_str())
    }

    /// Whether the locally-remembered identity owns the given entry.
    pub fn owns(&self, owner_name: &str) -> bool {
        self.username() == Some(owner_name)
    }

    /// A client carrying this session's token, for same-origin requests.
    pub fn client(&self) -> Client {
        Client::with_session("", self.session.as_ref())
    }
}

/// Get the current authentication state.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Provider component that loads the remembered session and shares it.
/// Wrap the app with this component.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let auth_state = use_signal(|| AuthState {
        session: Session::load(),
    });
    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Navbar fragment: a username badge with Logout when signed in, otherwise a
/// Login button toggling a register/login popup.
#[component]
pub fn AuthControls() -> Element {
    let mut auth_state = use_auth();
    let mut open = use_signal(|| false);
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let submit = move |register: bool| {
        spawn(async move {
            busy.set(true);
            error.set(None);
            let client = Client::new("");
            let result = if register {
                client.register(&username(), &password()).await
            } else {
                client.login(&username(), &password()).await
            };
            match result {
                Ok(response) => {
                    let session = Session::new(response.token, response.username);
                    session.save();
                    auth_state.set(AuthState {
                        session: Some(session),
                    });
                    open.set(false);
                    username.set(String::new());
                    password.set(String::new());
                }
                Err(e) => {
                    tracing::warn!("auth failed: {e}");
                    error.set(Some(e.to_string()));
                }
            }
            busy.set(false);
        });
    };

    let logout = move |_| {
        Session::clear();
        auth_state.set(AuthState::default());
    };

    rsx! {
        if let Some(name) = auth_state().username() {
            div { class: "user-badge", "{name}" }
            button { id: "logout-btn", onclick: logout, "Logout" }
        } else {
            button {
                id: "login-btn",
                onclick: move |_| open.set(!open()),
                "Login"
            }
            if open() {
                div { class: "auth-popup",
                    button {
                        class: "auth-close",
                        onclick: move |_| open.set(false),
                        "\u{d7}"
                    }
                    input {
                        placeholder: "username",
                        value: username(),
                        oninput: move |evt: FormEvent| username.set(evt.value()),
                    }
                    input {
                        r#type: "password",
                        placeholder: "password",
                        value: password(),
                        oninput: move |evt: FormEvent| password.set(evt.value()),
                    }
                    button {
                        disabled: busy(),
                        onclick: move |_| submit(true),
                        "Register"
                    }
                    button {
                        disabled: busy(),
                        onclick: move |_| submit(false),
                        "Login"
                    }
                    if let Some(message) = error() {
                        div { class: "auth-error", "{message}" }
                    }
                }
            }
        }
    }
}
