//! This crate contains all shared UI for the workspace.

mod auth;
pub use auth::{use_auth, AuthControls, AuthProvider, AuthState};

mod compose;
pub use compose::{ComposeMode, ComposeModal};

mod editor;
pub use editor::RichTextEditor;

mod entry_list;
pub use entry_list::{EntryActions, EntryList};

mod modal;
pub use modal::ModalOverlay;

mod navbar;
pub use navbar::Navbar;

mod search;
pub use search::SearchBox;

pub(crate) mod dom;
