//! Core domain logic for the Inkbook notebook.
//! This crate owns the document model, interaction state, and persistence.

pub mod context;
pub mod input;
pub mod logging;
pub mod model;
pub mod nav;
pub mod session;
pub mod store;

pub use context::{AppContext, SoundCue};
pub use input::{HitTarget, InputEffect, InputRouter, InteractionState, PointerButton, PointerEvent};
pub use logging::{default_log_level, init_logging};
pub use model::document::{NotebookDocument, FORMAT_VERSION};
pub use model::geometry::{Point, Rect, Size};
pub use model::page::{Page, PageSide};
pub use model::text::{FormatTag, RichText};
pub use model::widget::{ImageWidget, TextWidget, Widget};
pub use nav::{Navigator, ViewState, VisiblePages};
pub use session::{Session, UnsavedChoice};
pub use store::{StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
