//! Notebook domain model.
//!
//! # Responsibility
//! - Define the document/page/widget structures used by core logic.
//! - Keep geometry and rich-text rules next to the data they govern.
//!
//! # Invariants
//! - Every widget is identified by a stable `WidgetId`.
//! - A page exclusively owns its widgets; the document exclusively owns its
//!   pages.

pub mod document;
pub mod geometry;
pub mod page;
pub mod text;
pub mod widget;
