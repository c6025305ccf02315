//! Notebook document root.
//!
//! # Responsibility
//! - Own the ordered page sequence and document metadata.
//! - Maintain the even/odd left/right parity of the page list.
//!
//! # Invariants
//! - `pages` order is the document order; index parity defines the side.
//! - The page list always holds an even number of pages, so the view can
//!   always display a complete spread.
//! - `metadata.modified` moves forward on every recorded mutation.

use crate::model::page::{Page, PageSide};
use chrono::{DateTime, Utc};

/// Current on-disk format version written by this build.
pub const FORMAT_VERSION: u32 = 2;

/// Oldest format version the migration chain can still read.
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// Document-level bookkeeping block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub app_version: String,
    pub min_compatible_version: u32,
}

impl Metadata {
    pub fn now() -> Self {
        let stamp = Utc::now();
        Self {
            created: stamp,
            modified: stamp,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            min_compatible_version: MIN_COMPATIBLE_VERSION,
        }
    }
}

/// The in-memory notebook: metadata plus the ordered page sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct NotebookDocument {
    pub version: u32,
    pub metadata: Metadata,
    pub pages: Vec<Page>,
}

impl NotebookDocument {
    /// Creates a fresh notebook with one empty spread.
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION,
            metadata: Metadata::now(),
            pages: vec![Page::new(0), Page::new(1)],
        }
    }

    /// Rebuilds a document from already-constructed pages.
    ///
    /// Renumbers pages by position and fixes side parity, then pads with one
    /// trailing page if the count came out odd.
    pub fn from_pages(metadata: Metadata, mut pages: Vec<Page>) -> Self {
        if pages.is_empty() {
            pages.push(Page::new(0));
        }
        if pages.len() % 2 != 0 {
            pages.push(Page::new(pages.len()));
        }
        for (index, page) in pages.iter_mut().enumerate() {
            page.number = index;
            page.side = PageSide::from_index(index);
        }
        Self {
            version: FORMAT_VERSION,
            metadata,
            pages,
        }
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    /// Number of complete spreads in the document.
    pub fn spread_count(&self) -> usize {
        self.pages.len() / 2
    }

    /// Grows the page list until `index` exists, preserving parity.
    ///
    /// Pages are always appended in pairs so the trailing spread stays
    /// complete.
    pub fn ensure_page(&mut self, index: usize) {
        while self.pages.len() <= index {
            self.pages.push(Page::new(self.pages.len()));
            self.pages.push(Page::new(self.pages.len()));
        }
    }

    /// Appends one fresh spread and returns its left page index.
    pub fn append_spread(&mut self) -> usize {
        let left = self.pages.len();
        self.pages.push(Page::new(left));
        self.pages.push(Page::new(left + 1));
        left
    }

    /// Records a content mutation by advancing the modified timestamp.
    pub fn touch(&mut self) {
        self.metadata.modified = Utc::now();
    }
}

impl Default for NotebookDocument {
    fn default() -> Self {
        Self::new()
    }
}
