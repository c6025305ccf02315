//! Page navigation and single-page focus mode.
//!
//! # Responsibility
//! - Track which spread (or single focused page) is currently visible.
//! - Grow the document when the user flips past the last spread.
//! - Trigger the best-effort page-flip cue on every view change.
//!
//! # Invariants
//! - In spread mode the left index is always even and the right index is
//!   `left + 1`.
//! - Exiting focus mode restores exactly the spread that was visible before
//!   entering it.
//! - Navigation never leaves a dangling index: target pages are created on
//!   demand, in pairs.

use crate::context::AppContext;
use crate::model::document::NotebookDocument;
use log::debug;

/// What the view currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Two-page book view; `left` is always even.
    Spread { left: usize },
    /// Single centered page; `saved_left` restores the prior spread.
    Focus { index: usize, saved_left: usize },
}

/// Pages a renderer should display for the current view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisiblePages {
    Pair { left: usize, right: usize },
    Single(usize),
}

/// Navigation state machine over a document's page sequence.
#[derive(Debug)]
pub struct Navigator {
    view: ViewState,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            view: ViewState::Spread { left: 0 },
        }
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn in_focus_mode(&self) -> bool {
        matches!(self.view, ViewState::Focus { .. })
    }

    pub fn visible_pages(&self) -> VisiblePages {
        match self.view {
            ViewState::Spread { left } => VisiblePages::Pair {
                left,
                right: left + 1,
            },
            ViewState::Focus { index, .. } => VisiblePages::Single(index),
        }
    }

    /// Flips forward: one spread in book view, one page in focus mode.
    ///
    /// Flipping past the end appends a fresh spread so the notebook never
    /// runs out of paper.
    pub fn next(&mut self, document: &mut NotebookDocument, context: &mut AppContext) {
        match self.view {
            ViewState::Spread { left } => {
                let new_left = left + 2;
                document.ensure_page(new_left + 1);
                self.view = ViewState::Spread { left: new_left };
            }
            ViewState::Focus { index, saved_left } => {
                let new_index = index + 1;
                document.ensure_page(new_index);
                self.view = ViewState::Focus {
                    index: new_index,
                    saved_left,
                };
            }
        }
        self.after_flip(context);
    }

    /// Flips backward, clamping at the first spread (or first page).
    pub fn previous(&mut self, context: &mut AppContext) {
        let moved = match self.view {
            ViewState::Spread { left } if left >= 2 => {
                self.view = ViewState::Spread { left: left - 2 };
                true
            }
            ViewState::Focus { index, saved_left } if index >= 1 => {
                self.view = ViewState::Focus {
                    index: index - 1,
                    saved_left,
                };
                true
            }
            _ => false,
        };
        if moved {
            self.after_flip(context);
        }
    }

    /// Suspends the spread view and centers a single page.
    pub fn enter_focus(&mut self, index: usize, document: &mut NotebookDocument) {
        let saved_left = match self.view {
            ViewState::Spread { left } => left,
            ViewState::Focus { saved_left, .. } => saved_left,
        };
        document.ensure_page(index);
        self.view = ViewState::Focus { index, saved_left };
        debug!("event=focus_enter module=nav status=ok page={index}");
    }

    /// Restores the spread that was visible before focus mode.
    pub fn exit_focus(&mut self) {
        if let ViewState::Focus { saved_left, .. } = self.view {
            self.view = ViewState::Spread { left: saved_left };
            debug!("event=focus_exit module=nav status=ok left={saved_left}");
        }
    }

    /// Jumps straight to `index`.
    ///
    /// In spread mode the target normalizes to its enclosing even/odd pair;
    /// in focus mode the single page is shown as-is.
    pub fn go_to(
        &mut self,
        index: usize,
        document: &mut NotebookDocument,
        context: &mut AppContext,
    ) {
        let changed = match self.view {
            ViewState::Spread { left } => {
                let new_left = index - index % 2;
                document.ensure_page(new_left + 1);
                self.view = ViewState::Spread { left: new_left };
                new_left != left
            }
            ViewState::Focus { index: shown, saved_left } => {
                document.ensure_page(index);
                self.view = ViewState::Focus {
                    index,
                    saved_left,
                };
                index != shown
            }
        };
        if changed {
            self.after_flip(context);
        }
    }

    fn after_flip(&self, context: &mut AppContext) {
        context.play_page_flip();
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
