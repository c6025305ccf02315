//! Central pointer-event router for widget direct manipulation.
//!
//! # Responsibility
//! - Hold the interaction state machine (idle/focused/dragging/resizing).
//! - Translate pointer events into clamped widget geometry mutations.
//! - Handle the right-click delete trigger for either widget kind.
//!
//! # Invariants
//! - Geometry mutation always clamps to the page bounds; no transition
//!   produces an error.
//! - A press on a text widget's editing surface never starts a window drag;
//!   only the frame and handles do.
//! - Dragging and resizing always settle back to `Focused` on pointer-up.

use crate::model::geometry::{Point, Size};
use crate::model::page::Page;
use crate::model::widget::WidgetId;
use log::debug;

/// Pointer button relevant to widget interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    /// Right click; the delete trigger.
    Secondary,
}

/// What the pointer press landed on, as reported by the shell's hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A widget's frame border region.
    Frame(WidgetId),
    /// The designated move handle of a focused widget.
    MoveHandle(WidgetId),
    /// The resize handle of a focused widget.
    ResizeHandle(WidgetId),
    /// A text widget's editing surface; presses here belong to the editor.
    TextSurface(WidgetId),
    /// Empty page area.
    Background,
}

impl HitTarget {
    fn widget(&self) -> Option<WidgetId> {
        match self {
            Self::Frame(id)
            | Self::MoveHandle(id)
            | Self::ResizeHandle(id)
            | Self::TextSurface(id) => Some(*id),
            Self::Background => None,
        }
    }
}

/// One pointer event delivered by the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down {
        position: Point,
        target: HitTarget,
        button: PointerButton,
    },
    Moved {
        position: Point,
    },
    Up,
}

/// Interaction state for the page under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Focused(WidgetId),
    Dragging {
        widget: WidgetId,
        /// Pointer offset from the widget origin captured at drag start, so
        /// the widget does not jump under the cursor.
        grab: Point,
    },
    Resizing(WidgetId),
}

/// Observable outcome of one routed event, for the shell to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEffect {
    None,
    Focused(WidgetId),
    FocusCleared,
    Moved(WidgetId),
    Resized(WidgetId),
    Deleted(WidgetId),
}

/// Routes pointer events into state transitions and widget mutations.
#[derive(Debug, Default)]
pub struct InputRouter {
    state: InteractionState,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn focused_widget(&self) -> Option<WidgetId> {
        match self.state {
            InteractionState::Idle => None,
            InteractionState::Focused(id)
            | InteractionState::Dragging { widget: id, .. }
            | InteractionState::Resizing(id) => Some(id),
        }
    }

    /// Explicit focus sweep: navigating away or a programmatic clear.
    pub fn clear_focus(&mut self) -> InputEffect {
        if self.state == InteractionState::Idle {
            return InputEffect::None;
        }
        self.state = InteractionState::Idle;
        InputEffect::FocusCleared
    }

    /// Applies one pointer event against the page currently under the
    /// pointer. `page_bounds` is the page canvas size used for clamping.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        page: &mut Page,
        page_bounds: Size,
    ) -> InputEffect {
        match event {
            PointerEvent::Down {
                position,
                target,
                button,
            } => self.on_down(position, target, button, page),
            PointerEvent::Moved { position } => self.on_moved(position, page, page_bounds),
            PointerEvent::Up => self.on_up(),
        }
    }

    fn on_down(
        &mut self,
        position: Point,
        target: HitTarget,
        button: PointerButton,
        page: &mut Page,
    ) -> InputEffect {
        if button == PointerButton::Secondary {
            if let Some(id) = target.widget() {
                return self.delete_widget(id, page);
            }
            return InputEffect::None;
        }

        match target {
            HitTarget::Background => self.clear_focus(),
            HitTarget::TextSurface(_) => {
                // The editor owns this press; interaction state is untouched
                // so in-text selection drags never move the widget.
                InputEffect::None
            }
            HitTarget::Frame(id) => self.focus(id, page),
            HitTarget::MoveHandle(id) => {
                if self.state != InteractionState::Focused(id) {
                    return self.focus(id, page);
                }
                let Some(widget) = page.widget(id) else {
                    return self.clear_focus();
                };
                let origin = widget.bounds().origin;
                self.state = InteractionState::Dragging {
                    widget: id,
                    grab: Point::new(position.x - origin.x, position.y - origin.y),
                };
                InputEffect::None
            }
            HitTarget::ResizeHandle(id) => {
                if self.state != InteractionState::Focused(id) {
                    return self.focus(id, page);
                }
                if page.widget(id).is_none() {
                    return self.clear_focus();
                }
                self.state = InteractionState::Resizing(id);
                InputEffect::None
            }
        }
    }

    fn on_moved(&mut self, position: Point, page: &mut Page, page_bounds: Size) -> InputEffect {
        match self.state {
            InteractionState::Dragging { widget, grab } => {
                let origin = Point::new(position.x - grab.x, position.y - grab.y);
                if let Some(text) = page.text_widget_mut(widget) {
                    text.move_to(origin, page_bounds);
                } else if let Some(image) = page.image_widget_mut(widget) {
                    image.move_to(origin, page_bounds);
                } else {
                    return self.clear_focus();
                }
                InputEffect::Moved(widget)
            }
            InteractionState::Resizing(widget) => {
                if let Some(text) = page.text_widget_mut(widget) {
                    let requested = Size::new(
                        position.x - text.frame.origin.x,
                        position.y - text.frame.origin.y,
                    );
                    text.resize(requested, page_bounds);
                } else if let Some(image) = page.image_widget_mut(widget) {
                    let requested_width = position.x - image.frame.origin.x;
                    image.resize_to_width(requested_width, page_bounds);
                } else {
                    return self.clear_focus();
                }
                InputEffect::Resized(widget)
            }
            InteractionState::Idle | InteractionState::Focused(_) => InputEffect::None,
        }
    }

    fn on_up(&mut self) -> InputEffect {
        match self.state {
            InteractionState::Dragging { widget, .. } | InteractionState::Resizing(widget) => {
                self.state = InteractionState::Focused(widget);
                InputEffect::None
            }
            InteractionState::Idle | InteractionState::Focused(_) => InputEffect::None,
        }
    }

    fn focus(&mut self, id: WidgetId, page: &Page) -> InputEffect {
        if page.widget(id).is_none() {
            return self.clear_focus();
        }
        if self.state == InteractionState::Focused(id) {
            return InputEffect::None;
        }
        self.state = InteractionState::Focused(id);
        InputEffect::Focused(id)
    }

    fn delete_widget(&mut self, id: WidgetId, page: &mut Page) -> InputEffect {
        if !page.remove_widget(id) {
            return InputEffect::None;
        }
        debug!("event=widget_delete module=input status=ok widget={id}");
        if self.focused_widget() == Some(id) {
            self.state = InteractionState::Idle;
        }
        InputEffect::Deleted(id)
    }
}
