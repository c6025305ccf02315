//! Page container owning floating widgets.
//!
//! # Responsibility
//! - Own the ordered text and image widget collections for one page.
//! - Provide add/remove/hit-test operations used by the input router.
//!
//! # Invariants
//! - A widget belongs to exactly one page; removal drops it entirely.
//! - Widget order is insertion order and defines z-order (last on top).
//! - `side` mirrors the page's index parity in the document.

use crate::model::geometry::Point;
use crate::model::widget::{ImageWidget, TextWidget, Widget, WidgetId};

/// Which half of the open book a page is shown on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSide {
    Left,
    Right,
}

impl PageSide {
    /// Side implied by a page's index in the document sequence.
    pub fn from_index(index: usize) -> Self {
        if index % 2 == 0 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// One notebook page and the widgets placed on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub name: String,
    pub side: PageSide,
    pub text_widgets: Vec<TextWidget>,
    pub image_widgets: Vec<ImageWidget>,
}

impl Page {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            name: format!("Page {}", number + 1),
            side: PageSide::from_index(number),
            text_widgets: Vec::new(),
            image_widgets: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text_widgets.is_empty() && self.image_widgets.is_empty()
    }

    pub fn widget_count(&self) -> usize {
        self.text_widgets.len() + self.image_widgets.len()
    }

    pub fn add_text(&mut self, widget: TextWidget) -> WidgetId {
        let id = widget.id;
        self.text_widgets.push(widget);
        id
    }

    pub fn add_image(&mut self, widget: ImageWidget) -> WidgetId {
        let id = widget.id;
        self.image_widgets.push(widget);
        id
    }

    pub fn text_widget(&self, id: WidgetId) -> Option<&TextWidget> {
        self.text_widgets.iter().find(|widget| widget.id == id)
    }

    pub fn text_widget_mut(&mut self, id: WidgetId) -> Option<&mut TextWidget> {
        self.text_widgets.iter_mut().find(|widget| widget.id == id)
    }

    pub fn image_widget(&self, id: WidgetId) -> Option<&ImageWidget> {
        self.image_widgets.iter().find(|widget| widget.id == id)
    }

    pub fn image_widget_mut(&mut self, id: WidgetId) -> Option<&mut ImageWidget> {
        self.image_widgets.iter_mut().find(|widget| widget.id == id)
    }

    /// Looks up either widget kind by id.
    pub fn widget(&self, id: WidgetId) -> Option<Widget> {
        self.text_widget(id)
            .cloned()
            .map(Widget::Text)
            .or_else(|| self.image_widget(id).cloned().map(Widget::Image))
    }

    /// Removes a widget of either kind. Returns whether anything was removed.
    pub fn remove_widget(&mut self, id: WidgetId) -> bool {
        let before = self.widget_count();
        self.text_widgets.retain(|widget| widget.id != id);
        self.image_widgets.retain(|widget| widget.id != id);
        self.widget_count() != before
    }

    /// Topmost widget under `point`, if any.
    ///
    /// Images render above text boxes; within a kind, later insertions sit
    /// on top, so both collections scan back to front.
    pub fn widget_at(&self, point: Point) -> Option<WidgetId> {
        let text_hit = self
            .text_widgets
            .iter()
            .rev()
            .find(|widget| widget.frame.contains(point))
            .map(|widget| widget.id);
        let image_hit = self
            .image_widgets
            .iter()
            .rev()
            .find(|widget| widget.frame.contains(point))
            .map(|widget| widget.id);
        image_hit.or(text_hit)
    }

    /// Drops every widget on the page.
    pub fn clear(&mut self) {
        self.text_widgets.clear();
        self.image_widgets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, PageSide};
    use crate::model::geometry::{Point, Rect, Size};
    use crate::model::widget::{ImageWidget, TextWidget};
    use std::path::PathBuf;

    fn sample_page() -> Page {
        let mut page = Page::new(0);
        page.add_text(TextWidget::from_selection(Rect::new(10, 10, 200, 100)));
        page.add_image(ImageWidget::import(
            PathBuf::from("photo.png"),
            Size::new(200, 100),
            Point::new(50, 200),
            Size::new(800, 600),
        ));
        page
    }

    #[test]
    fn side_follows_index_parity() {
        assert_eq!(PageSide::from_index(0), PageSide::Left);
        assert_eq!(PageSide::from_index(1), PageSide::Right);
        assert_eq!(PageSide::from_index(4), PageSide::Left);
    }

    #[test]
    fn remove_widget_drops_either_kind() {
        let mut page = sample_page();
        let text_id = page.text_widgets[0].id;
        let image_id = page.image_widgets[0].id;

        assert!(page.remove_widget(text_id));
        assert!(page.remove_widget(image_id));
        assert!(!page.remove_widget(image_id));
        assert!(page.is_empty());
    }

    #[test]
    fn hit_test_finds_topmost_widget() {
        let page = sample_page();
        let text_id = page.text_widgets[0].id;
        let image_id = page.image_widgets[0].id;

        assert_eq!(page.widget_at(Point::new(20, 20)), Some(text_id));
        assert_eq!(page.widget_at(Point::new(60, 210)), Some(image_id));
        assert_eq!(page.widget_at(Point::new(700, 500)), None);
    }
}
