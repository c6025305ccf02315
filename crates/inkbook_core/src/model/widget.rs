//! Floating widget types placed on a page.
//!
//! # Responsibility
//! - Define the text and image widget records and their geometry rules.
//! - Enforce per-kind size floors and the image aspect-ratio lock.
//!
//! # Invariants
//! - `WidgetId` is stable across serialization round-trips.
//! - Image resize keeps `height / width` equal to the stored aspect ratio
//!   within integer rounding.
//! - Geometry mutation clamps instead of failing.

use crate::model::geometry::{Point, Rect, Size};
use crate::model::text::RichText;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stable identifier for every widget in a document.
pub type WidgetId = Uuid;

/// Minimum text widget extent under interactive resize.
pub const TEXT_MIN_SIZE: Size = Size {
    width: 100,
    height: 60,
};

/// Fixed width floor for image widgets.
pub const IMAGE_MIN_WIDTH: i32 = 80;

/// Fraction of the page canvas width an imported image may occupy.
pub const IMAGE_IMPORT_MAX_FRACTION: f64 = 0.4;

/// Default page tint carried by text widgets.
pub const DEFAULT_PAGE_COLOR: &str = "#c1a273";

/// A positioned, resizable rich-text box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWidget {
    pub id: WidgetId,
    pub frame: Rect,
    pub content: RichText,
    pub page_color: String,
}

impl TextWidget {
    /// Creates an empty text widget from a drag-selection rectangle.
    ///
    /// Degenerate selections fall back to a usable default extent: a drag
    /// narrower than 50 becomes 200 wide, shorter than 30 becomes 100 tall.
    pub fn from_selection(selection: Rect) -> Self {
        let width = if selection.size.width < 50 {
            200
        } else {
            selection.size.width
        };
        let height = if selection.size.height < 30 {
            100
        } else {
            selection.size.height
        };
        Self::with_id(
            Uuid::new_v4(),
            Rect::new(selection.origin.x, selection.origin.y, width, height),
        )
    }

    pub fn with_id(id: WidgetId, frame: Rect) -> Self {
        Self {
            id,
            frame,
            content: RichText::default(),
            page_color: DEFAULT_PAGE_COLOR.to_string(),
        }
    }

    /// Moves the widget, keeping it fully inside `page`.
    pub fn move_to(&mut self, origin: Point, page: Size) {
        self.frame = Rect {
            origin,
            size: self.frame.size,
        }
        .clamped_within(page);
    }

    /// Resizes width and height independently, clamped to the text floor and
    /// the page bounds.
    pub fn resize(&mut self, requested: Size, page: Size) {
        self.frame = self.frame.sized_within(requested, TEXT_MIN_SIZE, page);
    }
}

/// A positioned, aspect-locked image element.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageWidget {
    pub id: WidgetId,
    pub frame: Rect,
    pub source_path: PathBuf,
    /// `height / width` of the source bitmap, captured at import time.
    pub aspect_ratio: f64,
}

impl ImageWidget {
    /// Places a freshly imported image at `origin`.
    ///
    /// The display width starts at the intrinsic width but never exceeds
    /// `IMAGE_IMPORT_MAX_FRACTION` of the page canvas width; height follows
    /// the intrinsic aspect ratio.
    pub fn import(
        source_path: PathBuf,
        intrinsic: Size,
        origin: Point,
        page: Size,
    ) -> Self {
        let aspect_ratio = if intrinsic.width > 0 {
            f64::from(intrinsic.height) / f64::from(intrinsic.width)
        } else {
            1.0
        };
        let max_width = (f64::from(page.width) * IMAGE_IMPORT_MAX_FRACTION) as i32;
        let width = intrinsic.width.min(max_width).max(IMAGE_MIN_WIDTH);
        let height = scaled_height(width, aspect_ratio);

        let mut widget = Self {
            id: Uuid::new_v4(),
            frame: Rect {
                origin,
                size: Size::new(width, height),
            },
            source_path,
            aspect_ratio,
        };
        widget.frame = widget.frame.clamped_within(page);
        widget
    }

    /// Imports the image at `path`, probing its intrinsic pixel size from the
    /// file header first.
    pub fn import_from_file(path: PathBuf, origin: Point, page: Size) -> Result<Self, String> {
        let intrinsic = probe_image_size(&path)?;
        Ok(Self::import(path, intrinsic, origin, page))
    }

    /// Moves the widget, keeping it fully inside `page`.
    pub fn move_to(&mut self, origin: Point, page: Size) {
        self.frame = Rect {
            origin,
            size: self.frame.size,
        }
        .clamped_within(page);
    }

    /// Resizes to `requested_width`, deriving height from the aspect ratio.
    ///
    /// Width is clamped to the image floor and so that neither edge leaves
    /// the page.
    pub fn resize_to_width(&mut self, requested_width: i32, page: Size) {
        let max_by_x = page.width - self.frame.origin.x;
        let max_by_y = if self.aspect_ratio > 0.0 {
            (f64::from(page.height - self.frame.origin.y) / self.aspect_ratio) as i32
        } else {
            max_by_x
        };
        let max_width = max_by_x.min(max_by_y).max(IMAGE_MIN_WIDTH);
        let width = requested_width.clamp(IMAGE_MIN_WIDTH, max_width);
        self.frame.size = Size::new(width, scaled_height(width, self.aspect_ratio));
    }
}

fn scaled_height(width: i32, aspect_ratio: f64) -> i32 {
    ((f64::from(width) * aspect_ratio).round() as i32).max(1)
}

/// Reads the pixel dimensions of an image file without decoding the bitmap.
pub fn probe_image_size(path: &Path) -> Result<Size, String> {
    let (width, height) = image::image_dimensions(path)
        .map_err(|err| format!("cannot read image `{}`: {err}", path.display()))?;
    Ok(Size::new(width as i32, height as i32))
}

/// Tagged widget variant used wherever either kind may appear.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Text(TextWidget),
    Image(ImageWidget),
}

impl Widget {
    pub fn id(&self) -> WidgetId {
        match self {
            Self::Text(widget) => widget.id,
            Self::Image(widget) => widget.id,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Self::Text(widget) => widget.frame,
            Self::Image(widget) => widget.frame,
        }
    }

    /// Moves either widget kind, clamped to `page`.
    pub fn set_origin(&mut self, origin: Point, page: Size) {
        match self {
            Self::Text(widget) => widget.move_to(origin, page),
            Self::Image(widget) => widget.move_to(origin, page),
        }
    }
}
