//! On-disk JSON shapes and model conversions.
//!
//! # Responsibility
//! - Mirror the `.notebook` wire format exactly, field for field.
//! - Convert between wire shapes and the in-memory model.
//!
//! # Invariants
//! - `type` discriminators are `text_widget` / `image_widget`.
//! - `text.content` always equals the concatenation of `text.segments`.
//! - Image aspect ratio is re-derived from the stored width/height on load.

use crate::model::document::{Metadata, NotebookDocument};
use crate::model::geometry::Rect;
use crate::model::page::Page;
use crate::model::text::{parse_tag_name, tag_names, RichText, TextRun};
use crate::model::widget::{ImageWidget, TextWidget};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

pub const TEXT_WIDGET_TYPE: &str = "text_widget";
pub const IMAGE_WIDGET_TYPE: &str = "image_widget";

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentFile {
    pub version: u32,
    pub metadata: MetadataFile,
    pub pages: Vec<PageFile>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MetadataFile {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub app_version: String,
    pub min_compatible_version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageFile {
    pub page_number: usize,
    pub name: String,
    pub is_left_page: bool,
    #[serde(default)]
    pub textboxes: Vec<TextWidgetFile>,
    #[serde(default)]
    pub images: Vec<ImageWidgetFile>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextWidgetFile {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub text: TextContentFile,
    pub properties: TextPropertiesFile,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextContentFile {
    pub content: String,
    pub segments: Vec<SegmentFile>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SegmentFile {
    pub text: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextPropertiesFile {
    pub page_color: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageWidgetFile {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub image_path: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl DocumentFile {
    pub fn from_model(document: &NotebookDocument) -> Self {
        Self {
            version: document.version,
            metadata: MetadataFile {
                created: document.metadata.created,
                modified: document.metadata.modified,
                app_version: document.metadata.app_version.clone(),
                min_compatible_version: document.metadata.min_compatible_version,
            },
            pages: document.pages.iter().map(PageFile::from_model).collect(),
        }
    }

    pub fn metadata_model(&self) -> Metadata {
        Metadata {
            created: self.metadata.created,
            modified: self.metadata.modified,
            app_version: self.metadata.app_version.clone(),
            min_compatible_version: self.metadata.min_compatible_version,
        }
    }
}

impl PageFile {
    pub fn from_model(page: &Page) -> Self {
        Self {
            page_number: page.number,
            name: page.name.clone(),
            is_left_page: page.side == crate::model::page::PageSide::Left,
            textboxes: page
                .text_widgets
                .iter()
                .map(TextWidgetFile::from_model)
                .collect(),
            images: page
                .image_widgets
                .iter()
                .map(ImageWidgetFile::from_model)
                .collect(),
        }
    }

    /// Rebuilds the page shell; image widgets are attached separately so the
    /// loader can drop unresolvable ones.
    pub fn into_model_without_images(self) -> (Page, Vec<ImageWidgetFile>) {
        let mut page = Page::new(self.page_number);
        page.name = self.name;
        page.text_widgets = self
            .textboxes
            .into_iter()
            .map(TextWidgetFile::into_model)
            .collect();
        (page, self.images)
    }
}

impl TextWidgetFile {
    pub fn from_model(widget: &TextWidget) -> Self {
        let segments = widget
            .content
            .runs()
            .iter()
            .map(|run| SegmentFile {
                text: run.text.clone(),
                tags: tag_names(&run.tags),
            })
            .collect();
        Self {
            id: widget.id,
            kind: TEXT_WIDGET_TYPE.to_string(),
            x: widget.frame.origin.x,
            y: widget.frame.origin.y,
            width: widget.frame.size.width,
            height: widget.frame.size.height,
            text: TextContentFile {
                content: widget.content.content(),
                segments,
            },
            properties: TextPropertiesFile {
                page_color: widget.page_color.clone(),
            },
        }
    }

    pub fn into_model(self) -> TextWidget {
        let content = if self.text.segments.is_empty() && !self.text.content.is_empty() {
            // Defensive path for hand-edited files: content without segments
            // is treated as one unformatted run.
            RichText::plain(self.text.content)
        } else {
            RichText::from_runs(
                self.text
                    .segments
                    .into_iter()
                    .map(|segment| TextRun {
                        text: segment.text,
                        tags: segment
                            .tags
                            .iter()
                            .flat_map(|name| parse_tag_name(name))
                            .collect(),
                    })
                    .collect(),
            )
        };

        let mut widget =
            TextWidget::with_id(self.id, Rect::new(self.x, self.y, self.width, self.height));
        widget.content = content;
        widget.page_color = self.properties.page_color;
        widget
    }
}

impl ImageWidgetFile {
    pub fn from_model(widget: &ImageWidget) -> Self {
        Self {
            id: widget.id,
            kind: IMAGE_WIDGET_TYPE.to_string(),
            x: widget.frame.origin.x,
            y: widget.frame.origin.y,
            width: widget.frame.size.width,
            height: widget.frame.size.height,
            image_path: widget.source_path.to_string_lossy().into_owned(),
            properties: serde_json::Map::new(),
        }
    }

    /// Rebuilds the widget with an already-resolved source path.
    pub fn into_model(self, resolved_path: PathBuf) -> ImageWidget {
        let aspect_ratio = if self.width > 0 {
            f64::from(self.height) / f64::from(self.width)
        } else {
            1.0
        };
        ImageWidget {
            id: self.id,
            frame: Rect::new(self.x, self.y, self.width, self.height),
            source_path: resolved_path,
            aspect_ratio,
        }
    }
}
