//! Document persistence entry points.
//!
//! # Responsibility
//! - Save and load `.notebook` documents as versioned JSON.
//! - Run format migrations before decoding older files.
//! - Keep the image sidecar directory in sync on every save.
//!
//! # Invariants
//! - `save` never mutates document content other than rewriting image paths
//!   to their staged sidecar locations.
//! - A document newer than this build's format version is refused.
//! - An unresolvable image skips that one widget, not the whole load.

use crate::model::document::{NotebookDocument, FORMAT_VERSION};
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use std::time::Instant;

pub mod format;
pub mod images;
pub mod migrate;

use format::DocumentFile;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence-layer error for save/load/migration operations.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
    UnsupportedVersion {
        found: u32,
        latest_supported: u32,
    },
    Migration {
        version: u32,
        details: String,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
            Self::UnsupportedVersion {
                found,
                latest_supported,
            } => write!(
                f,
                "document format version {found} is newer than supported {latest_supported}"
            ),
            Self::Migration { version, details } => {
                write!(f, "migration to version {version} failed: {details}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::UnsupportedVersion { .. } | Self::Migration { .. } => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Writes the document to `path` as pretty-printed JSON.
///
/// # Side effects
/// - Stages referenced images into the sidecar directory and rewrites the
///   widgets' stored paths to the staged names.
/// - Garbage-collects sidecar files the document no longer references.
/// - Emits `doc_save` logging events with duration and status.
pub fn save(document: &mut NotebookDocument, path: impl AsRef<Path>) -> StoreResult<()> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=doc_save module=store status=start path={}", path.display());

    let result = save_inner(document, path);
    match &result {
        Ok(()) => info!(
            "event=doc_save module=store status=ok pages={} duration_ms={}",
            document.pages.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event=doc_save module=store status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn save_inner(document: &mut NotebookDocument, path: &Path) -> StoreResult<()> {
    let doc_dir = document_dir(path);
    images::stage_images(document, doc_dir)?;
    images::garbage_collect(document, doc_dir)?;

    document.version = FORMAT_VERSION;
    let wire = DocumentFile::from_model(document);
    let json = serde_json::to_string_pretty(&wire)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads, migrates, and reconstructs a document from `path`.
///
/// # Side effects
/// - Emits `doc_load` logging events with duration and status.
/// - Logs one warning per image widget whose source cannot be resolved;
///   such widgets are dropped and the rest of the document still loads.
pub fn load(path: impl AsRef<Path>) -> StoreResult<NotebookDocument> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=doc_load module=store status=start path={}", path.display());

    let result = load_inner(path);
    match &result {
        Ok(document) => info!(
            "event=doc_load module=store status=ok pages={} duration_ms={}",
            document.pages.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event=doc_load module=store status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn load_inner(path: &Path) -> StoreResult<NotebookDocument> {
    let raw = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;
    let value = migrate::apply_migrations(value)?;
    let file: DocumentFile = serde_json::from_value(value)?;

    let doc_dir = document_dir(path);
    let metadata = file.metadata_model();
    let mut pages = Vec::with_capacity(file.pages.len());
    for page_file in file.pages {
        let (mut page, image_files) = page_file.into_model_without_images();
        for image_file in image_files {
            match images::resolve_image_path(&image_file.image_path, doc_dir) {
                Some(resolved) => {
                    page.image_widgets.push(image_file.into_model(resolved));
                }
                None => warn!(
                    "event=doc_load module=store status=image_skipped widget={} path={}",
                    image_file.id, image_file.image_path
                ),
            }
        }
        pages.push(page);
    }

    Ok(NotebookDocument::from_pages(metadata, pages))
}

/// Directory the document lives in; bare filenames resolve against `.`.
fn document_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
