//! Image sidecar directory management.
//!
//! # Responsibility
//! - Copy referenced images into `<doc_dir>/images/` under hash-derived
//!   names, deduplicating identical sources.
//! - Garbage-collect sidecar files no longer referenced on save.
//! - Resolve stored image paths back to readable files on load.
//!
//! # Invariants
//! - Sidecar filenames are `<hash8>.<ext>` where `hash8` is the first 8 hex
//!   chars of the SHA-256 of the file bytes.
//! - Staging rewrites widget paths to be document-relative.
//! - Resolution failures never abort a load; callers skip the widget.

use crate::model::document::NotebookDocument;
use crate::store::StoreResult;
use log::{info, warn};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Sidecar directory name, relative to the document file.
pub const SIDECAR_DIR: &str = "images";

const HASH_PREFIX_LEN: usize = 8;
const DEFAULT_EXTENSION: &str = "png";

/// Copies every referenced image into the sidecar directory and rewrites the
/// widgets' stored paths to `images/<hash8>.<ext>`.
///
/// A source that cannot be read is left untouched with a warning; the save
/// still proceeds so one broken path does not hold the document hostage.
pub fn stage_images(document: &mut NotebookDocument, doc_dir: &Path) -> StoreResult<()> {
    let sidecar = doc_dir.join(SIDECAR_DIR);
    let mut created_dir = false;

    for page in &mut document.pages {
        for widget in &mut page.image_widgets {
            let source = absolute_source(&widget.source_path, doc_dir);
            let bytes = match fs::read(&source) {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(
                        "event=image_stage module=store status=skipped path={} error={}",
                        source.display(),
                        err
                    );
                    continue;
                }
            };

            if !created_dir {
                fs::create_dir_all(&sidecar)?;
                created_dir = true;
            }

            let file_name = sidecar_file_name(&bytes, &source);
            let target = sidecar.join(&file_name);
            if !target.exists() {
                fs::write(&target, &bytes)?;
                info!(
                    "event=image_stage module=store status=copied file={file_name} bytes={}",
                    bytes.len()
                );
            }
            widget.source_path = PathBuf::from(SIDECAR_DIR).join(file_name);
        }
    }

    Ok(())
}

/// Deletes sidecar files not referenced by any image widget.
pub fn garbage_collect(document: &NotebookDocument, doc_dir: &Path) -> StoreResult<()> {
    let sidecar = doc_dir.join(SIDECAR_DIR);
    if !sidecar.is_dir() {
        return Ok(());
    }

    let referenced: HashSet<PathBuf> = document
        .pages
        .iter()
        .flat_map(|page| page.image_widgets.iter())
        .filter_map(|widget| widget.source_path.file_name().map(PathBuf::from))
        .collect();

    for entry in fs::read_dir(&sidecar)? {
        let entry = entry?;
        let name = PathBuf::from(entry.file_name());
        if referenced.contains(&name) {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => info!(
                "event=image_gc module=store status=removed file={}",
                name.display()
            ),
            Err(err) => warn!(
                "event=image_gc module=store status=error file={} error={}",
                name.display(),
                err
            ),
        }
    }

    Ok(())
}

/// Resolves a stored image path to an existing file.
///
/// Tried in order: the path as stored (relative paths join the document
/// directory), a same-named file beside the document, a same-named file in
/// the sidecar. Returns `None` when nothing resolves.
pub fn resolve_image_path(stored: &str, doc_dir: &Path) -> Option<PathBuf> {
    let stored_path = Path::new(stored);

    let direct = absolute_source(stored_path, doc_dir);
    if direct.is_file() {
        return Some(direct);
    }

    let file_name = stored_path.file_name()?;
    let beside_document = doc_dir.join(file_name);
    if beside_document.is_file() {
        return Some(beside_document);
    }

    let in_sidecar = doc_dir.join(SIDECAR_DIR).join(file_name);
    if in_sidecar.is_file() {
        return Some(in_sidecar);
    }

    None
}

fn absolute_source(path: &Path, doc_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        doc_dir.join(path)
    }
}

fn sidecar_file_name(bytes: &[u8], source: &Path) -> String {
    let digest = Sha256::digest(bytes);
    let hash8: String = digest
        .iter()
        .take(HASH_PREFIX_LEN / 2)
        .map(|byte| format!("{byte:02x}"))
        .collect();
    let extension = source
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    format!("{hash8}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::{resolve_image_path, sidecar_file_name, SIDECAR_DIR};
    use std::fs;
    use std::path::Path;

    #[test]
    fn sidecar_name_is_hash8_with_lowercased_extension() {
        let name = sidecar_file_name(b"pixels", Path::new("/tmp/Photo.PNG"));
        let (stem, ext) = name.split_once('.').unwrap();
        assert_eq!(stem.len(), 8);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(ext, "png");
    }

    #[test]
    fn identical_bytes_produce_identical_names() {
        let a = sidecar_file_name(b"same", Path::new("a.jpg"));
        let b = sidecar_file_name(b"same", Path::new("b.jpg"));
        assert_eq!(a, b);
    }

    #[test]
    fn resolution_falls_back_to_file_beside_document() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("photo.png"), b"x").unwrap();

        let resolved =
            resolve_image_path("/nonexistent/dir/photo.png", dir.path()).unwrap();
        assert_eq!(resolved, dir.path().join("photo.png"));
    }

    #[test]
    fn resolution_falls_back_to_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let sidecar = dir.path().join(SIDECAR_DIR);
        fs::create_dir_all(&sidecar).unwrap();
        fs::write(sidecar.join("deadbeef.png"), b"x").unwrap();

        let resolved = resolve_image_path("/gone/deadbeef.png", dir.path()).unwrap();
        assert_eq!(resolved, sidecar.join("deadbeef.png"));
    }

    #[test]
    fn unresolvable_path_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_image_path("missing.png", dir.path()).is_none());
    }
}
