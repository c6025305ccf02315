//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `inkbook_core` linkage.
//! - Print a deterministic summary of a `.notebook` file for quick local
//!   sanity checks, without touching the sidecar.

use std::process::ExitCode;

fn main() -> ExitCode {
    println!("inkbook_core version={}", inkbook_core::core_version());

    let Some(path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match inkbook_core::store::load(&path) {
        Ok(document) => {
            println!("document version={}", document.version);
            println!("pages={}", document.pages.len());
            for page in &document.pages {
                println!(
                    "page {} name={:?} side={:?} text_widgets={} image_widgets={}",
                    page.number,
                    page.name,
                    page.side,
                    page.text_widgets.len(),
                    page.image_widgets.len()
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("cannot load `{path}`: {err}");
            ExitCode::FAILURE
        }
    }
}
