use inkbook_core::model::widget::TextWidget;
use inkbook_core::store;
use inkbook_core::{FormatTag, NotebookDocument, Rect, FORMAT_VERSION};
use std::fs;

#[test]
fn hello_document_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.notebook");

    let mut document = NotebookDocument::new();
    let mut widget = TextWidget::from_selection(Rect::new(10, 10, 200, 100));
    widget.content.set_plain("Hello");
    document.page_mut(0).unwrap().add_text(widget);

    store::save(&mut document, &path).unwrap();
    let loaded = store::load(&path).unwrap();

    assert_eq!(loaded.version, FORMAT_VERSION);
    assert_eq!(loaded.pages.len(), 2);

    let page = loaded.page(0).unwrap();
    assert_eq!(page.text_widgets.len(), 1);
    let restored = &page.text_widgets[0];
    assert_eq!(restored.frame, Rect::new(10, 10, 200, 100));
    assert_eq!(restored.content.content(), "Hello");
    assert_eq!(restored.content.runs().len(), 1);
    assert!(restored.content.runs()[0].tags.is_empty());
}

#[test]
fn formatted_runs_survive_the_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("formatted.notebook");

    let mut document = NotebookDocument::new();
    let mut widget = TextWidget::from_selection(Rect::new(20, 20, 300, 120));
    widget.content.set_plain("hello world");
    widget.content.apply_tag(0, 5, FormatTag::Bold);
    widget.content.apply_tag(6, 11, FormatTag::Size(24));
    document.page_mut(1).unwrap().add_text(widget);

    store::save(&mut document, &path).unwrap();
    let loaded = store::load(&path).unwrap();

    let restored = &loaded.page(1).unwrap().text_widgets[0].content;
    assert_eq!(restored.content(), "hello world");
    assert!(restored.range_has_tag(0, 5, FormatTag::Bold));
    assert!(restored.range_has_tag(6, 11, FormatTag::Size(24)));
    assert!(!restored.range_has_tag(5, 6, FormatTag::Bold));
}

#[test]
fn save_load_save_produces_identical_files() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.notebook");
    let second = dir.path().join("second.notebook");

    let mut document = NotebookDocument::new();
    let mut widget = TextWidget::from_selection(Rect::new(10, 10, 200, 100));
    widget.content.set_plain("stable");
    document.page_mut(0).unwrap().add_text(widget);

    store::save(&mut document, &first).unwrap();
    let mut reloaded = store::load(&first).unwrap();
    store::save(&mut reloaded, &second).unwrap();

    let first_json = fs::read_to_string(&first).unwrap();
    let second_json = fs::read_to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn v1_file_migrates_to_current_format_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.notebook");
    fs::write(
        &path,
        r##"{
            "version": 1,
            "pages": [
                {
                    "page_number": 0,
                    "name": "Page 1",
                    "is_left_page": true,
                    "textboxes": [{
                        "id": "3f6c0f44-6f1e-4c6e-9b6e-5a4f1dfe0b51",
                        "type": "text_widget",
                        "x": 10, "y": 10, "width": 200, "height": 100,
                        "text": "legacy body",
                        "properties": { "page_color": "#c1a273" }
                    }],
                    "images": []
                },
                {
                    "page_number": 1,
                    "name": "Page 2",
                    "is_left_page": false,
                    "textboxes": [],
                    "images": []
                }
            ]
        }"##,
    )
    .unwrap();

    let loaded = store::load(&path).unwrap();
    assert_eq!(loaded.version, FORMAT_VERSION);

    let restored = &loaded.page(0).unwrap().text_widgets[0];
    assert_eq!(restored.content.content(), "legacy body");
    assert_eq!(restored.content.runs().len(), 1);
    assert!(restored.content.runs()[0].tags.is_empty());
    assert_eq!(restored.page_color, "#c1a273");
}

#[test]
fn newer_format_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.notebook");
    fs::write(&path, r#"{ "version": 99, "pages": [] }"#).unwrap();

    let err = store::load(&path).unwrap_err();
    assert!(matches!(
        err,
        store::StoreError::UnsupportedVersion { found: 99, .. }
    ));
}

#[test]
fn unresolvable_image_is_dropped_but_the_document_still_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.notebook");
    fs::write(
        &path,
        r##"{
            "version": 2,
            "metadata": {
                "created": "2026-01-05T10:00:00Z",
                "modified": "2026-01-05T10:00:00Z",
                "app_version": "0.2.0",
                "min_compatible_version": 1
            },
            "pages": [
                {
                    "page_number": 0,
                    "name": "Page 1",
                    "is_left_page": true,
                    "textboxes": [{
                        "id": "3f6c0f44-6f1e-4c6e-9b6e-5a4f1dfe0b51",
                        "type": "text_widget",
                        "x": 10, "y": 10, "width": 200, "height": 100,
                        "text": { "content": "kept", "segments": [{ "text": "kept", "tags": [] }] },
                        "properties": { "page_color": "#c1a273" }
                    }],
                    "images": [{
                        "id": "90b1f1a6-18a2-4e2b-aba0-7cf2f9d1a111",
                        "type": "image_widget",
                        "x": 50, "y": 50, "width": 120, "height": 90,
                        "image_path": "images/feedface.png"
                    }]
                },
                {
                    "page_number": 1,
                    "name": "Page 2",
                    "is_left_page": false,
                    "textboxes": [],
                    "images": []
                }
            ]
        }"##,
    )
    .unwrap();

    let loaded = store::load(&path).unwrap();
    let page = loaded.page(0).unwrap();
    assert_eq!(page.text_widgets.len(), 1);
    assert!(page.image_widgets.is_empty());
}

#[test]
fn odd_page_count_is_padded_to_a_full_spread() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("odd.notebook");
    fs::write(
        &path,
        r#"{
            "version": 2,
            "metadata": {
                "created": "2026-01-05T10:00:00Z",
                "modified": "2026-01-05T10:00:00Z",
                "app_version": "0.2.0",
                "min_compatible_version": 1
            },
            "pages": [
                { "page_number": 0, "name": "Only", "is_left_page": true, "textboxes": [], "images": [] }
            ]
        }"#,
    )
    .unwrap();

    let loaded = store::load(&path).unwrap();
    assert_eq!(loaded.pages.len(), 2);
    assert_eq!(loaded.pages[0].name, "Only");
}
