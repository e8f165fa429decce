use gitmd::app::{Message, Model, update};
use gitmd::render::MarkdownRenderer;
use gitmd::store::{FileStore, KeyValueStore, MemoryStore, Persistence, SNAPSHOT_KEY};
use proptest::prelude::*;

proptest! {
    #[test]
    fn render_is_deterministic(text in "\\PC{0,200}") {
        let renderer = MarkdownRenderer::default();
        let first = renderer.render(&text);
        let second = renderer.render(&text);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn rendered_html_never_contains_script(body in "[a-z ]{0,20}") {
        let renderer = MarkdownRenderer::default();
        let text = format!("# Title\n\n<script>{body}</script>\n<img src=x onerror=\"{body}\">");
        let html = renderer.render(&text).unwrap();
        prop_assert!(!html.contains("<script"));
        prop_assert!(!html.contains("onerror"));
    }

    #[test]
    fn snapshot_round_trips(text in "\\PC{0,300}") {
        let mut persistence = Persistence::new(MemoryStore::new());
        prop_assert!(persistence.save(&text));
        prop_assert_eq!(persistence.restore(), Some(text));
    }
}

#[test]
fn test_render_heading_and_list() {
    let html = MarkdownRenderer::default()
        .render("# Title\n\n- a\n- b")
        .unwrap();
    assert!(html.contains("<h1>"));
    assert_eq!(html.matches("<li>").count(), 2);
}

#[test]
fn test_script_is_stripped_with_content() {
    let html = MarkdownRenderer::default()
        .render("before\n\n<script>alert(1)</script>\n\nafter")
        .unwrap();
    assert!(!html.contains("script"));
    assert!(!html.contains("alert"));
    assert!(html.contains("before"));
    assert!(html.contains("after"));
}

#[test]
fn test_restore_on_empty_store_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = Persistence::new(FileStore::open(dir.path().join("storage.json")).unwrap());
    assert_eq!(persistence.restore(), None);
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");

    let mut persistence = Persistence::new(FileStore::open(&path).unwrap());
    assert!(persistence.save("# Kept\n"));
    drop(persistence);

    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get(SNAPSHOT_KEY).unwrap().as_deref(), Some("# Kept\n"));
}

#[test]
fn test_typing_session_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let store = FileStore::open(&path).unwrap();
    let mut model = Model::restore(Box::new(store), (100, 30));
    update(&mut model, Message::Clear);
    model.tick(16);
    assert_eq!(model.render_cycles(), 1);

    for ch in "```rust\nfn main() {}\n```".chars() {
        if ch == '\n' {
            update(&mut model, Message::SplitLine);
        } else {
            update(&mut model, Message::InsertChar(ch));
        }
    }
    assert!(!model.tick(31));
    assert!(model.tick(32));
    assert_eq!(model.render_cycles(), 2);
    assert!(model.preview.html().contains("hl-code"));

    let model = Model::restore(Box::new(FileStore::open(&path).unwrap()), (100, 30));
    assert_eq!(model.editor.text(), "```rust\nfn main() {}\n```");
}
