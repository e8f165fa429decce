use super::*;
use crate::app::{Message, Model, ToastLevel, update};
use crate::store::MemoryStore;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::{Position, Rect};
use ratatui::style::Color;

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(80, 12);
    Terminal::new(backend).unwrap()
}

fn create_test_model(text: &str) -> Model {
    Model::new(text, Box::new(MemoryStore::new()), (80, 12))
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol().to_string())
        .collect()
}

#[test]
fn test_render_shows_text_and_preview() {
    let mut model = create_test_model("# Title");
    model.request_render();
    model.tick(16);

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    let content = screen_text(&terminal);
    assert!(content.contains("Markdown"));
    assert!(content.contains("# Title"));
    assert!(content.contains("Preview (light)"));
    assert!(content.contains("<h1>"));
}

#[test]
fn test_status_bar_shows_untitled_and_cursor() {
    let mut model = create_test_model("abc");
    update(&mut model, Message::MoveEnd);

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    let status = row_text(&terminal, 11);
    assert!(status.contains("untitled"));
    assert!(status.contains("Ln 1, Col 4"));
    assert!(status.contains("[light]"));
}

#[test]
fn test_toast_replaces_status_bar() {
    let mut model = create_test_model("");
    model.show_toast(ToastLevel::Info, "Copied!", 1_500);

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    let footer = row_text(&terminal, 11);
    assert!(footer.contains("[info] Copied!"));
    assert!(!footer.contains("untitled"));
}

#[test]
fn test_prompt_bar_is_shown() {
    let mut model = create_test_model("");
    update(&mut model, Message::OpenPrompt);
    update(&mut model, Message::PromptInput('a'));

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    assert!(row_text(&terminal, 11).starts_with("Open file: a"));
}

#[test]
fn test_editor_scroll_follows_cursor() {
    let text: String = (1..=30).map(|i| format!("line {i}\n")).collect();
    let mut model = create_test_model(&text);
    update(&mut model, Message::MoveToEnd);

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    // 12 rows: footer plus two border rows leaves nine visible lines.
    assert_eq!(model.editor_scroll, 31 - 9);
    assert!(screen_text(&terminal).contains("line 30"));

    update(&mut model, Message::MoveToStart);
    terminal.draw(|frame| render(&mut model, frame)).unwrap();
    assert_eq!(model.editor_scroll, 0);
}

#[test]
fn test_cursor_position_accounts_for_gutter() {
    let mut model = create_test_model("ab");
    update(&mut model, Message::MoveEnd);

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    // Border (1) + gutter "1 " (2) + "ab" (2)
    assert_eq!(terminal.get_cursor_position().unwrap(), Position::new(5, 1));
}

#[test]
fn test_dark_preview_title() {
    let mut model = create_test_model("x");
    update(&mut model, Message::ToggleTheme);

    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();
    assert!(screen_text(&terminal).contains("Preview (dark)"));
}

#[test]
fn test_html_line_spans_dims_markup() {
    let spans = html_line_spans("<p>hi <em>there</em></p>");
    let text: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, ["<p>", "hi ", "<em>", "there", "</em>", "</p>"]);
    assert_eq!(spans[0].style.fg, Some(Color::DarkGray));
    assert_eq!(spans[1].style.fg, None);
}

#[test]
fn test_html_line_spans_unterminated_tag() {
    let spans = html_line_spans("a <b");
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[1].content, "<b");
}

#[test]
fn test_split_panes_halves() {
    let panes = split_panes(Rect::new(0, 0, 80, 10));
    assert_eq!(panes[0].width, 40);
    assert_eq!(panes[1].width, 40);
}

#[test]
fn test_line_number_width() {
    assert_eq!(line_number_width(9), 1);
    assert_eq!(line_number_width(10), 2);
    assert_eq!(line_number_width(12_345), 5);
}
