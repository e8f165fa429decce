use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::Model;

use super::{EDITOR_WIDTH_PERCENT, PREVIEW_WIDTH_PERCENT, status};

pub fn split_panes(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(EDITOR_WIDTH_PERCENT),
            Constraint::Percentage(PREVIEW_WIDTH_PERCENT),
        ])
        .split(area)
}

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();
    let main_area = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let footer_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };

    let panes = split_panes(main_area);
    render_editor(model, frame, panes[0]);
    render_preview(model, frame, panes[1]);

    if model.prompt.is_some() {
        status::render_prompt_bar(model, frame, footer_area);
    } else if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, footer_area);
    } else {
        status::render_status_bar(model, frame, footer_area);
    }
}

fn render_editor(model: &mut Model, frame: &mut Frame, area: Rect) {
    let block = Block::default().title(" Markdown ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let buf = &model.editor;
    let total_lines = buf.line_count();
    let gutter_width = line_number_width(total_lines);
    let visible_height = inner.height as usize;
    let cursor = buf.cursor();

    // Keep the cursor line on screen.
    if cursor.line < model.editor_scroll {
        model.editor_scroll = cursor.line;
    } else if visible_height > 0 && cursor.line >= model.editor_scroll + visible_height {
        model.editor_scroll = cursor.line + 1 - visible_height;
    }
    let start = model.editor_scroll;
    let end = (start + visible_height).min(total_lines);

    let buf = &model.editor;
    let mut content: Vec<Line> = Vec::with_capacity(end.saturating_sub(start));
    for line_idx in start..end {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let line_num = format!("{:>width$} ", line_idx + 1, width = gutter_width as usize);
        content.push(Line::from(vec![
            Span::styled(line_num, Style::default().fg(Color::DarkGray)),
            Span::raw(line_text),
        ]));
    }
    frame.render_widget(Paragraph::new(content), inner);

    if model.prompt.is_none() && (start..end).contains(&cursor.line) {
        let line_text = buf.line_at(cursor.line).unwrap_or_default();
        let prefix: String = line_text.chars().take(cursor.col).collect();
        let x = inner.x + gutter_width + 1 + display_width(&prefix);
        let y = inner.y + u16::try_from(cursor.line - start).unwrap_or(u16::MAX);
        if x < inner.right() && y < inner.bottom() {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let theme = if model.preview.is_dark() { "dark" } else { "light" };
    let title = if model.render_pending() {
        format!(" Preview ({theme}) … ")
    } else {
        format!(" Preview ({theme}) ")
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let content: Vec<Line> = model
        .preview
        .html()
        .lines()
        .skip(model.preview_scroll)
        .take(inner.height as usize)
        .map(|line| Line::from(html_line_spans(line)))
        .collect();
    frame.render_widget(Paragraph::new(content), inner);
}

/// Split an HTML line into markup and text spans, dimming the markup.
pub fn html_line_spans(line: &str) -> Vec<Span<'static>> {
    let tag_style = Style::default().fg(Color::DarkGray);
    let mut spans = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find('<') {
        if open > 0 {
            spans.push(Span::raw(rest[..open].to_string()));
        }
        let tail = &rest[open..];
        let close = tail.find('>').map_or(tail.len(), |i| i + 1);
        spans.push(Span::styled(tail[..close].to_string(), tag_style));
        rest = &tail[close..];
    }
    if !rest.is_empty() {
        spans.push(Span::raw(rest.to_string()));
    }
    spans
}

fn display_width(text: &str) -> u16 {
    u16::try_from(unicode_width::UnicodeWidthStr::width(text)).unwrap_or(u16::MAX)
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
