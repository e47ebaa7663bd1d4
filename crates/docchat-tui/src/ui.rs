use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use docchat_core::{ChatMessage, ChatRole};

use crate::app::{App, Screen};

/// Render `**bold**` runs; an unclosed marker stays literal
fn parse_markdown_line(text: &str) -> Line<'static> {
    if text.is_empty() {
        return Line::default();
    }

    let parts: Vec<&str> = text.split("**").collect();
    // An even count means the last marker had no partner
    let closed = parts.len() % 2 == 1;

    let mut spans: Vec<Span<'static>> = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        let is_bold = i % 2 == 1;
        let unclosed_tail = !closed && i == parts.len() - 1;

        if unclosed_tail {
            spans.push(Span::raw(format!("**{}", part)));
        } else if is_bold && !part.is_empty() {
            spans.push(Span::styled(
                part.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        } else if !part.is_empty() {
            spans.push(Span::raw(part.to_string()));
        }
    }

    Line::from(spans)
}

/// Slice of `input` that fits in `width` columns with the cursor visible,
/// plus the cursor's column inside that slice
pub fn visible_input(input: &str, cursor: usize, width: usize) -> (String, usize) {
    if width == 0 {
        return (String::new(), 0);
    }

    // Keep one column for the cursor past the last character
    let offset = cursor.saturating_sub(width.saturating_sub(1));
    let visible: String = input.chars().skip(offset).take(width).collect();
    (visible, cursor - offset)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen() {
        Screen::Upload => render_upload(app, frame, body_area),
        Screen::Chat => render_chat(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = match app.session.document() {
        Some(doc) => Line::from(vec![
            Span::styled("Chat with: ", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            Span::styled(doc.to_string(), Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD)),
        ]),
        None => Line::from(Span::styled(
            "Document Intelligence",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
    };

    let header = Paragraph::new(title)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(Color::DarkGray)));

    frame.render_widget(header, area);
}

fn render_upload(app: &mut App, frame: &mut Frame, area: Rect) {
    let [status_area, input_area] = Layout::vertical([
        Constraint::Min(4),
        Constraint::Length(3),
    ])
    .areas(area);

    let (border_color, lines) = if app.session.is_pending() {
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        (
            Color::Blue,
            vec![
                Line::from(Span::styled(
                    format!("Processing{}", dots),
                    Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled("This may take a moment.", Style::default().fg(Color::DarkGray))),
            ],
        )
    } else if let Some(error) = app.session.upload_error() {
        (
            Color::Red,
            vec![
                Line::from(Span::styled(
                    "Upload Failed",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(error.to_string(), Style::default().fg(Color::Red))),
                Line::default(),
                Line::from(Span::styled("Please try another file.", Style::default().fg(Color::DarkGray))),
            ],
        )
    } else {
        (
            Color::DarkGray,
            vec![
                Line::from("Upload a PDF and ask questions about its content."),
                Line::default(),
                Line::from("Type a path below, or drop a file onto the terminal."),
                Line::from(Span::styled("Only .pdf files are supported", Style::default().fg(Color::DarkGray))),
            ],
        )
    };

    let status = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(" Upload "),
        );
    frame.render_widget(status, status_area);

    render_input(app, frame, input_area, " Path to a PDF, then Enter ", "");
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(3),
    ])
    .areas(area);

    // Inner size minus borders, for scroll calculations
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);
    app.apply_pending_scroll();

    let error_reply = app.last_assistant_is_error();
    let count = app.session.messages().len();
    let mut lines: Vec<Line> = Vec::new();
    for (i, msg) in app.session.messages().iter().enumerate() {
        let is_error = error_reply && i + 1 == count;
        lines.extend(chat_lines(msg, is_error));
    }

    if app.session.is_pending() {
        lines.push(Line::from(Span::styled(
            "AI:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)))
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    render_input(app, frame, input_area, " Ask ", "Ask anything about your document...");
}

/// Label, body and a blank separator for one message
fn chat_lines(msg: &ChatMessage, is_error: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    match msg.role {
        ChatRole::User => {
            lines.push(Line::from(Span::styled(
                "You:",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
            for line in msg.content.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
        ChatRole::Assistant => {
            lines.push(Line::from(Span::styled(
                "AI:",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            for line in msg.content.lines() {
                if is_error {
                    lines.push(Line::from(Span::styled(line.to_string(), Style::default().fg(Color::Red))));
                } else {
                    lines.push(parse_markdown_line(line));
                }
            }
        }
    }

    lines.push(Line::default());
    lines
}

fn render_input(app: &App, frame: &mut Frame, area: Rect, title: &str, placeholder: &str) {
    let enabled = app.input_enabled();
    let border_color = if enabled { Color::Yellow } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title.to_string());

    let inner_width = area.width.saturating_sub(2) as usize;
    let (visible, cursor_col) = visible_input(&app.input, app.cursor, inner_width);

    let content = if app.input.is_empty() {
        Line::from(Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray)))
    } else {
        let style = if enabled { Style::default() } else { Style::default().fg(Color::DarkGray) };
        Line::from(Span::styled(visible, style))
    };

    frame.render_widget(Paragraph::new(content).block(block), area);

    if enabled {
        frame.set_cursor_position((area.x + 1 + cursor_col as u16, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match app.screen() {
        Screen::Upload => "Enter: upload  Esc: quit",
        Screen::Chat => "Enter: send  PgUp/PgDn: scroll  Esc: quit",
    };

    let footer = Line::from(vec![
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled(app.api_url().to_string(), Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)),
    ]);

    frame.render_widget(Paragraph::new(footer), area);
}
