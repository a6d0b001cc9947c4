use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::task::Task;

use super::app::{AppState, StatusKind};

const MARKER_OPEN: &str = "[ ]";
const MARKER_DONE: &str = "[x]";
const COMPLETED_LABEL: &str = "Completed";
const HOST_WIDTH: usize = 24;
const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_BG_MUTED: Color = Color::Rgb(52, 56, 60);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER_LIST: Color = Color::Rgb(92, 126, 166);
const COLOR_MAGENTA: Color = Color::Rgb(214, 140, 230);

pub fn render(frame: &mut Frame, app: &AppState) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(area);

    render_header(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &AppState, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            "tabq",
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.task_count_summary(), Style::default().fg(COLOR_MUTED)),
    ]);
    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(COLOR_BG_MUTED)),
    );
    frame.render_widget(widget, area);
}

fn render_list(frame: &mut Frame, app: &AppState, area: Rect) {
    let content_width = area.width.saturating_sub(2) as usize;
    let mut lines = Vec::new();

    if app.tasks.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "No tasks. Press s to capture the open tabs.",
            Style::default().fg(COLOR_MUTED),
        )));
    } else {
        let list_height = area.height.saturating_sub(2) as usize;
        let (start, end) = list_window(app.tasks.len(), app.selected, list_height);
        let grabbed = app
            .move_gesture
            .as_ref()
            .map(|gesture| gesture.task_id.as_str());
        for idx in start..end {
            let task = &app.tasks[idx];
            lines.push(render_list_row(
                task,
                app.selected == Some(idx),
                grabbed == Some(task.id.as_str()),
                content_width,
            ));
        }
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Tasks")
            .border_style(Style::default().fg(COLOR_BORDER_LIST)),
    );
    frame.render_widget(widget, area);
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let hint_span = Span::styled(app.footer_hint(), Style::default().fg(COLOR_INFO));
    let line = if let Some((status, kind)) = app.status_line() {
        let status_style = match kind {
            StatusKind::Error => Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(COLOR_WARNING),
        };
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(status, status_style),
        ])
    } else {
        Line::from(hint_span)
    };
    let widget = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(COLOR_BORDER_LIST)),
    );
    frame.render_widget(widget, area);
}

fn render_list_row(task: &Task, selected: bool, grabbed: bool, width: usize) -> Line<'static> {
    let completed = task.is_completed();
    let marker = if completed { MARKER_DONE } else { MARKER_OPEN };
    let label = if completed {
        COMPLETED_LABEL.to_string()
    } else {
        " ".repeat(COMPLETED_LABEL.len())
    };
    let host = pad_text(&host_text(&task.url), HOST_WIDTH);

    let used = 2 + marker.len() + 1 + HOST_WIDTH + 1 + COMPLETED_LABEL.len() + 1;
    let title_width = width.saturating_sub(used);
    let title = pad_text(task.display_title(), title_width);

    let marker_style = if completed {
        Style::default().fg(COLOR_MUTED)
    } else {
        Style::default().fg(COLOR_SUCCESS)
    };
    let title_style = if completed {
        Style::default()
            .fg(COLOR_MUTED_DARK)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(COLOR_TEXT)
    };

    let mut spans = vec![
        Span::styled(
            if grabbed { ">" } else { " " },
            Style::default()
                .fg(COLOR_MAGENTA)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(marker, marker_style),
        Span::raw(" "),
        Span::styled(title, title_style),
        Span::raw(" "),
        Span::styled(host, Style::default().fg(COLOR_INFO)),
        Span::raw(" "),
        Span::styled(label, Style::default().fg(COLOR_MUTED)),
    ];

    if selected {
        for span in &mut spans {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }

    Line::from(spans)
}

fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0);
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn host_text(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_default()
}

fn pad_text(value: &str, width: usize) -> String {
    let mut text = value.to_string();
    if text.chars().count() > width {
        text = truncate_text(&text, width);
    }
    format!("{text:width$}")
}

fn truncate_text(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return chars[..max].iter().collect();
    }
    let mut out: String = chars[..(max - 3)].iter().collect();
    out.push_str("...");
    out
}
