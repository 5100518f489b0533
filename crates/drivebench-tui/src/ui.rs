//! UI rendering with Ratatui.

use crate::app::{App, AppState, Focus, InputMode};
use drivebench_core::{format_file_size, DriveItem, UploadStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

const HELP_LINE: &str = "Tab: focus | Enter: open/upload | n: new folder | d: delete | a: add \
                         | U: upload all | x: remove | C: clear | q: quit";

/// Main render function.
pub fn render(frame: &mut Frame, app: &App) {
    if app.state == AppState::Quit {
        return;
    }

    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Auth bar
            Constraint::Min(5),    // Explorer + queue
            Constraint::Length(1), // Help / status line
        ])
        .split(area);

    render_auth_bar(frame, app, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    render_explorer(frame, app, columns[0]);
    render_queue(frame, app, columns[1]);
    render_footer(frame, app, rows[2]);

    match app.input_mode {
        InputMode::NewFolder => {
            render_prompt(frame, app, " 📁 New Folder ", "Folder name:", area)
        }
        InputMode::AddFile => {
            render_prompt(frame, app, " ➕ Add File ", "Path to an image:", area)
        }
        InputMode::ConfirmDelete => render_delete_dialog(frame, app, area),
        InputMode::Normal => {}
    }
}

fn render_auth_bar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" ☁ Drivebench ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let session = app.workbench.session();
    let line = match session.user.filter(|_| session.authenticated) {
        Some(user) => Line::from(vec![
            Span::styled("● ", Style::default().fg(Color::Green)),
            Span::styled(user.name, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" <{}>", user.email), Style::default().fg(Color::DarkGray)),
            Span::styled("   S: sign out", Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(vec![
            Span::styled("○ ", Style::default().fg(Color::DarkGray)),
            Span::styled("Not signed in", Style::default().fg(Color::Yellow)),
            Span::styled("   s: sign in", Style::default().fg(Color::DarkGray)),
        ]),
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Render breadcrumbs and the current folder listing.
fn render_explorer(frame: &mut Frame, app: &App, area: Rect) {
    let border_color = focus_color(app, Focus::Explorer);
    let block = Block::default()
        .title(" 📂 Explorer ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !app.workbench.is_authenticated() {
        render_placeholder(frame, "Sign in to browse your drive", inner);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let navigation = app.workbench.navigation();
    let entries = navigation.path().entries();
    let mut crumbs = Vec::with_capacity(entries.len() * 2);
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            crumbs.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        }
        let style = if i + 1 == entries.len() {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        crumbs.push(Span::styled(format!("{} {}", i + 1, entry.name), style));
    }
    frame.render_widget(Paragraph::new(Line::from(crumbs)), chunks[0]);

    let loading = app.workbench.is_loading();
    let items = match navigation.current_folder() {
        Some(folder) => &folder.items,
        None if loading => {
            render_placeholder(frame, "Loading...", chunks[1]);
            return;
        }
        None => {
            render_placeholder(frame, "Press r to load this folder", chunks[1]);
            return;
        }
    };
    if items.is_empty() {
        let message = if loading { "Loading..." } else { "This folder is empty" };
        render_placeholder(frame, message, chunks[1]);
        return;
    }

    let rows: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == app.explorer_selected_index && app.focus == Focus::Explorer {
                Style::default()
                    .bg(Color::Rgb(60, 60, 80))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else if item.is_folder() {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };

            let size = item.size_bytes().map(format_file_size).unwrap_or_default();
            let line = Line::from(vec![
                Span::raw(format!("{} ", item_icon(item))),
                Span::raw(item.name.clone()),
                Span::styled(format!("  {size}"), Style::default().fg(Color::DarkGray)),
            ]);
            ListItem::new(line).style(style)
        })
        .collect();

    frame.render_widget(List::new(rows), chunks[1]);
}

/// Render the upload queue with per-task progress.
fn render_queue(frame: &mut Frame, app: &App, area: Rect) {
    let border_color = focus_color(app, Focus::Queue);
    let block = Block::default()
        .title(" ⬆ Upload Queue ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let tasks = app.tasks();
    if tasks.is_empty() {
        render_placeholder(frame, "Press a to add image files", inner);
        return;
    }

    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(tasks.iter().map(|_| Constraint::Length(2)));
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let summary = Paragraph::new(app.workbench.queue_summary())
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(summary, chunks[0]);

    for (i, task) in tasks.iter().enumerate() {
        let slot = chunks[i + 1];
        if slot.height == 0 {
            break;
        }
        let selected = i == app.queue_selected_index && app.focus == Focus::Queue;
        let name_style = if selected {
            Style::default()
                .bg(Color::Rgb(60, 60, 80))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let header = Line::from(vec![
            Span::styled(format!("🖼 {}", task.name), name_style),
            Span::styled(
                format!("  {}  ", format_file_size(task.size_bytes)),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(task.status.label(), Style::default().fg(status_color(&task.status))),
        ]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(slot);
        frame.render_widget(Paragraph::new(header), rows[0]);

        match &task.status {
            UploadStatus::Uploading { progress } => {
                let gauge = Gauge::default()
                    .gauge_style(Style::default().fg(Color::Cyan))
                    .ratio((progress / 100.0).clamp(0.0, 1.0))
                    .label(format!("{}%", progress.round()));
                frame.render_widget(gauge, rows[1]);
            }
            UploadStatus::Error { message } => {
                let error = Paragraph::new(message.as_str())
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: true });
                frame.render_widget(error, rows[1]);
            }
            UploadStatus::Success { .. } | UploadStatus::Pending => {}
        }
    }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let text = match &app.status_message {
        Some(message) => Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(HELP_LINE, Style::default().fg(Color::DarkGray))),
    };
    frame.render_widget(Paragraph::new(text), area);
}

/// Render a one-line text prompt.
fn render_prompt(frame: &mut Frame, app: &App, title: &str, label: &str, area: Rect) {
    let dialog_width = 50.min(area.width.saturating_sub(4));
    let dialog_area = centered_rect(dialog_width, 6, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(Paragraph::new(label).style(Style::default().fg(Color::White)), chunks[0]);
    frame.render_widget(
        Paragraph::new(format!("▸ {}_", app.input)).style(Style::default().fg(Color::Yellow)),
        chunks[1],
    );
    frame.render_widget(
        Paragraph::new("Enter: confirm | Esc: cancel").style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn render_delete_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let Some(target) = &app.delete_target else {
        return;
    };

    let dialog_width = 56.min(area.width.saturating_sub(4));
    let dialog_area = centered_rect(dialog_width, 7, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(format!(" 🗑 {} ", target.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let mut lines = vec![Line::from(format!(
        "Are you sure you want to delete \"{}\"?",
        target.name
    ))];
    if let Some(warning) = target.warning() {
        lines.push(Line::from(Span::styled(warning, Style::default().fg(Color::Red))));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "y: delete | n: cancel",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn render_placeholder(frame: &mut Frame, message: &str, area: Rect) {
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, centered_rect(area.width, 1, area));
}

fn focus_color(app: &App, focus: Focus) -> Color {
    if app.focus == focus && app.input_mode == InputMode::Normal {
        Color::Cyan
    } else {
        Color::DarkGray
    }
}

fn status_color(status: &UploadStatus) -> Color {
    match status {
        UploadStatus::Pending => Color::DarkGray,
        UploadStatus::Uploading { .. } => Color::Cyan,
        UploadStatus::Success { .. } => Color::Green,
        UploadStatus::Error { .. } => Color::Red,
    }
}

/// Icon for a listing row, chosen by kind and MIME type.
fn item_icon(item: &DriveItem) -> &'static str {
    match item.mime_type() {
        None => "📁",
        Some(mime) if mime.starts_with("image/") => "🖼",
        Some(mime) if mime.contains("pdf") => "📕",
        Some(mime) if mime.contains("word") || mime.starts_with("text/") => "📄",
        Some(mime) if mime.contains("excel") || mime.contains("sheet") => "📊",
        Some(mime) if mime.contains("powerpoint") || mime.contains("presentation") => "📽",
        Some(_) => "📎",
    }
}

/// Helper to create a centered rectangle.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
