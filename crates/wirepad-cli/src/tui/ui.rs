//! Rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::{App, InputMode, Modal};

/// Draw the whole frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_pad(frame, app, chunks[1]);
    draw_footer(frame, app, chunks[2]);

    if app.modal == Modal::ConfirmClear {
        draw_confirm_modal(frame, frame.area());
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.status.view();
    let (dot_style, label) = if view.is_online() {
        (Style::default().fg(Color::Green), view.label())
    } else {
        (Style::default().fg(Color::Red), view.label())
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.room_name()),
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Cyan),
        ),
        Span::styled("● ", dot_style),
        Span::raw(label),
    ];

    if app.saved_shown() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "Saved!",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_pad(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::Edit;

    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    // A visible cursor block while typing; remote updates are held off
    // exactly while it shows.
    let mut text = app.text.clone();
    if editing {
        text.push('█');
    }

    let pad = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" pad ")
                .border_style(border_style),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(pad, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.input_mode {
        InputMode::Browse => " i edit   Ctrl-S save   Ctrl-K clear   q quit",
        InputMode::Edit => " Esc stop editing   Ctrl-S save   Ctrl-K clear",
    };

    frame.render_widget(
        Paragraph::new(Span::styled(
            hints,
            Style::default().add_modifier(Modifier::DIM),
        )),
        area,
    );
}

fn draw_confirm_modal(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(50, 30, area);
    frame.render_widget(Clear, popup_area);

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from("Are you sure? This deletes the history"),
        Line::from("for this room."),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] ", Style::default().fg(Color::Yellow)),
            Span::raw("clear   "),
            Span::styled("[n] ", Style::default().fg(Color::Yellow)),
            Span::raw("keep"),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Clear room ")
            .border_style(Style::default().fg(Color::Red)),
    )
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    frame.render_widget(content, popup_area);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
