//! Popup rendering

use ratatui::{prelude::*, widgets::*};
use shared::Severity;
use tui_input::Input;
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::app::App;
use crate::state::{Focus, PopupState};

pub fn draw(f: &mut Frame, app: &App) {
    let state = &app.state;
    let add_form_height = if state.is_add_form_open() { 3 } else { 0 };
    let option_rows = state.options().len() as u16 + 2;
    // Error messages carry multi-line remediation text
    let status_height = match state.status() {
        Some(status) if status.severity == Severity::Error => 12,
        Some(_) => 3,
        None => 0,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),               // Header
            Constraint::Length(option_rows),     // Label type selector
            Constraint::Length(add_form_height), // Add form
            Constraint::Length(3),               // SKU + copies
            Constraint::Length(3),               // Print button
            Constraint::Length(status_height),   // Status banner
            Constraint::Min(3),                  // Logs
            Constraint::Length(1),               // Help
        ])
        .split(f.area());

    draw_header(f, chunks[0]);
    draw_selector(f, state, chunks[1]);

    if state.is_add_form_open() {
        draw_input(
            f,
            &state.new_category,
            " New label type (Enter to save, Esc to cancel) ",
            state.focus() == Focus::NewCategory,
            chunks[2],
        );
    }

    let fields = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(12)])
        .split(chunks[3]);
    draw_input(f, &state.sku, " SKU ", state.focus() == Focus::Sku, fields[0]);
    draw_input(
        f,
        &state.copies,
        " Copies ",
        state.focus() == Focus::Copies,
        fields[1],
    );

    draw_print_button(f, state, chunks[4]);
    draw_status(f, state, chunks[5]);

    // Logs (TuiLoggerWidget)
    let logs = TuiLoggerWidget::default()
        .block(
            Block::default()
                .title(" Logs ")
                .border_style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::DIM),
                )
                .borders(Borders::ALL),
        )
        .output_separator('|')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style(Style::default().fg(Color::White))
        .state(&app.logger_state);
    f.render_widget(logs, chunks[6]);

    let help = Paragraph::new("Tab/Shift-Tab move | Up/Down choose | Enter print | Esc quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right);
    f.render_widget(help, chunks[7]);
}

fn draw_header(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::raw(" DYMO Label Printer "),
        Span::styled(" SKU barcode labels ", Style::default().fg(Color::Yellow)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(title, area);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn draw_selector(f: &mut Frame, state: &PopupState, area: Rect) {
    let items: Vec<ListItem> = state
        .options()
        .iter()
        .map(|option| {
            let style = if option.is_add_new() {
                Style::default().fg(Color::Green)
            } else if option.value().is_empty() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(option.label(), style))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Label type ")
                .borders(Borders::ALL)
                .border_style(focus_style(state.focus() == Focus::Category)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut list_state = ListState::default().with_selected(Some(state.selected_index()));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_input(f: &mut Frame, input: &Input, title: &str, focused: bool, area: Rect) {
    let width = area.width.max(3) - 3;
    let scroll = input.visual_scroll(width as usize);
    let paragraph = Paragraph::new(input.value())
        .style(focus_style(focused))
        .scroll((0, scroll as u16))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(paragraph, area);

    // Cursor
    if focused {
        f.set_cursor_position((
            area.x + ((input.visual_cursor().max(scroll) - scroll) as u16) + 1,
            area.y + 1,
        ));
    }
}

fn draw_print_button(f: &mut Frame, state: &PopupState, area: Rect) {
    let (text, style) = if state.is_printing() {
        (" Printing... ", Style::default().fg(Color::DarkGray))
    } else if state.focus() == Focus::Print {
        (
            " Print Label ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            " Print Label ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    };

    let button = Paragraph::new(Span::styled(text, style))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(state.focus() == Focus::Print)),
        );
    f.render_widget(button, area);
}

fn draw_status(f: &mut Frame, state: &PopupState, area: Rect) {
    let Some(status) = state.status() else {
        return;
    };

    let color = match status.severity {
        Severity::Success => Color::Green,
        Severity::Info => Color::Blue,
        Severity::Error => Color::Red,
    };

    let banner = Paragraph::new(status.message.as_str())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {} ", status.severity))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(banner, area);
}
