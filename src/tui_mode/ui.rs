use super::app::App;
use super::helpers::{format_with_spaces, highlight_expression, wrap_text};
use crate::render_help::render_help;
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use shellcalc::environment::format_number;
use shellcalc::preprocess::Substitution;
use shellcalc::{Reply, Session};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const MIN_TERMINAL_WIDTH: u16 = 50;
const MIN_TERMINAL_HEIGHT: u16 = 10;

pub fn run_ui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            if app.show_help {
                render_help(f, app);
            } else {
                ui(f, app);
            }
        })?;

        if app.should_quit {
            break;
        }

        if crossterm::event::poll(Duration::from_millis(50))? {
            match crossterm::event::read()? {
                Event::Key(KeyEvent { code, modifiers, kind, .. }) if kind == KeyEventKind::Press => {
                    handle_key_event(app, code, modifiers);
                }
                Event::Mouse(event) => {
                    handle_mouse_event(app, event);
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if app.show_help {
        match code {
            KeyCode::Down => app.help_scroll = app.help_scroll.saturating_add(1),
            KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
            KeyCode::PageDown => app.help_scroll = app.help_scroll.saturating_add(10),
            KeyCode::PageUp => app.help_scroll = app.help_scroll.saturating_sub(10),
            KeyCode::Esc | KeyCode::F(1) => {
                app.show_help = false;
                app.help_scroll = 0;
            }
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Char('c') | KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('u') | KeyCode::Char('U') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_input();
        }
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            let byte_idx = App::char_index_to_byte_index(&app.input, app.cursor_position);
            app.input.insert(byte_idx, c);
            app.cursor_position += 1;
        }
        KeyCode::Backspace if app.cursor_position > 0 => {
            app.cursor_position -= 1;
            let byte_idx = App::char_index_to_byte_index(&app.input, app.cursor_position);
            app.input.remove(byte_idx);
        }
        KeyCode::Delete if app.cursor_position < app.input.chars().count() => {
            let byte_idx = App::char_index_to_byte_index(&app.input, app.cursor_position);
            app.input.remove(byte_idx);
        }
        KeyCode::Left if modifiers.contains(KeyModifiers::CONTROL) => app.move_cursor_by_words(-1),
        KeyCode::Right if modifiers.contains(KeyModifiers::CONTROL) => app.move_cursor_by_words(1),
        KeyCode::Left => app.move_cursor(-1),
        KeyCode::Right => app.move_cursor(1),
        KeyCode::Home => {
            app.cursor_position = 0;
            app.input_scroll = 0;
        }
        KeyCode::End => app.cursor_position = app.input.chars().count(),
        KeyCode::Up => app.navigate_history(-1),
        KeyCode::Down => app.navigate_history(1),
        KeyCode::PageUp => app.scroll_history(-1),
        KeyCode::PageDown => app.scroll_history(1),
        KeyCode::Enter => app.submit(),
        KeyCode::F(1) => {
            app.show_help = true;
            app.help_scroll = 0;
        }
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, event: crossterm::event::MouseEvent) {
    let scroll = if app.show_help {
        &mut app.help_scroll
    } else {
        &mut app.history_scroll
    };
    match event.kind {
        MouseEventKind::ScrollDown => *scroll = scroll.saturating_add(3),
        MouseEventKind::ScrollUp => *scroll = scroll.saturating_sub(3),
        _ => {}
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let terminal_size = frame.size();

    app.terminal_too_small =
        terminal_size.width < MIN_TERMINAL_WIDTH || terminal_size.height < MIN_TERMINAL_HEIGHT;

    if app.terminal_too_small {
        render_resize_message(frame, terminal_size);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(terminal_size);

    render_input(frame, app, layout[0]);
    render_status(frame, app, layout[1]);
    render_transcript(frame, app, layout[2]);
    app.list_height = layout[2].height as usize;
}

fn render_resize_message(frame: &mut Frame, area: Rect) {
    let message = format!(
        "window is {}x{}, shellcalc needs at least {}x{}",
        area.width, area.height, MIN_TERMINAL_WIDTH, MIN_TERMINAL_HEIGHT
    );
    let top = area.y + area.height / 2;
    let line = Rect::new(area.x, top, area.width, area.height.min(1));
    frame.render_widget(
        Paragraph::new(message)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        line,
    );
}

/// Indented, wrapped detail lines under an entry.
fn push_detail(items: &mut Vec<ListItem<'static>>, text: &str, width: usize, style: Style) {
    for (idx, line) in wrap_text(text, width).into_iter().enumerate() {
        let prefix = if idx == 0 { "    - " } else { "      " };
        items.push(ListItem::new(Line::from(Span::styled(
            format!("{}{}", prefix, line),
            style,
        ))));
    }
}

fn render_transcript(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" History ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    if app.transcript.is_empty() {
        let banner: Vec<Line> = std::iter::once(Line::from(Span::styled(
            "Enter an expression or a command:",
            Style::default().fg(Color::Gray),
        )))
        .chain(Session::banner().lines().map(|l| {
            Line::from(Span::styled(l.to_string(), Style::default().fg(Color::DarkGray)))
        }))
        .collect();
        frame.render_widget(Paragraph::new(banner).alignment(Alignment::Center), inner_area);
        return;
    }

    let mut items: Vec<ListItem<'static>> = Vec::new();
    app.item_start_indices.clear();

    let wrap_width = inner_area.width.saturating_sub(4) as usize;
    let show_steps = app.session.settings().show_steps;

    for (i, entry) in app.transcript.iter().enumerate() {
        app.item_start_indices.push(items.len());

        let is_selected = i == app.cursor_history;
        let base_style = Style::default().fg(if is_selected { Color::Yellow } else { Color::Cyan });

        let input = format_with_spaces(&entry.input);
        let input_lines = wrap_text(&input, wrap_width);
        let last_input_line = input_lines.len().saturating_sub(1);

        for (line_idx, line) in input_lines.into_iter().enumerate() {
            let mut spans = vec![if line_idx == 0 {
                Span::styled("> ", Style::default().fg(Color::Green))
            } else {
                Span::raw("  ")
            }];
            spans.extend(highlight_expression(&line, base_style));

            if line_idx == last_input_line {
                match &entry.reply {
                    Reply::Value { result, .. } => {
                        spans.push(Span::styled(" = ", Style::default().fg(Color::Gray)));
                        spans.push(Span::styled(
                            format_number(*result),
                            Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD),
                        ));
                    }
                    Reply::Error(message) if !message.contains('\n') => {
                        spans.push(Span::styled(" = ", Style::default().fg(Color::Gray)));
                        spans.push(Span::styled(
                            format!("Error: {}", message),
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ));
                    }
                    _ => {}
                }
            }

            items.push(ListItem::new(Line::from(spans)));
        }

        match &entry.reply {
            Reply::Text(text) => {
                for line in text.lines() {
                    push_detail(&mut items, line, wrap_width, Style::default().fg(Color::White));
                }
            }
            Reply::Error(message) if message.contains('\n') => {
                let style = Style::default().fg(Color::Red);
                for (idx, line) in message.lines().enumerate() {
                    let line = if idx == 0 { format!("Error: {}", line) } else { line.to_string() };
                    push_detail(&mut items, &line, wrap_width, style);
                }
            }
            Reply::Value { steps, .. } if show_steps => {
                for (j, step) in steps.iter().enumerate() {
                    let step_text = format!(
                        "Step {}: {} = {}",
                        j + 1,
                        step.operation,
                        format_number(step.result)
                    );
                    push_detail(&mut items, &step_text, wrap_width, Style::default().fg(Color::DarkGray));
                }
                let time_str = format!("Time: {:.6} ms", entry.duration.as_secs_f64() * 1000.0);
                push_detail(&mut items, &time_str, wrap_width, Style::default().fg(Color::Magenta));
            }
            _ => {}
        }

        if i < app.transcript.len() - 1 {
            let separator = Span::styled(
                "-".repeat(inner_area.width as usize),
                Style::default().fg(Color::DarkGray),
            );
            items.push(ListItem::new(Line::from(separator)));
        }
    }

    if app.scroll_to_bottom {
        app.history_scroll = items.len().saturating_sub(inner_area.height as usize);
        app.scroll_to_bottom = false;
    }

    let selected_index = app.item_start_indices.get(app.cursor_history).copied();

    let list = List::new(items)
        .block(Block::default())
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default()
        .with_selected(selected_index)
        .with_offset(app.history_scroll);

    frame.render_stateful_widget(list, inner_area, &mut state);
}

/// `label: value` pairs describing the session, shown in the status bar.
pub(crate) fn status_fields(session: &Session) -> Vec<(&'static str, String)> {
    let settings = session.settings();
    let env = session.environment();
    vec![
        (
            "ans",
            env.answer().map(format_number).unwrap_or_else(|| "-".to_string()),
        ),
        ("entries", env.history_len().to_string()),
        (
            "subst",
            match settings.substitution {
                Substitution::Textual => "textual",
                Substitution::Token => "token",
            }
            .to_string(),
        ),
        ("steps", if settings.show_steps { "on" } else { "off" }.to_string()),
    ]
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let label_style = Style::default().fg(Color::DarkGray);
    let value_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    for (label, value) in status_fields(&app.session) {
        spans.push(Span::styled(format!(" {}: ", label), label_style));
        spans.push(Span::styled(value, value_style));
    }
    spans.push(Span::styled("  F1 help  Ctrl+C quit", label_style));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Expression ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let visible_width = inner_area.width.saturating_sub(2) as usize;
    let total_chars = app.input.chars().count();
    app.adjust_input_scroll(visible_width);

    let visible_input: String = app
        .input
        .chars()
        .skip(app.input_scroll)
        .take(visible_width)
        .collect();

    frame.render_widget(Paragraph::new(format!("> {}", visible_input)), inner_area);

    let visible_cursor = app.cursor_position.saturating_sub(app.input_scroll);
    let visible_prefix: String = visible_input.chars().take(visible_cursor).collect();
    let cursor_x = inner_area.x + 2 + visible_prefix.width() as u16;
    frame.set_cursor(cursor_x, inner_area.y);

    let scroll_indicator_style = Style::default().fg(Color::DarkGray);

    if app.input_scroll > 0 {
        let left_indicator = Paragraph::new("<").style(scroll_indicator_style);
        frame.render_widget(left_indicator, Rect::new(inner_area.x, inner_area.y, 1, 1));
    }

    if total_chars > app.input_scroll + visible_width {
        let right_indicator = Paragraph::new(">").style(scroll_indicator_style);
        frame.render_widget(
            right_indicator,
            Rect::new(inner_area.x + inner_area.width - 1, inner_area.y, 1, 1),
        );
    }
}
