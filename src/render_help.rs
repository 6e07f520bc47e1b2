use crate::tui_mode::app::App;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use shellcalc::environment::COMMANDS;

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
    ))
}

pub fn render_help(frame: &mut Frame, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" ShellCalc Help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let mut help_text = vec![
        Line::from(Span::styled(
            "ShellCalc - Terminal Calculator",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        heading("Operators (highest binding first):"),
        Line::from("  -x : Negation of a number   (e.g., -2 ^ 2 = 4.0)"),
        Line::from("  ^  : Exponentiation         (e.g., 2 ^ 3 ^ 2 = 64.0)"),
        Line::from("  *  : Multiplication         (e.g., 6 * 7 = 42.0)"),
        Line::from("  /  : Division               (e.g., 15 / 2 = 7.5)"),
        Line::from("  %  : Modulo                 (e.g., -7 % 3 = 2.0)"),
        Line::from("  +  : Addition               (e.g., 5 + 3 = 8.0)"),
        Line::from("  -  : Subtraction            (e.g., 10 - 4 = 6.0)"),
        Line::from("  ( ) : Grouping              (e.g., (1 + 2) * 3 = 9.0)"),
        Line::from(""),
        heading("Constants:"),
        Line::from("  pi  : 3.141592653589793"),
        Line::from("  e   : 2.718281828459045"),
        Line::from("  ans : result of the last calculation"),
        Line::from(""),
        heading("Commands:"),
    ];

    help_text.extend(
        COMMANDS
            .iter()
            .map(|(name, description)| Line::from(format!("  {:<10}: {}", name, description))),
    );

    help_text.extend([
        Line::from(""),
        heading("Examples:"),
        Line::from("  var rate = 0.25"),
        Line::from("  1200 * rate"),
        Line::from("  ans ^ 2"),
        Line::from("  prev ans"),
        Line::from(""),
        heading("Navigation:"),
        Line::from("  ← → : Move cursor left/right"),
        Line::from("  Ctrl+←/→ : Move cursor by words"),
        Line::from("  Home/End : Move to start/end of line"),
        Line::from("  ↑ ↓ : Recall earlier input"),
        Line::from("  PgUp/PgDn : Page through history"),
        Line::from("  Mouse wheel : Scroll through history"),
        Line::from("  Esc / F1 : Close this screen"),
    ]);

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll as u16, 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}
