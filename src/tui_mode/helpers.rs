use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use shellcalc::environment::{is_command, COMMANDS};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if word_width > width {
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
                current_width = 0;
            }

            let mut chunk = String::new();
            let mut chunk_width = 0;
            for c in word.chars() {
                let char_width = UnicodeWidthChar::width(c).unwrap_or(1);
                if chunk_width + char_width > width {
                    lines.push(std::mem::take(&mut chunk));
                    chunk_width = 0;
                }
                chunk.push(c);
                chunk_width += char_width;
            }
            if !chunk.is_empty() {
                lines.push(chunk);
            }
            continue;
        }

        if current_width + word_width + 1 > width && !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
        }

        if !current_line.is_empty() {
            current_line.push(' ');
            current_width += 1;
        }

        current_line.push_str(word);
        current_width += word_width;
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// Spaces out binary operators and parentheses for display. Command lines are kept as typed.
pub fn format_with_spaces(expr: &str) -> String {
    let first = expr.split_whitespace().next().unwrap_or("");
    if is_command(&first.to_lowercase()) {
        return expr.split_whitespace().collect::<Vec<_>>().join(" ");
    }

    let mut result = String::new();
    // Previous significant character; a '-' after an operator or '(' is a sign.
    let mut last_char = '\0';

    for c in expr.chars().filter(|c| !c.is_whitespace()) {
        let unary = c == '-' && matches!(last_char, '\0' | '(' | '+' | '-' | '*' | '/' | '%' | '^');
        match c {
            '+' | '-' | '*' | '/' | '^' | '%' if !unary => {
                result.push(' ');
                result.push(c);
                result.push(' ');
            }
            _ => result.push(c),
        }
        last_char = c;
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Colours numbers, operators, identifiers and command words.
pub fn highlight_expression(expr: &str, base_style: Style) -> Vec<Span<'static>> {
    let identifier_style = Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::BOLD);
    let operator_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let number_style = Style::default().fg(Color::LightGreen);
    let command_style = Style::default()
        .fg(Color::LightMagenta)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    let mut chars = expr.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_alphabetic() || c == '_' {
            let mut word = c.to_string();
            while let Some(&next) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    word.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            let style = if spans.is_empty() && COMMANDS.iter().any(|(name, _)| word.eq_ignore_ascii_case(name)) {
                command_style
            } else {
                identifier_style
            };
            spans.push(Span::styled(word, style));
        } else if c.is_ascii_digit() || c == '.' {
            let mut number = c.to_string();
            while let Some(&next) = chars.peek() {
                if next.is_ascii_digit() || next == '.' {
                    number.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            spans.push(Span::styled(number, number_style));
        } else if "+-*/^%=".contains(c) {
            spans.push(Span::styled(c.to_string(), operator_style));
        } else if c == ' ' {
            spans.push(Span::raw(" "));
        } else {
            spans.push(Span::styled(c.to_string(), base_style));
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_binary_operators_only() {
        assert_eq!(format_with_spaces("2*-3+(4^2)"), "2 * -3 + (4 ^ 2)");
        assert_eq!(format_with_spaces("-2 -  1"), "-2 - 1");
    }

    #[test]
    fn commands_keep_their_words() {
        assert_eq!(format_with_spaces("var  x =   5"), "var x = 5");
    }

    #[test]
    fn wraps_long_words() {
        assert_eq!(wrap_text("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap_text("ab cd ef", 5), vec!["ab cd", "ef"]);
    }
}
