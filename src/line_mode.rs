use anyhow::Result;
use shellcalc::environment::format_number;
use shellcalc::{Reply, Session};
use std::io::{self, BufRead, Write};

#[cfg(feature = "line")]
use termion::{
    clear::CurrentLine as ClearLine,
    cursor::{DetectCursorPos, Goto},
    event::Key,
    input::TermRead,
    raw::IntoRawMode,
};

/// Prints the reply the way both line front ends do. Returns `false` on quit.
fn print_reply(out: &mut impl Write, reply: &Reply, newline: &str) -> io::Result<bool> {
    if let Reply::Quit = reply {
        return Ok(false);
    }
    if let Some(text) = reply.render() {
        for line in text.lines() {
            write!(out, "{}{}", line, newline)?;
        }
        if let Reply::Value { steps, .. } = reply {
            for (i, step) in steps.iter().enumerate() {
                write!(
                    out,
                    "  Step {}: {} = {}{}",
                    i + 1,
                    step.operation,
                    format_number(step.result),
                    newline
                )?;
            }
        }
        if !text.is_empty() {
            write!(out, "{}", newline)?;
        }
    }
    Ok(true)
}

/// Runs `lines` through a session non-interactively, stopping at `exit`.
/// Returns `false` if any line failed.
pub fn run_batch(session: &mut Session, lines: &[String], out: &mut impl Write) -> Result<bool> {
    let mut all_ok = true;
    for line in lines {
        let reply = session.handle_line(line);
        if let Reply::Error(_) = reply {
            all_ok = false;
        }
        if !print_reply(out, &reply, "\n")? {
            break;
        }
    }
    out.flush()?;
    Ok(all_ok)
}

/// Line-by-line REPL over plain stdin, usable with pipes.
pub fn run_plain(session: &mut Session) -> Result<()> {
    repl(session, &mut io::stdin().lock(), &mut io::stdout())
}

fn repl(session: &mut Session, input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}\n", Session::banner())?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }

        let reply = session.handle_line(&line);
        if !print_reply(out, &reply, "\n")? {
            return Ok(());
        }
    }
}

#[cfg(feature = "line")]
fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or_else(|| s.len())
}

/// Raw-mode line editor with cursor movement and recall of earlier input.
#[cfg(feature = "line")]
pub fn run_line(session: &mut Session) -> Result<()> {
    println!("{}\n", Session::banner());

    let mut stdout = io::stdout().into_raw_mode()?;
    let mut entered: Vec<String> = Vec::new();
    let mut entered_index = 0;

    loop {
        write!(stdout, "{}> ", ClearLine)?;
        stdout.flush()?;

        let mut expression = String::new();
        let mut cursor_pos = 0;
        let (_, initial_y) = stdout.cursor_pos()?;

        let stdin = io::stdin();
        let mut keys = stdin.keys();

        loop {
            write!(stdout, "{}{}> {}", Goto(1, initial_y), ClearLine, expression)?;
            let byte_pos = char_index_to_byte_index(&expression, cursor_pos);
            let column = 3 + expression[..byte_pos].chars().count() as u16;
            write!(stdout, "{}", Goto(column, initial_y))?;
            stdout.flush()?;

            let key = match keys.next() {
                Some(key) => key?,
                None => {
                    write!(stdout, "\r\n")?;
                    return Ok(());
                }
            };

            match key {
                Key::Char('\n') => break,
                Key::Ctrl('c') | Key::Ctrl('d') => {
                    write!(stdout, "\r\n")?;
                    return Ok(());
                }
                Key::Char(c) => {
                    let byte_idx = char_index_to_byte_index(&expression, cursor_pos);
                    expression.insert(byte_idx, c);
                    cursor_pos += 1;
                }
                Key::Backspace if cursor_pos > 0 => {
                    cursor_pos -= 1;
                    let byte_idx = char_index_to_byte_index(&expression, cursor_pos);
                    expression.remove(byte_idx);
                }
                Key::Delete if cursor_pos < expression.chars().count() => {
                    let byte_idx = char_index_to_byte_index(&expression, cursor_pos);
                    expression.remove(byte_idx);
                }
                Key::Left if cursor_pos > 0 => cursor_pos -= 1,
                Key::Right if cursor_pos < expression.chars().count() => cursor_pos += 1,
                Key::Home => cursor_pos = 0,
                Key::End => cursor_pos = expression.chars().count(),
                Key::Up => {
                    if entered_index > 0 {
                        entered_index -= 1;
                        expression = entered[entered_index].clone();
                        cursor_pos = expression.chars().count();
                    }
                }
                Key::Down => {
                    if entered_index + 1 < entered.len() {
                        entered_index += 1;
                        expression = entered[entered_index].clone();
                    } else {
                        entered_index = entered.len();
                        expression.clear();
                    }
                    cursor_pos = expression.chars().count();
                }
                _ => {}
            }
        }

        write!(stdout, "\r\n")?;
        let input = expression.trim();
        if !input.is_empty() {
            entered.push(input.to_string());
        }
        entered_index = entered.len();

        let reply = session.handle_line(input);
        if !print_reply(&mut stdout, &reply, "\r\n")? {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(lines: &[&str]) -> (bool, String) {
        let mut session = Session::default();
        let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        let mut out = Vec::new();
        let ok = run_batch(&mut session, &lines, &mut out).unwrap();
        (ok, String::from_utf8(out).unwrap())
    }

    #[test]
    fn batch_prints_each_reply_followed_by_blank_line() {
        let (ok, output) = batch(&["var x = 2", "x*3", "history"]);
        assert!(ok);
        assert_eq!(output, "x set to 2\n\n= 6.0\n\nx*3 = 6.0\n\n");
    }

    #[test]
    fn batch_reports_failure_but_keeps_going() {
        let (ok, output) = batch(&["1/0", "var y", "1+1"]);
        assert!(!ok);
        assert_eq!(
            output,
            "Error: division by zero\n\n\
             Error: Invalid var command\nUsage: var 'variable name' = 'value'\n\n\
             = 2.0\n\n"
        );
    }

    #[test]
    fn batch_stops_at_exit() {
        let (ok, output) = batch(&["2^3", "exit", "1/0"]);
        assert!(ok);
        assert_eq!(output, "= 8.0\n\n");
    }

    #[test]
    fn empty_text_prints_nothing() {
        let (ok, output) = batch(&["prev", "   "]);
        assert!(ok);
        assert_eq!(output, "");
    }

    #[test]
    fn plain_repl_shape() {
        let mut session = Session::default();
        let mut input = "1+2\n\nexit\n".as_bytes();
        let mut out = Vec::new();
        repl(&mut session, &mut input, &mut out).unwrap();

        let expected = format!("{}\n\n> = 3.0\n\n> > ", Session::banner());
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn plain_repl_ends_on_eof() {
        let mut session = Session::default();
        let mut input = "2*2".as_bytes();
        let mut out = Vec::new();
        repl(&mut session, &mut input, &mut out).unwrap();

        let expected = format!("{}\n\n> = 4.0\n\n> \n", Session::banner());
        assert_eq!(String::from_utf8(out).unwrap(), expected);
        assert_eq!(session.environment().answer(), Some(4.0));
    }
}
