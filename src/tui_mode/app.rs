use shellcalc::config::Settings;
use shellcalc::{Reply, Session};

/// One submitted line and what the session answered.
pub struct TranscriptEntry {
    pub input: String,
    pub reply: Reply,
    pub duration: std::time::Duration,
}

pub struct App {
    pub session: Session,
    pub input: String,
    pub cursor_position: usize,
    pub input_scroll: usize,
    pub transcript: Vec<TranscriptEntry>,
    pub cursor_history: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub list_height: usize,
    pub item_start_indices: Vec<usize>,
    pub history_scroll: usize,
    pub scroll_to_bottom: bool,
    pub terminal_too_small: bool,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        App {
            session: Session::new(settings),
            input: String::new(),
            cursor_position: 0,
            input_scroll: 0,
            transcript: Vec::new(),
            cursor_history: 0,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            list_height: 5,
            item_start_indices: Vec::new(),
            history_scroll: 0,
            scroll_to_bottom: false,
            terminal_too_small: false,
        }
    }

    pub fn adjust_input_scroll(&mut self, visible_width: usize) {
        let total_chars = self.input.chars().count();
        let cursor_pos = self.cursor_position;

        if cursor_pos < self.input_scroll {
            self.input_scroll = cursor_pos;
        } else if cursor_pos >= self.input_scroll + visible_width {
            self.input_scroll = cursor_pos - visible_width + 1;
        }

        if self.input_scroll > total_chars.saturating_sub(visible_width) {
            self.input_scroll = total_chars.saturating_sub(visible_width);
        }
    }

    pub fn submit(&mut self) {
        let input = self.input.trim().to_string();
        if input.is_empty() {
            return;
        }

        let start_time = std::time::Instant::now();
        let reply = self.session.handle_line(&input);
        let duration = start_time.elapsed();

        match reply {
            Reply::Quit => {
                self.should_quit = true;
                return;
            }
            Reply::Nothing => {}
            reply => self.transcript.push(TranscriptEntry {
                input,
                reply,
                duration,
            }),
        }

        // One past the last entry: the next Up recalls the line just submitted.
        self.cursor_history = self.transcript.len();
        self.clear_input();
        self.scroll_to_bottom = true;
    }

    pub fn move_cursor(&mut self, direction: i32) {
        match direction {
            -1 => self.cursor_position = self.cursor_position.saturating_sub(1),
            1 => self.cursor_position = (self.cursor_position + 1).min(self.input.chars().count()),
            _ => {}
        }
    }

    pub fn move_cursor_by_words(&mut self, direction: i32) {
        let input_chars: Vec<char> = self.input.chars().collect();
        let mut pos = self.cursor_position;

        if direction < 0 {
            while pos > 0 && input_chars[pos - 1].is_whitespace() {
                pos -= 1;
            }
            while pos > 0 && !input_chars[pos - 1].is_whitespace() {
                pos -= 1;
            }
        } else {
            let len = input_chars.len();
            while pos < len && !input_chars[pos].is_whitespace() {
                pos += 1;
            }
            while pos < len && input_chars[pos].is_whitespace() {
                pos += 1;
            }
        }
        self.cursor_position = pos;
    }

    pub fn navigate_history(&mut self, direction: i32) {
        if direction < 0 && self.cursor_history > 0 {
            self.cursor_history -= 1;
        } else if direction > 0 && self.cursor_history < self.transcript.len() {
            self.cursor_history += 1;
        }
        self.recall_selected();
    }

    pub fn scroll_history(&mut self, direction: i32) {
        let step = self.list_height.saturating_sub(1);
        if direction < 0 {
            self.cursor_history = self.cursor_history.saturating_sub(step);
        } else {
            self.cursor_history = self
                .cursor_history
                .saturating_add(step)
                .min(self.transcript.len().saturating_sub(1));
        }
        self.recall_selected();
    }

    fn recall_selected(&mut self) {
        match self.transcript.get(self.cursor_history) {
            Some(entry) => self.input = entry.input.clone(),
            None => self.input.clear(),
        }
        self.cursor_position = self.input.chars().count();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.input_scroll = 0;
    }

    pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
        s.char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or_else(|| s.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_line(app: &mut App, line: &str) {
        app.input = line.to_string();
        app.cursor_position = line.chars().count();
        app.submit();
    }

    #[test]
    fn submit_records_reply_and_clears_input() {
        let mut app = App::new(Settings::default());
        type_line(&mut app, "2 + 2");
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript[0].reply.render().as_deref(), Some("= 4.0"));
        assert!(app.input.is_empty());
        assert_eq!(app.cursor_position, 0);
    }

    #[test]
    fn exit_quits_without_an_entry() {
        let mut app = App::new(Settings::default());
        type_line(&mut app, "exit");
        assert!(app.should_quit);
        assert!(app.transcript.is_empty());
    }

    #[test]
    fn navigation_recalls_earlier_input() {
        let mut app = App::new(Settings::default());
        type_line(&mut app, "1+1");
        type_line(&mut app, "2*2");
        app.navigate_history(-1);
        assert_eq!(app.input, "2*2");
        app.navigate_history(-1);
        assert_eq!(app.input, "1+1");
        app.navigate_history(-1);
        assert_eq!(app.input, "1+1");
        app.navigate_history(1);
        assert_eq!(app.input, "2*2");
        app.navigate_history(1);
        assert!(app.input.is_empty());
        assert_eq!(app.cursor_history, app.transcript.len());
    }

    #[test]
    fn first_up_after_submit_recalls_last_line() {
        let mut app = App::new(Settings::default());
        type_line(&mut app, "3*3");
        assert_eq!(app.cursor_history, 1);
        app.navigate_history(-1);
        assert_eq!(app.input, "3*3");
        assert_eq!(app.cursor_position, 3);
    }

    #[test]
    fn word_movement() {
        let mut app = App::new(Settings::default());
        app.input = "var x = 5".to_string();
        app.cursor_position = app.input.chars().count();
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 8);
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 6);
        app.move_cursor_by_words(1);
        assert_eq!(app.cursor_position, 8);
    }
}
