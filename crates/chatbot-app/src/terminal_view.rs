use chatbot_chat::{ChatView, IN_PROGRESS_MARKER};
use chatbot_types::{Message, Role};
use colored::Colorize;
use std::io::{self, Write};

pub const USER_AVATAR: &str = "👤";
pub const ASSISTANT_AVATAR: &str = "🤖";

/// Erases the in-progress marker: back up one cell, blank it, back up again
const ERASE_MARKER: &str = "\x08 \x08";

/// Renders the conversation to a terminal.
///
/// A streaming reply is drawn once and then extended in place: each partial
/// buffer only prints the text not shown yet, followed by the marker.
pub struct TerminalView<W: Write> {
    out: W,
    /// Bytes of the current reply already on screen
    printed: usize,
    reply_open: bool,
    marker_shown: bool,
}

impl TerminalView<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: 0,
            reply_open: false,
            marker_shown: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn avatar(role: Role) -> String {
        match role {
            Role::User => format!("{} {}", USER_AVATAR, "You:".bright_green().bold()),
            Role::Assistant => {
                format!("{} {}", ASSISTANT_AVATAR, "Assistant:".bright_cyan().bold())
            }
        }
    }

    /// Print whatever part of `buffer` is not on screen yet
    fn extend_reply(&mut self, buffer: &str) {
        if !self.reply_open {
            let _ = write!(self.out, "{} ", Self::avatar(Role::Assistant));
            self.reply_open = true;
            self.printed = 0;
        }
        if self.marker_shown {
            let _ = write!(self.out, "{}", ERASE_MARKER);
            self.marker_shown = false;
        }
        // The buffer only ever grows, so the printed part is a prefix
        let unseen = buffer.get(self.printed..).unwrap_or(buffer);
        let _ = write!(self.out, "{}", unseen);
        self.printed = buffer.len();
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn show_message(&mut self, message: &Message) {
        let _ = writeln!(self.out, "{} {}", Self::avatar(message.role), message.content);
        let _ = self.out.flush();
    }

    fn show_partial_reply(&mut self, buffer: &str) {
        self.extend_reply(buffer);
        let _ = write!(self.out, "{}", IN_PROGRESS_MARKER);
        self.marker_shown = true;
        let _ = self.out.flush();
    }

    fn show_final_reply(&mut self, buffer: &str) {
        self.extend_reply(buffer);
        let _ = writeln!(self.out);
        let _ = self.out.flush();
        self.reply_open = false;
        self.printed = 0;
    }

    fn show_error(&mut self, error: &str) {
        let _ = writeln!(self.out, "{} {}", "❌".bright_red(), error.red());
        let _ = self.out.flush();
    }

    fn show_notice(&mut self, notice: &str) {
        let _ = writeln!(self.out, "{} {}", "ℹ️".bright_blue(), notice.bright_black());
        let _ = self.out.flush();
    }
}
