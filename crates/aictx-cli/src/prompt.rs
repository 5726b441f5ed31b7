//! Interactive confirmation on the terminal.

use std::io::{self, BufRead, IsTerminal, Write};

use aictx_core::Confirmation;

/// Asks on stderr and reads the answer from stdin.
pub struct TerminalConfirmation;

impl TerminalConfirmation {
    /// True when both stdin and stderr are attached to a terminal.
    pub fn available() -> bool {
        io::stdin().is_terminal() && io::stderr().is_terminal()
    }
}

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, question: &str) -> bool {
        eprint!("{} [y/N] ", question);
        if io::stderr().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!("Cannot read confirmation: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
