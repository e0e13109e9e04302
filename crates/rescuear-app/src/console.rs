//! Operator commands typed on stdin.

use std::str::FromStr;

/// A console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Advance to the next step.
    Next,
    /// Stand the model up.
    Complete,
    /// End the session.
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next" | "n" => Ok(Self::Next),
            "complete" | "c" => Ok(Self::Complete),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command {other:?}; try next, complete or quit")),
        }
    }
}
