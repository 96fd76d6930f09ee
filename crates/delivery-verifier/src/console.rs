//! Human-readable result lines
//!
//! Test harness scripts grep stdout for the `OK:`/`FAIL:`/`ERROR:` prefixes,
//! so the wording of these lines is part of the interface.

use colored::Colorize;
use std::io::{
    self,
    IsTerminal,
    Write,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Fail,
    Error,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Fail => "FAIL",
            Status::Error => "ERROR",
        }
    }
}

/// Line-oriented writer for command output
pub struct Console<W> {
    out: W,
    colored: bool,
}

impl Console<io::Stdout> {
    /// Console on stdout, colored only when stdout is a terminal
    pub fn stdout() -> Self {
        let out = io::stdout();
        let colored = out.is_terminal();
        Self { out, colored }
    }
}

impl Console<Vec<u8>> {
    /// Uncolored console collecting output in memory
    pub fn buffer() -> Self {
        Self::new(Vec::new(), false)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, colored: bool) -> Self {
        Self { out, colored }
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", text.as_ref())
    }

    /// A line prefixed with `OK:`, `FAIL:` or `ERROR:`
    pub fn status(&mut self, status: Status, text: impl AsRef<str>) -> io::Result<()> {
        let label = format!("{}:", status.label());
        let label = if self.colored {
            match status {
                Status::Ok => label.green().bold().to_string(),
                Status::Fail => label.red().bold().to_string(),
                Status::Error => label.red().to_string(),
            }
        } else {
            label
        };
        writeln!(self.out, "{label} {}", text.as_ref())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
