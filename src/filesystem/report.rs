use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use supports_color::Stream;

use crate::filesystem::{ChangeKind, FileChange};

/// Turns ANSI colors on or off depending on whether stdout supports them.
pub fn configure_color_output() {
    let supported = supports_color::on(Stream::Stdout).is_some();
    colored::control::set_override(supported);
}

/// Prints one line per change to stdout. Output stops quietly once stdout
/// is closed.
pub fn print_changes(changes: &[FileChange]) {
    let _ = write_changes(&mut io::stdout().lock(), changes);
}

fn write_changes(out: &mut impl Write, changes: &[FileChange]) -> io::Result<()> {
    for change in changes {
        writeln!(out, "{}", format_change(change))?;
    }
    out.flush()
}

pub fn format_change(change: &FileChange) -> String {
    let tag = colored_tag(change.kind).bold();
    match change.kind {
        ChangeKind::Delete => format!("{} {}", tag, change.path),
        ChangeKind::Create | ChangeKind::Update => {
            format!("{} {} ({} bytes)", tag, change.path, change.content_len())
        }
    }
}

fn colored_tag(kind: ChangeKind) -> ColoredString {
    let tag = kind.to_string();
    match kind {
        ChangeKind::Create => tag.as_str().green(),
        ChangeKind::Update => tag.as_str().yellow(),
        ChangeKind::Delete => tag.as_str().red(),
    }
}
