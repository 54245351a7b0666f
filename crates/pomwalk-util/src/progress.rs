//! Terminal feedback on stderr, so stdout stays clean for classpath output.

use std::io::Write;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// Width of the right-aligned label column.
const LABEL_WIDTH: usize = 12;

const SPINNER_TICK: Duration = Duration::from_millis(80);

/// `    Watching /work/pom.xml for changes`, label in bold green.
pub fn status(label: &str, message: &str) {
    write_status(Style::new().green().bold(), label, message);
}

/// Same layout as [`status`], label in bold yellow.
pub fn status_warn(label: &str, message: &str) {
    write_status(Style::new().yellow().bold(), label, message);
}

fn write_status(style: Style, label: &str, message: &str) {
    let _ = writeln!(
        std::io::stderr(),
        "{:>width$} {message}",
        style.apply_to(label),
        width = LABEL_WIDTH,
    );
}

/// Spinner shown while the engine has reads in flight. Callers clear it
/// with [`ProgressBar::finish_and_clear`]; it hides itself when stderr is
/// not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(SPINNER_TICK);
    pb
}
