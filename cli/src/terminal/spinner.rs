use std::io::Write;
use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

pub struct SpinnerHandle {
    spinner: ProgressBar,
}

impl SpinnerHandle {
    pub fn println(&self, msg: &str) {
        self.spinner.println(msg);
    }

    pub fn set_message(&self, msg: String) {
        self.spinner.set_message(msg);
    }

    fn is_visible(&self) -> bool {
        !self.spinner.is_hidden() && !self.spinner.is_finished()
    }
}

static SPINNER: OnceLock<SpinnerHandle> = OnceLock::new();

pub fn get_spinner() -> &'static SpinnerHandle {
    SPINNER.get_or_init(init_spinner)
}

/// Clears the spinner if one was ever shown.
pub fn finish() {
    if let Some(handle) = SPINNER.get() {
        handle.spinner.finish_and_clear();
    }
}

fn init_spinner() -> SpinnerHandle {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));

    SpinnerHandle { spinner: pb }
}

pub fn report_discovery_progress(count: usize) {
    get_spinner().set_message(format!(
        "Identified {} hosts so far...",
        count.to_string().green().bold()
    ));
}

/// Log sink that prints above the spinner while it is spinning.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        let msg = msg.trim_end();
        match SPINNER.get() {
            Some(handle) if handle.is_visible() => handle.println(msg),
            _ => writeln!(std::io::stdout(), "{msg}")?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stdout().flush()
    }
}
