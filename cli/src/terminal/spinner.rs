use std::io::Write;
use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use portinspector_core::inventory::PortProgress;

static SPINNER: OnceLock<ProgressBar> = OnceLock::new();

fn get_spinner() -> &'static ProgressBar {
    SPINNER.get_or_init(init_spinner)
}

fn init_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg} {elapsed:.dim}")
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
    pb
}

/// The spinner while it is on screen.
fn active_spinner() -> Option<&'static ProgressBar> {
    SPINNER.get().filter(|pb| !pb.is_finished())
}

pub fn report_port_progress(progress: PortProgress<'_>) {
    get_spinner().set_message(format!(
        "Inspecting {} ({}/{})",
        progress.port.bold(),
        (progress.index + 1).to_string().green().bold(),
        progress.total
    ));
}

pub fn finish() {
    if let Some(pb) = active_spinner() {
        pb.finish_and_clear();
    }
}

/// Prints a line without tearing the spinner.
pub fn println(msg: &str) {
    match active_spinner() {
        Some(pb) => pb.println(msg),
        None => println!("{msg}"),
    }
}

pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        let msg = msg.trim_end();
        match active_spinner() {
            Some(pb) => pb.println(msg),
            None => eprintln!("{msg}"),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
