//! Terminal output helpers (status messages and a watch-mode spinner). Grounded on the host
//! CLI's own `ui` module; trimmed to what `build`/`watch` actually print.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use fob_bundler::{DiagnosticLevel, DiagnosticSink};

/// True when running under a recognized CI environment, per the same check the host CLI
/// uses to decide whether color/animation is worth the noise.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
}

pub fn should_use_color() -> bool {
    !is_ci() && std::env::var("NO_COLOR").is_err() && console::colors_enabled()
}

pub fn init_colors() {
    if !should_use_color() {
        console::set_colors_enabled(false);
    }
}

pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

pub fn info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

/// Render every accumulated diagnostic (§4.13), regardless of whether the bundling that
/// produced them ultimately succeeded.
pub fn print_diagnostics(sink: &DiagnosticSink) {
    for rendered in sink.render() {
        match rendered.level {
            DiagnosticLevel::Warning => warning(&rendered.message),
            DiagnosticLevel::Error => error(&rendered.message),
        }
    }
}

/// Spinner for the watch loop's "waiting for changes" / "rebundling" states.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("valid template")
                .tick_strings(&["◐", "◓", "◑", "◒"]),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    pub fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    pub fn finish(&self, message: &str) {
        self.pb.finish_with_message(format!("{} {}", "✓".green(), message));
    }

    pub fn fail(&self, message: &str) {
        self.pb.finish_with_message(format!("{} {}", "✗".red(), message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_messages_do_not_panic() {
        success("ok");
        info("ok");
        warning("ok");
        error("ok");
    }

    #[test]
    fn spinner_lifecycle_does_not_panic() {
        let spinner = Spinner::new("waiting for changes");
        spinner.set_message("rebundling");
        spinner.finish("done");
    }
}
