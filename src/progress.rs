use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str = "embed  {bar:28} {percent:>3}% {human_pos}/{human_len} rows {msg}";
const BAR_CHARS: &str = "━━░";

/// Progress for the embed stage. Hidden unless stderr is a terminal.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    pub fn new(total: u64, enabled: bool) -> Self {
        let visible = enabled && std::io::stderr().is_terminal();
        let bar = if visible {
            ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr())
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars(BAR_CHARS));
        }
        bar.set_length(total);
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self::new(0, false)
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        self.bar.set_message(msg.into());
    }

    pub fn add_embedded(&self, count: u64) {
        self.bar.inc(count);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
