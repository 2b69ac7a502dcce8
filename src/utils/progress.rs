use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

const STAGE_TEMPLATE: &str = "{spinner} {wide_msg}";

pub trait StageProgress {
    fn add_stage(&self, message: impl ToString) -> ProgressBar;
}

impl StageProgress for MultiProgress {
    fn add_stage(&self, message: impl ToString) -> ProgressBar {
        let pb = self.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::with_template(STAGE_TEMPLATE) {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(message.to_string());
        pb
    }
}
