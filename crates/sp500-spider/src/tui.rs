use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar over `len` rows; hidden unless running in tui mode.
pub(crate) fn progress_bar(len: usize, msg: &'static str, tui: bool) -> Result<ProgressBar> {
    if !tui {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(len as u64).with_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.magenta} {msg:>9.white} |{bar:40.cyan/blue}| {pos:<3} / {human_len} \
                    [Time: {elapsed}, Rate: {per_sec}]",
            )?
            .progress_chars("## "),
    );
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));

    Ok(pb)
}
