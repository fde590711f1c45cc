use indicatif::{ProgressBar, ProgressStyle};

/// A progress bar for `len` steps, `None` if there is nothing to track.
pub fn progress_bar(len: u64, msg: String) -> Option<ProgressBar> {
    if len == 0 {
        return None;
    }

    let bar = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise} / {eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
    {
        bar.set_style(style.progress_chars("##-"));
    }
    bar.set_message(msg);

    Some(bar)
}
