use crate::host::ViewportHost;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

pub const SCREENSHOT_PREFIX: &str = "Screenshot-";

/// `Screenshot-<yyMMdd-HHmmss>.png` for the given wall-clock time.
pub fn screenshot_file_name(at: NaiveDateTime) -> String {
    format!("{SCREENSHOT_PREFIX}{}.png", at.format("%y%m%d-%H%M%S"))
}

/// Capture the viewport into `dir` and return the written path.
pub fn take_screenshot(viewport: &mut dyn ViewportHost, dir: &Path, at: NaiveDateTime) -> Result<PathBuf> {
    let path = dir.join(screenshot_file_name(at));
    log::info!("Saving screenshot to: {}", path.display());
    viewport
        .capture_screenshot(&path)
        .with_context(|| format!("Failed to capture screenshot {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimViewport;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d).and_then(|date| date.and_hms_opt(h, mi, s)).expect("valid timestamp")
    }

    #[test]
    fn file_name_uses_two_digit_fields() {
        assert_eq!(screenshot_file_name(at(2024, 3, 2, 13, 5, 9)), "Screenshot-240302-130509.png");
        assert_eq!(screenshot_file_name(at(2031, 12, 31, 0, 0, 0)), "Screenshot-311231-000000.png");
    }

    #[test]
    fn capture_joins_output_dir() {
        let mut viewport = SimViewport::new();
        let path = take_screenshot(&mut viewport, Path::new("captures"), at(2024, 3, 2, 13, 5, 9))
            .expect("capture");
        assert_eq!(path, Path::new("captures").join("Screenshot-240302-130509.png"));
        assert_eq!(viewport.screenshots(), &[path]);
    }

    #[test]
    fn capture_failure_is_reported() {
        let mut viewport = SimViewport::new();
        viewport.set_open(false);
        let err = take_screenshot(&mut viewport, Path::new("."), at(2024, 1, 1, 9, 0, 0)).unwrap_err();
        assert!(err.to_string().contains("Failed to capture screenshot"));
    }
}
