use anyhow::Result;
use inquire::Confirm;
use std::path::Path;
use tracing::debug;
use unaccent_core::LogLine;

pub fn confirm_rename(target: &Path, changes: usize) -> Result<bool> {
    println!("\n🔎 Found {} item(s) to rename in {}", changes, target.display());

    let apply_change = Confirm::new("Rename them now?")
        .with_default(true)
        .prompt()?;

    Ok(apply_change)
}

pub fn confirm_restore(backup_file: &Path, records: usize) -> Result<bool> {
    println!("\n♻️  {} rename(s) recorded in {}", records, backup_file.display());

    let apply_change = Confirm::new("Restore the original names?")
        .with_default(true)
        .prompt()?;

    Ok(apply_change)
}

pub fn print_line(line: LogLine) {
    if line.is_failure() {
        eprintln!("❌ {}", line);
    } else {
        println!("{}", line);
    }
}

/// Logs progress at debug level whenever the integer percentage advances.
pub fn progress_reporter() -> impl FnMut(usize, usize) {
    let mut last = None;
    move |done, total| {
        let percent = percent(done, total);
        if last != Some(percent) {
            last = Some(percent);
            debug!("Progress: {}% ({}/{})", percent, done, total);
        }
    }
}

pub fn percent(done: usize, total: usize) -> usize {
    if total == 0 {
        return 100;
    }
    (done.min(total) * 100) / total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 4), 0);
        assert_eq!(percent(1, 4), 25);
        assert_eq!(percent(4, 4), 100);
        assert_eq!(percent(5, 4), 100);
        assert_eq!(percent(1, 0), 100);
    }

    #[test]
    fn test_percent_rounds_down() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 66);
    }
}
