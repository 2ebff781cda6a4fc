use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::books::Books;
use crate::error::Result;
use crate::settings::{load_settings_from, resolve_dir, save_settings_to, settings_path, Settings};

/// Set up till for this user: settings file, data and export folders, schema.
/// Running it again keeps the saved settings unless `--data-dir` is given.
pub fn run(data_dir: Option<String>) -> Result<()> {
    let path = settings_path();
    let settings = prepare_settings(&path, data_dir, ask_data_dir)?;
    save_settings_to(&path, &settings)?;

    let data = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(data.join("exports"))?;
    let books = Books::open(&settings)?;

    info!(target: "till::init", data_dir = %data.display(), backend = books.backend(), "initialized");
    println!(
        "Initialized till at {} ({} backend)",
        data.display(),
        books.backend()
    );
    Ok(())
}

/// Settings to write for `till init`. The flag always picks the data
/// directory. Without it, a saved file is kept as is, and only a first run
/// (no settings file yet) asks where the data should live.
fn prepare_settings(
    path: &Path,
    flag: Option<String>,
    ask: impl FnOnce(&str) -> Option<String>,
) -> Result<Settings> {
    let saved = match load_settings_from(path) {
        Ok(saved) => saved,
        Err(e) => {
            warn!(target: "till::init", error = %e, "replacing unreadable settings");
            None
        }
    };
    let first_run = saved.is_none();
    let mut settings = saved.unwrap_or_default();

    let chosen = match flag {
        Some(dir) => Some(dir),
        None if first_run => ask(&settings.data_dir),
        None => None,
    };
    if let Some(dir) = chosen {
        settings.data_dir = resolve_dir(&dir).to_string_lossy().into_owned();
    }
    Ok(settings)
}

/// Prompt on stdout and read one line. Blank input or a closed stdin keeps
/// the suggested directory.
fn ask_data_dir(suggested: &str) -> Option<String> {
    print!("Where should till keep its data? [{suggested}] ");
    std::io::stdout().flush().ok()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer).ok()?;
    let answer = answer.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never_asked(_: &str) -> Option<String> {
        panic!("prompted when the data directory was already known");
    }

    #[test]
    fn test_flag_wins_over_saved_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let saved = Settings {
            data_dir: "/srv/old".into(),
            ..Settings::default()
        };
        save_settings_to(&path, &saved).unwrap();
        let s = prepare_settings(&path, Some("/srv/new".into()), never_asked).unwrap();
        assert_eq!(s.data_dir, "/srv/new");
    }

    #[test]
    fn test_rerun_keeps_saved_directory_without_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        // A saved file that still holds the default directory and no cafe
        // name is not a first run.
        save_settings_to(&path, &Settings::default()).unwrap();
        let s = prepare_settings(&path, None, never_asked).unwrap();
        assert_eq!(s.data_dir, Settings::default().data_dir);
    }

    #[test]
    fn test_first_run_asks_and_uses_answer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut offered = String::new();
        let s = prepare_settings(&path, None, |suggested| {
            offered = suggested.to_string();
            Some("/srv/cafe".into())
        })
        .unwrap();
        assert_eq!(offered, Settings::default().data_dir);
        assert_eq!(s.data_dir, "/srv/cafe");
    }

    #[test]
    fn test_first_run_blank_answer_keeps_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let s = prepare_settings(&path, None, |_| None).unwrap();
        assert_eq!(s.data_dir, Settings::default().data_dir);
    }

    #[test]
    fn test_unreadable_settings_count_as_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "][").unwrap();
        let s = prepare_settings(&path, None, |_| Some("/srv/fresh".into())).unwrap();
        assert_eq!(s.data_dir, "/srv/fresh");
    }
}
