use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;
use tracing::{debug, info, warn};

use crate::roster::Roster;

use super::codec::{deserialize, deserialize_lenient, serialize};
use super::StoreError;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".grade-tracker";
/// Roster file stored inside the application data directory.
const DATA_FILE_NAME: &str = "student_grades.csv";

/// Resolve the absolute path to the roster file inside the user's home.
pub fn default_data_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DATA_FILE_NAME))
}

/// Read the roster stored at `path`. A missing file is an empty roster; any
/// malformed record fails the whole load. Bytes that are not valid UTF-8 are
/// replaced rather than failing the read.
pub fn load(path: &Path) -> Result<Roster, StoreError> {
    let Some(bytes) = read_if_exists(path)? else {
        return Ok(Roster::new());
    };
    Ok(Roster::from_students(deserialize(&String::from_utf8_lossy(&bytes))?))
}

/// Write the full roster to `path`, replacing any previous contents.
pub fn save(roster: &Roster, path: &Path) -> Result<(), StoreError> {
    let persistence = |source: io::Error| StoreError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(persistence)?;
    }

    let mut writer = BufWriter::new(File::create(path).map_err(persistence)?);
    writer
        .write_all(serialize(roster.students()).as_bytes())
        .map_err(persistence)?;
    writer.flush().map_err(persistence)?;

    info!(path = %path.display(), students = roster.len(), "roster saved");
    Ok(())
}

/// Result of the startup load: always a usable roster, plus a message for the
/// user when something had to be dropped.
#[derive(Debug)]
pub struct LoadOutcome {
    pub roster: Roster,
    pub warning: Option<String>,
}

/// Load the session roster without ever failing. Unreadable files start an
/// empty session, malformed records are skipped and bytes that are not valid
/// UTF-8 are replaced. Whenever that happens the file is first copied to
/// `<file>.bak` so the next save cannot destroy what was on disk.
pub fn load_session(path: &Path) -> LoadOutcome {
    let bytes = match read_if_exists(path) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            info!(path = %path.display(), "no roster file yet, starting empty");
            return LoadOutcome {
                roster: Roster::new(),
                warning: None,
            };
        }
        Err(err) => {
            warn!(error = %err, "could not read roster, starting empty");
            let mut warning =
                format!("Could not load student data ({err}). A new session was started.");
            append_backup_note(&mut warning, path);
            return LoadOutcome {
                roster: Roster::new(),
                warning: Some(warning),
            };
        }
    };

    let text = String::from_utf8_lossy(&bytes);
    let lossy = matches!(text, Cow::Owned(_));
    let (students, rejected) = deserialize_lenient(&text);
    let roster = Roster::from_students(students);

    if rejected.is_empty() && !lossy {
        info!(path = %path.display(), students = roster.len(), "roster loaded");
        return LoadOutcome {
            roster,
            warning: None,
        };
    }

    for err in &rejected {
        debug!(error = %err, "skipped malformed record");
    }
    warn!(
        path = %path.display(),
        kept = roster.len(),
        skipped = rejected.len(),
        invalid_utf8 = lossy,
        "roster loaded with damaged records"
    );

    let mut notes = Vec::new();
    if let Some(first) = rejected.first() {
        notes.push(format!(
            "Skipped {} malformed record(s); first at {first}.",
            rejected.len()
        ));
    }
    if lossy {
        notes.push("Replaced characters that were not valid UTF-8.".to_string());
    }
    let mut warning = notes.join(" ");
    append_backup_note(&mut warning, path);

    LoadOutcome {
        roster,
        warning: Some(warning),
    }
}

/// Copy the roster file aside and mention the copy in `warning`.
fn append_backup_note(warning: &mut String, path: &Path) {
    let backup = backup_path(path);
    match fs::copy(path, &backup) {
        Ok(_) => warning.push_str(&format!(" Original kept at {}.", backup.display())),
        Err(err) => warn!(error = %err, backup = %backup.display(), "could not back up roster"),
    }
}

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Persistence {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Student;
    use tempfile::TempDir;

    fn sample_roster() -> Roster {
        let mut roster = Roster::new();
        roster.record_grade("Alice", 90).unwrap();
        roster.record_grade("Alice", 85).unwrap();
        roster.add_student(Student::new("Bob"));
        roster
    }

    #[test]
    fn test_missing_file_loads_empty_roster() {
        let dir = TempDir::new().unwrap();
        let roster = load(&dir.path().join("absent.csv")).unwrap();
        assert!(roster.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("grades.csv");
        let roster = sample_roster();

        save(&roster, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Alice,90,85\nBob\n");
        assert_eq!(load(&path).unwrap(), roster);
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grades.csv");
        save(&sample_roster(), &path).unwrap();
        save(&Roster::new(), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_load_rejects_malformed_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grades.csv");
        fs::write(&path, "Alice,90\nBob,abc\n").unwrap();

        match load(&path) {
            Err(StoreError::Malformed(err)) => assert_eq!(err.line, 2),
            other => panic!("expected malformed record error, got {other:?}"),
        }
    }

    #[test]
    fn test_unreadable_path_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a file.
        assert!(matches!(
            load(dir.path()),
            Err(StoreError::Persistence { .. })
        ));
        assert!(matches!(
            save(&Roster::new(), dir.path()),
            Err(StoreError::Persistence { .. })
        ));
    }

    #[test]
    fn test_load_session_recovers_valid_records_and_backs_up() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grades.csv");
        fs::write(&path, "Alice,90\nBob,abc\nCarol,70\n").unwrap();

        let outcome = load_session(&path);
        let names: Vec<&str> = outcome
            .roster
            .students()
            .iter()
            .map(Student::name)
            .collect();
        assert_eq!(names, vec!["Alice", "Carol"]);

        let warning = outcome.warning.unwrap();
        assert!(warning.starts_with("Skipped 1 malformed record(s); first at line 2"));
        assert_eq!(
            fs::read_to_string(dir.path().join("grades.csv.bak")).unwrap(),
            "Alice,90\nBob,abc\nCarol,70\n"
        );
    }

    #[test]
    fn test_load_session_keeps_records_around_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grades.csv");
        let original: &[u8] = b"Alice,90\nBob,80\nJos\xE9,70\n";
        fs::write(&path, original).unwrap();

        let outcome = load_session(&path);
        let students = outcome.roster.students();
        assert_eq!(students.len(), 3);
        assert_eq!(students[0].name(), "Alice");
        assert_eq!(students[1].grades(), &[80]);
        assert_eq!(students[2].name(), "Jos\u{FFFD}");
        assert_eq!(students[2].grades(), &[70]);

        assert!(outcome.warning.unwrap().contains("not valid UTF-8"));
        assert_eq!(fs::read(dir.path().join("grades.csv.bak")).unwrap(), original);

        // Saving the session afterwards keeps the readable records.
        save(&outcome.roster, &path).unwrap();
        assert_eq!(load(&path).unwrap().len(), 3);
    }

    #[test]
    fn test_load_session_clean_file_has_no_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grades.csv");
        save(&sample_roster(), &path).unwrap();

        let outcome = load_session(&path);
        assert_eq!(outcome.roster, sample_roster());
        assert!(outcome.warning.is_none());
        assert!(!dir.path().join("grades.csv.bak").exists());
    }

    #[test]
    fn test_load_session_unreadable_starts_empty_with_warning() {
        let dir = TempDir::new().unwrap();
        let outcome = load_session(dir.path());
        assert!(outcome.roster.is_empty());
        assert!(outcome
            .warning
            .unwrap()
            .contains("A new session was started."));
    }
}
