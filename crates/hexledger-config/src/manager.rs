//! The live `config.json` plus timestamped backups kept next to it.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{Config, ConfigError};

const CONFIG_FILE: &str = "config.json";
const BACKUPS_DIR: &str = "backups";
const BACKUP_PREFIX: &str = "config_";
const BACKUP_SUFFIX: &str = ".json";
const BACKUP_STAMP: &str = "%Y%m%d_%H%M%S";

/// One saved copy of the config, described by its file name
/// `config_<YYYYMMDD>_<HHMMSS>[_<note>].json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub name: String,
    /// `None` when the name carries no readable timestamp.
    pub created_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl BackupEntry {
    /// Reads a backup file name; anything outside the naming scheme is `None`.
    pub fn parse(name: &str) -> Option<Self> {
        if name.contains(['/', '\\']) {
            return None;
        }
        let stem = name
            .strip_prefix(BACKUP_PREFIX)?
            .strip_suffix(BACKUP_SUFFIX)?;
        let mut parts = stem.splitn(3, '_');
        let created_at = match (parts.next(), parts.next()) {
            (Some(date), Some(time)) => {
                NaiveDateTime::parse_from_str(&format!("{}_{}", date, time), BACKUP_STAMP)
                    .ok()
                    .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
            }
            _ => None,
        };
        let note = created_at.and(parts.next()).map(str::to_string);
        Some(Self {
            name: name.to_string(),
            created_at,
            note,
        })
    }
}

/// Loads, saves and snapshots [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf, backups_dir: PathBuf) -> Self {
        Self {
            config_path,
            backups_dir,
        }
    }

    /// `<base>/config/config.json`, backups in `<base>/config/backups`.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let dir = base.join("config");
        let manager = Self::new(dir.join(CONFIG_FILE), dir.join(BACKUPS_DIR));
        fs::create_dir_all(&manager.backups_dir)?;
        Ok(manager)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// The saved config, or defaults when nothing was saved yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        match fs::read_to_string(&self.config_path) {
            Ok(data) => parse_config(&self.config_path, &data),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Config::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        replace_file(&self.config_path, &serde_json::to_string_pretty(config)?)
    }

    /// Writes a timestamped copy of `config` and returns its file name.
    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String, ConfigError> {
        fs::create_dir_all(&self.backups_dir)?;
        let name = backup_name(Utc::now(), note);
        replace_file(
            &self.backups_dir.join(&name),
            &serde_json::to_string_pretty(config)?,
        )?;
        Ok(name)
    }

    /// Reads a backup by file name. Names that could escape the backups
    /// directory are refused like missing ones.
    pub fn restore(&self, name: &str) -> Result<Config, ConfigError> {
        let entry =
            BackupEntry::parse(name).ok_or_else(|| ConfigError::UnknownBackup(name.to_string()))?;
        let path = self.backups_dir.join(&entry.name);
        match fs::read_to_string(&path) {
            Ok(data) => parse_config(&path, &data),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(ConfigError::UnknownBackup(name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Backups newest first; undated names sort last.
    pub fn list_backups(&self) -> Result<Vec<BackupEntry>, ConfigError> {
        let dir = match fs::read_dir(&self.backups_dir) {
            Ok(dir) => dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut entries = Vec::new();
        for item in dir {
            let file_name = item?.file_name();
            if let Some(entry) = file_name.to_str().and_then(BackupEntry::parse) {
                entries.push(entry);
            }
        }
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.name.cmp(&a.name))
        });
        Ok(entries)
    }
}

fn backup_name(at: DateTime<Utc>, note: Option<&str>) -> String {
    let stamp = at.format(BACKUP_STAMP);
    match note.and_then(slug) {
        Some(slug) => format!("{}{}_{}{}", BACKUP_PREFIX, stamp, slug, BACKUP_SUFFIX),
        None => format!("{}{}{}", BACKUP_PREFIX, stamp, BACKUP_SUFFIX),
    }
}

/// Lowercase ASCII words joined by `-`, or `None` when nothing is left.
fn slug(note: &str) -> Option<String> {
    let words: Vec<String> = note
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    (!words.is_empty()).then(|| words.join("-"))
}

fn parse_config(path: &Path, data: &str) -> Result<Config, ConfigError> {
    serde_json::from_str(data).map_err(|err| ConfigError::Corrupt {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Writes through a sibling `.tmp` file so readers never see half a file.
fn replace_file(path: &Path, contents: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn notes_become_slug_suffixes() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        assert_eq!(
            backup_name(at, Some("Before FY close!")),
            "config_20261016_093000_before-fy-close.json"
        );
        assert_eq!(backup_name(at, Some(" -- ")), "config_20261016_093000.json");
        assert_eq!(backup_name(at, None), "config_20261016_093000.json");
    }

    #[test]
    fn backup_names_parse_back() {
        let entry = BackupEntry::parse("config_20261016_093000_reject-mode.json").unwrap();
        assert_eq!(
            entry.created_at,
            Some(Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap())
        );
        assert_eq!(entry.note.as_deref(), Some("reject-mode"));

        let undated = BackupEntry::parse("config_manual.json").unwrap();
        assert!(undated.created_at.is_none());
        assert!(undated.note.is_none());

        assert!(BackupEntry::parse("notes.json").is_none());
        assert!(BackupEntry::parse("config_../../etc.json").is_none());
    }
}
