//! Line-preserving model of a `.env` file.
//!
//! DESIGN
//! ======
//! A file is an ordered list of lines: key/value entries, comments, blanks,
//! and anything unparseable. Non-entry lines survive every edit verbatim, so
//! a rewrite touches only the entries that changed. Values are stored
//! unquoted in memory; serialization re-quotes when the value needs it.
//!
//! ERROR HANDLING
//! ==============
//! Writes go through a temp file in the same directory. The previous file is
//! copied to `<name>.bak` before the rename, and a failed rename restores
//! from that backup. A missing file loads as an empty model so the first
//! `set` can create it.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Key fragments that mark a value as sensitive, matched case-insensitively.
pub const SENSITIVE_KEY_MARKERS: [&str; 6] = [
    "SECRET",
    "PASSWORD",
    "TOKEN",
    "API_KEY",
    "PRIVATE_KEY",
    "CONNECTION_STRING",
];

#[derive(Debug, thiserror::Error)]
pub enum EnvFileError {
    #[error("could not read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("could not replace {}: {source}", .path.display())]
    Replace { path: PathBuf, source: io::Error },
    #[error(
        "could not replace {}: {source}; backup kept at {}",
        .path.display(),
        .backup.display()
    )]
    ReplaceUnrecoverable {
        path: PathBuf,
        backup: PathBuf,
        source: io::Error,
    },
}

/// One line of the file. `Other` holds text that is neither a comment, a
/// blank, nor a `key=value` pair; it is preserved as found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Entry { key: String, value: String },
    Comment(String),
    Blank,
    Other(String),
}

impl Line {
    fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Blank;
        }
        if trimmed.starts_with('#') {
            return Self::Comment(raw.to_owned());
        }
        match raw.split_once('=') {
            Some((key, value)) => Self::Entry {
                key: key.trim().to_owned(),
                value: unquote(value),
            },
            None => Self::Other(raw.to_owned()),
        }
    }
}

#[derive(Debug, Default)]
pub struct EnvFile {
    lines: Vec<Line>,
}

impl EnvFile {
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(Line::parse).collect(),
        }
    }

    /// Loads `path`, treating a missing file as empty.
    pub fn load(path: &Path) -> Result<Self, EnvFileError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Self::parse(&content)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(EnvFileError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Value of the first entry named `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Entry { key: name, value } if name == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Updates the first entry named `key` in place, or appends a new entry.
    /// Returns `true` when an existing entry was updated.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        for line in &mut self.lines {
            if let Line::Entry { key: name, value: slot } = line {
                if name == key {
                    *slot = value.to_owned();
                    return true;
                }
            }
        }
        self.lines.push(Line::Entry {
            key: key.to_owned(),
            value: value.to_owned(),
        });
        false
    }

    /// Removes every entry named `key`. Returns `true` when anything was
    /// removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.lines.len();
        self.lines
            .retain(|line| !matches!(line, Line::Entry { key: name, .. } if name == key));
        self.lines.len() != before
    }

    /// Entries in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry { key, value } => Some((key.as_str(), value.as_str())),
            _ => None,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Entry { key, value } => {
                    out.push_str(key);
                    out.push('=');
                    out.push_str(&quote(value));
                }
                Line::Comment(text) | Line::Other(text) => out.push_str(text),
                Line::Blank => {}
            }
            out.push('\n');
        }
        out
    }

    /// Writes the file atomically: render to a sibling temp file, copy the
    /// current file to `<name>.bak`, then rename the temp over the target.
    pub fn save(&self, path: &Path) -> Result<(), EnvFileError> {
        let temp_path = sibling_temp_path(path);
        let result = self.save_via(path, &temp_path);
        if temp_path.exists() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }

    fn save_via(&self, path: &Path, temp_path: &Path) -> Result<(), EnvFileError> {
        fs::write(temp_path, self.render()).map_err(|source| EnvFileError::Write {
            path: temp_path.to_path_buf(),
            source,
        })?;

        let backup = backup_path(path);
        let had_original = path.exists();
        if had_original {
            fs::copy(path, &backup).map_err(|source| EnvFileError::Write {
                path: backup.clone(),
                source,
            })?;
            // The rename replaces the file's metadata with the temp file's,
            // so carry the original mode over first.
            if let Ok(metadata) = fs::metadata(path) {
                let _ = fs::set_permissions(temp_path, metadata.permissions());
            }
        }

        if let Err(source) = fs::rename(temp_path, path) {
            if had_original && !path.exists() && fs::rename(&backup, path).is_err() {
                return Err(EnvFileError::ReplaceUnrecoverable {
                    path: path.to_path_buf(),
                    backup,
                    source,
                });
            }
            return Err(EnvFileError::Replace {
                path: path.to_path_buf(),
                source,
            });
        }

        Ok(())
    }
}

/// Whether a key name suggests its value should be masked.
pub fn is_sensitive_key(key: &str) -> bool {
    let upper = key.to_uppercase();
    SENSITIVE_KEY_MARKERS
        .iter()
        .any(|marker| upper.contains(marker))
}

/// Strips one matching pair of surrounding quotes. Double-quoted values also
/// have `\"` and `\\` escapes resolved; single-quoted values are literal.
fn unquote(raw: &str) -> String {
    let value = raw.trim();
    if value.len() >= 2 {
        if let Some(inner) = value
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            return unescape(inner);
        }
        if let Some(inner) = value
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
        {
            return inner.to_owned();
        }
    }
    value.to_owned()
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Quotes `value` when it would not survive a round-trip bare: empty values,
/// whitespace, `#`, `=`, or quote characters.
fn quote(value: &str) -> String {
    if value.is_empty() {
        return "\"\"".to_owned();
    }
    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | '=' | '"' | '\''));
    if !needs_quotes {
        return value.to_owned();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn sibling_temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(OsStr::to_string_lossy)
        .unwrap_or_default();
    path.with_file_name(format!("{name}.{}.tmp", Uuid::new_v4()))
}

fn backup_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(OsStr::to_string_lossy)
        .unwrap_or_default();
    path.with_file_name(format!("{name}.bak"))
}

#[cfg(test)]
#[path = "env_file_test.rs"]
mod tests;
