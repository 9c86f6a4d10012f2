//! Variable store backed by the cache file
//!
//! Provides a `VariableStore` that loads the cache file lazily on first access
//! and rewrites the whole file after every successful mutation.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use thiserror::Error;

use super::codec::{self, CodecError};

/// File name of the variables cache inside the user cache directory
pub const CACHE_FILE_NAME: &str = "gocu.cache";

/// Permission bits for the cache file (read/write/execute for owner and group)
#[cfg(unix)]
const CACHE_FILE_MODE: u32 = 0o770;

/// Errors returned by variable store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The variable is not in the store
    #[error("Variable {0:?} does not exist")]
    NotFound(String),

    /// `add` was called for a name that is already present
    #[error("Variable named {name:?} (value={value}) already exists. Use modify command to override.")]
    AlreadyExists { name: String, value: String },

    /// Name or value contains the reserved separator character
    #[error("The {field} of variable {name:?} contains the reserved zero-width space character (U+200B)")]
    ReservedSeparator {
        /// Either `"name"` or `"value"`
        field: &'static str,
        name: String,
    },

    /// The cache file could not be decoded
    #[error(transparent)]
    CorruptFormat(#[from] CodecError),

    /// The user cache directory could not be determined
    #[error("Couldn't retrieve variables cache path: no home directory found")]
    NoCacheDir,

    /// A filesystem operation on the cache file failed
    #[error("Couldn't {action} variables cache ({}): {source}", .path.display())]
    Storage {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn storage<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> Self + 'a {
        move |source| StoreError::Storage {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Persistent name to value mapping used for placeholder substitution
///
/// The backing file is read on the first call that needs the variables, so
/// creating a store never touches the filesystem, and the default location
/// is not even looked up until then. Every successful `add`, `modify` and
/// `remove` re-encodes the full mapping and replaces the file before
/// returning.
///
/// There is no locking between processes: two invocations mutating the same
/// file at the same time can lose one of the updates.
#[derive(Debug)]
pub struct VariableStore {
    /// Path of the cache file, `None` until the default location is resolved
    path: Option<PathBuf>,
    /// Loaded variables, `None` until first access
    entries: Option<HashMap<String, String>>,
}

impl VariableStore {
    /// Creates a store backed by `gocu.cache` in the platform user cache
    /// directory (`~/.cache` on Linux, `~/Library/Caches` on macOS,
    /// `%LOCALAPPDATA%` on Windows).
    ///
    /// The directory is resolved on first access; a missing home directory
    /// surfaces then as `StoreError::NoCacheDir`.
    pub fn open_default() -> Self {
        Self {
            path: None,
            entries: None,
        }
    }

    /// Creates a store backed by a specific file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            entries: None,
        }
    }

    /// Path of the backing cache file, if already known
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the value of a variable
    pub fn get(&mut self, name: &str) -> Result<String, StoreError> {
        self.entries()?
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Adds a new variable, failing if the name is already taken
    pub fn add(&mut self, name: &str, value: &str) -> Result<(), StoreError> {
        validate(name, value)?;
        if let Some(existing) = self.entries()?.get(name) {
            return Err(StoreError::AlreadyExists {
                name: name.to_string(),
                value: existing.clone(),
            });
        }

        self.set(name, value)?;

        tracing::info!("Added variable {}={}", name, value);
        Ok(())
    }

    /// Overwrites the value of an existing variable
    pub fn modify(&mut self, name: &str, value: &str) -> Result<(), StoreError> {
        validate(name, value)?;
        let old_value = self.get(name)?;

        self.set(name, value)?;

        tracing::info!(
            "Modified value of variable {:?} ({} => {})",
            name,
            old_value,
            value
        );
        Ok(())
    }

    /// Removes a variable
    pub fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        let entries = self.entries()?;
        let value = entries
            .remove(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;

        if let Err(e) = self.save() {
            self.entries()?.insert(name.to_string(), value);
            return Err(e);
        }

        tracing::info!("Deleted variable {}={}", name, value);
        Ok(())
    }

    /// Removes every variable one by one.
    ///
    /// Stops at the first failure; variables removed before it stay removed.
    pub fn remove_all(&mut self) -> Result<(), StoreError> {
        let names: Vec<String> = self.entries()?.keys().cloned().collect();
        for name in names {
            self.remove(&name)?;
        }
        Ok(())
    }

    /// Returns a copy of all stored variables
    pub fn list(&mut self) -> Result<HashMap<String, String>, StoreError> {
        Ok(self.entries()?.clone())
    }

    /// Inserts or replaces a variable and persists, restoring the previous
    /// value if the write fails.
    fn set(&mut self, name: &str, value: &str) -> Result<(), StoreError> {
        let previous = self
            .entries()?
            .insert(name.to_string(), value.to_string());

        if let Err(e) = self.save() {
            let entries = self.entries()?;
            match previous {
                Some(previous) => entries.insert(name.to_string(), previous),
                None => entries.remove(name),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Returns the cache file path, resolving the default location once
    fn cache_path(&mut self) -> Result<PathBuf, StoreError> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let base_dirs = BaseDirs::new().ok_or(StoreError::NoCacheDir)?;
        let path = base_dirs.cache_dir().join(CACHE_FILE_NAME);
        self.path = Some(path.clone());
        Ok(path)
    }

    /// Returns the loaded variables, reading the cache file on first use
    fn entries(&mut self) -> Result<&mut HashMap<String, String>, StoreError> {
        if self.entries.is_none() {
            let path = self.cache_path()?;
            self.entries = Some(load(&path)?);
        }
        Ok(self.entries.get_or_insert_with(HashMap::new))
    }

    /// Writes the full mapping to the cache file.
    ///
    /// The content goes to a sibling temporary file first and is renamed over
    /// the cache file, so a crash mid-write leaves the old file in place.
    fn save(&self) -> Result<(), StoreError> {
        let path = self.path.as_deref().ok_or(StoreError::NoCacheDir)?;
        let content = match &self.entries {
            Some(entries) => codec::encode(entries),
            None => String::new(),
        };

        let target = write_target(path);
        let temp_path = target.with_extension("cache.tmp");
        let result =
            write_synced(&temp_path, &content).and_then(|()| fs::rename(&temp_path, &target));
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result.map_err(StoreError::storage("save", path))
    }
}

/// Creates the cache file if needed and decodes its content
fn load(path: &Path) -> Result<HashMap<String, String>, StoreError> {
    if !path.exists() {
        create(path)?;
    }

    let content = fs::read_to_string(path).map_err(StoreError::storage("read", path))?;
    let vars = codec::decode(&content)?;

    tracing::debug!(path = %path.display(), count = vars.len(), "variables cache loaded");
    Ok(vars)
}

/// Creates an empty cache file, including missing parent directories
fn create(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(StoreError::storage("create", path))?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(false);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(CACHE_FILE_MODE);
    }
    options
        .open(path)
        .map_err(StoreError::storage("create", path))?;

    tracing::info!("Cache created ({})", path.display());
    Ok(())
}

/// File the rename must land on: the link target when the cache file is a
/// symlink, so the link itself is kept
fn write_target(path: &Path) -> PathBuf {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

/// Writes `content` to a fresh file at `path` and flushes it to disk
fn write_synced(path: &Path, content: &str) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(CACHE_FILE_MODE))?;
    }
    file.sync_all()
}

/// Rejects names and values that would corrupt the cache file
fn validate(name: &str, value: &str) -> Result<(), StoreError> {
    let field = if codec::contains_reserved(name) {
        "name"
    } else if codec::contains_reserved(value) {
        "value"
    } else {
        return Ok(());
    };
    Err(StoreError::ReservedSeparator {
        field,
        name: name.to_string(),
    })
}
