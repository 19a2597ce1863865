use crate::error::AppError;
use crate::model::Task;
use crate::storage::{Encoding, record_store};
use crate::store::Store;
use std::fs;
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

/// Loads the store from disk. A missing file is a first run and yields an
/// empty store; everything else is read in full and decoded.
pub fn load_store(path: &Path, encoding: Encoding) -> Result<Store, AppError> {
    if !path.exists() {
        return Ok(Store::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    encoding.decode(&content)
}

/// Replaces the store file atomically: the full store is serialized to a
/// temp file in the same directory, synced, then renamed over the live file.
/// A crash at any point leaves the previous file byte-identical; the live
/// file is never truncated in place.
pub fn save_store(path: &Path, encoding: Encoding, store: &Store) -> Result<(), AppError> {
    let content = encoding.encode(store)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|err| AppError::io(format!("{}: {}", parent.display(), err)))?;
    }

    let temp_path = write_replacement(path, &content)?;
    if let Err(err) = fs::rename(&temp_path, path) {
        fs::remove_file(&temp_path).ok();
        return Err(AppError::io(format!("{}: {}", path.display(), err)));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, permissions)
            .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    }

    Ok(())
}

/// Writes the replacement content to a temp file beside the target and
/// returns its path. The caller renames it into place; until then the live
/// file is untouched.
fn write_replacement(path: &Path, content: &str) -> Result<PathBuf, AppError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| AppError::io(format!("{}: not a file path", path.display())))?;
    let temp_name = format!(
        "{}.tmp.{}",
        file_name.to_string_lossy(),
        std::process::id()
    );
    let temp_path = path.with_file_name(temp_name);

    let result = fs::File::create(&temp_path)
        .and_then(|mut file| {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                file.set_permissions(fs::Permissions::from_mode(0o600))?;
            }
            file.write_all(content.as_bytes())?;
            file.sync_all()
        })
        .map_err(|err| AppError::io(format!("{}: {}", temp_path.display(), err)));

    if let Err(err) = result {
        fs::remove_file(&temp_path).ok();
        return Err(err);
    }

    Ok(temp_path)
}

/// Append path for the record-stream encoding: assigns `last id + 1` by
/// parsing only the final record's id field and appends one record, leaving
/// all earlier bytes untouched. Mutating operations always take the full
/// atomic rewrite instead.
pub fn append_record(
    path: &Path,
    delimiter: char,
    message: &str,
    now: &str,
) -> Result<Task, AppError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("message is required"));
    }

    let last_id = if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
        record_store::last_record_id(&content, delimiter)?
    } else {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|err| AppError::io(format!("{}: {}", parent.display(), err)))?;
        }
        None
    };

    let task = Task {
        id: last_id.unwrap_or(0) + 1,
        message: trimmed.to_string(),
        created_at: now.to_string(),
        completed_at: None,
        done: false,
    };

    let mut record = record_store::encode_record(&task, delimiter);
    record.push('\n');

    let mut options = fs::OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    file.write_all(record.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;

    Ok(task)
}

/// Advisory lock over a store file, held for the full load-mutate-save span
/// of one invocation. The lock is a sentinel file beside the store, created
/// exclusively and removed when the guard drops on any exit path.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    pub fn acquire(store_path: &Path) -> Result<Self, AppError> {
        let path = lock_path(store_path);

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|err| AppError::io(format!("{}: {}", parent.display(), err)))?;
        }

        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(Self { path }),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Err(AppError::io(format!(
                "{}: store is locked by another invocation",
                path.display()
            ))),
            Err(err) => Err(AppError::io(format!("{}: {}", path.display(), err))),
        }
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        fs::remove_file(&self.path).ok();
    }
}

fn lock_path(store_path: &Path) -> PathBuf {
    let mut name = store_path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}
