use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use tempfile::{Builder, NamedTempFile};
use tracing::info;

use super::{ConfKind, JsonConf, StringifyOptions};
use crate::error::{ConfError, Result};


/// Write `conf` back to the file it was loaded from, using the default [`StringifyOptions`].
///
/// # Errors
/// [`ConfError::MissingPath`] if `conf` is transient, otherwise see [`save_as`].
pub fn save<K: ConfKind>(conf: &JsonConf<K>) -> Result<()> {
    let path = conf.file_path().ok_or(ConfError::MissingPath)?;

    save_as_with(conf, path, &StringifyOptions::default())
}

/// Write `conf` to `path`, using the default [`StringifyOptions`].
///
/// The recorded path of `conf` is not changed, so a later [`save`] still
/// targets the file it was loaded from.
pub fn save_as<K: ConfKind, P: AsRef<Path>>(conf: &JsonConf<K>, path: P) -> Result<()> {
    save_as_with(conf, path, &StringifyOptions::default())
}

/// Write `conf` to `path` with explicit serialization options.
///
/// Missing parent directories are created. The file is replaced atomically:
/// the contents are written to a temporary file next to it, flushed and then
/// renamed over the target, so a failed write never leaves a truncated file behind.
/// An existing target keeps its permissions; a new one gets the usual mode for
/// newly created files.
///
/// # Errors
/// [`ConfError::PersistenceFailure`] if any of the file system operations fail.
pub fn save_as_with<K: ConfKind, P: AsRef<Path>>(
    conf: &JsonConf<K>,
    path: P,
    options: &StringifyOptions,
) -> Result<()> {
    let path = path.as_ref();
    let contents = conf.stringify(options);

    let parent_directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(parent_directory)
        .map_err(|source| ConfError::persistence_failure(parent_directory, source))?;

    let mut temporary_file = create_temporary_file(parent_directory)
        .map_err(|source| ConfError::persistence_failure(path, source))?;

    if let Ok(metadata) = fs::metadata(path) {
        temporary_file
            .as_file()
            .set_permissions(metadata.permissions())
            .map_err(|source| ConfError::persistence_failure(path, source))?;
    }

    temporary_file
        .write_all(contents.as_bytes())
        .and_then(|_| temporary_file.as_file().sync_all())
        .map_err(|source| ConfError::persistence_failure(path, source))?;

    temporary_file
        .persist(path)
        .map_err(|error| ConfError::persistence_failure(path, error.error))?;

    info!(
        kind = K::schema().name(),
        path = %path.display(),
        "Saved configuration."
    );

    Ok(())
}


#[cfg(unix)]
fn create_temporary_file(directory: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    // The process umask still applies, same as for `File::create`.
    Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(directory)
}

#[cfg(not(unix))]
fn create_temporary_file(directory: &Path) -> io::Result<NamedTempFile> {
    Builder::new().tempfile_in(directory)
}
