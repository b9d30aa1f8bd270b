//! The process-wide identity cache: one live instance per (kind, canonical path).
//!
//! Loading the same file twice with the same kind hands out the same
//! [`SharedConf`], so every part of the program observes (and saves) a single
//! in-memory state. Once loaded, the in-memory state is authoritative: later
//! loads never re-read the file. Entries are never evicted.

use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    fs,
    io,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tracing::debug;

use super::{json_type_name, ConfKind, JsonConf};
use crate::error::{ConfError, Result};


/// A file-backed configuration instance, shared by everyone who loads it.
pub type SharedConf<K> = Arc<RwLock<JsonConf<K>>>;


#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    kind: TypeId,
    path: PathBuf,
}

impl CacheKey {
    fn new<K: ConfKind>(path: PathBuf) -> Self {
        Self {
            kind: TypeId::of::<K>(),
            path,
        }
    }
}

type AnyConf = Arc<dyn Any + Send + Sync>;

static INSTANCES: Lazy<Mutex<HashMap<CacheKey, AnyConf>>> = Lazy::new(|| Mutex::new(HashMap::new()));



/// Returns the shared instance of kind `K` backed by the file at `path`.
///
/// On the first call for a given kind and canonical path, a new instance is built
/// from the defaults of `K`, the file contents (if the file exists) are applied
/// on top of them, and the result is cached. Every later call returns that same
/// instance without touching the disk.
///
/// # Errors
/// - [`ConfError::MalformedFile`] if the file is not a JSON object,
/// - [`ConfError::ReadFailure`] if the file exists but can not be read,
/// - any error raised by [`ConfKind::set_item`] while applying the contents.
pub fn load<K: ConfKind>(path: impl AsRef<Path>) -> Result<SharedConf<K>> {
    let path = canonical_path(path.as_ref())
        .map_err(|source| ConfError::ReadFailure {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
    let key = CacheKey::new::<K>(path);

    let mut instances = INSTANCES.lock();

    if let Some(existing) = instances.get(&key) {
        debug!(
            kind = type_name::<K>(),
            path = %key.path.display(),
            "Configuration cache hit."
        );

        return Ok(downcast::<K>(existing.clone()));
    }


    debug!(
        kind = type_name::<K>(),
        path = %key.path.display(),
        "Configuration cache miss, reading file."
    );

    let mut conf = JsonConf::<K>::new()?;
    if let Some(contents) = read_object(&key.path)? {
        conf.update(contents)?;
    }
    conf.set_file_path(key.path.clone());

    let shared: SharedConf<K> = Arc::new(RwLock::new(conf));
    instances.insert(key, shared.clone());

    Ok(shared)
}

/// Returns `true` if an instance of kind `K` for `path` has already been loaded.
pub fn is_cached<K: ConfKind>(path: impl AsRef<Path>) -> bool {
    let Ok(path) = canonical_path(path.as_ref()) else {
        return false;
    };

    INSTANCES.lock().contains_key(&CacheKey::new::<K>(path))
}

fn downcast<K: ConfKind>(instance: AnyConf) -> SharedConf<K> {
    // PANIC SAFETY: entries are keyed by the `TypeId` of their kind,
    // so the stored instance is always a `RwLock<JsonConf<K>>`.
    instance.downcast::<RwLock<JsonConf<K>>>().unwrap()
}


/// Reads `path` as a JSON object. A missing file yields `None`.
fn read_object(path: &Path) -> Result<Option<serde_json::Map<String, Value>>> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfError::ReadFailure {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let document: Value =
        serde_json::from_slice(&contents).map_err(|source| ConfError::MalformedFile {
            path: path.to_path_buf(),
            detail: source.to_string(),
            source: Some(source),
        })?;

    match document {
        Value::Object(map) => Ok(Some(map)),
        other => Err(ConfError::MalformedFile {
            path: path.to_path_buf(),
            detail: format!("expected a JSON object, found {}", json_type_name(&other)),
            source: None,
        }),
    }
}



/// Resolve `path` to an absolute path with symlinks, `.` and `..` resolved.
///
/// The file itself does not need to exist: the nearest existing ancestor is
/// canonicalized and the remaining components are appended to it.
pub fn canonical_path(path: &Path) -> io::Result<PathBuf> {
    if path.exists() {
        return dunce::canonicalize(path);
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let absolute = normalize_lexically(&absolute);

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();

    while !existing.exists() {
        let (Some(parent), Some(name)) = (existing.parent(), existing.file_name()) else {
            break;
        };

        missing.push(name.to_os_string());
        existing = parent;
    }

    let mut resolved = if existing.exists() {
        dunce::canonicalize(existing)?
    } else {
        existing.to_path_buf()
    };

    for name in missing.into_iter().rev() {
        resolved.push(name);
    }

    Ok(resolved)
}

/// Drops `.` components and resolves `..` against the preceding component
/// without touching the file system.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}
