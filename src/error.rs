use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;


pub type Result<T, E = ConfError> = std::result::Result<T, E>;


/// Everything that can go wrong while reading, mutating or persisting a [`JsonConf`].
///
/// [`JsonConf`]: crate::JsonConf
#[derive(Debug, Error, Diagnostic)]
pub enum ConfError {
    /// A key was read that has neither been set nor declared as a default.
    #[error("key \"{key}\" is not defined")]
    #[diagnostic(code(jsonconf::undefined_key))]
    UndefinedKey { key: String },

    /// A key was set whose name is reserved by a method of the configuration kind.
    #[error("key \"{key}\" collides with a method of the same name")]
    #[diagnostic(
        code(jsonconf::key_conflict),
        help("Pick a different key name, method names can not be shadowed.")
    )]
    KeyConflict { key: String },

    /// The file on disk exists, but does not contain a JSON object.
    #[error("malformed configuration file at {}: {detail}", path.display())]
    #[diagnostic(
        code(jsonconf::malformed_file),
        help("Fix the file by hand or delete it to start over from the defaults.")
    )]
    MalformedFile {
        path: PathBuf,
        detail: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The file exists, but could not be read.
    #[error("failed to read configuration file at {}", path.display())]
    #[diagnostic(code(jsonconf::read_failure))]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the serialized configuration to disk failed.
    /// The previous file contents (if any) are left untouched.
    #[error("failed to write configuration file at {}", path.display())]
    #[diagnostic(code(jsonconf::persistence_failure))]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `save` was called on an instance that was never loaded from a file.
    #[error("configuration has no file path to save to")]
    #[diagnostic(
        code(jsonconf::missing_path),
        help("Use `save_as` for instances that were not created by `load`.")
    )]
    MissingPath,

    /// A value could not be converted to or from JSON through the attribute view.
    #[error("invalid value for key \"{key}\"")]
    #[diagnostic(code(jsonconf::invalid_value))]
    InvalidValue {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfError {
    pub(crate) fn undefined_key<S: Into<String>>(key: S) -> Self {
        Self::UndefinedKey { key: key.into() }
    }

    pub(crate) fn persistence_failure<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::PersistenceFailure {
            path: path.into(),
            source,
        }
    }
}
