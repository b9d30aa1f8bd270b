//! Command-line interface definitions for the `jsonconf` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;



/// Command-line arguments.
#[derive(Parser)]
#[command(
    name = "jsonconf",
    author,
    about = "Inspect and edit JSON configuration files.",
    version
)]
pub struct CLIArgs {
    /// This is the path to the configuration file of the tool itself.
    /// If unspecified, this defaults to `./data/configuration.toml`.
    #[arg(
        short = 'c',
        long = "configuration-file-path",
        help = "Path to the tool's own configuration file. Defaults to ./data/configuration.toml"
    )]
    pub configuration_file_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CLICommand,
}


#[derive(Subcommand)]
pub enum CLICommand {
    /// Print the contents of a configuration file.
    Show {
        file_path: PathBuf,

        #[arg(
            long = "indent",
            help = "Pretty-print with this many spaces per level. \
                    If unspecified, the [output] table of the configuration decides."
        )]
        indent: Option<usize>,

        #[arg(long = "no-sort", help = "Keep the key order of the file instead of sorting.")]
        no_sort: bool,

        #[arg(
            long = "keep-empty",
            help = "Also print keys whose value is null, an empty array or an empty object."
        )]
        keep_empty: bool,
    },

    /// Print the value of a single key.
    Get { file_path: PathBuf, key: String },

    /// Set a key and save the file.
    Set {
        file_path: PathBuf,
        key: String,

        #[arg(help = "Value as JSON. Anything that is not valid JSON is stored as a string.")]
        value: String,
    },

    /// Remove a key and save the file.
    Unset { file_path: PathBuf, key: String },

    /// Write the contents of a configuration file to another path.
    Copy {
        file_path: PathBuf,
        destination_path: PathBuf,
    },
}


/// Parse a command-line value as JSON, falling back to a plain string
/// (so that `jsonconf set file.json name Alice` does not require quoting).
pub fn parse_value_argument(value: &str) -> Value {
    serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
}
