use std::fs;
use std::path::{Path, PathBuf};

use miette::{Context, IntoDiagnostic, Result};
use serde::Deserialize;
use tracing::warn;

pub use self::logging::LoggingConfiguration;
use self::logging::UnresolvedLoggingConfiguration;
pub use self::output::OutputConfiguration;
use self::output::UnresolvedOutputConfiguration;
use super::traits::{ResolvableConfiguration, ResolvableConfigurationWithContext};
use super::utilities::get_default_configuration_file_path;

mod logging;
mod output;



#[derive(Deserialize, Debug, Default)]
pub(crate) struct UnresolvedConfiguration {
    /// Logging-related configuration.
    #[serde(default)]
    logging: UnresolvedLoggingConfiguration,

    /// How JSON files are printed and copied.
    #[serde(default)]
    output: UnresolvedOutputConfiguration,
}


/// The entire configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// This is the file path this `Configuration` instance was loaded from,
    /// or `None` if no configuration file exists and the defaults are in use.
    pub file_path: Option<PathBuf>,

    /// Logging-related configuration.
    pub logging: LoggingConfiguration,

    /// How JSON files are printed and copied.
    pub output: OutputConfiguration,
}


impl ResolvableConfigurationWithContext for UnresolvedConfiguration {
    type Resolved = Configuration;
    type Context = Option<PathBuf>;

    fn resolve(self, context: Self::Context) -> Result<Self::Resolved> {
        let configuration_directory = match context.as_deref().and_then(Path::parent) {
            Some(directory) => directory.to_path_buf(),
            None => std::env::current_dir()
                .into_diagnostic()
                .wrap_err("Could not get the current directory.")?,
        };

        let logging = self
            .logging
            .resolve_table(configuration_directory, "logging")?;

        let output = self.output.resolve_table("output")?;


        Ok(Configuration {
            file_path: context,
            logging,
            output,
        })
    }
}


impl Configuration {
    /// Load the configuration from a specific file path.
    /// If the file does not exist, the default configuration is returned.
    pub fn load_from_path<S: AsRef<Path>>(configuration_file_path: S) -> Result<Self> {
        let configuration_file_path = configuration_file_path.as_ref();

        if !configuration_file_path.exists() {
            warn!(
                "Configuration file {} does not exist, using defaults.",
                configuration_file_path.display()
            );

            return UnresolvedConfiguration::default()
                .resolve(None)
                .wrap_err("Failed to resolve default configuration.");
        }


        // Read the configuration file into memory.
        let configuration_string = fs::read_to_string(configuration_file_path)
            .into_diagnostic()
            .wrap_err("Could not read configuration file!")?;


        // Parse the string into the `UnresolvedConfiguration` structure and then resolve it.
        let unresolved_configuration =
            toml::from_str::<UnresolvedConfiguration>(&configuration_string)
                .into_diagnostic()
                .wrap_err("Could not load configuration file!")?;


        let configuration_file_path = dunce::canonicalize(configuration_file_path)
            .into_diagnostic()
            .wrap_err("Could not canonicalize configuration file path!")?;

        let resolved_configuration = unresolved_configuration
            .resolve(Some(configuration_file_path))
            .wrap_err("Failed to resolve configuration.")?;

        Ok(resolved_configuration)
    }

    /// Load the configuration from the default path (`./data/configuration.toml`).
    pub fn load_from_default_path() -> Result<Configuration> {
        Configuration::load_from_path(
            get_default_configuration_file_path()
                .wrap_err_with(|| "Could not load configuration file at default path.")?,
        )
    }
}
