use clap::Parser;
use jsonconf::{JsonConf, Plain};
use miette::{miette, Context, IntoDiagnostic, Result};
use tracing::{debug, info};

use crate::{
    cli::{parse_value_argument, CLIArgs, CLICommand},
    configuration::Configuration,
    logging::initialize_tracing,
};

mod cli;
mod configuration;
mod logging;


/***
 * Compile-time configuration values
 */

/// Name of the log file inside the configured log directory.
pub const LOG_FILE_NAME: &str = "jsonconf.log";

/***
 * END OF compile-time configuration values
 */


fn run_command(command: CLICommand, configuration: &Configuration) -> Result<()> {
    match command {
        CLICommand::Show {
            file_path,
            indent,
            no_sort,
            keep_empty,
        } => {
            let conf = JsonConf::<Plain>::load(&file_path)
                .wrap_err_with(|| miette!("Failed to load {}.", file_path.display()))?;

            let options = configuration
                .output
                .stringify_options(indent, no_sort, keep_empty);

            println!("{}", conf.read().stringify(&options));
        }

        CLICommand::Get { file_path, key } => {
            let conf = JsonConf::<Plain>::load(&file_path)
                .wrap_err_with(|| miette!("Failed to load {}.", file_path.display()))?;

            let conf = conf.read();
            let value = conf.item(&key)?;

            println!(
                "{}",
                serde_json::to_string(value).into_diagnostic()?
            );
        }

        CLICommand::Set {
            file_path,
            key,
            value,
        } => {
            let conf = JsonConf::<Plain>::load(&file_path)
                .wrap_err_with(|| miette!("Failed to load {}.", file_path.display()))?;

            let mut conf = conf.write();
            conf.set(key.as_str(), parse_value_argument(&value))?;
            conf.save()
                .wrap_err_with(|| miette!("Failed to save {}.", file_path.display()))?;

            info!("Set {} in {}.", key, file_path.display());
        }

        CLICommand::Unset { file_path, key } => {
            let conf = JsonConf::<Plain>::load(&file_path)
                .wrap_err_with(|| miette!("Failed to load {}.", file_path.display()))?;

            let mut conf = conf.write();
            if conf.remove(&key).is_none() {
                return Err(miette!(
                    "Key {} is not set in {}.",
                    key,
                    file_path.display()
                ));
            }

            conf.save()
                .wrap_err_with(|| miette!("Failed to save {}.", file_path.display()))?;

            info!("Removed {} from {}.", key, file_path.display());
        }

        CLICommand::Copy {
            file_path,
            destination_path,
        } => {
            let conf = JsonConf::<Plain>::load(&file_path)
                .wrap_err_with(|| miette!("Failed to load {}.", file_path.display()))?;

            let options = configuration
                .output
                .stringify_options(None, false, false);

            conf.read()
                .save_as_with(&destination_path, &options)
                .wrap_err_with(|| {
                    miette!(
                        "Failed to write {}.",
                        destination_path.display()
                    )
                })?;

            info!(
                "Copied {} to {}.",
                file_path.display(),
                destination_path.display()
            );
        }
    }

    Ok(())
}


fn main() -> Result<()> {
    let cli_args = CLIArgs::parse();

    // Load configuration.
    let configuration = match cli_args.configuration_file_path.as_ref() {
        Some(path) => Configuration::load_from_path(path),
        None => Configuration::load_from_default_path(),
    }
    .wrap_err("Failed to load configuration file.")?;


    let log_file_output = configuration
        .logging
        .log_file_output_directory
        .as_deref()
        .map(|directory| {
            (
                configuration.logging.log_file_output_level_filter(),
                directory,
                LOG_FILE_NAME,
            )
        });

    let logging_raii_guard = initialize_tracing(
        configuration.logging.console_output_level_filter(),
        log_file_output,
    )
    .wrap_err("Failed to initialize tracing.")?;

    debug!("Tracing initialized.");

    match configuration.file_path.as_ref() {
        Some(path) => debug!("Configuration loaded: {}.", path.display()),
        None => debug!("No configuration file found, using defaults."),
    }


    run_command(cli_args.command, &configuration)?;


    drop(logging_raii_guard);
    Ok(())
}
