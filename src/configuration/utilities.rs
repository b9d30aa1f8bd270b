use std::{collections::HashMap, env::current_dir, path::{Path, PathBuf}};

use miette::{miette, Context, IntoDiagnostic, Result};


/// Returns the default configuration filepath, which is at
/// `{current directory}/data/configuration.toml`.
///
/// The file does not need to exist.
pub fn get_default_configuration_file_path() -> Result<PathBuf> {
    let mut configuration_filepath = current_dir()
        .into_diagnostic()
        .wrap_err_with(|| miette!("Could not get the current directory."))?;
    configuration_filepath.push("data/configuration.toml");

    Ok(configuration_filepath)
}


/// Placeholders available in path fields of the configuration.
pub fn placeholders_map(configuration_directory: &Path) -> HashMap<&'static str, String> {
    let mut placeholders_map = HashMap::with_capacity(1);

    placeholders_map.insert(
        "{CONFIGURATION_DIRECTORY}",
        configuration_directory.to_string_lossy().to_string(),
    );

    placeholders_map
}


#[must_use = "function returns the modified path"]
pub fn replace_placeholders_in_path<S>(
    original_path: S,
    placeholders: HashMap<&'static str, String>,
) -> PathBuf
where
    S: Into<String>,
{
    let mut path_string: String = original_path.into();

    for (key, value) in placeholders.into_iter() {
        path_string = path_string.replace(key, &value);
    }

    PathBuf::from(path_string)
}
