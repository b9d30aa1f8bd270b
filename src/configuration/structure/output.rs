use jsonconf::{default_value_blacklist, StringifyOptions};
use miette::{miette, Result};
use serde::Deserialize;

use crate::configuration::traits::ResolvableConfiguration;


/// Widest indentation we accept; anything larger is almost certainly a typo.
const MAXIMUM_INDENT: usize = 16;


#[derive(Deserialize, Clone, Debug)]
pub(super) struct UnresolvedOutputConfiguration {
    #[serde(default)]
    indent: Option<usize>,

    #[serde(default = "default_sort_keys")]
    sort_keys: bool,

    #[serde(default)]
    keep_empty_values: bool,
}

impl Default for UnresolvedOutputConfiguration {
    fn default() -> Self {
        Self {
            indent: None,
            sort_keys: default_sort_keys(),
            keep_empty_values: false,
        }
    }
}

fn default_sort_keys() -> bool {
    true
}


#[derive(Clone, Debug)]
pub struct OutputConfiguration {
    pub indent: Option<usize>,

    pub sort_keys: bool,

    /// Print `null`, `[]` and `{}` values instead of leaving them out.
    pub keep_empty_values: bool,
}

impl ResolvableConfiguration for UnresolvedOutputConfiguration {
    type Resolved = OutputConfiguration;

    fn resolve(self) -> Result<Self::Resolved> {
        if let Some(indent) = self.indent {
            if indent > MAXIMUM_INDENT {
                return Err(miette!(
                    "Field indent must be at most {}, got {}.",
                    MAXIMUM_INDENT,
                    indent
                ));
            }
        }


        Ok(Self::Resolved {
            indent: self.indent,
            sort_keys: self.sort_keys,
            keep_empty_values: self.keep_empty_values,
        })
    }
}

impl OutputConfiguration {
    /// Serialization options, with command-line overrides applied on top.
    pub fn stringify_options(
        &self,
        indent: Option<usize>,
        no_sort: bool,
        keep_empty: bool,
    ) -> StringifyOptions {
        let value_blacklist = if keep_empty || self.keep_empty_values {
            Vec::new()
        } else {
            default_value_blacklist()
        };

        StringifyOptions::default()
            .indent(indent.or(self.indent))
            .sort_keys(self.sort_keys && !no_sort)
            .value_blacklist(value_blacklist)
    }
}
