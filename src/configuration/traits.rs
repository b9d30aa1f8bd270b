use miette::{miette, Context, Result};

/// A TOML table of the `jsonconf` tool configuration that is checked
/// and turned into its final form after deserialization.
///
/// Used for tables that need nothing but their own fields, such as `[output]`.
pub trait ResolvableConfiguration: Sized {
    type Resolved;

    /// Validate the table (e.g. bounds on `indent`) and convert it.
    fn resolve(self) -> Result<Self::Resolved>;

    /// Like [`resolve`][Self::resolve], naming `table_name` in the error.
    fn resolve_table(self, table_name: &str) -> Result<Self::Resolved> {
        self.resolve()
            .wrap_err_with(|| miette!("Failed to resolve {} table.", table_name))
    }
}


/// A tool configuration table whose resolution depends on where the
/// configuration was loaded from.
///
/// `[logging]` takes the configuration directory as its `Context` so that
/// `{CONFIGURATION_DIRECTORY}` in paths can be expanded, while the root table
/// takes the (optional) path of the configuration file itself.
pub trait ResolvableConfigurationWithContext: Sized {
    type Context;
    type Resolved;

    fn resolve(self, context: Self::Context) -> Result<Self::Resolved>;

    /// Like [`resolve`][Self::resolve], naming `table_name` in the error.
    fn resolve_table(self, context: Self::Context, table_name: &str) -> Result<Self::Resolved> {
        self.resolve(context)
            .wrap_err_with(|| miette!("Failed to resolve {} table.", table_name))
    }
}
