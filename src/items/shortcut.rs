use once_cell::sync::Lazy;
use serde_json::{json, Value};

use super::{Action, Query, QueryHistory, ResultItem};
use crate::{ConfKind, JsonConf, Result, Schema};


/// Placeholder in a shortcut command that is replaced by the query argument.
const ARGUMENT_PLACEHOLDER: &str = "%s";

/// Shown in place of the argument while none has been typed yet.
const MISSING_ARGUMENT: &str = "...";


/// Configuration kind of a user-defined shortcut.
pub struct ShortcutRecord;

static SHORTCUT_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::extend(Schema::base(), "ShortcutRecord")
        .default("keyword", json!(""))
        .default("name", json!(""))
        .default("cmd", json!(""))
        .default("icon", Value::Null)
        .default("is_default_search", json!(false))
        .default("run_without_argument", json!(false))
        .build()
});

impl ConfKind for ShortcutRecord {
    fn schema() -> &'static Schema {
        &SHORTCUT_SCHEMA
    }
}


/// A shortcut as a search result: opens a URL or runs a script, with the
/// query argument substituted for `%s` in its command.
#[derive(Debug, Clone)]
pub struct ShortcutResult {
    record: JsonConf<ShortcutRecord>,
}

impl ShortcutResult {
    pub fn new<S: Into<String>>(keyword: S, name: S, cmd: S, icon: Option<S>) -> Result<Self> {
        let record = JsonConf::from_entries([
            ("keyword", Value::String(keyword.into())),
            ("name", Value::String(name.into())),
            ("cmd", Value::String(cmd.into())),
            ("icon", icon.map_or(Value::Null, |icon| Value::String(icon.into()))),
        ])?;

        Ok(Self { record })
    }

    pub fn from_record(record: JsonConf<ShortcutRecord>) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &JsonConf<ShortcutRecord> {
        &self.record
    }

    pub fn set_default_search(&mut self, is_default_search: bool) -> Result<()> {
        self.record.set_attr("is_default_search", is_default_search)
    }

    pub fn set_run_without_argument(&mut self, run_without_argument: bool) -> Result<()> {
        self.record.set_attr("run_without_argument", run_without_argument)
    }

    fn text(&self, key: &str) -> String {
        self.record.attr::<String>(key).unwrap_or_default()
    }

    fn flag(&self, key: &str) -> bool {
        self.record.attr::<bool>(key).unwrap_or_default()
    }

    /// The argument to substitute for this query, if any.
    fn argument<'q>(&self, query: &'q Query) -> Option<&'q str> {
        match query.argument() {
            Some(argument) if query.keyword() == self.text("keyword") => Some(argument),
            _ if self.flag("is_default_search") => Some(query.text()),
            _ => None,
        }
    }
}

impl ResultItem for ShortcutResult {
    fn keyword(&self) -> String {
        self.text("keyword")
    }

    fn name(&self) -> String {
        self.text("name")
    }

    fn description(&self, query: &Query) -> String {
        let cmd = self.text("cmd");

        cmd.replace(
            ARGUMENT_PLACEHOLDER,
            self.argument(query).unwrap_or(MISSING_ARGUMENT),
        )
    }

    fn icon(&self) -> Option<String> {
        self.record.attr::<Option<String>>("icon").ok().flatten()
    }

    fn on_enter(&self, query: &Query, history: &mut dyn QueryHistory) -> Result<Action> {
        history.save_query(query.text(), &self.name())?;

        let cmd = self.text("cmd");

        let command = if self.flag("run_without_argument") {
            cmd
        } else if let Some(argument) = self.argument(query) {
            cmd.replace(ARGUMENT_PLACEHOLDER, argument)
        } else {
            return Ok(Action::SetUserQuery(format!("{} ", self.keyword())));
        };

        if command.starts_with("http://") || command.starts_with("https://") {
            Ok(Action::OpenUrl(command))
        } else {
            Ok(Action::RunScript(command))
        }
    }
}
