use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::{ConfKind, JsonConf, Result, Schema};


/// Something that remembers which item was picked for a query.
pub trait QueryHistory {
    fn save_query(&mut self, query: &str, name: &str) -> Result<()>;
}


/// Configuration kind for the query history: a `queries` object mapping
/// the query text to the name of the item last activated for it.
pub struct QueryHistoryConf;

static QUERY_HISTORY_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::extend(Schema::base(), "QueryHistoryConf")
        .default("queries", json!({}))
        .method("name_for_query")
        .method("save_query")
        .build()
});

impl ConfKind for QueryHistoryConf {
    fn schema() -> &'static Schema {
        &QUERY_HISTORY_SCHEMA
    }
}

impl JsonConf<QueryHistoryConf> {
    /// The name of the item last activated for `query`.
    pub fn name_for_query(&self, query: &str) -> Option<&str> {
        self.get("queries")?.get(query)?.as_str()
    }
}

impl QueryHistory for JsonConf<QueryHistoryConf> {
    /// Records the query and writes the history back to disk if it is file-backed.
    fn save_query(&mut self, query: &str, name: &str) -> Result<()> {
        let mut queries = match self.get("queries") {
            Some(Value::Object(queries)) => queries.clone(),
            _ => Map::new(),
        };
        queries.insert(query.to_string(), Value::String(name.to_string()));

        self.set("queries", Value::Object(queries))?;
        debug!(query, name, "Recorded query in history.");

        if self.file_path().is_some() {
            self.save()?;
        }

        Ok(())
    }
}
