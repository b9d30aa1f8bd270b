//! Default schemas: the ordered defaults and reserved method names of a configuration kind.
//!
//! A schema is declared once per kind by extending the schema of its parent kind,
//! mirroring how a class body inherits from its base class:
//!
//! ```
//! use jsonconf::Schema;
//! use serde_json::json;
//!
//! let window = Schema::extend(Schema::base(), "Window")
//!     .default("width", json!(800))
//!     .default("height", json!(600))
//!     .method("area")
//!     .build();
//!
//! let dialog = Schema::extend(&window, "Dialog")
//!     .default("height", json!(200))
//!     .default("modal", json!(true))
//!     .build();
//!
//! // `height` keeps the position it was introduced at by `Window`.
//! let keys: Vec<_> = dialog.defaults().keys().cloned().collect();
//! assert_eq!(keys, ["width", "height", "modal"]);
//! assert!(dialog.is_reserved("area"));
//! ```

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};


/// Names of the methods callable on every configuration instance.
/// Keys with these names can never be set.
pub const BASE_METHOD_NAMES: &[&str] = &[
    "as_map",
    "attr",
    "clone",
    "contains_key",
    "file_path",
    "get",
    "get_mut",
    "has_attr",
    "is_empty",
    "item",
    "iter",
    "keys",
    "len",
    "remove",
    "save",
    "save_as",
    "save_as_with",
    "set",
    "set_attr",
    "store",
    "stringify",
    "to_string",
    "update",
    "update_with",
    "values",
];


static BASE_SCHEMA: Lazy<Schema> = Lazy::new(|| Schema {
    name: "JsonConf",
    defaults: Map::new(),
    reserved: BASE_METHOD_NAMES.iter().copied().collect(),
});


/// The merged defaults and reserved (method) names of one configuration kind.
#[derive(Debug, Clone)]
pub struct Schema {
    name: &'static str,
    defaults: Map<String, Value>,
    reserved: BTreeSet<&'static str>,
}

impl Schema {
    /// The root schema shared by every kind: no defaults, only the base method names.
    pub fn base() -> &'static Schema {
        &BASE_SCHEMA
    }

    /// Start declaring a schema that inherits everything from `parent`.
    pub fn extend(parent: &Schema, name: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            schema: Schema {
                name,
                defaults: parent.defaults.clone(),
                reserved: parent.reserved.clone(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns a fresh copy of the default entries, in first-introduction order.
    ///
    /// Every call clones the values, so containers handed to one instance
    /// are never shared with another instance or with the schema itself.
    pub fn defaults(&self) -> Map<String, Value> {
        self.defaults.clone()
    }

    /// Returns `true` if `key` is the name of a method and therefore can not be set.
    pub fn is_reserved(&self, key: &str) -> bool {
        self.reserved.contains(key)
    }

    pub fn reserved_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.reserved.iter().copied()
    }
}


/// Builder returned by [`Schema::extend`].
#[must_use = "call `build` to obtain the schema"]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Declare a default value.
    ///
    /// Overriding an inherited default replaces its value but keeps its position.
    /// Declaring a default under an inherited method name replaces that method.
    pub fn default<S: Into<String>>(mut self, key: S, value: Value) -> Self {
        let key = key.into();

        self.schema.reserved.remove(key.as_str());
        self.schema.defaults.insert(key, value);

        self
    }

    /// Declare a method name. An inherited default of the same name is dropped.
    pub fn method(mut self, name: &'static str) -> Self {
        self.schema.defaults.shift_remove(name);
        self.schema.reserved.insert(name);

        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}
