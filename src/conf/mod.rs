//! The configuration object: an ordered key/value store with a mapping view
//! and a typed attribute view, both funnelled through a single mutation entry point.

use std::{
    fmt,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

pub use self::cache::{canonical_path, is_cached, load, SharedConf};
pub(crate) use self::cache::normalize_lexically;
pub use self::persist::{save, save_as, save_as_with};
pub use self::schema::{Schema, SchemaBuilder, BASE_METHOD_NAMES};
pub use self::stringify::{default_value_blacklist, stringify, StringifyOptions};
use crate::error::{ConfError, Result};

mod cache;
mod persist;
mod schema;
mod stringify;



/// A configuration "class": supplies the default schema and may customise
/// how keys are set.
///
/// ```
/// use jsonconf::{ConfKind, JsonConf, Schema};
/// use once_cell::sync::Lazy;
/// use serde_json::json;
///
/// struct Appearance;
///
/// static APPEARANCE: Lazy<Schema> = Lazy::new(|| {
///     Schema::extend(Schema::base(), "Appearance")
///         .default("theme", json!("light"))
///         .default("font_size", json!(12))
///         .build()
/// });
///
/// impl ConfKind for Appearance {
///     fn schema() -> &'static Schema {
///         &APPEARANCE
///     }
/// }
///
/// let appearance = JsonConf::<Appearance>::new().unwrap();
/// assert_eq!(appearance.attr::<String>("theme").unwrap(), "light");
/// ```
pub trait ConfKind: Sized + 'static {
    /// The default schema of this kind. Built once, usually in a `Lazy` static.
    fn schema() -> &'static Schema;

    /// The single mutation entry point.
    ///
    /// Every state change (construction, [`JsonConf::set`], [`JsonConf::set_attr`]
    /// and [`JsonConf::update`]) ends up here. Override it to transform keys or
    /// values before they are stored; call [`JsonConf::store`] to actually store them.
    fn set_item(conf: &mut JsonConf<Self>, key: String, value: Value) -> Result<()> {
        conf.store(key, value)
    }
}


/// The base configuration kind: no defaults, only the base method names are reserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl ConfKind for Plain {
    fn schema() -> &'static Schema {
        Schema::base()
    }
}



/// A JSON-compatible configuration object of kind `K`.
///
/// Instances are either transient (built with [`JsonConf::new`] and friends)
/// or file-backed, in which case they are obtained through [`JsonConf::load`]
/// and shared process-wide.
pub struct JsonConf<K: ConfKind = Plain> {
    entries: Map<String, Value>,

    /// Canonical path this instance was loaded from, if any.
    file_path: Option<PathBuf>,

    kind: PhantomData<fn() -> K>,
}


impl<K: ConfKind> JsonConf<K> {
    fn empty() -> Self {
        Self {
            entries: Map::new(),
            file_path: None,
            kind: PhantomData,
        }
    }

    /// Create a transient instance holding the defaults of `K`.
    pub fn new() -> Result<Self> {
        let mut conf = Self::empty();
        conf.update(K::schema().defaults())?;

        Ok(conf)
    }

    /// Create a transient instance: defaults, then `entries` on top.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let mut conf = Self::new()?;
        conf.update(entries)?;

        Ok(conf)
    }

    /// Create a transient instance: defaults, then `mapping`, then `overrides`.
    pub fn with_overrides<I, S, O, T>(mapping: I, overrides: O) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
        O: IntoIterator<Item = (T, Value)>,
        T: Into<String>,
    {
        let mut conf = Self::new()?;
        conf.update_with(mapping, overrides)?;

        Ok(conf)
    }

    /// Create a transient instance from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_entries(map),
            other => Err(ConfError::InvalidValue {
                key: String::new(),
                source: <serde_json::Error as serde::de::Error>::custom(format!(
                    "expected a JSON object, found {}",
                    json_type_name(&other)
                )),
            }),
        }
    }

    /// Returns the shared instance of kind `K` backed by `path`.
    /// See [`load`](crate::load).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<SharedConf<K>> {
        cache::load::<K>(path)
    }

    /// The canonical path this instance was loaded from, or `None` for transient instances.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub(crate) fn set_file_path(&mut self, path: PathBuf) {
        self.file_path = Some(path);
    }


    /*
     * Mutation
     */

    /// Store `value` under `key` without going through [`ConfKind::set_item`].
    ///
    /// This is the base behaviour custom `set_item` implementations delegate to.
    /// Fails with [`ConfError::KeyConflict`] if `key` names a method of `K`.
    pub fn store<S: Into<String>>(&mut self, key: S, value: Value) -> Result<()> {
        let key = key.into();

        if K::schema().is_reserved(&key) {
            return Err(ConfError::KeyConflict { key });
        }

        trace!(kind = K::schema().name(), key = %key, "Storing configuration entry.");
        self.entries.insert(key, value);

        Ok(())
    }

    /// Set a key through the mapping view.
    pub fn set<S: Into<String>>(&mut self, key: S, value: Value) -> Result<()> {
        K::set_item(self, key.into(), value)
    }

    /// Apply every entry in iteration order; later entries with the same key win.
    pub fn update<I, S>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        for (key, value) in entries {
            K::set_item(self, key.into(), value)?;
        }

        Ok(())
    }

    /// Apply `mapping`, then `overrides`.
    pub fn update_with<I, S, O, T>(&mut self, mapping: I, overrides: O) -> Result<()>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
        O: IntoIterator<Item = (T, Value)>,
        T: Into<String>,
    {
        self.update(mapping)?;
        self.update(overrides)
    }

    /// Remove a key, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }


    /*
     * Mapping view
     */

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Mutable access to a stored value, e.g. to edit a nested container in place.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Like [`get`](Self::get), but a missing key is an [`ConfError::UndefinedKey`] error.
    pub fn item(&self, key: &str) -> Result<&Value> {
        self.entries
            .get(key)
            .ok_or_else(|| ConfError::undefined_key(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }


    /*
     * Attribute view
     */

    /// Read a key as a typed attribute.
    pub fn attr<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.item(name)?;

        T::deserialize(value).map_err(|source| ConfError::InvalidValue {
            key: name.to_string(),
            source,
        })
    }

    /// Set a key from any serializable value.
    pub fn set_attr<S, T>(&mut self, name: S, value: T) -> Result<()>
    where
        S: Into<String>,
        T: Serialize,
    {
        let name = name.into();
        let value = serde_json::to_value(value).map_err(|source| ConfError::InvalidValue {
            key: name.clone(),
            source,
        })?;

        K::set_item(self, name, value)
    }

    /// Returns `true` exactly when `name` is currently set.
    pub fn has_attr(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }


    /*
     * Serialization
     */

    pub fn stringify(&self, options: &StringifyOptions) -> String {
        stringify::stringify_map(&self.entries, options)
    }

    /// Write this instance to the file it was loaded from.
    pub fn save(&self) -> Result<()> {
        persist::save(self)
    }

    /// Write this instance to `path`. The recorded file path stays unchanged.
    pub fn save_as<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persist::save_as(self, path)
    }

    pub fn save_as_with<P: AsRef<Path>>(&self, path: P, options: &StringifyOptions) -> Result<()> {
        persist::save_as_with(self, path, options)
    }
}


/// A clone is always transient: it carries the entries, but neither the file
/// path nor the cache identity of the original.
impl<K: ConfKind> Clone for JsonConf<K> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            file_path: None,
            kind: PhantomData,
        }
    }
}

impl<K: ConfKind> fmt::Debug for JsonConf<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(K::schema().name())
            .field("entries", &self.entries)
            .field("file_path", &self.file_path)
            .finish()
    }
}

impl<K: ConfKind> fmt::Display for JsonConf<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify(&StringifyOptions::default()))
    }
}

impl<K: ConfKind, L: ConfKind> PartialEq<JsonConf<L>> for JsonConf<K> {
    fn eq(&self, other: &JsonConf<L>) -> bool {
        self.entries == other.entries
    }
}

impl<K: ConfKind> Eq for JsonConf<K> {}

impl<K: ConfKind> PartialEq<Map<String, Value>> for JsonConf<K> {
    fn eq(&self, other: &Map<String, Value>) -> bool {
        &self.entries == other
    }
}

impl<K: ConfKind> Serialize for JsonConf<K> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'a, K: ConfKind> IntoIterator for &'a JsonConf<K> {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}


pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}


#[cfg(test)]
mod tests {
    use once_cell::sync::Lazy;
    use serde_json::json;

    use super::*;

    struct WithDefaults;

    static WITH_DEFAULTS: Lazy<Schema> = Lazy::new(|| {
        Schema::extend(Schema::base(), "WithDefaults")
            .default("b", json!(1))
            .default("a", json!(2))
            .default("subdict", json!({}))
            .method("sum")
            .build()
    });

    impl ConfKind for WithDefaults {
        fn schema() -> &'static Schema {
            &WITH_DEFAULTS
        }
    }

    impl JsonConf<WithDefaults> {
        fn sum(&self) -> Result<i64> {
            Ok(self.attr::<i64>("a")? + self.attr::<i64>("b")?)
        }
    }


    struct UnderscorePrefix;

    impl ConfKind for UnderscorePrefix {
        fn schema() -> &'static Schema {
            Schema::base()
        }

        fn set_item(conf: &mut JsonConf<Self>, key: String, value: Value) -> Result<()> {
            conf.store(format!("_{key}"), value)
        }
    }


    #[test]
    fn reading_unset_attribute_fails_until_set() {
        let mut conf = JsonConf::<Plain>::new().unwrap();

        assert!(!conf.has_attr("a"));
        assert!(matches!(
            conf.attr::<bool>("a"),
            Err(ConfError::UndefinedKey { key }) if key == "a"
        ));

        conf.set_attr("a", false).unwrap();

        assert!(conf.has_attr("a"));
        assert!(!conf.attr::<bool>("a").unwrap());
    }

    #[test]
    fn construction_paths_compare_equal() {
        let mut conf = JsonConf::<Plain>::new().unwrap();
        conf.set_attr("a", 1).unwrap();
        conf.update_with([("b", json!(2))], [("c", json!(3))]).unwrap();
        conf.set("d", json!(4)).unwrap();

        let expected = JsonConf::<Plain>::from_entries([
            ("a", json!(1)),
            ("b", json!(2)),
            ("c", json!(3)),
            ("d", json!(4)),
        ])
        .unwrap();

        assert_eq!(conf, expected);
        assert_eq!(
            JsonConf::<Plain>::from_entries([("b", json!(2)), ("a", json!(1))]).unwrap(),
            JsonConf::<Plain>::from_value(json!({"a": 1, "b": 2})).unwrap()
        );
        assert_ne!(
            JsonConf::<Plain>::from_entries([("a", json!(1)), ("b", json!(2))]).unwrap(),
            JsonConf::<Plain>::from_entries([("a", json!(1))]).unwrap()
        );
    }

    #[test]
    fn later_entries_win_in_update() {
        let conf = JsonConf::<Plain>::with_overrides(
            [("a", json!(1)), ("a", json!(2))],
            [("a", json!(3))],
        )
        .unwrap();

        assert_eq!(conf.get("a"), Some(&json!(3)));
    }

    #[test]
    fn setting_a_method_name_fails_without_mutation() {
        let mut conf = JsonConf::<Plain>::new().unwrap();

        let result = conf.set_attr("get", 1);

        assert!(matches!(result, Err(ConfError::KeyConflict { key }) if key == "get"));
        assert!(conf.is_empty());
        assert_eq!(conf.get("get"), None);
    }

    #[test]
    fn constructor_names_are_ordinary_keys() {
        let mut conf = JsonConf::<Plain>::new().unwrap();

        conf.set("new", json!(1)).unwrap();
        conf.set_attr("load", "yes").unwrap();

        assert_eq!(conf.get("new"), Some(&json!(1)));
        assert_eq!(conf.attr::<String>("load").unwrap(), "yes");
        assert!(matches!(
            conf.set_attr("clone", 1),
            Err(ConfError::KeyConflict { .. })
        ));
        assert!(matches!(
            conf.set_attr("to_string", 1),
            Err(ConfError::KeyConflict { .. })
        ));
    }

    #[test]
    fn declared_method_is_reserved_for_its_kind() {
        let mut conf = JsonConf::<WithDefaults>::new().unwrap();

        assert!(matches!(
            conf.set("sum", json!(1)),
            Err(ConfError::KeyConflict { .. })
        ));
        assert_eq!(conf.sum().unwrap(), 3);
    }

    #[test]
    fn defaults_are_applied_and_overridable() {
        assert_eq!(JsonConf::<WithDefaults>::new().unwrap().attr::<i64>("b").unwrap(), 1);

        let overridden = JsonConf::<WithDefaults>::from_entries([("b", json!(2))]).unwrap();
        assert_eq!(overridden.attr::<i64>("b").unwrap(), 2);

        let summed = JsonConf::<WithDefaults>::from_entries([("a", json!(9))]).unwrap();
        assert_eq!(summed.sum().unwrap(), 10);
    }

    #[test]
    fn mutable_defaults_are_not_shared() {
        let mut first = JsonConf::<WithDefaults>::new().unwrap();
        first.get_mut("subdict").unwrap()["k"] = json!("v");

        let second = JsonConf::<WithDefaults>::new().unwrap();

        assert_eq!(second.get("subdict"), Some(&json!({})));
        assert_eq!(first.get("subdict"), Some(&json!({"k": "v"})));
    }

    #[test]
    fn every_mutation_path_goes_through_set_item() {
        let mut data = JsonConf::<UnderscorePrefix>::from_entries([("one", json!(1))]).unwrap();
        data.update([("two", json!(2))]).unwrap();
        data.set_attr("three", 3).unwrap();
        data.set("four", json!(4)).unwrap();

        let keys: Vec<_> = data.keys().collect();
        assert_eq!(keys, ["_one", "_two", "_three", "_four"]);
    }

    #[test]
    fn equality_ignores_kind_and_order() {
        let with_defaults = JsonConf::<WithDefaults>::new().unwrap();
        let plain = JsonConf::<Plain>::from_value(json!({"subdict": {}, "a": 2, "b": 1})).unwrap();

        assert_eq!(with_defaults, plain);
    }

    #[test]
    fn remove_keeps_order_of_remaining_keys() {
        let mut conf = JsonConf::<Plain>::from_entries([
            ("a", json!(1)),
            ("b", json!(2)),
            ("c", json!(3)),
        ])
        .unwrap();

        assert_eq!(conf.remove("a"), Some(json!(1)));
        assert_eq!(conf.remove("a"), None);

        let keys: Vec<_> = conf.keys().collect();
        assert_eq!(keys, ["b", "c"]);
    }

    #[test]
    fn typed_attribute_with_wrong_type_is_invalid_value() {
        let conf = JsonConf::<Plain>::from_entries([("name", json!("x"))]).unwrap();

        assert!(matches!(
            conf.attr::<u32>("name"),
            Err(ConfError::InvalidValue { key, .. }) if key == "name"
        ));
    }

    #[test]
    fn from_value_rejects_non_objects() {
        assert!(JsonConf::<Plain>::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn clone_is_transient() {
        let mut conf = JsonConf::<Plain>::from_entries([("a", json!(1))]).unwrap();
        conf.set_file_path(PathBuf::from("/tmp/somewhere.json"));

        let copy = conf.clone();

        assert_eq!(copy, conf);
        assert_eq!(copy.file_path(), None);
    }
}
