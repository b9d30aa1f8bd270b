//! End-to-end behaviour of loading, mutating and saving configuration objects.

use std::{fs, path::Path, sync::Arc};

use jsonconf::{
    is_cached, save_as, stringify, ConfError, ConfKind, JsonConf, Plain, Schema,
    StringifyOptions,
};
use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use tempfile::TempDir;


fn read_json(path: &Path) -> Map<String, Value> {
    match fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap(),
        Err(_) => Map::new(),
    }
}


struct ClassWithDefault;

static CLASS_WITH_DEFAULT: Lazy<Schema> = Lazy::new(|| {
    Schema::extend(Schema::base(), "ClassWithDefault")
        .default("b", json!(1))
        .default("a", json!(2))
        .method("sum")
        .build()
});

impl ConfKind for ClassWithDefault {
    fn schema() -> &'static Schema {
        &CLASS_WITH_DEFAULT
    }
}


struct SubclassWithDefault;

static SUBCLASS_WITH_DEFAULT: Lazy<Schema> = Lazy::new(|| {
    Schema::extend(&CLASS_WITH_DEFAULT, "SubclassWithDefault")
        .default("c", json!(3))
        .build()
});

impl ConfKind for SubclassWithDefault {
    fn schema() -> &'static Schema {
        &SUBCLASS_WITH_DEFAULT
    }
}


struct FirstKind;

impl ConfKind for FirstKind {
    fn schema() -> &'static Schema {
        Schema::base()
    }
}

struct SecondKind;

impl ConfKind for SecondKind {
    fn schema() -> &'static Schema {
        Schema::base()
    }
}


#[test]
fn new_file_is_loaded_once_and_shared() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("jsonconf_test_cache.json");

    let first = JsonConf::<Plain>::load(&path).unwrap();
    assert!(!first.read().has_attr("a"));
    first.write().set_attr("a", 1).unwrap();

    let second = JsonConf::<Plain>::load(directory.path().join("./jsonconf_test_cache.json")).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.read().attr::<i64>("a").unwrap(), 1);
    assert!(is_cached::<Plain>(&path));
}

#[test]
fn different_kinds_get_independent_instances_for_the_same_path() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("jsonconf.json");

    let first = JsonConf::<FirstKind>::load(&path).unwrap();
    let second_a = JsonConf::<SecondKind>::load(&path).unwrap();
    let second_b = JsonConf::<SecondKind>::load(&path).unwrap();

    second_a.write().set_attr("unique_cache_key", 1).unwrap();

    assert!(!first.read().has_attr("unique_cache_key"));
    assert!(second_a.read().has_attr("unique_cache_key"));
    assert!(second_b.read().has_attr("unique_cache_key"));
}

#[test]
fn save_as_targets_the_given_path_not_the_instance_path() {
    let directory = TempDir::new().unwrap();
    let instance_path = directory.path().join("jsonconf.json");
    let other_path = directory.path().join("jsonconf_save_as.json");

    let transient = JsonConf::<Plain>::from_entries([("abc", json!(123))]).unwrap();
    save_as(&transient, &other_path).unwrap();
    assert_eq!(read_json(&other_path).get("abc"), Some(&json!(123)));

    let loaded = JsonConf::<Plain>::load(&instance_path).unwrap();
    loaded.read().save().unwrap();
    loaded.write().set_attr("bcd", 234).unwrap();
    save_as(&*loaded.read(), &other_path).unwrap();

    assert_eq!(read_json(&instance_path).get("abc"), None);
    assert_eq!(read_json(&instance_path).get("bcd"), None);
    assert_eq!(read_json(&other_path).get("abc"), None);
    assert_eq!(read_json(&other_path).get("bcd"), Some(&json!(234)));

    // The recorded path is still the original one.
    assert_eq!(
        loaded.read().file_path(),
        Some(dunce::canonicalize(&instance_path).unwrap().as_path())
    );
}

#[test]
fn save_writes_current_state() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("jsonconf.json");

    let conf = JsonConf::<Plain>::load(&path).unwrap();
    conf.write().set_attr("asdf", "xyz").unwrap();
    conf.read().save().unwrap();
    assert_eq!(read_json(&path).get("asdf"), Some(&json!("xyz")));

    conf.write().update([("asdf", json!("zyx"))]).unwrap();
    conf.read().save().unwrap();
    assert_eq!(read_json(&path).get("asdf"), Some(&json!("zyx")));
}

#[test]
fn file_contents_override_defaults_and_extra_keys_are_kept() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("existing.json");
    fs::write(&path, r#"{"a": 20, "extra": "kept"}"#).unwrap();

    let conf = JsonConf::<ClassWithDefault>::load(&path).unwrap();
    let conf = conf.read();

    assert_eq!(conf.attr::<i64>("a").unwrap(), 20);
    assert_eq!(conf.attr::<i64>("b").unwrap(), 1);
    assert_eq!(conf.attr::<String>("extra").unwrap(), "kept");
}

#[test]
fn cached_state_wins_over_later_file_changes() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("first_read_wins.json");
    fs::write(&path, r#"{"value": 1}"#).unwrap();

    let conf = JsonConf::<Plain>::load(&path).unwrap();
    fs::write(&path, r#"{"value": 2}"#).unwrap();
    let again = JsonConf::<Plain>::load(&path).unwrap();

    assert!(Arc::ptr_eq(&conf, &again));
    assert_eq!(again.read().attr::<i64>("value").unwrap(), 1);
}

#[test]
fn malformed_files_are_reported() {
    let directory = TempDir::new().unwrap();

    let invalid = directory.path().join("invalid.json");
    fs::write(&invalid, "{not json").unwrap();
    assert!(matches!(
        JsonConf::<Plain>::load(&invalid),
        Err(ConfError::MalformedFile { source: Some(_), .. })
    ));

    let not_an_object = directory.path().join("array.json");
    fs::write(&not_an_object, "[1, 2, 3]").unwrap();
    assert!(matches!(
        JsonConf::<Plain>::load(&not_an_object),
        Err(ConfError::MalformedFile { source: None, .. })
    ));

    // A failed load does not poison the cache.
    assert!(!is_cached::<Plain>(&invalid));
}

#[test]
fn non_utf8_file_is_malformed() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("latin1.json");
    fs::write(&path, b"{\"name\": \"caf\xe9\"}").unwrap();

    assert!(matches!(
        JsonConf::<Plain>::load(&path),
        Err(ConfError::MalformedFile { source: Some(_), .. })
    ));
    assert!(!is_cached::<Plain>(&path));
}

#[test]
fn reloading_from_disk_after_restart_yields_equal_state() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("restart.json");

    let conf = JsonConf::<FirstKind>::load(&path).unwrap();
    conf.write()
        .update([("name", json!("x")), ("empty", json!([])), ("n", json!(1.5))])
        .unwrap();
    conf.read().save().unwrap();

    // A different kind has its own cache entry, which stands in for a fresh process.
    let reloaded = JsonConf::<SecondKind>::load(&path).unwrap();
    let expected = JsonConf::<Plain>::from_entries([("name", json!("x")), ("n", json!(1.5))]).unwrap();

    assert_eq!(*reloaded.read(), expected);
}

#[test]
fn setting_a_method_name_fails_and_the_method_survives() {
    let mut conf = JsonConf::<Plain>::new().unwrap();

    assert!(matches!(
        conf.set_attr("get", 1),
        Err(ConfError::KeyConflict { .. })
    ));
    assert_eq!(conf.get("get"), None);
}

#[test]
fn inherited_defaults_are_serialized_in_order() {
    let subclass = JsonConf::<SubclassWithDefault>::new().unwrap();

    assert_eq!(
        stringify(&subclass, &StringifyOptions::default()),
        r#"{"a": 2, "b": 1, "c": 3}"#
    );
    assert_eq!(
        stringify(&subclass, &StringifyOptions::default().sort_keys(false)),
        r#"{"b": 1, "a": 2, "c": 3}"#
    );
    assert!(matches!(
        JsonConf::<SubclassWithDefault>::new().unwrap().set("sum", json!(0)),
        Err(ConfError::KeyConflict { .. })
    ));
}

#[test]
fn saved_key_order_is_sorted() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("jsonconf-key-order.json");

    let conf = JsonConf::<ClassWithDefault>::load(&path).unwrap();
    conf.read().save().unwrap();

    let keys: Vec<String> = read_json(&path).keys().cloned().collect();
    assert_eq!(keys, ["a", "b"]);
}

#[test]
fn stringify_filters_and_orders() {
    let conf = JsonConf::<Plain>::from_entries([
        ("a", json!(null)),
        ("b", json!([])),
        ("c", json!({})),
        ("d", json!(1)),
    ])
    .unwrap();

    assert_eq!(stringify(&conf, &StringifyOptions::default()), r#"{"d": 1}"#);
    assert_eq!(
        stringify(&conf, &StringifyOptions::default().value_blacklist(Vec::new())),
        r#"{"a": null, "b": [], "c": {}, "d": 1}"#
    );
    assert_eq!(conf.to_string(), r#"{"d": 1}"#);
}
