//! Canonical JSON text for configuration objects.

use std::io;

use serde::Serialize;
use serde_json::{ser::Formatter, Map, Value};

use super::{ConfKind, JsonConf};


/// Options for [`stringify`].
#[derive(Debug, Clone, PartialEq)]
pub struct StringifyOptions {
    /// Sort keys (recursively) instead of keeping insertion order.
    pub sort_keys: bool,

    /// Pretty-print with this many spaces per level. `None` renders a single line.
    pub indent: Option<usize>,

    /// Top-level entries whose value equals any of these are left out.
    pub value_blacklist: Vec<Value>,
}

impl Default for StringifyOptions {
    fn default() -> Self {
        Self {
            sort_keys: true,
            indent: None,
            value_blacklist: default_value_blacklist(),
        }
    }
}

impl StringifyOptions {
    pub fn sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    pub fn indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }

    pub fn value_blacklist(mut self, value_blacklist: Vec<Value>) -> Self {
        self.value_blacklist = value_blacklist;
        self
    }
}

/// `null`, `[]` and `{}`.
pub fn default_value_blacklist() -> Vec<Value> {
    vec![
        Value::Null,
        Value::Array(Vec::new()),
        Value::Object(Map::new()),
    ]
}


/// Render the current state of `conf` as JSON text.
///
/// ```
/// use jsonconf::{stringify, JsonConf, StringifyOptions};
/// use serde_json::json;
///
/// let conf = JsonConf::<jsonconf::Plain>::from_entries([
///     ("a", json!(null)),
///     ("c", json!(3)),
///     ("b", json!([1, 2])),
/// ])
/// .unwrap();
///
/// assert_eq!(
///     stringify(&conf, &StringifyOptions::default()),
///     r#"{"b": [1, 2], "c": 3}"#
/// );
/// ```
pub fn stringify<K: ConfKind>(conf: &JsonConf<K>, options: &StringifyOptions) -> String {
    stringify_map(conf.as_map(), options)
}


pub(crate) fn stringify_map(entries: &Map<String, Value>, options: &StringifyOptions) -> String {
    let mut filtered = Map::with_capacity(entries.len());

    for (key, value) in entries {
        if options.value_blacklist.contains(value) {
            continue;
        }

        filtered.insert(key.clone(), value.clone());
    }

    let mut document = Value::Object(filtered);
    if options.sort_keys {
        document = sorted(document);
    }

    let indent = options.indent.map(|width| " ".repeat(width));
    let formatter = SpacedFormatter::new(indent.as_deref().map(str::as_bytes));

    let mut buffer = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);

    // PANIC SAFETY: a `Value` always has string keys and we write into a `Vec`,
    // so serialization can not fail.
    document.serialize(&mut serializer).unwrap();

    // PANIC SAFETY: serde_json only ever emits valid UTF-8.
    String::from_utf8(buffer).unwrap()
}


fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(left, _), (right, _)| left.cmp(right));

            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sorted(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}



/// JSON formatter that separates keys from values with `": "`.
///
/// Without indentation, elements are separated by `", "` on a single line.
/// With indentation, every element goes on its own line and the separator is `","`.
struct SpacedFormatter<'a> {
    indent: Option<&'a [u8]>,
    current_depth: usize,
    has_value: bool,
}

impl<'a> SpacedFormatter<'a> {
    fn new(indent: Option<&'a [u8]>) -> Self {
        Self {
            indent,
            current_depth: 0,
            has_value: false,
        }
    }

    fn begin_element<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        match self.indent {
            Some(indent) => {
                writer.write_all(if first { b"\n" } else { b",\n" })?;
                write_indent(writer, self.current_depth, indent)
            }
            None if first => Ok(()),
            None => writer.write_all(b", "),
        }
    }

    fn end_container<W>(&mut self, writer: &mut W, closing: &[u8]) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.current_depth -= 1;

        if let (true, Some(indent)) = (self.has_value, self.indent) {
            writer.write_all(b"\n")?;
            write_indent(writer, self.current_depth, indent)?;
        }

        writer.write_all(closing)
    }
}

impl Formatter for SpacedFormatter<'_> {
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.current_depth += 1;
        self.has_value = false;
        writer.write_all(b"[")
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.end_container(writer, b"]")
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.begin_element(writer, first)
    }

    fn end_array_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.current_depth += 1;
        self.has_value = false;
        writer.write_all(b"{")
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.end_container(writer, b"}")
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.begin_element(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn end_object_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.has_value = true;
        Ok(())
    }
}

fn write_indent<W>(writer: &mut W, depth: usize, indent: &[u8]) -> io::Result<()>
where
    W: ?Sized + io::Write,
{
    for _ in 0..depth {
        writer.write_all(indent)?;
    }

    Ok(())
}
