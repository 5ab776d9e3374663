//! Conversion between typed [`Value`]s and flat key-path maps.
//!
//! Writing a value produces every flat entry of its subtree, including the `#`
//! count of each list, so a written subtree always replaces what was there
//! before. Reading goes through a [`LayeredReader`], one flat key at a time.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::{Error, Result},
    key_path,
    lookup::LayeredReader,
    schema::{resolve, Node, Schema, SchemaMap, ValueType},
    value::Value,
};

/// The most elements a list may hold, so that a corrupt `#` cannot make a
/// read allocate without bound.
pub const MAX_LIST_LEN: usize = 100_000;

/// Flatten `value` as the subtree at `key`. An empty `key` addresses the whole
/// resource, in which case `value` must be a map of attributes.
///
/// Nothing is returned unless the whole value fits the schema.
pub fn flatten(schema: &SchemaMap, key: &str, value: &Value) -> Result<BTreeMap<String, String>> {
    let node = node_at(schema, key)?;
    let mut out = BTreeMap::new();
    write(node, key, value, &mut out)?;
    Ok(out)
}

/// Read the value at `key`. An empty `key` reads the whole resource as a map
/// of attributes.
pub fn unflatten(schema: &SchemaMap, key: &str, reader: &LayeredReader<'_>) -> Result<Value> {
    read(node_at(schema, key)?, key, reader)
}

fn node_at<'a>(schema: &'a SchemaMap, key: &str) -> Result<Node<'a>> {
    if key.is_empty() {
        Ok(Node::Record(schema))
    } else {
        resolve(schema, key)
    }
}

/// Parse a stored string as a value of a primitive type.
///
/// An empty string is no value for anything but strings.
pub fn coerce(type_: ValueType, raw: &str, key: &str) -> Result<Value> {
    let fail = || Error::Coercion {
        key: key.to_owned(),
        value: raw.to_owned(),
        expected: type_,
    };
    match type_ {
        ValueType::String => Ok(Value::String(raw.to_owned())),
        _ if raw.is_empty() => Ok(Value::Null),
        ValueType::Int => raw.parse().map(Value::Int).map_err(|_| fail()),
        ValueType::Float => raw.parse().map(Value::Float).map_err(|_| fail()),
        ValueType::Bool => match raw {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(fail()),
        },
        ValueType::List | ValueType::Map | ValueType::Record => Err(fail()),
    }
}

fn missing_elem(schema: &Schema, key: &str) -> Error {
    Error::invalid_schema(key, format!("{} attribute without element type", schema.type_))
}

pub(crate) fn read(node: Node<'_>, key: &str, reader: &LayeredReader<'_>) -> Result<Value> {
    match node {
        Node::Count { of } => {
            let parent = key
                .strip_suffix(key_path::COUNT)
                .and_then(|p| p.strip_suffix(key_path::SEPARATOR))
                .unwrap_or(key);
            let count = match (of.type_, Node::elem(of)) {
                (ValueType::Map, Some(elem)) => map_keys(elem, parent, reader).len(),
                _ => list_len(parent, reader)?,
            };
            Ok(Value::Int(count as i64))
        }
        Node::Record(fields) => read_record(fields, key, reader),
        Node::Attr(schema) if schema.type_.is_primitive() => match reader.get(key) {
            Some(raw) => coerce(schema.type_, raw, key),
            None => Ok(Value::Null),
        },
        Node::Attr(schema) => {
            let elem = Node::elem(schema).ok_or_else(|| missing_elem(schema, key))?;
            match schema.type_ {
                ValueType::List => (0..list_len(key, reader)?)
                    .map(|i| read(elem, &key_path::join(key, &i.to_string()), reader))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::List),
                ValueType::Map => map_keys(elem, key, reader)
                    .into_iter()
                    .map(|k| {
                        let v = read(elem, &key_path::join(key, &k), reader)?;
                        Ok((k, v))
                    })
                    .collect::<Result<BTreeMap<_, _>>>()
                    .map(Value::Map),
                // Record: the element node holds the fields
                _ => read(elem, key, reader),
            }
        }
    }
}

fn read_record(fields: &SchemaMap, key: &str, reader: &LayeredReader<'_>) -> Result<Value> {
    fields
        .iter()
        .map(|(name, field)| {
            let v = read(Node::Attr(field), &key_path::join(key, name), reader)?;
            Ok((name.clone(), v))
        })
        .collect::<Result<BTreeMap<_, _>>>()
        .map(Value::Map)
}

/// The stored `#` of a list; a list without one is empty.
pub(crate) fn list_len(key: &str, reader: &LayeredReader<'_>) -> Result<usize> {
    let count_key = key_path::join(key, key_path::COUNT);
    let len: u64 = match reader.get(&count_key) {
        None | Some("") => return Ok(0),
        Some(raw) => raw.parse().map_err(|_| Error::Coercion {
            key: count_key.clone(),
            value: raw.to_owned(),
            expected: ValueType::Int,
        })?,
    };
    match usize::try_from(len) {
        Ok(len) if len <= MAX_LIST_LEN => Ok(len),
        _ => Err(Error::ListTooLong {
            key: count_key,
            len,
            max: MAX_LIST_LEN,
        }),
    }
}

/// Check that every list index along `key` addresses an existing element.
pub(crate) fn check_indices(
    schema: &SchemaMap,
    key: &str,
    reader: &LayeredReader<'_>,
) -> Result<()> {
    for (at, _) in key.match_indices(key_path::SEPARATOR) {
        let parent = &key[..at];
        let rest = &key[at + 1..];
        let segment = rest.split(key_path::SEPARATOR).next().unwrap_or(rest);
        let Some(index) = key_path::parse_index(segment) else {
            continue;
        };
        if let Node::Attr(Schema {
            type_: ValueType::List,
            ..
        }) = resolve(schema, parent)?
        {
            let len = list_len(parent, reader)?;
            if index >= len {
                return Err(Error::lookup(
                    key,
                    format!("index {} is out of range for {} elements", index, len),
                ));
            }
        }
    }
    Ok(())
}

/// The keys of the map at `key`. A map of primitives takes the whole rest of
/// each flat key as its key; other maps take one segment.
fn map_keys(elem: Node<'_>, key: &str, reader: &LayeredReader<'_>) -> BTreeSet<String> {
    let whole_rest = matches!(elem, Node::Attr(s) if s.type_.is_primitive());
    reader
        .keys_under(key)
        .into_iter()
        .filter_map(|full| key_path::strip_parent(full, key))
        .map(|rest| {
            if whole_rest {
                rest
            } else {
                rest.split(key_path::SEPARATOR).next().unwrap_or(rest)
            }
        })
        .filter(|k| *k != key_path::COUNT)
        .map(str::to_owned)
        .collect()
}

pub(crate) fn write(
    node: Node<'_>,
    key: &str,
    value: &Value,
    out: &mut BTreeMap<String, String>,
) -> Result<()> {
    let mismatch = |expected: ValueType| Error::TypeMismatch {
        key: key.to_owned(),
        expected,
        found: value.type_name(),
    };
    match node {
        Node::Count { .. } => Err(Error::lookup(
            key,
            "element counts follow from the elements and cannot be set",
        )),
        Node::Record(fields) => match value {
            Value::Null => Ok(()),
            Value::Map(m) => {
                // Unknown fields are ignored
                for (name, field) in fields {
                    if let Some(v) = m.get(name) {
                        write(Node::Attr(field), &key_path::join(key, name), v, out)?;
                    }
                }
                Ok(())
            }
            _ => Err(mismatch(ValueType::Record)),
        },
        Node::Attr(schema) => {
            let raw = match (schema.type_, value) {
                (_, Value::Null) if schema.type_ != ValueType::List => return Ok(()),
                (ValueType::String, Value::String(s)) => s.clone(),
                (ValueType::Int, Value::Int(i)) => i.to_string(),
                (ValueType::Float, Value::Float(f)) => f.to_string(),
                (ValueType::Bool, Value::Bool(b)) => b.to_string(),
                (t, _) if t.is_primitive() => return Err(mismatch(t)),
                _ => return write_composite(schema, key, value, out),
            };
            out.insert(key.to_owned(), raw);
            Ok(())
        }
    }
}

fn write_composite(
    schema: &Schema,
    key: &str,
    value: &Value,
    out: &mut BTreeMap<String, String>,
) -> Result<()> {
    let elem = Node::elem(schema).ok_or_else(|| missing_elem(schema, key))?;
    match (schema.type_, value) {
        (ValueType::List, Value::Null) => {
            out.insert(key_path::join(key, key_path::COUNT), "0".to_owned());
            Ok(())
        }
        (ValueType::List, Value::List(items)) => {
            if items.len() > MAX_LIST_LEN {
                return Err(Error::ListTooLong {
                    key: key.to_owned(),
                    len: items.len() as u64,
                    max: MAX_LIST_LEN,
                });
            }
            for (i, item) in items.iter().enumerate() {
                write(elem, &key_path::join(key, &i.to_string()), item, out)?;
            }
            out.insert(
                key_path::join(key, key_path::COUNT),
                items.len().to_string(),
            );
            Ok(())
        }
        (ValueType::Map, Value::Map(m)) => {
            let whole_rest = matches!(elem, Node::Attr(s) if s.type_.is_primitive());
            for (k, v) in m {
                let elem_key = key_path::join(key, k);
                if !key_path::is_valid_map_key(k)
                    || (!whole_rest && k.contains(key_path::SEPARATOR))
                {
                    return Err(Error::lookup(&elem_key, format!("invalid map key {:?}", k)));
                }
                write(elem, &elem_key, v, out)?;
            }
            Ok(())
        }
        (ValueType::Record, _) => write(elem, key, value, out),
        (t, _) => Err(Error::TypeMismatch {
            key: key.to_owned(),
            expected: t,
            found: value.type_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        diff::{AttrDiff, ResourceDiff},
        schema::Resource,
        state::ResourceState,
    };

    fn schema() -> SchemaMap {
        SchemaMap::from([
            ("name".to_owned(), Schema::string()),
            ("port".to_owned(), Schema::int()),
            ("ratio".to_owned(), Schema::float()),
            ("enabled".to_owned(), Schema::bool()),
            ("ports".to_owned(), Schema::list(Schema::int())),
            ("tags".to_owned(), Schema::map(Schema::string())),
            (
                "ingress".to_owned(),
                Schema::list(Resource::new([
                    ("from", Schema::int()),
                    ("cidrs", Schema::list(Schema::string())),
                ])),
            ),
            (
                "config_vars".to_owned(),
                Schema::list(Schema::map(Schema::string())),
            ),
            (
                "network".to_owned(),
                Schema::record(Resource::new([
                    ("vpc", Schema::string()),
                    ("subnets", Schema::map(Schema::list(Schema::string()))),
                ])),
            ),
        ])
    }

    fn entries(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn map(pairs: impl IntoIterator<Item = (&'static str, Value)>) -> Value {
        Value::Map(pairs.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce(ValueType::Int, "80", "p").unwrap(), Value::Int(80));
        assert_eq!(coerce(ValueType::Int, "-3", "p").unwrap(), Value::Int(-3));
        assert_eq!(coerce(ValueType::Float, "1.5", "p").unwrap(), Value::Float(1.5));
        assert_eq!(coerce(ValueType::Bool, "true", "p").unwrap(), Value::Bool(true));
        assert_eq!(coerce(ValueType::String, "", "p").unwrap(), Value::from(""));
        assert_eq!(coerce(ValueType::Int, "", "p").unwrap(), Value::Null);
    }

    #[test]
    fn test_coerce_malformed() {
        for (t, raw) in [
            (ValueType::Int, "NOPE"),
            (ValueType::Int, "1.5"),
            (ValueType::Float, "one"),
            (ValueType::Bool, "yes"),
            (ValueType::Bool, "1"),
        ] {
            assert_eq!(
                coerce(t, raw, "k"),
                Err(Error::Coercion {
                    key: "k".to_owned(),
                    value: raw.to_owned(),
                    expected: t
                })
            );
        }
    }

    #[test]
    fn test_flatten_list() {
        let out = flatten(&schema(), "ports", &Value::from(vec![1, 2, 5])).unwrap();
        assert_eq!(
            out,
            entries(&[("ports.#", "3"), ("ports.0", "1"), ("ports.1", "2"), ("ports.2", "5")])
        );
    }

    #[test]
    fn test_flatten_empty_list() {
        let out = flatten(&schema(), "ports", &Value::List(vec![])).unwrap();
        assert_eq!(out, entries(&[("ports.#", "0")]));
    }

    #[test]
    fn test_flatten_nested() {
        let value = Value::from(vec![
            map([("from", Value::from(80)), ("cidrs", Value::from(vec!["10.0.0.0/8"]))]),
            map([("from", Value::from(443)), ("ignored", Value::from(true))]),
        ]);
        let out = flatten(&schema(), "ingress", &value).unwrap();
        assert_eq!(
            out,
            entries(&[
                ("ingress.#", "2"),
                ("ingress.0.cidrs.#", "1"),
                ("ingress.0.cidrs.0", "10.0.0.0/8"),
                ("ingress.0.from", "80"),
                ("ingress.1.from", "443"),
            ])
        );
    }

    #[test]
    fn test_flatten_list_of_maps() {
        let value = Value::from(vec![
            map([("foo", Value::from("bar"))]),
            map([("bar", Value::from("baz"))]),
        ]);
        let out = flatten(&schema(), "config_vars", &value).unwrap();
        assert_eq!(
            out,
            entries(&[
                ("config_vars.#", "2"),
                ("config_vars.0.foo", "bar"),
                ("config_vars.1.bar", "baz"),
            ])
        );
    }

    #[test]
    fn test_flatten_record() {
        let value = map([
            ("vpc", Value::from("vpc-1")),
            (
                "subnets",
                map([("a", Value::from(vec!["s1", "s2"]))]),
            ),
        ]);
        let out = flatten(&schema(), "network", &value).unwrap();
        assert_eq!(
            out,
            entries(&[
                ("network.subnets.a.#", "2"),
                ("network.subnets.a.0", "s1"),
                ("network.subnets.a.1", "s2"),
                ("network.vpc", "vpc-1"),
            ])
        );
    }

    #[test]
    fn test_flatten_type_mismatch() {
        let err = flatten(&schema(), "ports", &Value::from(vec![Value::from(1), Value::from("NOPE")]))
            .unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                key: "ports.1".to_owned(),
                expected: ValueType::Int,
                found: "string"
            }
        );

        let err = flatten(&schema(), "name", &Value::from(80)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { expected: ValueType::String, .. }));

        let err = flatten(&schema(), "ports", &Value::from("1,2")).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { expected: ValueType::List, .. }));

        let err = flatten(&schema(), "ingress.0", &Value::from(1)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { expected: ValueType::Record, .. }));
    }

    #[test]
    fn test_flatten_invalid_map_key() {
        let err = flatten(&schema(), "tags", &map([("#", Value::from("x"))])).unwrap_err();
        assert!(matches!(err, Error::SchemaLookup { key, .. } if key == "tags.#"));
        // Dotted keys are fine in a map of strings
        let out = flatten(&schema(), "tags", &map([("a.b", Value::from("x"))])).unwrap();
        assert_eq!(out, entries(&[("tags.a.b", "x")]));
        for bad in ["", "a.", "a..b", "a.#"] {
            let value = Value::Map(BTreeMap::from([(bad.to_owned(), Value::from("x"))]));
            assert!(
                matches!(flatten(&schema(), "tags", &value), Err(Error::SchemaLookup { .. })),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_map_of_records() {
        let schema = SchemaMap::from([(
            "rules".to_owned(),
            Schema::map(Resource::new([
                ("port", Schema::int()),
                ("proto", Schema::string()),
            ])),
        )]);
        let value = map([
            ("ssh", map([("port", Value::Int(22)), ("proto", Value::from("tcp"))])),
            ("dns", map([("port", Value::Int(53)), ("proto", Value::Null)])),
        ]);
        let out = flatten(&schema, "rules", &value).unwrap();
        assert_eq!(
            out,
            entries(&[
                ("rules.dns.port", "53"),
                ("rules.ssh.port", "22"),
                ("rules.ssh.proto", "tcp"),
            ])
        );

        let state = ResourceState::from_attributes(out);
        let reader = LayeredReader::new().with_layer(&state);
        assert_eq!(unflatten(&schema, "rules", &reader).unwrap(), value);
        assert_eq!(unflatten(&schema, "rules.#", &reader).unwrap(), Value::Int(2));
        assert_eq!(
            unflatten(&schema, "rules.ssh.proto", &reader).unwrap(),
            Value::from("tcp")
        );
        // Keys of composite maps are single segments
        let dotted = map([("a.b", map([("port", Value::Int(1))]))]);
        assert!(matches!(
            flatten(&schema, "rules", &dotted),
            Err(Error::SchemaLookup { .. })
        ));
    }

    #[test]
    fn test_list_length_limit() {
        let state = ResourceState::from_attributes([("ports.#", "99999999999")]);
        let reader = LayeredReader::new().with_layer(&state);
        assert_eq!(
            unflatten(&schema(), "ports", &reader),
            Err(Error::ListTooLong {
                key: "ports.#".to_owned(),
                len: 99999999999,
                max: MAX_LIST_LEN,
            })
        );

        let state = ResourceState::from_attributes([("ports.#", MAX_LIST_LEN.to_string())]);
        let reader = LayeredReader::new().with_layer(&state);
        assert_eq!(list_len("ports", &reader).unwrap(), MAX_LIST_LEN);

        let long = Value::List(vec![Value::Int(0); MAX_LIST_LEN + 1]);
        assert!(matches!(
            flatten(&schema(), "ports", &long),
            Err(Error::ListTooLong { .. })
        ));
    }

    #[test]
    fn test_check_indices() {
        let schema = schema();
        let state = ResourceState::from_attributes([
            ("ports.#", "2"),
            ("ingress.#", "1"),
            ("ingress.0.cidrs.#", "1"),
        ]);
        let reader = LayeredReader::new().with_layer(&state);
        for key in ["ports", "ports.1", "ingress.0", "ingress.0.cidrs.0", "tags.0", "name"] {
            assert_eq!(check_indices(&schema, key, &reader), Ok(()), "{}", key);
        }
        for key in ["ports.2", "ingress.1.from", "ingress.0.cidrs.1", "config_vars.0"] {
            assert!(
                matches!(
                    check_indices(&schema, key, &reader),
                    Err(Error::SchemaLookup { key: k, .. }) if k == key
                ),
                "{}",
                key
            );
        }
    }

    #[test]
    fn test_flatten_count_rejected() {
        assert!(matches!(
            flatten(&schema(), "ports.#", &Value::from(3)),
            Err(Error::SchemaLookup { .. })
        ));
    }

    #[test]
    fn test_flatten_float_and_bool() {
        assert_eq!(
            flatten(&schema(), "ratio", &Value::Float(0.25)).unwrap(),
            entries(&[("ratio", "0.25")])
        );
        // Integers are not floats; reading back would not give the same value
        assert_eq!(
            flatten(&schema(), "ratio", &Value::Int(2)),
            Err(Error::TypeMismatch {
                key: "ratio".to_owned(),
                expected: ValueType::Float,
                found: "int",
            })
        );
        assert_eq!(
            flatten(&schema(), "ratio", &Value::Float(2.0)).unwrap(),
            entries(&[("ratio", "2")])
        );
        assert_eq!(
            flatten(&schema(), "enabled", &Value::Bool(false)).unwrap(),
            entries(&[("enabled", "false")])
        );
        assert_eq!(flatten(&schema(), "enabled", &Value::Null).unwrap(), entries(&[]));
    }

    #[test]
    fn test_unflatten_from_state() {
        let schema = schema();
        let state = ResourceState::from_attributes([
            ("ports.#", "3"),
            ("ports.0", "1"),
            ("ports.1", "2"),
            ("ports.2", "5"),
            ("tags.env", "prod"),
            ("tags.owner.team", "infra"),
            ("network.vpc", "vpc-1"),
            ("network.subnets.a.#", "1"),
            ("network.subnets.a.0", "s1"),
        ]);
        let reader = LayeredReader::new().with_layer(&state);
        assert_eq!(
            unflatten(&schema, "ports", &reader).unwrap(),
            Value::from(vec![1, 2, 5])
        );
        assert_eq!(unflatten(&schema, "ports.#", &reader).unwrap(), Value::Int(3));
        assert_eq!(unflatten(&schema, "ports.2", &reader).unwrap(), Value::Int(5));
        assert_eq!(
            unflatten(&schema, "tags", &reader).unwrap(),
            map([
                ("env", Value::from("prod")),
                ("owner.team", Value::from("infra"))
            ])
        );
        assert_eq!(unflatten(&schema, "tags.#", &reader).unwrap(), Value::Int(2));
        assert_eq!(
            unflatten(&schema, "network", &reader).unwrap(),
            map([
                ("vpc", Value::from("vpc-1")),
                ("subnets", map([("a", Value::from(vec!["s1"]))])),
            ])
        );
        assert_eq!(unflatten(&schema, "port", &reader).unwrap(), Value::Null);
    }

    #[test]
    fn test_unflatten_absent() {
        let schema = schema();
        let reader = LayeredReader::new();
        assert_eq!(unflatten(&schema, "ports", &reader).unwrap(), Value::List(vec![]));
        assert_eq!(unflatten(&schema, "ports.#", &reader).unwrap(), Value::Int(0));
        assert_eq!(unflatten(&schema, "tags", &reader).unwrap(), Value::Map(BTreeMap::new()));
        assert_eq!(unflatten(&schema, "name", &reader).unwrap(), Value::Null);
    }

    #[test]
    fn test_unflatten_keys_from_different_layers() {
        let schema = schema();
        let state = ResourceState::from_attributes([("ports.#", "1"), ("ports.0", "80")]);
        let diff = ResourceDiff::new([
            ("ports.#", AttrDiff::new("1", "2")),
            ("ports.1", AttrDiff::new("", "100")),
        ]);
        let reader = LayeredReader::new().with_layer(&diff).with_layer(&state);
        assert_eq!(
            unflatten(&schema, "ports", &reader).unwrap(),
            Value::from(vec![80, 100])
        );
    }

    #[test]
    fn test_unflatten_shrunk_list_ignores_stale_indices() {
        let schema = schema();
        let state = ResourceState::from_attributes([("ports.#", "2"), ("ports.0", "1"), ("ports.1", "2")]);
        let diff = ResourceDiff::new([("ports.#", AttrDiff::new("2", "1"))]);
        let reader = LayeredReader::new().with_layer(&diff).with_layer(&state);
        assert_eq!(unflatten(&schema, "ports", &reader).unwrap(), Value::from(vec![1]));
    }

    #[test]
    fn test_unflatten_malformed() {
        let schema = schema();
        let state = ResourceState::from_attributes([
            ("port", "eighty"),
            ("ports.#", "many"),
        ]);
        let reader = LayeredReader::new().with_layer(&state);
        assert!(matches!(
            unflatten(&schema, "port", &reader),
            Err(Error::Coercion { key, .. }) if key == "port"
        ));
        assert!(matches!(
            unflatten(&schema, "ports", &reader),
            Err(Error::Coercion { key, .. }) if key == "ports.#"
        ));
        // The error surfaces through enclosing reads too
        assert!(unflatten(&schema, "", &reader).is_err());
    }

    #[test]
    fn test_unflatten_whole_resource() {
        let schema = SchemaMap::from([
            ("availability_zone".to_owned(), Schema::string()),
            ("ports".to_owned(), Schema::list(Schema::int())),
        ]);
        let state = ResourceState::from_attributes([("availability_zone", "foo")]);
        let reader = LayeredReader::new().with_layer(&state);
        assert_eq!(
            unflatten(&schema, "", &reader).unwrap(),
            map([
                ("availability_zone", Value::from("foo")),
                ("ports", Value::List(vec![])),
            ])
        );
    }

    #[test]
    fn test_flatten_then_unflatten() {
        let schema = schema();
        let value = Value::from(vec![
            map([("from", Value::from(80)), ("cidrs", Value::from(vec!["a", "b"]))]),
            map([("from", Value::from(443)), ("cidrs", Value::List(vec![]))]),
        ]);
        let state = ResourceState::from_attributes(flatten(&schema, "ingress", &value).unwrap());
        let reader = LayeredReader::new().with_layer(&state);
        assert_eq!(unflatten(&schema, "ingress", &reader).unwrap(), value);
    }
}
