//! Attribute schemas.
//!
//! A [`SchemaMap`] describes the attributes of one resource type. Each
//! [`Schema`] declares the type of an attribute and, for lists and maps, the
//! type of their elements, which may be a further schema or a nested
//! [`Resource`] (a record with its own named fields).

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    key_path,
};

/// The attributes of a resource, by name.
pub type SchemaMap = BTreeMap<String, Schema>;

/// The type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Int,
    Bool,
    Float,
    List,
    Map,
    /// A single nested resource, with named fields
    Record,
}

impl ValueType {
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            ValueType::String | ValueType::Int | ValueType::Bool | ValueType::Float
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueType::String => "string",
            ValueType::Int => "int",
            ValueType::Bool => "bool",
            ValueType::Float => "float",
            ValueType::List => "list",
            ValueType::Map => "map",
            ValueType::Record => "record",
        })
    }
}

/// Schema for a single attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// The data type of this attribute
    #[serde(rename = "type")]
    pub type_: ValueType,
    /// Whether the user must provide this attribute
    #[serde(default)]
    pub required: bool,
    /// Whether the user may provide this attribute
    #[serde(default)]
    pub optional: bool,
    /// Whether the provider may fill in this attribute
    #[serde(default)]
    pub computed: bool,
    /// Whether a change to this attribute requires replacing the resource.
    /// Informational; the engine only reports the diff's flag.
    #[serde(default)]
    pub force_new: bool,
    /// Whether this attribute is sensitive (should be redacted)
    #[serde(default)]
    pub sensitive: bool,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Element type of a list or map, or the fields of a record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elem: Option<Elem>,
}

/// The element type of a list or map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Elem {
    Schema(Box<Schema>),
    Resource(Resource),
}

/// A nested resource: a record with named, typed fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resource {
    pub schema: SchemaMap,
}

impl Resource {
    pub fn new(schema: impl IntoIterator<Item = (impl Into<String>, Schema)>) -> Self {
        Resource {
            schema: schema.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<Schema> for Elem {
    fn from(value: Schema) -> Self {
        Elem::Schema(Box::new(value))
    }
}

impl From<Resource> for Elem {
    fn from(value: Resource) -> Self {
        Elem::Resource(value)
    }
}

impl Schema {
    pub fn new(type_: ValueType) -> Self {
        Schema {
            type_,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            sensitive: false,
            description: None,
            elem: None,
        }
    }

    pub fn string() -> Self {
        Self::new(ValueType::String)
    }

    pub fn int() -> Self {
        Self::new(ValueType::Int)
    }

    pub fn bool() -> Self {
        Self::new(ValueType::Bool)
    }

    pub fn float() -> Self {
        Self::new(ValueType::Float)
    }

    pub fn list(elem: impl Into<Elem>) -> Self {
        Self::new(ValueType::List).with_elem(elem)
    }

    pub fn map(elem: impl Into<Elem>) -> Self {
        Self::new(ValueType::Map).with_elem(elem)
    }

    pub fn record(resource: Resource) -> Self {
        Self::new(ValueType::Record).with_elem(resource)
    }

    pub fn with_elem(mut self, elem: impl Into<Elem>) -> Self {
        self.elem = Some(elem.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check the structural invariants of this schema and everything nested in
    /// it. `key` is the key-path of the attribute, for error reporting.
    pub fn validate(&self, key: &str) -> Result<()> {
        if self.required && self.optional {
            return Err(Error::invalid_schema(
                key,
                "required and optional are mutually exclusive",
            ));
        }
        if self.required && self.computed {
            return Err(Error::invalid_schema(
                key,
                "required attributes cannot be computed",
            ));
        }
        match (self.type_, &self.elem) {
            (t, Some(_)) if t.is_primitive() => Err(Error::invalid_schema(
                key,
                format!("{} attributes cannot have an element type", t),
            )),
            (t, None) if !t.is_primitive() => Err(Error::invalid_schema(
                key,
                format!("{} attributes must have an element type", t),
            )),
            (ValueType::Record, Some(Elem::Schema(_))) => Err(Error::invalid_schema(
                key,
                "record attributes must have a resource element",
            )),
            (ValueType::List, Some(elem)) => {
                elem.validate(&key_path::join(key, key_path::ELEM_PLACEHOLDER))
            }
            (ValueType::Map, Some(elem)) => {
                elem.validate(&key_path::join(key, key_path::ELEM_PLACEHOLDER))
            }
            (_, Some(elem)) => elem.validate(key),
            _ => Ok(()),
        }
    }
}

impl Elem {
    fn validate(&self, key: &str) -> Result<()> {
        match self {
            Elem::Schema(schema) => schema.validate(key),
            Elem::Resource(resource) => validate_schema_map(&resource.schema, key),
        }
    }
}

/// Validate every attribute of a schema map, recursively.
pub fn validate_schema_map(schema: &SchemaMap, prefix: &str) -> Result<()> {
    for (name, attr) in schema {
        let key = key_path::join(prefix, name);
        if name.is_empty() {
            return Err(Error::invalid_schema(&key, "attribute names cannot be empty"));
        }
        if name.contains(key_path::SEPARATOR) || name == key_path::COUNT {
            return Err(Error::invalid_schema(
                &key,
                format!(
                    "attribute names cannot contain '{}' or be '{}'",
                    key_path::SEPARATOR,
                    key_path::COUNT
                ),
            ));
        }
        attr.validate(&key)?;
    }
    Ok(())
}

/// What a key-path addresses, as far as the codec is concerned.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Node<'a> {
    /// An attribute, list element or map value described by a schema
    Attr(&'a Schema),
    /// A nested resource, such as a list element of resource type
    Record(&'a SchemaMap),
    /// The `#` marker of a list or map
    Count { of: &'a Schema },
}

impl<'a> Node<'a> {
    fn of_elem(elem: &'a Elem) -> Node<'a> {
        match elem {
            Elem::Schema(schema) => Node::Attr(schema),
            Elem::Resource(resource) => Node::Record(&resource.schema),
        }
    }

    /// The node for the elements of a list or map, or the fields of a record
    /// attribute. `None` for primitives.
    pub(crate) fn elem(schema: &'a Schema) -> Option<Node<'a>> {
        schema.elem.as_ref().map(Node::of_elem)
    }
}

/// Find the node addressed by `key`, walking the schema along its segments.
pub(crate) fn resolve<'a>(schema: &'a SchemaMap, key: &str) -> Result<Node<'a>> {
    let mut segments = key.split(key_path::SEPARATOR);
    let name = segments.next().unwrap_or_default();
    let mut node = match schema.get(name) {
        Some(attr) => Node::Attr(attr),
        None => return Err(Error::lookup(key, format!("unknown attribute {:?}", name))),
    };
    // Byte offset of the remaining segments, for maps with dotted keys
    let mut consumed = name.len();

    while let Some(segment) = segments.next() {
        consumed += 1 + segment.len();
        if segment.is_empty() {
            return Err(Error::lookup(key, "empty key-path segment"));
        }
        node = match node {
            Node::Count { .. } => {
                return Err(Error::lookup(key, "nothing is nested under a count"));
            }
            Node::Record(fields) => match fields.get(segment) {
                Some(attr) => Node::Attr(attr),
                None => return Err(Error::lookup(key, format!("unknown field {:?}", segment))),
            },
            Node::Attr(attr) => match (attr.type_, Node::elem(attr)) {
                (ValueType::List | ValueType::Map, Some(_)) if segment == key_path::COUNT => {
                    Node::Count { of: attr }
                }
                (ValueType::List, Some(elem)) => {
                    if key_path::parse_index(segment).is_none() {
                        return Err(Error::lookup(
                            key,
                            format!("list index {:?} is not a number", segment),
                        ));
                    }
                    elem
                }
                (ValueType::Map, Some(elem @ Node::Attr(e))) if e.type_.is_primitive() => {
                    // Map keys of primitive maps may contain the separator;
                    // the rest of the path is the key.
                    let map_key = &key[consumed - segment.len()..];
                    if !key_path::is_valid_map_key(map_key) {
                        return Err(Error::lookup(key, format!("invalid map key {:?}", map_key)));
                    }
                    let _ = segments.by_ref().count();
                    elem
                }
                (ValueType::Map, Some(elem)) => elem,
                (ValueType::Record, Some(Node::Record(fields))) => match fields.get(segment) {
                    Some(attr) => Node::Attr(attr),
                    None => {
                        return Err(Error::lookup(key, format!("unknown field {:?}", segment)))
                    }
                },
                (t, _) => {
                    return Err(Error::lookup(
                        key,
                        format!(
                            "{} attribute {:?} has no nested values",
                            t,
                            &key[..consumed - segment.len() - 1]
                        ),
                    ))
                }
            },
        };
    }
    Ok(node)
}
