// convnet-core/src/nn/attributes.rs

//! Flat key/value dumps of layers and volumes, ready for a JSON-like writer.

use serde::Serialize;
use std::collections::BTreeMap;

/// Attribute map of one layer or volume. Keys are sorted so dumps are stable.
pub type Attributes = BTreeMap<String, AttrValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(usize),
    Float(f64),
    Str(String),
    Floats(Vec<f64>),
    Map(Attributes),
    List(Vec<Attributes>),
}

impl From<usize> for AttrValue {
    fn from(v: usize) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl From<Attributes> for AttrValue {
    fn from(v: Attributes) -> Self {
        AttrValue::Map(v)
    }
}

/// Builds an [`Attributes`] map from `key => value` pairs.
macro_rules! attributes {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut attrs = $crate::nn::attributes::Attributes::new();
        $(
            attrs.insert(
                $key.to_string(),
                $crate::nn::attributes::AttrValue::from($value),
            );
        )*
        attrs
    }};
}

pub(crate) use attributes;
