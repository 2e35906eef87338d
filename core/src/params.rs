//! Request parameters and their form encoding.
//!
//! # Design
//! The API takes nested parameters as flat form fields using bracket
//! notation: `{"customer": {"metadata": {"order_id": "6735"}}}` travels as
//! `customer[metadata][order_id]=6735`, and sequence elements are indexed
//! (`items[0][price]=price_1`).
//!
//! `ParamValue` is a closed tree of the shapes the API accepts, so the
//! flattener cannot meet an unsupported leaf. `Params` keeps insertion order;
//! the encoded output follows it rather than sorting keys.
//!
//! Nulls are dropped at every depth. Callers use them to say "leave this
//! unset", and the API has no wire representation for them.
//!
//! Non-finite floats are a caller bug: flattening panics on them rather than
//! sending `NaN` or `inf`.

use serde_json::Value;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Map(Params),
    List(Vec<ParamValue>),
}

/// An insertion-ordered mapping of parameter names to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Vec<(String, ParamValue)>);

impl Params {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builder-style insert. Replaces an existing key in place, keeping its
    /// original position.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten into `(key, value)` pairs using bracket notation.
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        flatten_map(self, "", &mut out);
        out
    }

    /// Flatten and encode as `application/x-www-form-urlencoded`, keeping
    /// brackets in keys readable.
    pub fn to_form(&self) -> String {
        encode_pairs(&self.flatten())
    }
}

fn flatten_map(params: &Params, prefix: &str, out: &mut Vec<(String, String)>) {
    for (key, value) in params.iter() {
        let composed = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}[{key}]")
        };
        flatten_value(value, composed, out);
    }
}

fn flatten_value(value: &ParamValue, key: String, out: &mut Vec<(String, String)>) {
    match value {
        ParamValue::Null => {}
        ParamValue::Map(map) => flatten_map(map, &key, out),
        ParamValue::List(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_value(item, format!("{key}[{i}]"), out);
            }
        }
        ParamValue::Bool(b) => out.push((key, b.to_string())),
        ParamValue::Int(n) => out.push((key, n.to_string())),
        ParamValue::Float(x) => {
            // NaN and infinities have no decimal form the API accepts
            assert!(x.is_finite(), "parameter `{key}` is not a finite number: {x}");
            out.push((key, x.to_string()));
        }
        ParamValue::Str(s) => out.push((key, s.clone())),
    }
}

/// Percent-encode flattened pairs into a form body or query string.
pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| {
            let key = urlencoding::encode(k).replace("%5B", "[").replace("%5D", "]");
            format!("{key}={}", urlencoding::encode(v))
        })
        .collect::<Vec<_>>()
        .join("&")
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<&String> for ParamValue {
    fn from(s: &String) -> Self {
        ParamValue::Str(s.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Int(n.into())
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::Int(n.into())
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Float(x)
    }
}

impl From<Params> for ParamValue {
    fn from(p: Params) -> Self {
        ParamValue::Map(p)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(ParamValue::Null, Into::into)
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ParamValue::Null,
            Value::Bool(b) => ParamValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ParamValue::Int(i),
                // u64 beyond i64 and non-integers keep their exact JSON text
                None => match n.as_f64() {
                    Some(x) if !n.is_u64() => ParamValue::Float(x),
                    _ => ParamValue::Str(n.to_string()),
                },
            },
            Value::String(s) => ParamValue::Str(s),
            Value::Array(items) => ParamValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => ParamValue::Map(Params(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            )),
        }
    }
}

/// Build `Params` from a JSON object. Non-object values produce empty params.
impl From<Value> for Params {
    fn from(value: Value) -> Self {
        match ParamValue::from(value) {
            ParamValue::Map(params) => params,
            _ => Params::new(),
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}
