//! JSON value tree.
//!
//! A [`Value`] is a tagged sum of the eight JSON kinds plus the allocator
//! context it was built under. String payloads live in buffers obtained
//! from that context; children created through the tree API inherit it.
//!
//! Kind-mismatched `get_*` calls are programming errors and panic. The
//! non-panicking `as_*` observers return `Option` instead.

use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

use crate::alloc::{Alloc, Str};

/// The kind tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The null literal.
    Null,
    /// true or false.
    Bool,
    /// A signed 64-bit integer.
    Long,
    /// A 32-bit IEEE-754 value.
    Float,
    /// A 64-bit IEEE-754 value.
    Double,
    /// An owned UTF-8 string.
    String,
    /// An ordered sequence of values.
    Array,
    /// A string-keyed mapping with lexicographic iteration.
    Object,
}

#[derive(Debug, PartialEq)]
pub(crate) enum Data {
    Null,
    Bool(bool),
    Long(i64),
    Float(f32),
    Double(f64),
    String(Str),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

/// A JSON value: a kind tag, its payload, and the allocator context the
/// payload was built under.
#[derive(Debug)]
pub struct Value {
    ctx: Alloc,
    data: Data,
}

impl Value {
    /// A null value under the given context.
    pub fn null(ctx: Alloc) -> Value {
        Value {
            ctx,
            data: Data::Null,
        }
    }

    /// A boolean value.
    pub fn from_bool(ctx: Alloc, value: bool) -> Value {
        Value {
            ctx,
            data: Data::Bool(value),
        }
    }

    /// A Long value.
    pub fn from_i64(ctx: Alloc, value: i64) -> Value {
        Value {
            ctx,
            data: Data::Long(value),
        }
    }

    /// A Long value, or a Double when the input exceeds `i64::MAX`.
    pub fn from_u64(ctx: Alloc, value: u64) -> Value {
        let data = match i64::try_from(value) {
            Ok(long) => Data::Long(long),
            Err(_) => Data::Double(value as f64),
        };
        Value { ctx, data }
    }

    /// A Float value.
    pub fn from_f32(ctx: Alloc, value: f32) -> Value {
        Value {
            ctx,
            data: Data::Float(value),
        }
    }

    /// A Double value.
    pub fn from_f64(ctx: Alloc, value: f64) -> Value {
        Value {
            ctx,
            data: Data::Double(value),
        }
    }

    /// A String value; the bytes are copied into storage from `ctx`.
    pub fn from_str(ctx: Alloc, value: &str) -> Value {
        Value {
            ctx,
            data: Data::String(Str::new_in(ctx, value)),
        }
    }

    /// The allocator context this value was built under.
    pub fn context(&self) -> Alloc {
        self.ctx
    }

    /// The kind tag.
    pub fn kind(&self) -> Kind {
        match self.data {
            Data::Null => Kind::Null,
            Data::Bool(_) => Kind::Bool,
            Data::Long(_) => Kind::Long,
            Data::Float(_) => Kind::Float,
            Data::Double(_) => Kind::Double,
            Data::String(_) => Kind::String,
            Data::Array(_) => Kind::Array,
            Data::Object(_) => Kind::Object,
        }
    }

    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self.data, Data::Null)
    }

    /// Returns true if this is a boolean value.
    pub fn is_bool(&self) -> bool {
        matches!(self.data, Data::Bool(_))
    }

    /// Returns true if this is any numeric value.
    pub fn is_number(&self) -> bool {
        matches!(self.data, Data::Long(_) | Data::Float(_) | Data::Double(_))
    }

    /// Returns true if this is a Long value.
    pub fn is_long(&self) -> bool {
        matches!(self.data, Data::Long(_))
    }

    /// Returns true if this is a string value.
    pub fn is_string(&self) -> bool {
        matches!(self.data, Data::String(_))
    }

    /// Returns true if this is an array value.
    pub fn is_array(&self) -> bool {
        matches!(self.data, Data::Array(_))
    }

    /// Returns true if this is an object value.
    pub fn is_object(&self) -> bool {
        matches!(self.data, Data::Object(_))
    }

    /// The boolean payload.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not Bool.
    pub fn get_bool(&self) -> bool {
        match self.data {
            Data::Bool(value) => value,
            _ => panic!("expected Bool, found {:?}", self.kind()),
        }
    }

    /// The integer payload.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not Long.
    pub fn get_long(&self) -> i64 {
        match self.data {
            Data::Long(value) => value,
            _ => panic!("expected Long, found {:?}", self.kind()),
        }
    }

    /// The floating-point payload as a single.
    ///
    /// # Panics
    ///
    /// Panics if the kind is neither Float nor Double.
    pub fn get_float(&self) -> f32 {
        match self.data {
            Data::Float(value) => value,
            Data::Double(value) => value as f32,
            _ => panic!("expected Float or Double, found {:?}", self.kind()),
        }
    }

    /// The floating-point payload as a double.
    ///
    /// # Panics
    ///
    /// Panics if the kind is neither Float nor Double.
    pub fn get_double(&self) -> f64 {
        match self.data {
            Data::Float(value) => f64::from(value),
            Data::Double(value) => value,
            _ => panic!("expected Float or Double, found {:?}", self.kind()),
        }
    }

    /// Any numeric payload widened to a double.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not numeric.
    pub fn get_number(&self) -> f64 {
        match self.data {
            Data::Long(value) => value as f64,
            Data::Float(value) => f64::from(value),
            Data::Double(value) => value,
            _ => panic!("expected a number, found {:?}", self.kind()),
        }
    }

    /// The string payload.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not String.
    pub fn get_string(&self) -> &str {
        match &self.data {
            Data::String(value) => value.as_str(),
            _ => panic!("expected String, found {:?}", self.kind()),
        }
    }

    /// The array payload.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not Array.
    pub fn get_array(&self) -> &Vec<Value> {
        match &self.data {
            Data::Array(items) => items,
            _ => panic!("expected Array, found {:?}", self.kind()),
        }
    }

    /// The array payload, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not Array.
    pub fn get_array_mut(&mut self) -> &mut Vec<Value> {
        let kind = self.kind();
        match &mut self.data {
            Data::Array(items) => items,
            _ => panic!("expected Array, found {:?}", kind),
        }
    }

    /// The object payload.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not Object.
    pub fn get_object(&self) -> &BTreeMap<String, Value> {
        match &self.data {
            Data::Object(entries) => entries,
            _ => panic!("expected Object, found {:?}", self.kind()),
        }
    }

    /// The object payload, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not Object.
    pub fn get_object_mut(&mut self) -> &mut BTreeMap<String, Value> {
        let kind = self.kind();
        match &mut self.data {
            Data::Object(entries) => entries,
            _ => panic!("expected Object, found {:?}", kind),
        }
    }

    /// The boolean payload, if this is a Bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            Data::Bool(value) => Some(value),
            _ => None,
        }
    }

    /// The integer payload, if this is a Long.
    pub fn as_i64(&self) -> Option<i64> {
        match self.data {
            Data::Long(value) => Some(value),
            _ => None,
        }
    }

    /// Any numeric payload widened to a double.
    pub fn as_f64(&self) -> Option<f64> {
        match self.data {
            Data::Long(value) => Some(value as f64),
            Data::Float(value) => Some(f64::from(value)),
            Data::Double(value) => Some(value),
            _ => None,
        }
    }

    /// The string payload, if this is a String.
    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            Data::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// The array payload, if this is an Array.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match &self.data {
            Data::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The object payload, if this is an Object.
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match &self.data {
            Data::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Whether this is an object with an entry under `key`.
    pub fn contains(&self, key: &str) -> bool {
        match &self.data {
            Data::Object(entries) => entries.contains_key(key),
            _ => false,
        }
    }

    /// Replace the payload with null.
    pub fn set_null(&mut self) {
        self.data = Data::Null;
    }

    /// Replace the payload with a boolean.
    pub fn set_bool(&mut self, value: bool) {
        self.data = Data::Bool(value);
    }

    /// Replace the payload with a Long.
    pub fn set_long(&mut self, value: i64) {
        self.data = Data::Long(value);
    }

    /// Replace the payload with a Float.
    pub fn set_float(&mut self, value: f32) {
        self.data = Data::Float(value);
    }

    /// Replace the payload with a Double.
    pub fn set_double(&mut self, value: f64) {
        self.data = Data::Double(value);
    }

    /// Replace the payload with a copy of `value` in this value's context.
    pub fn set_string(&mut self, value: &str) {
        self.data = Data::String(Str::new_in(self.ctx, value));
    }

    /// Replace the payload with an empty array.
    pub fn set_array(&mut self) {
        self.data = Data::Array(Vec::new());
    }

    /// Replace the payload with an empty object.
    pub fn set_object(&mut self) {
        self.data = Data::Object(BTreeMap::new());
    }

    /// Deep-copy `other`'s payload into this value, keeping this value's
    /// context; string storage is re-allocated under it.
    pub fn assign(&mut self, other: &Value) {
        self.data = clone_data_in(&other.data, self.ctx);
    }

    /// Move `other`'s payload into this value. Buffer ownership transfers
    /// only when the contexts are identical; otherwise the payload is
    /// copied under this value's context and `other`'s storage is freed.
    pub fn adopt(&mut self, other: Value) {
        if self.ctx == other.ctx {
            self.data = other.data;
        } else {
            self.assign(&other);
        }
    }

    /// Deep copy under a possibly different context.
    pub fn clone_in(&self, ctx: Alloc) -> Value {
        Value {
            ctx,
            data: clone_data_in(&self.data, ctx),
        }
    }

    pub(crate) fn data(&self) -> &Data {
        &self.data
    }

    pub(crate) fn install_string(&mut self, value: Str) {
        self.data = Data::String(value);
    }

    pub(crate) fn install_array(&mut self, items: Vec<Value>) {
        self.data = Data::Array(items);
    }

    pub(crate) fn install_object(&mut self, entries: BTreeMap<String, Value>) {
        self.data = Data::Object(entries);
    }

    pub(crate) fn take_key(self) -> Option<String> {
        match self.data {
            Data::String(value) => Some(value.as_str().to_owned()),
            _ => None,
        }
    }
}

fn clone_data_in(data: &Data, ctx: Alloc) -> Data {
    match data {
        Data::Null => Data::Null,
        Data::Bool(value) => Data::Bool(*value),
        Data::Long(value) => Data::Long(*value),
        Data::Float(value) => Data::Float(*value),
        Data::Double(value) => Data::Double(*value),
        Data::String(value) => Data::String(value.clone_in(ctx)),
        Data::Array(items) => Data::Array(items.iter().map(|item| item.clone_in(ctx)).collect()),
        Data::Object(entries) => Data::Object(
            entries
                .iter()
                .map(|(key, item)| (key.clone(), item.clone_in(ctx)))
                .collect(),
        ),
    }
}

impl Clone for Value {
    fn clone(&self) -> Value {
        self.clone_in(self.ctx)
    }
}

// Equality is structural; the allocator context does not participate.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.data == other.data
    }
}

impl Index<usize> for Value {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if the kind is not Array or the index is out of bounds.
    fn index(&self, index: usize) -> &Value {
        &self.get_array()[index]
    }
}

impl IndexMut<usize> for Value {
    /// Coerces the value to an Array, discarding any prior payload, and
    /// extends it with nulls up to `index`.
    fn index_mut(&mut self, index: usize) -> &mut Value {
        let ctx = self.ctx;
        if !self.is_array() {
            self.set_array();
        }
        let items = self.get_array_mut();
        if index >= items.len() {
            items.resize(index + 1, Value::null(ctx));
        }
        &mut items[index]
    }
}

impl Index<&str> for Value {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if the kind is not Object or the key is absent.
    fn index(&self, key: &str) -> &Value {
        match self.get_object().get(key) {
            Some(value) => value,
            None => panic!("no entry for key {key:?}"),
        }
    }
}

impl IndexMut<&str> for Value {
    /// Coerces the value to an Object, discarding any prior payload, and
    /// inserts a null entry when the key is absent.
    fn index_mut(&mut self, key: &str) -> &mut Value {
        let ctx = self.ctx;
        if !self.is_object() {
            self.set_object();
        }
        self.get_object_mut()
            .entry(key.to_owned())
            .or_insert_with(|| Value::null(ctx))
    }
}
