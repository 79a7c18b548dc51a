// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Decoding helpers for the canister reply shape.
//!
//! The services render Candid values the way the JavaScript agent does:
//! a variant is a record with exactly one key (`{"Active": null}`), an
//! option is a sequence of zero or one elements, and 64-bit integers may
//! arrive as JSON numbers or as digit strings. Nothing outside this module
//! and `normalize` should ever look at that shape.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};

/// A closed enumeration carried on the wire as a single-key record.
pub trait WireVariant: Sized + Copy {
    /// Field name used in error messages.
    const FIELD: &'static str;
    /// Every tag the field may carry.
    const TAGS: &'static [&'static str];

    fn tag(&self) -> &'static str;
    fn from_tag(tag: &str) -> Option<Self>;
}

/// Unwrap an optional-as-sequence value.
pub fn decode_optional<T>(seq: Vec<T>) -> CoreResult<Option<T>> {
    if seq.len() > 1 {
        return Err(CoreError::malformed(format!(
            "optional value carried {} elements",
            seq.len()
        )));
    }
    Ok(seq.into_iter().next())
}

/// Return the active tag of a single-key variant record, checked against
/// the closed set `allowed`.
pub fn decode_variant_tag<'a>(
    record: &'a Map<String, Value>,
    field: &str,
    allowed: &[&str],
) -> CoreResult<&'a str> {
    let mut keys = record.keys();
    let tag = match (keys.next(), keys.next()) {
        (Some(tag), None) => tag.as_str(),
        (None, _) => {
            return Err(CoreError::malformed(format!("{field}: variant record has no tag")));
        }
        (Some(_), Some(_)) => {
            return Err(CoreError::malformed(format!(
                "{field}: variant record has {} tags",
                record.len()
            )));
        }
    };
    if !allowed.contains(&tag) {
        return Err(CoreError::UnknownVariant {
            field: field.to_string(),
            tag: tag.to_string(),
        });
    }
    Ok(tag)
}

/// Decode a variant field into its enum. A bare tag string is accepted too,
/// which is how an already-normalized view carries the same field.
pub fn decode_variant<T: WireVariant>(value: &Value) -> CoreResult<T> {
    let tag = match value {
        Value::Object(record) => decode_variant_tag(record, T::FIELD, T::TAGS)?,
        Value::String(tag) => tag.as_str(),
        other => {
            return Err(CoreError::malformed(format!(
                "{}: expected a variant record, found {}",
                T::FIELD,
                kind(other)
            )));
        }
    };
    T::from_tag(tag).ok_or_else(|| CoreError::UnknownVariant {
        field: T::FIELD.to_string(),
        tag: tag.to_string(),
    })
}

/// Re-encode a variant as the single-key record the services expect.
pub fn encode_variant<T: WireVariant>(variant: &T) -> Value {
    let mut record = Map::new();
    record.insert(variant.tag().to_string(), Value::Null);
    Value::Object(record)
}

/// Encode an optional value as a zero-or-one sequence.
pub fn encode_optional(value: Option<Value>) -> Value {
    Value::Array(value.into_iter().collect())
}

pub(crate) fn as_record<'a>(value: &'a Value, what: &str) -> CoreResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        CoreError::malformed(format!("{what}: expected a record, found {}", kind(value)))
    })
}

pub(crate) fn as_sequence<'a>(value: &'a Value, what: &str) -> CoreResult<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| {
        CoreError::malformed(format!("{what}: expected a sequence, found {}", kind(value)))
    })
}

/// First present field among `names`; services and views disagree on case.
pub(crate) fn field<'a>(record: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|n| record.get(*n))
}

pub(crate) fn required<'a>(
    record: &'a Map<String, Value>,
    names: &[&str],
) -> CoreResult<&'a Value> {
    field(record, names)
        .ok_or_else(|| CoreError::malformed(format!("missing field '{}'", names[0])))
}

/// How a record carries its optional fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    /// Service reply: optionals are `[]`/`[x]` sequences.
    Wire,
    /// Flattened view-model: optionals are `null` or the bare value.
    View,
}

impl Shape {
    /// A record whose variant field holds a bare tag string is a view;
    /// anything else is held to the wire rules.
    pub(crate) fn of(record: &Map<String, Value>, variant: &[&str]) -> Shape {
        match field(record, variant) {
            Some(Value::String(_)) => Shape::View,
            _ => Shape::Wire,
        }
    }
}

/// Optional field. Missing and `null` are absent in either shape; a wire
/// record must otherwise carry a zero-or-one sequence.
pub(crate) fn optional<'a>(
    record: &'a Map<String, Value>,
    names: &[&str],
    shape: Shape,
) -> CoreResult<Option<&'a Value>> {
    match (field(record, names), shape) {
        (None | Some(Value::Null), _) => Ok(None),
        (Some(Value::Array(seq)), _) => {
            decode_optional(seq.iter().collect()).map_err(|e| match e {
                CoreError::MalformedResponse(msg) => {
                    CoreError::malformed(format!("{}: {}", names[0], msg))
                }
                other => other,
            })
        }
        (Some(v), Shape::View) => Ok(Some(v)),
        (Some(v), Shape::Wire) => Err(CoreError::malformed(format!(
            "{}: expected an optional sequence, found {}",
            names[0],
            kind(v)
        ))),
    }
}

/// A plain field some replies leave out: missing and `null` are absent.
pub(crate) fn omissible<'a>(record: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    field(record, names).filter(|v| !v.is_null())
}

pub(crate) fn text(value: &Value, field: &str) -> CoreResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            CoreError::malformed(format!("{field}: expected text, found {}", kind(value)))
        })
}

/// Numeric coercion into `Decimal`. Floats go through their shortest
/// decimal rendering so `856.07` stays `856.07`.
pub fn decimal(value: &Value, field: &str) -> CoreResult<Decimal> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => {
            return Err(CoreError::malformed(format!(
                "{field}: expected a number, found {}",
                kind(other)
            )));
        }
    };
    raw.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| CoreError::malformed(format!("{field}: '{raw}' is not a decimal")))
}

/// Unsigned integer coercion; big integers usually arrive as digit strings.
pub fn unsigned(value: &Value, field: &str) -> CoreResult<u64> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        CoreError::malformed(format!("{field}: expected an unsigned integer, found {value}"))
    })
}

pub(crate) fn bounded<T: TryFrom<u64>>(value: &Value, field: &str) -> CoreResult<T> {
    let n = unsigned(value, field)?;
    T::try_from(n).map_err(|_| CoreError::malformed(format!("{field}: {n} is out of range")))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a record",
    }
}
