// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Numeric leaf extraction from arbitrary JSON.
//!
//! Objects and arrays are walked recursively; every number is collected,
//! strings, booleans and nulls are skipped. Object values are visited in map
//! iteration order and array elements left to right, so the output order is
//! stable for a given input.

use serde_json::{Map, Value};

/// Collect every numeric leaf of `value` into a flat sequence.
pub fn flatten(value: &Value) -> Vec<f64> {
    let mut out = Vec::new();
    collect(value, &mut out);
    out
}

fn collect(value: &Value, out: &mut Vec<f64>) {
    match value {
        Value::Object(map) => collect_object(map, out),
        Value::Array(items) => collect_array(items, out),
        Value::Number(n) => {
            if let Some(n) = n.as_f64() {
                out.push(n);
            }
        }
        Value::String(_) | Value::Bool(_) | Value::Null => {}
    }
}

fn collect_object(map: &Map<String, Value>, out: &mut Vec<f64>) {
    for value in map.values() {
        collect(value, out);
    }
}

fn collect_array(items: &[Value], out: &mut Vec<f64>) {
    for item in items {
        collect(item, out);
    }
}
