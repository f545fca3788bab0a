//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the rawk project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::collections::HashMap;

use super::value::Value;

/// An associative array: an unordered map from canonical string keys to
/// values. Elements may themselves be arrays, which is how
/// multi-dimensional indexing is represented.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    elements: HashMap<String, Value>,
}

impl Array {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.elements.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.elements.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.elements.get_mut(key)
    }

    pub(crate) fn insert<V: Into<Value>>(&mut self, key: String, value: V) {
        self.elements.insert(key, value.into());
    }

    pub(crate) fn entry_or_insert_with<F: FnOnce() -> Value>(
        &mut self,
        key: String,
        default: F,
    ) -> &mut Value {
        self.elements.entry(key).or_insert_with(default)
    }

    pub(crate) fn delete(&mut self, key: &str) -> bool {
        self.elements.remove(key).is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.elements.clear();
    }

    /// A snapshot of the keys, in no particular order. Iterating a
    /// snapshot keeps `for (k in a)` well-defined when the loop body
    /// mutates the array.
    pub(crate) fn keys(&self) -> Vec<String> {
        self.elements.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.elements.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Array {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut array = Array::default();
        for (key, value) in iter {
            array.insert(key.into(), value);
        }
        array
    }
}
