//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the rawk project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::format;

use super::array::Array;

/// Longest-prefix string to number conversion: leading whitespace is
/// skipped, and whatever numeric prefix remains is parsed. No prefix (or a
/// non-finite one) yields 0.
pub(crate) fn str_to_f64(s: &str) -> f64 {
    let trimmed = s.trim_start();
    match lexical::parse_partial::<f64, _>(trimmed) {
        Ok((value, consumed)) if consumed > 0 && value.is_finite() => value,
        _ => 0.0,
    }
}

/// Full-string conversion: the whole (trimmed) text has to be a finite
/// number.
pub(crate) fn parse_full_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    lexical::parse::<f64, _>(trimmed).ok().filter(|v| v.is_finite())
}

pub(crate) fn looks_numeric(s: &str) -> bool {
    parse_full_f64(s).is_some()
}

fn has_integer_form(x: f64) -> bool {
    // i64 round-trips exactly below 2^63
    x.fract() == 0.0 && x.abs() < 9.22e18
}

/// A scalar value. The canonical form is the string; the numeric and
/// boolean interpretations are derived from it on demand.
///
/// `numeric` records provenance, not parseability: it is set on number
/// literals, arithmetic results and input-derived strings that look like
/// numbers, and it decides whether comparisons are numeric or
/// lexicographic. The string literal `"10"` compares lexicographically,
/// the number 10 numerically.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    text: String,
    numeric: bool,
}

impl Scalar {
    /// A plain string value.
    pub fn str<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            numeric: false,
        }
    }

    /// A value read from input (a record, a field, a `getline` or `split`
    /// result): numeric when the whole text looks like a number.
    pub(crate) fn input<S: Into<String>>(text: S) -> Self {
        let text = text.into();
        let numeric = looks_numeric(&text);
        Self { text, numeric }
    }

    /// The value of a name that was never assigned: the empty string,
    /// which is 0 in numeric contexts.
    pub(crate) fn uninitialized() -> Self {
        Self {
            text: String::new(),
            numeric: true,
        }
    }

    pub(crate) fn integer(n: i64) -> Self {
        Self {
            text: n.to_string(),
            numeric: true,
        }
    }

    pub(crate) fn bool(p: bool) -> Self {
        Self {
            text: if p { "1" } else { "0" }.to_string(),
            numeric: true,
        }
    }

    /// Store a number: integral values keep their exact decimal form, all
    /// others go through the numeric output format.
    pub(crate) fn from_number(x: f64, number_format: &str) -> Result<Self, String> {
        let text = if has_integer_form(x) {
            (x as i64).to_string()
        } else {
            format::format_float(number_format, x)?
        };
        Ok(Self {
            text,
            numeric: true,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub(crate) fn is_numeric(&self) -> bool {
        self.numeric
    }

    pub fn to_f64(&self) -> f64 {
        str_to_f64(&self.text)
    }

    pub(crate) fn parse_full(&self) -> Option<f64> {
        parse_full_f64(&self.text)
    }

    pub fn to_bool(&self) -> bool {
        if self.text.is_empty() {
            return false;
        }
        match self.parse_full() {
            Some(x) => x != 0.0,
            None => true,
        }
    }

    /// Canonicalize into an array key: integral numbers use the integer's
    /// decimal form (`a[2.0]` and `a[2]` are the same element), everything
    /// else is the text verbatim.
    pub(crate) fn into_key(self) -> String {
        match self.parse_full() {
            Some(x) if has_integer_form(x) => (x as i64).to_string(),
            _ => self.text,
        }
    }

    pub(crate) fn into_text(self) -> String {
        self.text
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Self::uninitialized()
    }
}

impl From<String> for Scalar {
    fn from(text: String) -> Self {
        Scalar::str(text)
    }
}

impl From<&str> for Scalar {
    fn from(text: &str) -> Self {
        Scalar::str(text)
    }
}

/// A stored value: every binding is determinately a scalar or an array,
/// and the two never mix under one name.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Array(Array),
}

impl Value {
    pub fn scalar(&self) -> Result<&Scalar, String> {
        match self {
            Value::Scalar(s) => Ok(s),
            Value::Array(_) => Err("array used in scalar context".to_string()),
        }
    }

    pub(crate) fn into_scalar(self) -> Result<Scalar, String> {
        match self {
            Value::Scalar(s) => Ok(s),
            Value::Array(_) => Err("array used in scalar context".to_string()),
        }
    }

    pub fn array(&self) -> Result<&Array, String> {
        match self {
            Value::Array(a) => Ok(a),
            Value::Scalar(_) => Err("scalar used in array context".to_string()),
        }
    }

    pub(crate) fn array_mut(&mut self) -> Result<&mut Array, String> {
        match self {
            Value::Array(a) => Ok(a),
            Value::Scalar(_) => Err("scalar used in array context".to_string()),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}
