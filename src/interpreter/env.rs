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

/// The process-global name to value map. It lives for the whole program
/// run and is handed back to the embedder afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Environment {
    globals: HashMap<String, Value>,
}

impl Environment {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.globals.get_mut(name)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.globals.contains_key(name)
    }

    pub(crate) fn insert<V: Into<Value>>(&mut self, name: &str, value: V) {
        self.globals.insert(name.to_string(), value.into());
    }

    /// The canonical text of a well-known scalar global (`FS`, `OFS`, ...).
    /// Missing or non-scalar bindings read as the empty string.
    pub(crate) fn scalar_text(&self, name: &str) -> &str {
        match self.globals.get(name) {
            Some(Value::Scalar(s)) => s.as_str(),
            _ => "",
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.globals.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The per-call tier of the name lookup: `None` outside of user functions,
/// one fresh map per invocation inside them.
#[derive(Debug, Default)]
pub(crate) struct Frame {
    locals: Option<HashMap<String, Value>>,
}

impl Frame {
    pub(crate) fn global() -> Self {
        Self { locals: None }
    }

    pub(crate) fn local(locals: HashMap<String, Value>) -> Self {
        Self {
            locals: Some(locals),
        }
    }

    fn get(&self, name: &str) -> Option<&Value> {
        self.locals.as_ref().and_then(|l| l.get(name))
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.locals.as_mut().and_then(|l| l.get_mut(name))
    }

    fn contains(&self, name: &str) -> bool {
        self.locals.as_ref().is_some_and(|l| l.contains_key(name))
    }
}

/// Locals first, then globals.
pub(crate) fn read<'a>(env: &'a Environment, frame: &'a Frame, name: &str) -> Option<&'a Value> {
    frame.get(name).or_else(|| env.get(name))
}

pub(crate) fn read_mut<'a>(
    env: &'a mut Environment,
    frame: &'a mut Frame,
    name: &str,
) -> Option<&'a mut Value> {
    if frame.contains(name) {
        frame.get_mut(name)
    } else {
        env.get_mut(name)
    }
}

/// Bind a name: in the scope it already exists in, else in the locals when
/// inside a function, else in the globals.
pub(crate) fn write(env: &mut Environment, frame: &mut Frame, name: &str, value: Value) {
    if frame.contains(name) {
        frame
            .locals
            .as_mut()
            .expect("frame with a bound local has no locals map")
            .insert(name.to_string(), value);
    } else if env.contains(name) || frame.locals.is_none() {
        env.insert(name, value);
    } else {
        frame
            .locals
            .as_mut()
            .expect("local frame has no locals map")
            .insert(name.to_string(), value);
    }
}
