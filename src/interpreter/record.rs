//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the rawk project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::collections::VecDeque;
use std::rc::Rc;

use crate::regex::Regex;

use super::env::Environment;
use super::value::{str_to_f64, Scalar};

/// How a record is split into fields. The single-space default does not
/// split on a literal space: it splits on runs of whitespace with leading
/// and trailing whitespace stripped.
#[derive(Debug, Clone)]
pub(crate) enum FieldSeparator {
    Default,
    Char(char),
    Ere(Rc<Regex>),
    Null,
}

impl FieldSeparator {
    pub(crate) fn parse(fs: &str) -> Result<Self, String> {
        let mut chars = fs.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(FieldSeparator::Null),
            (Some(' '), None) => Ok(FieldSeparator::Default),
            (Some(c), None) => Ok(FieldSeparator::Char(c)),
            _ => Ok(FieldSeparator::Ere(Rc::new(Regex::new(fs)?))),
        }
    }
}

/// Split `text` into fields, invoking `push` once per field in order.
/// An empty text has no fields at all.
pub(crate) fn split_text(
    text: &str,
    separator: &FieldSeparator,
    push: &mut impl FnMut(Scalar),
) -> Result<(), String> {
    if text.is_empty() {
        return Ok(());
    }
    match separator {
        FieldSeparator::Default => {
            for field in text.split_whitespace() {
                push(Scalar::input(field));
            }
        }
        FieldSeparator::Char(c) => {
            for field in text.split(*c) {
                push(Scalar::input(field));
            }
        }
        FieldSeparator::Ere(ere) => {
            let mut split_start = 0;
            for location in ere.match_locations(text)? {
                push(Scalar::input(&text[split_start..location.start]));
                split_start = location.end;
            }
            push(Scalar::input(&text[split_start..]));
        }
        FieldSeparator::Null => {
            for c in text.chars() {
                push(Scalar::input(c.to_string()));
            }
        }
    }
    Ok(())
}

/// The current record and its decomposition into fields, plus the staged
/// input lines it came from. The `NR`/`FNR`/`NF` counters live in the
/// global environment; this type is what keeps them honest.
#[derive(Debug, Default)]
pub(crate) struct RecordManager {
    lines: VecDeque<String>,
    record: Scalar,
    fields: Vec<Scalar>,
    separator_cache: Option<(String, FieldSeparator)>,
}

impl RecordManager {
    pub(crate) fn new() -> Self {
        Self {
            lines: VecDeque::new(),
            record: Scalar::str(""),
            fields: Vec::new(),
            separator_cache: None,
        }
    }

    /// Point the manager at a new sequence of lines. `FNR` restarts from
    /// zero, `NR` keeps counting across sources; the current record is
    /// cleared until the driver advances.
    pub(crate) fn open(&mut self, lines: Vec<String>, env: &mut Environment) {
        self.lines = lines.into();
        self.record = Scalar::str("");
        self.fields.clear();
        env.insert("FNR", Scalar::integer(0));
        env.insert("NF", Scalar::integer(0));
    }

    /// Consume the next line: bump `NR`/`FNR`, split and assign. Returns
    /// whether a line was available.
    pub(crate) fn advance(&mut self, env: &mut Environment) -> Result<bool, String> {
        match self.lines.pop_front() {
            Some(line) => {
                bump_counters(env);
                self.split_and_assign(line, env)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Consume the next line raw: the record counters advance but the
    /// current record is left alone. This is `getline var`.
    pub(crate) fn next_raw(&mut self, env: &mut Environment) -> Option<String> {
        let line = self.lines.pop_front()?;
        bump_counters(env);
        Some(line)
    }

    pub(crate) fn split_and_assign(
        &mut self,
        line: String,
        env: &mut Environment,
    ) -> Result<(), String> {
        let separator = self.separator(env)?;
        let record = Scalar::input(line);
        let mut fields = Vec::new();
        split_text(record.as_str(), &separator, &mut |field| fields.push(field))?;
        self.record = record;
        self.fields = fields;
        env.insert("NF", Scalar::integer(self.fields.len() as i64));
        Ok(())
    }

    /// Replace one field. Index 0 replaces the whole record (re-splitting
    /// it); an index beyond `NF` grows the field list with empty fields.
    /// Any field change re-derives the record by joining on `OFS`.
    pub(crate) fn edit_field(
        &mut self,
        index: usize,
        value: Scalar,
        env: &mut Environment,
    ) -> Result<(), String> {
        if index == 0 {
            return self.split_and_assign(value.into_text(), env);
        }
        if index > self.fields.len() {
            self.fields.resize_with(index, || Scalar::input(""));
        }
        self.fields[index - 1] = value;
        self.recompute_record(env);
        Ok(())
    }

    /// `$index`: 0 is the whole record; 1..=NF are the fields.
    pub(crate) fn field(&self, index: usize) -> Option<&Scalar> {
        if index == 0 {
            Some(&self.record)
        } else {
            self.fields.get(index - 1)
        }
    }

    pub(crate) fn record(&self) -> &Scalar {
        &self.record
    }

    pub(crate) fn field_count(&self) -> usize {
        self.fields.len()
    }

    fn recompute_record(&mut self, env: &mut Environment) {
        let ofs = env.scalar_text("OFS").to_string();
        let joined = self
            .fields
            .iter()
            .map(Scalar::as_str)
            .collect::<Vec<_>>()
            .join(&ofs);
        self.record = Scalar::input(joined);
        env.insert("NF", Scalar::integer(self.fields.len() as i64));
    }

    fn separator(&mut self, env: &Environment) -> Result<FieldSeparator, String> {
        let fs = env.scalar_text("FS");
        let stale = match &self.separator_cache {
            Some((cached, _)) => cached != fs,
            None => true,
        };
        if stale {
            let parsed = FieldSeparator::parse(fs)?;
            self.separator_cache = Some((fs.to_string(), parsed));
        }
        Ok(self
            .separator_cache
            .as_ref()
            .expect("field separator cache was just filled")
            .1
            .clone())
    }
}

fn bump_counters(env: &mut Environment) {
    for counter in ["NR", "FNR"] {
        let next = str_to_f64(env.scalar_text(counter)) as i64 + 1;
        env.insert(counter, Scalar::integer(next));
    }
}
