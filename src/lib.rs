//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the rawk project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Tree-walking interpreter core for an awk-family text processing
//! language.
//!
//! The crate executes an already-parsed [`program::Program`] over input
//! lines: BEGIN blocks first, then every pattern-action rule against each
//! record, then END blocks with the last record still latched. Values are
//! string-backed scalars with on-demand numeric interpretation, plus
//! nestable associative arrays. Program output goes to a caller-supplied
//! [`std::io::Write`] sink, and the final global environment is handed
//! back for inspection.
//!
//! Producing the program tree (lexing and parsing), command line
//! handling and file discovery are the host's business; this crate only
//! needs a file path or a vector of lines.

pub mod error;
pub mod program;
pub mod regex;

mod format;
mod interpreter;

pub use error::{Error, ErrorKind, EvalError, Result};
pub use interpreter::{interpret, Array, Environment, Interpreter, Scalar, Value};
