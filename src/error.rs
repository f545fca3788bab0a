//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the rawk project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use core::fmt;

use crate::program::SourcePos;

/// The category of an evaluation failure. The language has no in-program
/// exception handling, so these only serve diagnostics at the host boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The program has the wrong shape (`break` outside a loop, a bare
    /// regular expression where an expression is required, a call to an
    /// undefined function).
    Program,
    /// A scalar was used where an array is required or vice versa, or an
    /// operator that demands numbers was given a non-numeric operand.
    Type,
    /// A field or array index is out of range.
    Index,
    /// A built-in was called with arguments that fit none of its
    /// parameter sets, or a user function with too few arguments.
    Argument,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Program => write!(f, "program"),
            ErrorKind::Type => write!(f, "type"),
            ErrorKind::Index => write!(f, "index"),
            ErrorKind::Argument => write!(f, "argument"),
        }
    }
}

/// An evaluation failure, annotated with the position the parser stamped
/// on the offending node.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} error: {message}, at {pos}")]
pub struct EvalError {
    pub kind: ErrorKind,
    pub pos: SourcePos,
    pub message: String,
}

impl EvalError {
    pub fn new<M: Into<String>>(kind: ErrorKind, pos: SourcePos, message: M) -> Self {
        Self {
            kind,
            pos,
            message: message.into(),
        }
    }

    pub fn program<M: Into<String>>(pos: SourcePos, message: M) -> Self {
        Self::new(ErrorKind::Program, pos, message)
    }

    pub fn type_error<M: Into<String>>(pos: SourcePos, message: M) -> Self {
        Self::new(ErrorKind::Type, pos, message)
    }

    pub fn index<M: Into<String>>(pos: SourcePos, message: M) -> Self {
        Self::new(ErrorKind::Index, pos, message)
    }

    pub fn argument<M: Into<String>>(pos: SourcePos, message: M) -> Self {
        Self::new(ErrorKind::Argument, pos, message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// NOTE: not an error. `next` has to abandon whatever user-function
    /// nesting it was evaluated in and resume the per-record loop, so it
    /// travels through [`Result`] like any other unwinding. The driver
    /// consumes it; in a BEGIN or END block it becomes a [`Program`]
    /// error.
    ///
    /// [`Program`]: ErrorKind::Program
    #[error("`next` used outside of a per-record action, at {0}")]
    NextRecord(SourcePos),
}

impl Error {
    /// The kind of the underlying evaluation error, if this is one.
    pub fn eval_kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Eval(e) => Some(e.kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
