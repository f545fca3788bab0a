//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the rawk project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! The evaluator: a pattern/action driver on top of a tree-walking
//! statement and expression interpreter.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::error::{Error, EvalError, Result};
use crate::program::{
    BinaryOp, Block, Expr, ExprKind, Function, IncDecOp, LValue, Program, SourcePos, Stmt,
    StmtKind, UnaryOp,
};
use crate::regex::Regex;

mod array;
mod builtins;
mod env;
mod record;
mod value;


pub use array::Array;
pub use env::Environment;
pub use value::{Scalar, Value};

use env::Frame;
use record::RecordManager;

/// Names the startup options map may seed; everything else in it is
/// ignored.
const KNOWN_OPTIONS: [&str; 3] = ["FS", "OFS", "OFMT"];

/// The outcome of one statement. Loops consume `Break` and `Continue`,
/// function calls consume `Return`; anything else reaching a block
/// boundary is a program error reported at the carried position.
enum Signal {
    Normal,
    Break(SourcePos),
    Continue(SourcePos),
    Return { value: Value, pos: SourcePos },
}

pub struct Interpreter<'a> {
    globals: Environment,
    functions: HashMap<Rc<str>, Rc<Function>>,
    record: RecordManager,
    out: &'a mut dyn Write,
    rng: SmallRng,
    rand_seed: u64,
}

/// Run `program` over `lines` and hand back the final global environment.
pub fn interpret(
    program: &Program,
    lines: Vec<String>,
    options: &HashMap<String, String>,
    output: &mut dyn Write,
) -> Result<Environment> {
    let mut interpreter = Interpreter::with_lines(program, options, lines, output);
    interpreter.run(program)?;
    Ok(interpreter.into_globals())
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents.lines().map(str::to_string).collect())
}

impl<'a> Interpreter<'a> {
    /// An interpreter with no input: only BEGIN and END blocks will run
    /// unless it is re-pointed at a file later.
    pub fn new(
        program: &Program,
        options: &HashMap<String, String>,
        out: &'a mut dyn Write,
    ) -> Self {
        let mut globals = Environment::default();
        globals.insert("FS", Scalar::str(" "));
        globals.insert("OFS", Scalar::str(" "));
        globals.insert("OFMT", Scalar::str("%.6g"));
        globals.insert("NR", Scalar::integer(0));
        globals.insert("FNR", Scalar::integer(0));
        globals.insert("NF", Scalar::integer(0));
        globals.insert("FILENAME", Scalar::str(""));
        for name in KNOWN_OPTIONS {
            if let Some(value) = options.get(name) {
                globals.insert(name, Scalar::str(value.as_str()));
            }
        }
        Self {
            globals,
            functions: program.functions.clone(),
            record: RecordManager::new(),
            out,
            rng: SmallRng::seed_from_u64(0),
            rand_seed: 0,
        }
    }

    pub fn with_lines(
        program: &Program,
        options: &HashMap<String, String>,
        lines: Vec<String>,
        out: &'a mut dyn Write,
    ) -> Self {
        let mut interpreter = Self::new(program, options, out);
        interpreter.record.open(lines, &mut interpreter.globals);
        interpreter
    }

    pub fn with_file(
        program: &Program,
        options: &HashMap<String, String>,
        path: &Path,
        out: &'a mut dyn Write,
    ) -> Result<Self> {
        let lines = read_lines(path)?;
        let mut interpreter = Self::new(program, options, out);
        interpreter
            .globals
            .insert("FILENAME", Scalar::str(path.display().to_string()));
        interpreter.record.open(lines, &mut interpreter.globals);
        Ok(interpreter)
    }

    /// Re-point the interpreter at another input file: `FNR` restarts,
    /// `NR` keeps counting.
    pub fn switch_file(&mut self, path: &Path) -> Result<()> {
        log::debug!("switching input to {}", path.display());
        let lines = read_lines(path)?;
        self.globals
            .insert("FILENAME", Scalar::str(path.display().to_string()));
        self.record.open(lines, &mut self.globals);
        Ok(())
    }

    /// [`switch_file`](Self::switch_file) for an in-memory line source.
    pub fn switch_lines(&mut self, lines: Vec<String>, filename: &str) {
        log::debug!("switching input to {} staged lines", lines.len());
        self.globals.insert("FILENAME", Scalar::str(filename));
        self.record.open(lines, &mut self.globals);
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn into_globals(self) -> Environment {
        self.globals
    }

    /// Execute the program: BEGIN blocks, the per-record loop, END blocks.
    /// END blocks see the last record still latched.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        for block in &program.begin {
            self.run_special_block(block, "BEGIN")?;
        }

        if !program.main.is_empty() || !program.end.is_empty() {
            if self.advance()? {
                loop {
                    for block in &program.main {
                        match self.run_block(block) {
                            Err(Error::NextRecord(_)) => break,
                            other => other?,
                        }
                    }
                    if !self.advance()? {
                        break;
                    }
                }
            }
        }

        for block in &program.end {
            self.run_special_block(block, "END")?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn advance(&mut self) -> Result<bool> {
        let advanced = self
            .record
            .advance(&mut self.globals)
            .map_err(|msg| EvalError::type_error(SourcePos::default(), msg))?;
        if advanced {
            log::trace!(
                "record {}: {}",
                self.globals.scalar_text("NR"),
                self.record.record().as_str()
            );
        }
        Ok(advanced)
    }

    fn run_special_block(&mut self, block: &Block, which: &str) -> Result<()> {
        match self.run_block(block) {
            Err(Error::NextRecord(pos)) => Err(EvalError::program(
                pos,
                format!("`next` cannot be used in a {} block", which),
            )
            .into()),
            other => other,
        }
    }

    fn run_block(&mut self, block: &Block) -> Result<()> {
        let mut frame = Frame::global();
        let matched = match &block.predicate {
            None => true,
            Some(predicate) => self.eval_predicate(predicate, &mut frame)?,
        };
        if !matched {
            return Ok(());
        }
        match self.exec_stmts(&block.body, &mut frame)? {
            Signal::Normal => Ok(()),
            Signal::Break(pos) => {
                Err(EvalError::program(pos, "`break` outside of a loop").into())
            }
            Signal::Continue(pos) => {
                Err(EvalError::program(pos, "`continue` outside of a loop").into())
            }
            Signal::Return { pos, .. } => {
                Err(EvalError::program(pos, "`return` outside of a function").into())
            }
        }
    }

    /// A missing predicate matches everything; a bare regular expression
    /// literal is matched against the whole record.
    fn eval_predicate(&mut self, predicate: &Expr, frame: &mut Frame) -> Result<bool> {
        match &predicate.kind {
            ExprKind::Ere(ere) => ere
                .matches(self.record.record().as_str())
                .map_err(|msg| EvalError::type_error(predicate.pos, msg).into()),
            _ => Ok(self.eval_scalar(predicate, frame)?.to_bool()),
        }
    }

    fn exec_stmts(&mut self, stmts: &[Stmt], frame: &mut Frame) -> Result<Signal> {
        for stmt in stmts {
            match self.exec_stmt(stmt, frame)? {
                Signal::Normal => {}
                signal => return Ok(signal),
            }
        }
        Ok(Signal::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt, frame: &mut Frame) -> Result<Signal> {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.eval_expr(expr, frame)?;
                Ok(Signal::Normal)
            }
            StmtKind::If {
                cond,
                body,
                else_branch,
            } => {
                if self.eval_scalar(cond, frame)?.to_bool() {
                    self.exec_stmts(body, frame)
                } else if let Some(else_body) = else_branch {
                    self.exec_stmts(else_body, frame)
                } else {
                    Ok(Signal::Normal)
                }
            }
            StmtKind::While {
                cond,
                body,
                is_do_while,
            } => {
                if *is_do_while {
                    loop {
                        match self.exec_stmts(body, frame)? {
                            Signal::Break(_) => break,
                            signal @ Signal::Return { .. } => return Ok(signal),
                            Signal::Normal | Signal::Continue(_) => {}
                        }
                        if !self.eval_scalar(cond, frame)?.to_bool() {
                            break;
                        }
                    }
                } else {
                    while self.eval_scalar(cond, frame)?.to_bool() {
                        match self.exec_stmts(body, frame)? {
                            Signal::Break(_) => break,
                            signal @ Signal::Return { .. } => return Ok(signal),
                            Signal::Normal | Signal::Continue(_) => {}
                        }
                    }
                }
                Ok(Signal::Normal)
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.eval_expr(init, frame)?;
                }
                loop {
                    if let Some(cond) = cond {
                        if !self.eval_scalar(cond, frame)?.to_bool() {
                            break;
                        }
                    }
                    match self.exec_stmts(body, frame)? {
                        Signal::Break(_) => break,
                        signal @ Signal::Return { .. } => return Ok(signal),
                        Signal::Normal | Signal::Continue(_) => {}
                    }
                    if let Some(update) = update {
                        self.eval_expr(update, frame)?;
                    }
                }
                Ok(Signal::Normal)
            }
            StmtKind::ForIn { var, array, body } => {
                // iterate a snapshot so the body may mutate the array
                let keys = self.array_keys(array, frame, stmt.pos)?;
                for key in keys {
                    self.assign_var(var, Value::Scalar(Scalar::input(key)), frame, stmt.pos)?;
                    match self.exec_stmts(body, frame)? {
                        Signal::Break(_) => break,
                        signal @ Signal::Return { .. } => return Ok(signal),
                        Signal::Normal | Signal::Continue(_) => {}
                    }
                }
                Ok(Signal::Normal)
            }
            StmtKind::Delete { array, indices } => {
                if indices.is_empty() {
                    self.resolve_array_mut(array, frame, stmt.pos)?.clear();
                    return Ok(Signal::Normal);
                }
                let mut keys = Vec::with_capacity(indices.len());
                for index in indices {
                    keys.push(self.eval_scalar(index, frame)?.into_key());
                }
                let name = array;
                let array = self.resolve_array_mut(array, frame, stmt.pos)?;
                for key in keys {
                    if !array.delete(&key) {
                        return Err(EvalError::index(
                            stmt.pos,
                            format!("index \"{}\" is not in array {}", key, name),
                        )
                        .into());
                    }
                }
                Ok(Signal::Normal)
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => Value::Scalar(self.eval_scalar(expr, frame)?),
                    None => Value::Scalar(Scalar::uninitialized()),
                };
                Ok(Signal::Return {
                    value,
                    pos: stmt.pos,
                })
            }
            StmtKind::Break => Ok(Signal::Break(stmt.pos)),
            StmtKind::Continue => Ok(Signal::Continue(stmt.pos)),
        }
    }

    fn eval_expr(&mut self, expr: &Expr, frame: &mut Frame) -> Result<Value> {
        match &expr.kind {
            ExprKind::Number(x) => Ok(Value::Scalar(self.number(*x, expr.pos)?)),
            ExprKind::Str(s) => Ok(Value::Scalar(Scalar::str(s.as_ref()))),
            ExprKind::Ere(_) => Err(EvalError::program(
                expr.pos,
                "regular expression literal is only valid as a pattern or as an argument \
                 to a regex-accepting built-in",
            )
            .into()),
            ExprKind::Var(name) => Ok(self.read_var(name, frame)),
            ExprKind::Element { array, indices } => {
                self.read_element(array, indices, frame, expr.pos)
            }
            ExprKind::Field(index) => {
                let index = self.field_index(index, frame)?;
                self.read_field(index, expr.pos)
            }
            ExprKind::Assign { target, value } => {
                let value = self.eval_expr(value, frame)?;
                self.assign_lvalue(target, value.clone(), frame, expr.pos)?;
                Ok(value)
            }
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand, frame, expr.pos),
            ExprKind::Binary { op, left, right } => {
                self.eval_binary(*op, left, right, frame, expr.pos)
            }
            ExprKind::IncDec { op, target } => self.eval_inc_dec(*op, target, frame, expr.pos),
            ExprKind::In { keys, array } => self.eval_in(keys, array, frame, expr.pos),
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_scalar(cond, frame)?.to_bool() {
                    self.eval_expr(then_branch, frame)
                } else {
                    self.eval_expr(else_branch, frame)
                }
            }
            ExprKind::Call { name, args } => self.eval_call(name, args, frame, expr.pos),
        }
    }

    fn eval_scalar(&mut self, expr: &Expr, frame: &mut Frame) -> Result<Scalar> {
        self.eval_expr(expr, frame)?
            .into_scalar()
            .map_err(|msg| EvalError::type_error(expr.pos, msg).into())
    }

    /// A name that was never bound reads as the uninitialized scalar.
    fn read_var(&self, name: &str, frame: &Frame) -> Value {
        env::read(&self.globals, frame, name)
            .cloned()
            .unwrap_or(Value::Scalar(Scalar::uninitialized()))
    }

    /// Read through an index chain. Reading never creates elements: a
    /// missing element (at any depth) is the uninitialized scalar, so
    /// membership stays observable through `in`.
    fn read_element(
        &mut self,
        array: &str,
        indices: &[Expr],
        frame: &mut Frame,
        pos: SourcePos,
    ) -> Result<Value> {
        let mut keys = Vec::with_capacity(indices.len());
        for index in indices {
            keys.push(self.eval_scalar(index, frame)?.into_key());
        }
        let Some((last, walk)) = keys.split_last() else {
            return Ok(self.read_var(array, frame));
        };
        let Some(binding) = env::read(&self.globals, frame, array) else {
            return Ok(Value::Scalar(Scalar::uninitialized()));
        };
        let mut current = binding
            .array()
            .map_err(|msg| EvalError::type_error(pos, format!("{}: {}", array, msg)))?;
        for key in walk {
            match current.get(key) {
                Some(Value::Array(next)) => current = next,
                Some(Value::Scalar(_)) => {
                    return Err(EvalError::type_error(
                        pos,
                        format!("scalar element of {} used in array context", array),
                    )
                    .into())
                }
                None => return Ok(Value::Scalar(Scalar::uninitialized())),
            }
        }
        Ok(current
            .get(last)
            .cloned()
            .unwrap_or(Value::Scalar(Scalar::uninitialized())))
    }

    /// Evaluate a field index: numeric, truncated towards zero, never
    /// negative.
    fn field_index(&mut self, index: &Expr, frame: &mut Frame) -> Result<usize> {
        let scalar = self.eval_scalar(index, frame)?;
        let x = self.strict_num(&scalar, index.pos)? as i64;
        if x < 0 {
            return Err(EvalError::index(
                index.pos,
                format!("field index {} is negative", x),
            )
            .into());
        }
        Ok(x as usize)
    }

    fn read_field(&self, index: usize, pos: SourcePos) -> Result<Value> {
        match self.record.field(index) {
            Some(field) => Ok(Value::Scalar(field.clone())),
            None => Err(EvalError::index(
                pos,
                format!(
                    "field index {} is out of bounds for a record with {} field(s)",
                    index,
                    self.record.field_count()
                ),
            )
            .into()),
        }
    }

    fn assign_lvalue(
        &mut self,
        target: &LValue,
        value: Value,
        frame: &mut Frame,
        pos: SourcePos,
    ) -> Result<()> {
        match target {
            LValue::Var(name) => self.assign_var(name, value, frame, pos),
            LValue::Element { array, indices } => {
                self.assign_element(array, indices, value, frame, pos)
            }
            LValue::Field(index) => {
                let index = self.field_index(index, frame)?;
                let scalar = value
                    .into_scalar()
                    .map_err(|msg| EvalError::type_error(pos, msg))?;
                self.record
                    .edit_field(index, scalar, &mut self.globals)
                    .map_err(|msg| EvalError::type_error(pos, msg).into())
            }
        }
    }

    /// Bind a name per the two-tier scope rule, rejecting scalar/array
    /// mismatches with the existing binding.
    fn assign_var(
        &mut self,
        name: &str,
        value: Value,
        frame: &mut Frame,
        pos: SourcePos,
    ) -> Result<()> {
        if let Some(existing) = env::read(&self.globals, frame, name) {
            if existing.is_array() != value.is_array() {
                let message = if value.is_array() {
                    format!("cannot assign an array to the scalar variable {}", name)
                } else {
                    format!("cannot assign a scalar to the array variable {}", name)
                };
                return Err(EvalError::type_error(pos, message).into());
            }
        }
        env::write(&mut self.globals, frame, name, value);
        Ok(())
    }

    /// Write through an index chain, creating intermediate arrays as
    /// needed.
    fn assign_element(
        &mut self,
        array: &str,
        indices: &[Expr],
        value: Value,
        frame: &mut Frame,
        pos: SourcePos,
    ) -> Result<()> {
        let mut keys = Vec::with_capacity(indices.len());
        for index in indices {
            keys.push(self.eval_scalar(index, frame)?.into_key());
        }
        let Some((last, walk)) = keys.split_last() else {
            return self.assign_var(array, value, frame, pos);
        };
        let mut current = self.resolve_array_mut(array, frame, pos)?;
        for key in walk {
            current = current
                .entry_or_insert_with(key.clone(), || Value::Array(Array::default()))
                .array_mut()
                .map_err(|msg| EvalError::type_error(pos, msg))?;
        }
        if let Some(existing) = current.get(last) {
            if existing.is_array() != value.is_array() {
                return Err(EvalError::type_error(
                    pos,
                    format!("array element {}[{}] used in a mismatched context", array, last),
                )
                .into());
            }
        }
        current.insert(last.clone(), value);
        Ok(())
    }

    /// The array bound to `name`, creating an empty one if the name is
    /// unbound. The borrow may come from the globals or from the frame's
    /// locals.
    fn resolve_array_mut<'e>(
        &'e mut self,
        name: &str,
        frame: &'e mut Frame,
        pos: SourcePos,
    ) -> Result<&'e mut Array> {
        if env::read(&self.globals, frame, name).is_none() {
            env::write(
                &mut self.globals,
                frame,
                name,
                Value::Array(Array::default()),
            );
        }
        env::read_mut(&mut self.globals, frame, name)
            .expect("array binding was just created")
            .array_mut()
            .map_err(|msg| EvalError::type_error(pos, format!("{}: {}", name, msg)).into())
    }

    fn array_keys(&mut self, name: &str, frame: &mut Frame, pos: SourcePos) -> Result<Vec<String>> {
        Ok(self.resolve_array_mut(name, frame, pos)?.keys())
    }

    fn eval_unary(
        &mut self,
        op: UnaryOp,
        operand: &Expr,
        frame: &mut Frame,
        pos: SourcePos,
    ) -> Result<Value> {
        let scalar = self.eval_scalar(operand, frame)?;
        match op {
            UnaryOp::Not => Ok(Value::Scalar(Scalar::bool(!scalar.to_bool()))),
            UnaryOp::Neg => {
                let x = self.strict_num(&scalar, pos)?;
                Ok(Value::Scalar(self.number(-x, pos)?))
            }
            UnaryOp::Pos => Ok(Value::Scalar(self.number(scalar.to_f64(), pos)?)),
        }
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        frame: &mut Frame,
        pos: SourcePos,
    ) -> Result<Value> {
        match op {
            BinaryOp::And => {
                if !self.eval_scalar(left, frame)?.to_bool() {
                    return Ok(Value::Scalar(Scalar::bool(false)));
                }
                let result = self.eval_scalar(right, frame)?.to_bool();
                Ok(Value::Scalar(Scalar::bool(result)))
            }
            BinaryOp::Or => {
                if self.eval_scalar(left, frame)?.to_bool() {
                    return Ok(Value::Scalar(Scalar::bool(true)));
                }
                let result = self.eval_scalar(right, frame)?.to_bool();
                Ok(Value::Scalar(Scalar::bool(result)))
            }
            BinaryOp::Match | BinaryOp::NotMatch => {
                let subject = self.eval_scalar(left, frame)?;
                let ere = self.regex_operand(right, frame)?;
                let matched = ere
                    .matches(subject.as_str())
                    .map_err(|msg| EvalError::type_error(pos, msg))?;
                Ok(Value::Scalar(Scalar::bool(
                    matched == (op == BinaryOp::Match),
                )))
            }
            BinaryOp::Concat => {
                let left = self.eval_scalar(left, frame)?;
                let right = self.eval_scalar(right, frame)?;
                let mut text = left.into_text();
                text.push_str(right.as_str());
                Ok(Value::Scalar(Scalar::str(text)))
            }
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge => {
                let left = self.eval_scalar(left, frame)?;
                let right = self.eval_scalar(right, frame)?;
                Ok(Value::Scalar(Scalar::bool(compare(op, &left, &right))))
            }
            BinaryOp::Add
            | BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Mod
            | BinaryOp::Pow => {
                let left = self.eval_scalar(left, frame)?;
                let right = self.eval_scalar(right, frame)?;
                let lhs = self.strict_num(&left, pos)?;
                let rhs = self.strict_num(&right, pos)?;
                let result = match op {
                    BinaryOp::Add => lhs + rhs,
                    BinaryOp::Sub => lhs - rhs,
                    BinaryOp::Mul => lhs * rhs,
                    BinaryOp::Div => {
                        if rhs == 0.0 {
                            return Err(EvalError::type_error(pos, "division by zero").into());
                        }
                        lhs / rhs
                    }
                    BinaryOp::Mod => {
                        if rhs == 0.0 {
                            return Err(EvalError::type_error(pos, "modulo by zero").into());
                        }
                        lhs % rhs
                    }
                    _ => lhs.powf(rhs),
                };
                Ok(Value::Scalar(self.number(result, pos)?))
            }
        }
    }

    fn eval_inc_dec(
        &mut self,
        op: IncDecOp,
        target: &LValue,
        frame: &mut Frame,
        pos: SourcePos,
    ) -> Result<Value> {
        let original = self.read_lvalue_scalar(target, frame, pos)?;
        let x = self.strict_num(&original, pos)?;
        let updated = self.number(x + op.step(), pos)?;
        self.assign_lvalue(target, Value::Scalar(updated.clone()), frame, pos)?;
        let result = if op.is_post() {
            self.number(x, pos)?
        } else {
            updated
        };
        Ok(Value::Scalar(result))
    }

    fn read_lvalue_scalar(
        &mut self,
        target: &LValue,
        frame: &mut Frame,
        pos: SourcePos,
    ) -> Result<Scalar> {
        let value = match target {
            LValue::Var(name) => self.read_var(name, frame),
            LValue::Element { array, indices } => self.read_element(array, indices, frame, pos)?,
            LValue::Field(index) => {
                let index = self.field_index(index, frame)?;
                self.read_field(index, pos)?
            }
        };
        value
            .into_scalar()
            .map_err(|msg| EvalError::type_error(pos, msg).into())
    }

    /// Multi-dimensional membership: walk the nested arrays named by all
    /// but the last key, then test the last one. Any missing level is
    /// simply "not a member"; an unbound array name likewise.
    fn eval_in(
        &mut self,
        keys: &[Expr],
        array: &str,
        frame: &mut Frame,
        pos: SourcePos,
    ) -> Result<Value> {
        let mut resolved = Vec::with_capacity(keys.len());
        for key in keys {
            resolved.push(self.eval_scalar(key, frame)?.into_key());
        }
        let Some((last, walk)) = resolved.split_last() else {
            return Ok(Value::Scalar(Scalar::bool(false)));
        };
        let Some(binding) = env::read(&self.globals, frame, array) else {
            return Ok(Value::Scalar(Scalar::bool(false)));
        };
        let mut current = binding
            .array()
            .map_err(|msg| EvalError::type_error(pos, format!("{}: {}", array, msg)))?;
        for key in walk {
            match current.get(key) {
                Some(Value::Array(next)) => current = next,
                _ => return Ok(Value::Scalar(Scalar::bool(false))),
            }
        }
        Ok(Value::Scalar(Scalar::bool(current.contains(last))))
    }

    fn eval_call(
        &mut self,
        name: &Rc<str>,
        args: &[Expr],
        frame: &mut Frame,
        pos: SourcePos,
    ) -> Result<Value> {
        if let Some(function) = self.functions.get(name).cloned() {
            return self.call_function(function, args, frame, pos);
        }
        if let Some(builtin) = builtins::lookup(name) {
            return self.call_builtin(builtin, args, frame, pos);
        }
        Err(EvalError::program(pos, format!("call to undefined function {}", name)).into())
    }

    /// User function dispatch: positional binding into a fresh local
    /// scope, surplus arguments collected into a local array named after
    /// the function.
    fn call_function(
        &mut self,
        function: Rc<Function>,
        args: &[Expr],
        frame: &mut Frame,
        pos: SourcePos,
    ) -> Result<Value> {
        if args.len() < function.parameters.len() {
            return Err(EvalError::argument(
                pos,
                format!(
                    "too few arguments in call to {}: expected at least {}, got {}",
                    function.name,
                    function.parameters.len(),
                    args.len()
                ),
            )
            .into());
        }
        log::trace!("calling function {}", function.name);
        let mut locals = HashMap::new();
        for (parameter, arg) in function.parameters.iter().zip(args) {
            let value = self.eval_expr(arg, frame)?;
            locals.insert(parameter.to_string(), value);
        }
        let surplus = &args[function.parameters.len()..];
        if !surplus.is_empty() {
            let mut extra = Array::default();
            for (i, arg) in surplus.iter().enumerate() {
                let value = self.eval_expr(arg, frame)?;
                extra.insert((i + 1).to_string(), value);
            }
            locals.insert(function.name.to_string(), Value::Array(extra));
        }
        let mut callee_frame = Frame::local(locals);
        match self.exec_stmts(&function.body, &mut callee_frame)? {
            Signal::Return { value, .. } => Ok(value),
            Signal::Normal => Ok(Value::Scalar(Scalar::uninitialized())),
            Signal::Break(p) => Err(EvalError::program(p, "`break` outside of a loop").into()),
            Signal::Continue(p) => {
                Err(EvalError::program(p, "`continue` outside of a loop").into())
            }
        }
    }

    fn regex_operand(&mut self, expr: &Expr, frame: &mut Frame) -> Result<Rc<Regex>> {
        match &expr.kind {
            ExprKind::Ere(ere) => Ok(ere.clone()),
            _ => {
                let pattern = self.eval_scalar(expr, frame)?;
                Regex::new(pattern.as_str())
                    .map(Rc::new)
                    .map_err(|msg| EvalError::type_error(expr.pos, msg).into())
            }
        }
    }

    /// Strict numeric coercion for operators that demand numbers: the
    /// whole text must parse, except that the empty (uninitialized) value
    /// counts as 0.
    fn strict_num(&self, scalar: &Scalar, pos: SourcePos) -> Result<f64> {
        if scalar.as_str().trim().is_empty() {
            return Ok(0.0);
        }
        scalar.parse_full().ok_or_else(|| {
            EvalError::type_error(
                pos,
                format!("expected a numeric operand, got \"{}\"", scalar.as_str()),
            )
            .into()
        })
    }

    fn number(&self, x: f64, pos: SourcePos) -> Result<Scalar> {
        Scalar::from_number(x, self.globals.scalar_text("OFMT"))
            .map_err(|msg| EvalError::type_error(pos, msg).into())
    }
}

/// The comparison duality: numeric when both sides are numeric by
/// provenance, lexicographic otherwise.
fn compare(op: BinaryOp, left: &Scalar, right: &Scalar) -> bool {
    use std::cmp::Ordering;
    let ordering = if left.is_numeric() && right.is_numeric() {
        left.to_f64()
            .partial_cmp(&right.to_f64())
            .unwrap_or(Ordering::Equal)
    } else {
        left.as_str().cmp(right.as_str())
    };
    match op {
        BinaryOp::Eq => ordering.is_eq(),
        BinaryOp::Ne => !ordering.is_eq(),
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::Le => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::Ge => ordering.is_ge(),
        _ => unreachable!("not a comparison operator"),
    }
}
