//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the rawk project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::collections::HashMap;
use std::rc::Rc;
use std::time::SystemTime;

use rand::{Rng, SeedableRng};

use crate::error::{Error, EvalError, Result};
use crate::format;
use crate::program::{Expr, ExprKind, SourcePos};
use crate::regex::Regex;

use super::array::Array;
use super::env;
use super::record::{split_text, FieldSeparator};
use super::value::{Scalar, Value};
use super::{Frame, Interpreter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuiltinKind {
    Print,
    Printf,
    Sprintf,
    GetLine,
    Next,
    Sub,
    Gsub,
    Match,
    Length,
    Index,
    Substr,
    ToLower,
    ToUpper,
    Split,
    Int,
    Sqrt,
    Exp,
    Log,
    Sin,
    Cos,
    Atan2,
    Rand,
    Srand,
}

/// A built-in function: a set of acceptable parameter lists tried in
/// order, or a variadic signature accepting any argument count.
/// Parameters whose name starts with `var` are bound by reference: the
/// argument has to be a variable reference, and the (possibly mutated)
/// parameter is copied back to the caller's binding after the call.
pub(crate) struct Builtin {
    pub(crate) name: &'static str,
    pub(crate) kind: BuiltinKind,
    pub(crate) variadic: bool,
    pub(crate) overloads: &'static [&'static [&'static str]],
}

const fn variadic(name: &'static str, kind: BuiltinKind) -> Builtin {
    Builtin {
        name,
        kind,
        variadic: true,
        overloads: &[],
    }
}

const fn fixed(
    name: &'static str,
    kind: BuiltinKind,
    overloads: &'static [&'static [&'static str]],
) -> Builtin {
    Builtin {
        name,
        kind,
        variadic: false,
        overloads,
    }
}

static PRINT: Builtin = variadic("print", BuiltinKind::Print);
static PRINTF: Builtin = variadic("printf", BuiltinKind::Printf);
static SPRINTF: Builtin = variadic("sprintf", BuiltinKind::Sprintf);
static NEXT: Builtin = variadic("next", BuiltinKind::Next);
static GETLINE: Builtin = fixed("getline", BuiltinKind::GetLine, &[&[], &["var"]]);
static SUB: Builtin = fixed(
    "sub",
    BuiltinKind::Sub,
    &[&["ere", "replacement", "var"], &["ere", "replacement"]],
);
static GSUB: Builtin = fixed(
    "gsub",
    BuiltinKind::Gsub,
    &[&["ere", "replacement", "var"], &["ere", "replacement"]],
);
static MATCH: Builtin = fixed(
    "match",
    BuiltinKind::Match,
    &[&["target", "ere"], &["target", "ere", "vararray"]],
);
static LENGTH: Builtin = fixed("length", BuiltinKind::Length, &[&["target"], &[]]);
static INDEX: Builtin = fixed("index", BuiltinKind::Index, &[&["string", "substring"]]);
static SUBSTR: Builtin = fixed(
    "substr",
    BuiltinKind::Substr,
    &[&["string", "start", "length"], &["string", "start"]],
);
static TOLOWER: Builtin = fixed("tolower", BuiltinKind::ToLower, &[&["string"]]);
static TOUPPER: Builtin = fixed("toupper", BuiltinKind::ToUpper, &[&["string"]]);
static SPLIT: Builtin = fixed(
    "split",
    BuiltinKind::Split,
    &[&["string", "vararray", "separator"], &["string", "vararray"]],
);
static INT: Builtin = fixed("int", BuiltinKind::Int, &[&["x"]]);
static SQRT: Builtin = fixed("sqrt", BuiltinKind::Sqrt, &[&["x"]]);
static EXP: Builtin = fixed("exp", BuiltinKind::Exp, &[&["x"]]);
static LOG: Builtin = fixed("log", BuiltinKind::Log, &[&["x"]]);
static SIN: Builtin = fixed("sin", BuiltinKind::Sin, &[&["x"]]);
static COS: Builtin = fixed("cos", BuiltinKind::Cos, &[&["x"]]);
static ATAN2: Builtin = fixed("atan2", BuiltinKind::Atan2, &[&["y", "x"]]);
static RAND: Builtin = fixed("rand", BuiltinKind::Rand, &[&[]]);
static SRAND: Builtin = fixed("srand", BuiltinKind::Srand, &[&["seed"], &[]]);

pub(crate) fn lookup(name: &str) -> Option<&'static Builtin> {
    match name {
        "print" => Some(&PRINT),
        "printf" => Some(&PRINTF),
        "sprintf" => Some(&SPRINTF),
        "next" => Some(&NEXT),
        "getline" => Some(&GETLINE),
        "sub" => Some(&SUB),
        "gsub" => Some(&GSUB),
        "match" => Some(&MATCH),
        "length" => Some(&LENGTH),
        "index" => Some(&INDEX),
        "substr" => Some(&SUBSTR),
        "tolower" => Some(&TOLOWER),
        "toupper" => Some(&TOUPPER),
        "split" => Some(&SPLIT),
        "int" => Some(&INT),
        "sqrt" => Some(&SQRT),
        "exp" => Some(&EXP),
        "log" => Some(&LOG),
        "sin" => Some(&SIN),
        "cos" => Some(&COS),
        "atan2" => Some(&ATAN2),
        "rand" => Some(&RAND),
        "srand" => Some(&SRAND),
        _ => None,
    }
}

/// The first parameter list that fits the call: the argument count has to
/// match exactly, and every `var` parameter has to receive a variable
/// reference. Selection is purely syntactic, so arguments are evaluated
/// once, after a list is chosen.
fn select_overload(builtin: &'static Builtin, args: &[Expr]) -> Option<&'static [&'static str]> {
    builtin.overloads.iter().copied().find(|parameters| {
        parameters.len() == args.len()
            && parameters
                .iter()
                .zip(args)
                .all(|(parameter, arg)| {
                    !parameter.starts_with("var") || matches!(arg.kind, ExprKind::Var(_))
                })
    })
}

/// Arguments bound for one built-in call: by parameter name for the fixed
/// overloads, positionally for the variadic ones.
#[derive(Default)]
pub(crate) struct Args {
    named: HashMap<&'static str, Value>,
    positional: Vec<Value>,
}

impl Args {
    fn has(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    fn scalar(&self, name: &str, pos: SourcePos) -> Result<&Scalar> {
        self.named
            .get(name)
            .expect("built-in parameter was not bound")
            .scalar()
            .map_err(|msg| EvalError::type_error(pos, msg).into())
    }

    fn text(&self, name: &str, pos: SourcePos) -> Result<String> {
        Ok(self.scalar(name, pos)?.as_str().to_string())
    }
}

/// Split a substitution replacement into literal pieces and `&` slots.
/// `\&` is a literal ampersand, `\\` a literal backslash; any other
/// backslash sequence is kept as written.
enum ReplacementToken {
    Literal(String),
    WholeMatch,
}

fn parse_replacement(replacement: &str) -> Vec<ReplacementToken> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut iter = replacement.chars();
    while let Some(c) = iter.next() {
        match c {
            '\\' => match iter.next() {
                Some('\\') => literal.push('\\'),
                Some('&') => literal.push('&'),
                Some(other) => {
                    literal.push('\\');
                    literal.push(other);
                }
                None => literal.push('\\'),
            },
            '&' => {
                tokens.push(ReplacementToken::Literal(std::mem::take(&mut literal)));
                tokens.push(ReplacementToken::WholeMatch);
            }
            other => literal.push(other),
        }
    }
    tokens.push(ReplacementToken::Literal(literal));
    tokens
}

/// Replace the first or every match of `ere` in `subject`, returning the
/// new string and the number of substitutions.
pub(crate) fn replace_matches(
    subject: &str,
    ere: &Regex,
    replacement: &str,
    first_only: bool,
) -> std::result::Result<(String, usize), String> {
    let tokens = parse_replacement(replacement);
    let mut result = String::with_capacity(subject.len());
    let mut last_end = 0;
    let mut count = 0;
    for location in ere.match_locations(subject)? {
        result.push_str(&subject[last_end..location.start]);
        for token in &tokens {
            match token {
                ReplacementToken::Literal(text) => result.push_str(text),
                ReplacementToken::WholeMatch => {
                    result.push_str(&subject[location.start..location.end])
                }
            }
        }
        last_end = location.end;
        count += 1;
        if first_only {
            break;
        }
    }
    result.push_str(&subject[last_end..]);
    Ok((result, count))
}

fn char_position(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count() + 1
}

impl<'a> Interpreter<'a> {
    pub(crate) fn call_builtin(
        &mut self,
        builtin: &'static Builtin,
        arg_exprs: &[Expr],
        frame: &mut Frame,
        pos: SourcePos,
    ) -> Result<Value> {
        let mut args = Args::default();
        let mut write_back: Vec<(Rc<str>, &'static str)> = Vec::new();
        if builtin.variadic {
            for arg in arg_exprs {
                let value = self.eval_expr(arg, frame)?;
                args.positional.push(value);
            }
        } else {
            let parameters = select_overload(builtin, arg_exprs).ok_or_else(|| {
                EvalError::argument(
                    pos,
                    format!(
                        "no matching parameter list for built-in function {} with {} argument(s)",
                        builtin.name,
                        arg_exprs.len()
                    ),
                )
            })?;
            for (parameter, arg) in parameters.iter().copied().zip(arg_exprs) {
                let value = if parameter.starts_with("var") {
                    let ExprKind::Var(name) = &arg.kind else {
                        unreachable!("overload selection admitted a non-variable var argument");
                    };
                    write_back.push((name.clone(), parameter));
                    env::read(&self.globals, frame, name)
                        .cloned()
                        .unwrap_or(Value::Scalar(Scalar::uninitialized()))
                } else {
                    match &arg.kind {
                        ExprKind::Ere(ere) => Value::Scalar(Scalar::str(ere.pattern())),
                        _ => self.eval_expr(arg, frame)?,
                    }
                };
                args.named.insert(parameter, value);
            }
        }

        let result = self.exec_builtin(builtin.kind, &mut args, pos)?;

        for (caller_name, parameter) in write_back {
            if let Some(value) = args.named.remove(parameter) {
                self.assign_var(&caller_name, value, frame, pos)?;
            }
        }
        Ok(result)
    }

    fn exec_builtin(&mut self, kind: BuiltinKind, args: &mut Args, pos: SourcePos) -> Result<Value> {
        match kind {
            BuiltinKind::Print => {
                let ofs = self.globals.scalar_text("OFS").to_string();
                let mut parts = Vec::with_capacity(args.positional.len());
                if args.positional.is_empty() {
                    parts.push(self.record.record().as_str().to_string());
                } else {
                    for value in &args.positional {
                        let scalar = value
                            .scalar()
                            .map_err(|msg| EvalError::type_error(pos, msg))?;
                        parts.push(scalar.as_str().to_string());
                    }
                }
                let line = parts.join(&ofs);
                writeln!(self.out, "{}", line)?;
                Ok(Value::Scalar(Scalar::str(line)))
            }
            BuiltinKind::Printf | BuiltinKind::Sprintf => {
                let mut values = args.positional.iter();
                let fmt = values
                    .next()
                    .ok_or_else(|| EvalError::argument(pos, "printf requires a format string"))?
                    .scalar()
                    .map_err(|msg| EvalError::type_error(pos, msg))?
                    .as_str()
                    .to_string();
                let rest = values
                    .map(|v| v.scalar().map_err(|msg| EvalError::type_error(pos, msg).into()))
                    .collect::<Result<Vec<_>>>()?;
                let text = sprintf(&fmt, &rest, pos)?;
                if kind == BuiltinKind::Printf {
                    write!(self.out, "{}", text)?;
                }
                Ok(Value::Scalar(Scalar::str(text)))
            }
            BuiltinKind::GetLine => {
                if args.has("var") {
                    match self.record.next_raw(&mut self.globals) {
                        Some(line) => {
                            args.named.insert("var", Value::Scalar(Scalar::input(line)));
                            Ok(Value::Scalar(Scalar::bool(true)))
                        }
                        None => Ok(Value::Scalar(Scalar::bool(false))),
                    }
                } else {
                    let advanced = self
                        .record
                        .advance(&mut self.globals)
                        .map_err(|msg| EvalError::type_error(pos, msg))?;
                    Ok(Value::Scalar(Scalar::bool(advanced)))
                }
            }
            BuiltinKind::Next => Err(Error::NextRecord(pos)),
            BuiltinKind::Sub | BuiltinKind::Gsub => {
                let first_only = kind == BuiltinKind::Sub;
                let ere = self.compile_ere(&args.text("ere", pos)?, pos)?;
                let replacement = args.text("replacement", pos)?;
                if args.has("var") {
                    let target = args.text("var", pos)?;
                    let (result, count) = replace_matches(&target, &ere, &replacement, first_only)
                        .map_err(|msg| EvalError::type_error(pos, msg))?;
                    args.named.insert("var", Value::Scalar(Scalar::input(result)));
                    Ok(Value::Scalar(Scalar::integer(count as i64)))
                } else {
                    let target = self.record.record().as_str().to_string();
                    let (result, count) = replace_matches(&target, &ere, &replacement, first_only)
                        .map_err(|msg| EvalError::type_error(pos, msg))?;
                    self.record
                        .split_and_assign(result, &mut self.globals)
                        .map_err(|msg| EvalError::type_error(pos, msg))?;
                    Ok(Value::Scalar(Scalar::integer(count as i64)))
                }
            }
            BuiltinKind::Match => {
                let target = args.text("target", pos)?;
                let ere = self.compile_ere(&args.text("ere", pos)?, pos)?;
                let captures = ere
                    .capture_locations(&target)
                    .map_err(|msg| EvalError::type_error(pos, msg))?;
                match captures {
                    None => {
                        self.globals.insert("RSTART", Scalar::integer(0));
                        self.globals.insert("RLENGTH", Scalar::integer(-1));
                        Ok(Value::Scalar(Scalar::integer(0)))
                    }
                    Some(captures) => {
                        let whole =
                            captures[0].expect("a successful match reports its whole range");
                        let start = char_position(&target, whole.start);
                        let length = target[whole.start..whole.end].chars().count();
                        self.globals.insert("RSTART", Scalar::integer(start as i64));
                        self.globals
                            .insert("RLENGTH", Scalar::integer(length as i64));
                        if args.has("vararray") {
                            let mut groups = Array::default();
                            for (i, capture) in captures.iter().enumerate() {
                                let text = capture
                                    .map(|r| &target[r.start..r.end])
                                    .unwrap_or_default();
                                groups.insert(i.to_string(), Scalar::input(text));
                            }
                            args.named.insert("vararray", Value::Array(groups));
                        }
                        Ok(Value::Scalar(Scalar::integer(start as i64)))
                    }
                }
            }
            BuiltinKind::Length => {
                let length = if args.has("target") {
                    match args.named.get("target").expect("target was just checked") {
                        Value::Array(array) => array.len(),
                        Value::Scalar(scalar) => scalar.as_str().chars().count(),
                    }
                } else {
                    self.record.record().as_str().chars().count()
                };
                Ok(Value::Scalar(Scalar::integer(length as i64)))
            }
            BuiltinKind::Index => {
                let string = args.text("string", pos)?;
                let substring = args.text("substring", pos)?;
                let position = match string.find(&substring) {
                    Some(byte_offset) => char_position(&string, byte_offset) as i64,
                    None => 0,
                };
                Ok(Value::Scalar(Scalar::integer(position)))
            }
            BuiltinKind::Substr => {
                let string = args.text("string", pos)?;
                let start = args.scalar("start", pos)?.to_f64() as i64;
                let skip = (start.max(1) - 1) as usize;
                let take = if args.has("length") {
                    let length = args.scalar("length", pos)?.to_f64() as i64;
                    let wanted = start.saturating_add(length) - start.max(1);
                    if wanted <= 0 {
                        0
                    } else {
                        wanted as usize
                    }
                } else {
                    usize::MAX
                };
                let result: String = string.chars().skip(skip).take(take).collect();
                Ok(Value::Scalar(Scalar::str(result)))
            }
            BuiltinKind::ToLower => {
                Ok(Value::Scalar(Scalar::str(args.text("string", pos)?.to_lowercase())))
            }
            BuiltinKind::ToUpper => {
                Ok(Value::Scalar(Scalar::str(args.text("string", pos)?.to_uppercase())))
            }
            BuiltinKind::Split => {
                let string = args.text("string", pos)?;
                let separator = if args.has("separator") {
                    FieldSeparator::parse(&args.text("separator", pos)?)
                } else {
                    FieldSeparator::parse(self.globals.scalar_text("FS"))
                }
                .map_err(|msg| EvalError::type_error(pos, msg))?;
                let mut array = Array::default();
                let mut count = 0i64;
                split_text(&string, &separator, &mut |field| {
                    count += 1;
                    array.insert(count.to_string(), field);
                })
                .map_err(|msg| EvalError::type_error(pos, msg))?;
                args.named.insert("vararray", Value::Array(array));
                Ok(Value::Scalar(Scalar::integer(count)))
            }
            BuiltinKind::Int => self.numeric_builtin(args, pos, f64::trunc),
            BuiltinKind::Sqrt => self.numeric_builtin(args, pos, f64::sqrt),
            BuiltinKind::Exp => self.numeric_builtin(args, pos, f64::exp),
            BuiltinKind::Log => self.numeric_builtin(args, pos, f64::ln),
            BuiltinKind::Sin => self.numeric_builtin(args, pos, f64::sin),
            BuiltinKind::Cos => self.numeric_builtin(args, pos, f64::cos),
            BuiltinKind::Atan2 => {
                let y = args.scalar("y", pos)?.to_f64();
                let x = args.scalar("x", pos)?.to_f64();
                Ok(Value::Scalar(self.number(y.atan2(x), pos)?))
            }
            BuiltinKind::Rand => {
                let value = self.rng.gen_range(0.0..1.0);
                Ok(Value::Scalar(self.number(value, pos)?))
            }
            BuiltinKind::Srand => {
                let seed = if args.has("seed") {
                    args.scalar("seed", pos)?.to_f64() as i64 as u64
                } else {
                    SystemTime::now()
                        .duration_since(SystemTime::UNIX_EPOCH)
                        .map(|d| d.as_secs())
                        .unwrap_or_default()
                };
                let previous = self.rand_seed;
                self.rand_seed = seed;
                self.rng = rand::rngs::SmallRng::seed_from_u64(seed);
                Ok(Value::Scalar(self.number(previous as f64, pos)?))
            }
        }
    }

    fn numeric_builtin(
        &mut self,
        args: &Args,
        pos: SourcePos,
        op: impl FnOnce(f64) -> f64,
    ) -> Result<Value> {
        let x = args.scalar("x", pos)?.to_f64();
        Ok(Value::Scalar(self.number(op(x), pos)?))
    }

    fn compile_ere(&self, pattern: &str, pos: SourcePos) -> Result<Rc<Regex>> {
        Regex::new(pattern)
            .map(Rc::new)
            .map_err(|msg| EvalError::type_error(pos, msg).into())
    }
}

/// C-style formatting of `args` through `format`, with the conversions
/// `%d %i %o %u %x %X %c %s %f %e %E %g %G` and `%%`.
fn sprintf(format: &str, args: &[&Scalar], pos: SourcePos) -> Result<String> {
    let mut result = String::with_capacity(format.len());
    let mut iter = format.chars();
    let mut next_arg = 0;
    while let Some(c) = iter.next() {
        if c != '%' {
            result.push(c);
            continue;
        }
        let (specifier, spec) =
            format::parse_conversion(&mut iter).map_err(|msg| EvalError::argument(pos, msg))?;
        if specifier == '%' {
            result.push('%');
            continue;
        }
        let arg = *args.get(next_arg).ok_or_else(|| {
            EvalError::argument(pos, "not enough arguments for the format string")
        })?;
        next_arg += 1;
        match specifier {
            'd' | 'i' => format::write_signed(&mut result, arg.to_f64() as i64, &spec),
            'u' | 'o' | 'x' | 'X' => {
                let value = arg.to_f64() as i64;
                if value < 0 {
                    return Err(EvalError::argument(
                        pos,
                        format!("negative value for the unsigned conversion '%{}'", specifier),
                    )
                    .into());
                }
                let radix = match specifier {
                    'u' => format::Radix::Decimal,
                    'o' => format::Radix::Octal,
                    'x' => format::Radix::HexLower,
                    _ => format::Radix::HexUpper,
                };
                format::write_unsigned(&mut result, value as u64, radix, &spec);
            }
            'c' => {
                let text = if arg.is_numeric() {
                    char::from_u32(arg.to_f64() as u32)
                        .map(String::from)
                        .unwrap_or_default()
                } else {
                    arg.as_str().chars().next().map(String::from).unwrap_or_default()
                };
                format::write_str(&mut result, &text, &spec);
            }
            's' => format::write_str(&mut result, arg.as_str(), &spec),
            'f' | 'F' => format::write_float(
                &mut result,
                arg.to_f64(),
                format::FloatStyle::Fixed,
                specifier == 'F',
                &spec,
            ),
            'e' | 'E' => format::write_float(
                &mut result,
                arg.to_f64(),
                format::FloatStyle::Scientific,
                specifier == 'E',
                &spec,
            ),
            'g' | 'G' => format::write_float(
                &mut result,
                arg.to_f64(),
                format::FloatStyle::General,
                specifier == 'G',
                &spec,
            ),
            other => {
                return Err(EvalError::argument(
                    pos,
                    format!("unsupported conversion specifier '%{}'", other),
                )
                .into())
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ere(pattern: &str) -> Regex {
        Regex::new(pattern).expect("error compiling ere")
    }

    #[test]
    fn replace_first_and_all() {
        let (result, count) = replace_matches("foo bar foo", &ere("foo"), "X", true).unwrap();
        assert_eq!((result.as_str(), count), ("X bar foo", 1));
        let (result, count) = replace_matches("foo bar foo", &ere("foo"), "X", false).unwrap();
        assert_eq!((result.as_str(), count), ("X bar X", 2));
    }

    #[test]
    fn replace_nothing_counts_zero() {
        let (result, count) = replace_matches("abc", &ere("q"), "X", false).unwrap();
        assert_eq!((result.as_str(), count), ("abc", 0));
    }

    #[test]
    fn ampersand_inserts_the_match() {
        let (result, _) = replace_matches("ab", &ere("b"), "<&>", false).unwrap();
        assert_eq!(result, "a<b>");
        let (result, _) = replace_matches("ab", &ere("b"), r"\&", false).unwrap();
        assert_eq!(result, "a&");
        let (result, _) = replace_matches("ab", &ere("b"), r"\\&", false).unwrap();
        assert_eq!(result, r"a\b");
    }

    #[test]
    fn sprintf_mixes_conversions() {
        let pos = SourcePos::default();
        let a = Scalar::integer(42);
        let b = Scalar::str("hello");
        let text = sprintf("%05d says %s, 100%%", &[&a, &b], pos).unwrap();
        assert_eq!(text, "00042 says hello, 100%");
    }

    #[test]
    fn sprintf_character_conversion() {
        let pos = SourcePos::default();
        let code = Scalar::integer(65);
        let letter = Scalar::str("xyz");
        assert_eq!(sprintf("%c%c", &[&code, &letter], pos).unwrap(), "Ax");
    }

    #[test]
    fn sprintf_missing_arguments_is_an_error() {
        let err = sprintf("%d %d", &[&Scalar::integer(1)], SourcePos::default()).unwrap_err();
        assert_eq!(err.eval_kind(), Some(crate::error::ErrorKind::Argument));
    }

    #[test]
    fn overload_selection_requires_matching_shape() {
        let pos = SourcePos::default();
        let var = Expr::new(ExprKind::Var("v".into()), pos);
        let lit = Expr::new(ExprKind::Str("x".into()), pos);

        // sub(ere, repl) and sub(ere, repl, var) both exist
        let chosen = select_overload(&SUB, &[lit.clone(), lit.clone()]).unwrap();
        assert_eq!(chosen.len(), 2);
        let chosen = select_overload(&SUB, &[lit.clone(), lit.clone(), var.clone()]).unwrap();
        assert_eq!(chosen.len(), 3);
        // a non-variable where a var parameter is expected fits nothing
        assert!(select_overload(&SUB, &[lit.clone(), lit.clone(), lit.clone()]).is_none());
        assert!(select_overload(&SUB, &[lit.clone()]).is_none());
        // match(target, ere, vararray) only fits the three-parameter list
        let chosen = select_overload(&MATCH, &[lit.clone(), lit, var]).unwrap();
        assert_eq!(chosen, &["target", "ere", "vararray"]);
    }
}
