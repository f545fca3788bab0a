//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the rawk project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Conversion-specification engine behind `printf`, `sprintf` and the
//! numeric output format (`OFMT`). Supports the C conversions
//! `d i o u x X c s f e E g G` with flags, field width and precision.

use std::str::Chars;

#[derive(Debug, Default, PartialEq)]
pub struct FormatSpec {
    pub left_justified: bool,
    pub signed: bool,
    pub space_prefix: bool,
    pub alternative_form: bool,
    pub zero_padded: bool,
    pub width: usize,
    pub precision: Option<usize>,
}

/// Parse the flags, width and precision of a conversion specification.
/// `iter` has to be positioned right after the `%`. Returns the conversion
/// specifier character together with the parsed spec.
pub fn parse_conversion(iter: &mut Chars) -> Result<(char, FormatSpec), String> {
    let next_char = |iter: &mut Chars| {
        iter.next()
            .ok_or_else(|| "incomplete conversion specification in format string".to_string())
    };

    let parse_number = |current: &mut char, iter: &mut Chars| -> Result<usize, String> {
        let mut number = 0usize;
        while let Some(digit) = current.to_digit(10) {
            number = number
                .checked_mul(10)
                .and_then(|n| n.checked_add(digit as usize))
                .ok_or_else(|| "field width out of range in format string".to_string())?;
            *current = next_char(iter)?;
        }
        Ok(number)
    };

    let mut spec = FormatSpec::default();
    let mut current = next_char(iter)?;
    loop {
        match current {
            '-' => spec.left_justified = true,
            '+' => spec.signed = true,
            ' ' => spec.space_prefix = true,
            '#' => spec.alternative_form = true,
            '0' => spec.zero_padded = true,
            _ => break,
        }
        current = next_char(iter)?;
    }

    spec.width = parse_number(&mut current, iter)?;

    spec.precision = if current == '.' {
        current = next_char(iter)?;
        Some(parse_number(&mut current, iter)?)
    } else {
        None
    };

    Ok((current, spec))
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Radix {
    Decimal,
    Octal,
    HexLower,
    HexUpper,
}

fn pad(target: &mut String, count: usize, c: char) {
    for _ in 0..count {
        target.push(c);
    }
}

/// Assemble `prefix` (sign or base marker), precision zeros and digits into
/// `target`, honoring justification and padding flags.
fn emit_number(target: &mut String, prefix: &str, zeros: usize, digits: &str, spec: &FormatSpec) {
    let number_len = prefix.len() + zeros + digits.len();
    let padding = spec.width.saturating_sub(number_len);
    if spec.left_justified {
        target.push_str(prefix);
        pad(target, zeros, '0');
        target.push_str(digits);
        pad(target, padding, ' ');
    } else if spec.zero_padded && spec.precision.is_none() {
        // the 0 flag is ignored when a precision is given
        target.push_str(prefix);
        pad(target, padding, '0');
        pad(target, zeros, '0');
        target.push_str(digits);
    } else {
        pad(target, padding, ' ');
        target.push_str(prefix);
        pad(target, zeros, '0');
        target.push_str(digits);
    }
}

pub fn write_signed(target: &mut String, value: i64, spec: &FormatSpec) {
    let sign = if value < 0 {
        "-"
    } else if spec.signed {
        "+"
    } else if spec.space_prefix {
        " "
    } else {
        ""
    };
    let digits = if spec.precision == Some(0) && value == 0 {
        String::new()
    } else {
        value.unsigned_abs().to_string()
    };
    let zeros = spec.precision.unwrap_or(1).saturating_sub(digits.len());
    emit_number(target, sign, zeros, &digits, spec);
}

pub fn write_unsigned(target: &mut String, value: u64, radix: Radix, spec: &FormatSpec) {
    let digits = if spec.precision == Some(0) && value == 0 {
        String::new()
    } else {
        match radix {
            Radix::Decimal => format!("{}", value),
            Radix::Octal => format!("{:o}", value),
            Radix::HexLower => format!("{:x}", value),
            Radix::HexUpper => format!("{:X}", value),
        }
    };
    let mut zeros = spec.precision.unwrap_or(1).saturating_sub(digits.len());
    let prefix = match radix {
        Radix::HexLower if spec.alternative_form && value != 0 => "0x",
        Radix::HexUpper if spec.alternative_form && value != 0 => "0X",
        Radix::Octal if spec.alternative_form && zeros == 0 && !digits.starts_with('0') => {
            // the octal alternative form forces a leading zero digit
            zeros = 1;
            ""
        }
        _ => "",
    };
    emit_number(target, prefix, zeros, &digits, spec);
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FloatStyle {
    Fixed,
    Scientific,
    General,
}

fn scientific_parts(value: f64, precision: usize) -> (String, i32) {
    // {:e} writes "d.ddde[-]X"; rebuild the exponent in C form later
    let formatted = format!("{:.*e}", precision, value);
    let (mantissa, exponent) = formatted
        .split_once('e')
        .expect("float written in scientific notation has no exponent");
    (
        mantissa.to_string(),
        exponent.parse().expect("invalid exponent in formatted float"),
    )
}

fn strip_trailing_zeros(mantissa: &mut String) {
    if mantissa.contains('.') {
        while mantissa.ends_with('0') {
            mantissa.pop();
        }
        if mantissa.ends_with('.') {
            mantissa.pop();
        }
    }
}

pub fn write_float(
    target: &mut String,
    value: f64,
    style: FloatStyle,
    uppercase: bool,
    spec: &FormatSpec,
) {
    let sign = if value.is_sign_negative() && !value.is_nan() {
        "-"
    } else if spec.signed {
        "+"
    } else if spec.space_prefix {
        " "
    } else {
        ""
    };

    if !value.is_finite() {
        let body = match (value.is_nan(), uppercase) {
            (true, false) => "nan",
            (true, true) => "NAN",
            (false, false) => "inf",
            (false, true) => "INF",
        };
        let padding = spec.width.saturating_sub(sign.len() + body.len());
        if spec.left_justified {
            target.push_str(sign);
            target.push_str(body);
            pad(target, padding, ' ');
        } else {
            pad(target, padding, ' ');
            target.push_str(sign);
            target.push_str(body);
        }
        return;
    }

    let magnitude = value.abs();
    let precision = spec.precision.unwrap_or(6);
    let body = match style {
        FloatStyle::Fixed => {
            let mut body = format!("{:.*}", precision, magnitude);
            if spec.alternative_form && precision == 0 {
                body.push('.');
            }
            body
        }
        FloatStyle::Scientific => {
            let (mut mantissa, exponent) = scientific_parts(magnitude, precision);
            if spec.alternative_form && precision == 0 {
                mantissa.push('.');
            }
            format!(
                "{}{}{}{:02}",
                mantissa,
                if uppercase { 'E' } else { 'e' },
                if exponent < 0 { '-' } else { '+' },
                exponent.abs()
            )
        }
        FloatStyle::General => {
            let significant = precision.max(1);
            let (_, exponent) = scientific_parts(magnitude, significant - 1);
            if exponent >= -4 && (exponent as i64) < significant as i64 {
                let fixed_precision = (significant as i64 - 1 - exponent as i64) as usize;
                let mut body = format!("{:.*}", fixed_precision, magnitude);
                if !spec.alternative_form {
                    strip_trailing_zeros(&mut body);
                }
                body
            } else {
                let (mut mantissa, exponent) = scientific_parts(magnitude, significant - 1);
                if !spec.alternative_form {
                    strip_trailing_zeros(&mut mantissa);
                }
                format!(
                    "{}{}{}{:02}",
                    mantissa,
                    if uppercase { 'E' } else { 'e' },
                    if exponent < 0 { '-' } else { '+' },
                    exponent.abs()
                )
            }
        }
    };

    let number_len = sign.len() + body.len();
    let padding = spec.width.saturating_sub(number_len);
    if spec.left_justified {
        target.push_str(sign);
        target.push_str(&body);
        pad(target, padding, ' ');
    } else if spec.zero_padded {
        target.push_str(sign);
        pad(target, padding, '0');
        target.push_str(&body);
    } else {
        pad(target, padding, ' ');
        target.push_str(sign);
        target.push_str(&body);
    }
}

pub fn write_str(target: &mut String, value: &str, spec: &FormatSpec) {
    let char_count = value.chars().count();
    let kept = spec.precision.unwrap_or(usize::MAX).min(char_count);
    let padding = spec.width.saturating_sub(kept);
    if spec.left_justified {
        target.extend(value.chars().take(kept));
        pad(target, padding, ' ');
    } else {
        pad(target, padding, ' ');
        target.extend(value.chars().take(kept));
    }
}

/// Render a number through a numeric output format string (`OFMT`). The
/// format may only contain floating point conversions.
pub fn format_float(format: &str, value: f64) -> Result<String, String> {
    let mut result = String::with_capacity(format.len());
    let mut iter = format.chars();
    while let Some(c) = iter.next() {
        if c != '%' {
            result.push(c);
            continue;
        }
        let (specifier, spec) = parse_conversion(&mut iter)?;
        match specifier {
            '%' => result.push('%'),
            'f' | 'F' => write_float(&mut result, value, FloatStyle::Fixed, specifier == 'F', &spec),
            'e' | 'E' => write_float(
                &mut result,
                value,
                FloatStyle::Scientific,
                specifier == 'E',
                &spec,
            ),
            'g' | 'G' => write_float(
                &mut result,
                value,
                FloatStyle::General,
                specifier == 'G',
                &spec,
            ),
            other => {
                return Err(format!(
                    "unsupported conversion '%{}' in numeric output format",
                    other
                ))
            }
        }
    }
    Ok(result)
}
