//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the rawk project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use core::fmt;
use std::ffi::CString;
use std::ptr;

/// A compiled POSIX extended regular expression.
///
/// Matching is search semantics: a pattern matches if it matches any
/// substring of the subject, unless it is anchored with `^`/`$`.
pub struct Regex {
    raw: libc::regex_t,
    pattern: String,
}

/// Byte offsets of one match in the subject string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
}

fn compilation_error(status: libc::c_int, raw: &libc::regex_t) -> String {
    let mut buffer = vec![0u8; 128];
    unsafe {
        libc::regerror(
            status,
            ptr::from_ref(raw),
            buffer.as_mut_ptr() as *mut libc::c_char,
            buffer.len(),
        );
    }
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    buffer.truncate(end);
    String::from_utf8(buffer).unwrap_or_else(|_| "invalid regular expression".to_string())
}

fn subject_cstring(subject: &str) -> Result<CString, String> {
    CString::new(subject).map_err(|_| "string contains an interior nul byte".to_string())
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Self, String> {
        let c_pattern = subject_cstring(pattern)
            .map_err(|_| "regular expression contains an interior nul byte".to_string())?;
        let mut raw = unsafe { std::mem::zeroed::<libc::regex_t>() };
        let status =
            unsafe { libc::regcomp(ptr::from_mut(&mut raw), c_pattern.as_ptr(), libc::REG_EXTENDED) };
        if status != 0 {
            let message = compilation_error(status, &raw);
            return Err(format!("invalid regular expression '{}': {}", pattern, message));
        }
        Ok(Self {
            raw,
            pattern: pattern.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The number of parenthesized subexpressions in the pattern.
    pub fn group_count(&self) -> usize {
        // libc's `regex_t` keeps its fields private (they are prefixed with
        // `__` and have no public accessor), even though `re_nsub` is part
        // of the stable glibc/musl/BSD ABI. `RegexTLayout` mirrors the
        // in-memory layout of `libc::regex_t` field-for-field so we can read
        // the same value the C library stores there.
        #[repr(C)]
        struct RegexTLayout {
            _buffer: *mut libc::c_void,
            _allocated: libc::size_t,
            _used: libc::size_t,
            _syntax: libc::c_ulong,
            _fastmap: *mut libc::c_char,
            _translate: *mut libc::c_char,
            re_nsub: libc::size_t,
            _bitfield: u8,
        }
        debug_assert_eq!(
            std::mem::size_of::<RegexTLayout>(),
            std::mem::size_of::<libc::regex_t>()
        );
        let layout = unsafe { &*(ptr::from_ref(&self.raw) as *const RegexTLayout) };
        layout.re_nsub
    }

    pub fn matches(&self, subject: &str) -> Result<bool, String> {
        let c_subject = subject_cstring(subject)?;
        let status = unsafe {
            libc::regexec(
                ptr::from_ref(&self.raw),
                c_subject.as_ptr(),
                0,
                ptr::null_mut(),
                0,
            )
        };
        Ok(status != libc::REG_NOMATCH)
    }

    /// All non-overlapping matches in the subject, leftmost first. An empty
    /// match directly after the end of the previous match is skipped, so a
    /// pattern like `x*` never produces two matches at the same point.
    pub fn match_locations(&self, subject: &str) -> Result<Vec<MatchRange>, String> {
        let c_subject = subject_cstring(subject)?;
        let len = subject.len();
        let mut locations = Vec::new();
        let mut next_start = 0;
        let mut previous_end = None;
        while next_start <= len {
            let mut pmatch = libc::regmatch_t { rm_so: -1, rm_eo: -1 };
            let eflags = if next_start == 0 { 0 } else { libc::REG_NOTBOL };
            let status = unsafe {
                libc::regexec(
                    ptr::from_ref(&self.raw),
                    c_subject.as_ptr().add(next_start),
                    1,
                    ptr::from_mut(&mut pmatch),
                    eflags,
                )
            };
            if status == libc::REG_NOMATCH {
                break;
            }
            let start = next_start + pmatch.rm_so as usize;
            let end = next_start + pmatch.rm_eo as usize;
            if start == end {
                if previous_end != Some(start) {
                    locations.push(MatchRange { start, end });
                    previous_end = Some(end);
                }
                next_start = start + 1;
            } else {
                locations.push(MatchRange { start, end });
                previous_end = Some(end);
                next_start = end;
            }
        }
        Ok(locations)
    }

    /// The first match together with its capture groups. Index 0 is the
    /// whole match; groups that did not participate are `None`.
    pub fn capture_locations(&self, subject: &str) -> Result<Option<Vec<Option<MatchRange>>>, String> {
        let c_subject = subject_cstring(subject)?;
        let nmatch = self.group_count() + 1;
        let mut pmatch = vec![libc::regmatch_t { rm_so: -1, rm_eo: -1 }; nmatch];
        let status = unsafe {
            libc::regexec(
                ptr::from_ref(&self.raw),
                c_subject.as_ptr(),
                nmatch,
                pmatch.as_mut_ptr(),
                0,
            )
        };
        if status == libc::REG_NOMATCH {
            return Ok(None);
        }
        Ok(Some(
            pmatch
                .iter()
                .map(|m| {
                    if m.rm_so < 0 {
                        None
                    } else {
                        Some(MatchRange {
                            start: m.rm_so as usize,
                            end: m.rm_eo as usize,
                        })
                    }
                })
                .collect(),
        ))
    }
}

impl Drop for Regex {
    fn drop(&mut self) {
        unsafe {
            libc::regfree(ptr::from_mut(&mut self.raw));
        }
    }
}

impl fmt::Debug for Regex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Regex(/{}/)", self.pattern)
    }
}

impl PartialEq for Regex {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}
