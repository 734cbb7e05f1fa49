//! Permissive numeric parsing.
//!
//! Numeric coercion never fails: the longest numeric prefix of the input is
//! parsed and everything after it is ignored. An input without a numeric
//! prefix parses as zero. Calendar coercion, by contrast, is strict.

use rust_decimal::Decimal;
use std::str::FromStr;

struct Scan {
    fraction: bool,
    exponent: bool,
}

impl Scan {
    /// Returns the numeric prefix of `src` with digit separators removed, or
    /// `None` when `src` does not start with a number.
    fn prefix(&self, src: &str) -> Option<String> {
        let bytes = src.trim_start().as_bytes();
        let mut out = String::new();
        let mut i = 0;

        if let Some(sign @ (b'+' | b'-')) = bytes.first() {
            out.push(*sign as char);
            i += 1;
        }

        let digits = digit_run(bytes, &mut i, &mut out);
        if digits == 0 {
            return None;
        }

        if self.fraction && bytes.get(i) == Some(&b'.') {
            let mut j = i + 1;
            let mut frac = String::from(".");
            if digit_run(bytes, &mut j, &mut frac) > 0 {
                out.push_str(&frac);
                i = j;
            }
        }

        if self.exponent && matches!(bytes.get(i), Some(b'e' | b'E')) {
            let mut j = i + 1;
            let mut exp = String::from("e");
            if let Some(sign @ (b'+' | b'-')) = bytes.get(j) {
                exp.push(*sign as char);
                j += 1;
            }
            if digit_run(bytes, &mut j, &mut exp) > 0 {
                out.push_str(&exp);
            }
        }

        Some(out)
    }
}

/// Reads ASCII digits starting at `*i`, allowing single `_` separators
/// between digits. Returns the number of digits read.
fn digit_run(bytes: &[u8], i: &mut usize, out: &mut String) -> usize {
    let mut count = 0;

    while let Some(&b) = bytes.get(*i) {
        match b {
            b'0'..=b'9' => {
                out.push(b as char);
                count += 1;
                *i += 1;
            }
            b'_' if count > 0 && matches!(bytes.get(*i + 1), Some(b'0'..=b'9')) => {
                *i += 1;
            }
            _ => break,
        }
    }

    count
}

pub(super) fn parse_integer_prefix(src: &str) -> i64 {
    let scan = Scan {
        fraction: false,
        exponent: false,
    };

    let Some(prefix) = scan.prefix(src) else {
        log::trace!("no integer prefix in {src:?}; using 0");
        return 0;
    };

    prefix.parse().unwrap_or_else(|_| {
        // Only overflow can fail here; saturate in the direction of the sign.
        if prefix.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

pub(super) fn parse_float_prefix(src: &str) -> f64 {
    let scan = Scan {
        fraction: true,
        exponent: true,
    };

    match scan.prefix(src) {
        Some(prefix) => prefix.parse().unwrap_or(0.0),
        None => {
            log::trace!("no float prefix in {src:?}; using 0.0");
            0.0
        }
    }
}

pub(super) fn parse_decimal_prefix(src: &str) -> Decimal {
    let scan = Scan {
        fraction: true,
        exponent: false,
    };

    match scan.prefix(src) {
        Some(prefix) => Decimal::from_str(&prefix).unwrap_or(Decimal::ZERO),
        None => {
            log::trace!("no decimal prefix in {src:?}; using 0");
            Decimal::ZERO
        }
    }
}
