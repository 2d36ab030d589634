// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `const` parsing of build time configuration variables.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ParseIntError {
    Empty,
    InvalidDigit,
    Overflow,
}

/// Parse the input to usize
pub(crate) const fn parse(s: &str) -> Result<usize, ParseIntError> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return Err(ParseIntError::Empty);
    }

    let mut result: usize = 0;
    let mut index = 0;
    while index < bytes.len() {
        let digit = bytes[index].wrapping_sub(b'0');
        if digit > 9 {
            return Err(ParseIntError::InvalidDigit);
        }
        result = match result.checked_mul(10) {
            Some(r) => match r.checked_add(digit as usize) {
                Some(r) => r,
                None => return Err(ParseIntError::Overflow),
            },
            None => return Err(ParseIntError::Overflow),
        };
        index += 1;
    }
    Ok(result)
}

/// Parse the input to integer; or otherwise cause
/// a const error, an "unwarp" in space and time.
pub(crate) const fn parse_unwarp(s: &str) -> usize {
    match parse(s) {
        Ok(t) => t,
        res @ Err(_) => {
            [0, /* const error: failed to parse environment variable */][res.is_err() as usize]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARSED: usize = parse_unwarp("512");

    #[test]
    fn parses_in_const_context() {
        assert_eq!(PARSED, 512);
    }

    #[test]
    fn parse_digits() {
        assert_eq!(parse("0"), Ok(0));
        assert_eq!(parse("64"), Ok(64));
        assert_eq!(parse("000128"), Ok(128));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(parse(""), Err(ParseIntError::Empty));
        assert_eq!(parse("12a"), Err(ParseIntError::InvalidDigit));
        assert_eq!(parse("-1"), Err(ParseIntError::InvalidDigit));
        assert_eq!(parse("99999999999999999999999"), Err(ParseIntError::Overflow));
    }
}
