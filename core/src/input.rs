//! Postcode and house-number normalization.
//!
//! Everything here is pure and runs before any request is built, so invalid
//! input is rejected without a network round trip.
//!
//! # House-number grammar
//! ```text
//! house-number := digits [ addition ]
//! addition     := letter { alnum | ' ' }          -- "36B", "123a4"
//!               | sep { alnum | ' ' }+            -- "123 rood", "123-a"
//! sep          := { non-alnum }+
//! ```
//! A string outside this grammar is returned unchanged as the number with an
//! empty addition, so the digits-only check downstream rejects it.

use crate::error::Error;
use crate::types::{AddressQuery, LookupRequest};

/// True iff `postcode` is four digits (first non-zero) followed by two ASCII
/// letters, with nothing in between or around.
pub fn is_valid_postcode_format(postcode: &str) -> bool {
    let bytes = postcode.as_bytes();
    if bytes.len() != 6 {
        return false;
    }
    let (digits, letters) = bytes.split_at(4);
    matches!(digits[0], b'1'..=b'9')
        && digits[1..].iter().all(u8::is_ascii_digit)
        && letters.iter().all(u8::is_ascii_alphabetic)
}

/// Split a combined house number like `"123 rood"` into `("123", "rood")`.
pub fn split_house_number(raw: &str) -> (String, String) {
    match parse_house_number(raw) {
        Some((number, addition)) => (number.to_string(), addition.trim_end().to_string()),
        None => (raw.to_string(), String::new()),
    }
}

fn is_addition_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' '
}

fn parse_house_number(raw: &str) -> Option<(&str, &str)> {
    let digits_end = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    if digits_end == 0 {
        return None;
    }
    let (number, rest) = raw.split_at(digits_end);

    let Some(first) = rest.chars().next() else {
        return Some((number, ""));
    };

    if first.is_ascii_alphabetic() {
        return rest.chars().all(is_addition_char).then_some((number, rest));
    }

    // `first` is neither digit nor letter, so a separator run starts here.
    let sep_end = rest
        .find(|c: char| c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let (sep, addition) = rest.split_at(sep_end);

    if addition.is_empty() {
        // The separator swallowed everything. Its trailing spaces can still
        // serve as the addition as long as one separator character remains.
        let trimmed = sep.trim_end_matches(' ');
        return (!trimmed.is_empty() && trimmed.len() < sep.len()).then_some((number, ""));
    }

    addition.chars().all(is_addition_char).then_some((number, addition))
}

/// Trim, split and validate a `LookupRequest` into the query that goes on
/// the wire.
///
/// An addition supplied by the caller always wins; the house number is only
/// split when the addition field is empty.
pub fn normalize(request: &LookupRequest) -> Result<AddressQuery, Error> {
    let postcode: String = request
        .postcode
        .trim()
        .chars()
        .filter(|c| *c != ' ')
        .collect();
    let mut house_number = request.house_number.trim().to_string();
    let mut house_number_addition = request.house_number_addition.trim().to_string();

    if house_number_addition.is_empty() {
        (house_number, house_number_addition) = split_house_number(&house_number);
    }

    if !is_valid_postcode_format(&postcode) {
        return Err(Error::input_invalid(format!(
            "postcode `{postcode}` needs to be in the 1234AB format"
        )));
    }
    if house_number.is_empty() || !house_number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::input_invalid(format!(
            "house number `{house_number}` must contain digits only"
        )));
    }

    Ok(AddressQuery {
        postcode,
        house_number,
        house_number_addition,
    })
}
