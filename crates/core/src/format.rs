//! Input masks for identifier fields.
//!
//! These functions run on every keystroke: they take whatever the user has typed so far, keep
//! the digits, and lay them out in the display shape. They never judge whether the value is
//! correct; that belongs to [`crate::validation`].
//!
//! All functions are total. Feeding a masked value back in returns it unchanged.

use crate::constants::{POSTAL_CODE_DIGITS, TAX_ID_DIGITS};

/// Keeps only the ASCII digits of `input`.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Masks a phone number as `(DD) DDDDD-DDDD`.
///
/// The area code is parenthesised once a third digit is typed. The hyphen is placed before the
/// last four digits once at least five digits follow the area code, so both mobile
/// (`(11) 98765-4321`) and landline (`(11) 3456-7890`) numbers come out right.
pub fn format_phone(input: &str) -> String {
    let digits = digits_only(input);
    if digits.len() < 3 {
        return digits;
    }

    let (area, rest) = digits.split_at(2);
    let mut out = String::with_capacity(digits.len() + 4);
    out.push('(');
    out.push_str(area);
    out.push_str(") ");

    if rest.len() >= 5 {
        let (head, tail) = rest.split_at(rest.len() - 4);
        out.push_str(head);
        out.push('-');
        out.push_str(tail);
    } else {
        out.push_str(rest);
    }
    out
}

/// Masks a CPF as `DDD.DDD.DDD-DD`, dropping digits past the eleventh.
pub fn format_tax_id(input: &str) -> String {
    let mut digits = digits_only(input);
    digits.truncate(TAX_ID_DIGITS);

    let mut out = String::with_capacity(TAX_ID_DIGITS + 3);
    for (idx, digit) in digits.chars().enumerate() {
        match idx {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(digit);
    }
    out
}

/// Masks a CEP as `DDDDD-DDD`, dropping digits past the eighth.
pub fn format_postal_code(input: &str) -> String {
    let mut digits = digits_only(input);
    digits.truncate(POSTAL_CODE_DIGITS);

    if digits.len() > 5 {
        digits.insert(5, '-');
    }
    digits
}
