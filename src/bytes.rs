//! Helpers for getting input into byte form and digests back out as text. Nothing in here knows
//! anything about hashing.

use std::convert::TryFrom;
use std::ffi::OsStr;

use crate::{Error, Parameter};

const HEX_TABLE: &[u8; 16] = b"0123456789abcdef";

/// Something that can be hashed: either raw bytes or a string, which gets hashed as UTF-8.
///
/// Conversions exist for the common byte and string types, so most callers never name this type:
///
/// ```
/// let a = blake2b_portable::hash("abc", None, 64).unwrap();
/// let b = blake2b_portable::hash(b"abc", None, 64).unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Bytes(&'a [u8]),
    Text(&'a str),
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Input<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(text: &'a str) -> Self {
        Input::Text(text)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(text: &'a String) -> Self {
        Input::Text(text)
    }
}

/// OS strings are only accepted when they're valid UTF-8, since their raw encoding differs by
/// platform.
impl<'a> TryFrom<&'a OsStr> for Input<'a> {
    type Error = Error;

    fn try_from(s: &'a OsStr) -> Result<Self, Error> {
        match s.to_str() {
            Some(text) => Ok(Input::Text(text)),
            None => Err(Parameter::Input("OS string is not valid UTF-8").into()),
        }
    }
}

/// Get the bytes that will actually be hashed.
pub fn normalize<'a>(input: Input<'a>) -> &'a [u8] {
    match input {
        Input::Bytes(bytes) => bytes,
        Input::Text(text) => text.as_bytes(),
    }
}

/// Render bytes as lowercase hex, two digits per byte, with no prefix or separators.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(2 * bytes.len());
    for &b in bytes {
        s.push(HEX_TABLE[(b >> 4) as usize] as char);
        s.push(HEX_TABLE[(b & 0xf) as usize] as char);
    }
    s
}
