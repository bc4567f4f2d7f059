//! A streaming implementation of the BLAKE2b hash ([RFC 7693](https://tools.ietf.org/html/rfc7693))
//! with:
//!
//! - 100% safe, portable Rust, using native 64-bit arithmetic.
//! - Adjustable output length, from 1 to 64 bytes.
//! - Keyed hashing, so that BLAKE2b acts as a MAC.
//! - Incremental input. Splitting the input into chunks never changes the result.
//!
//! # Example
//!
//! ```
//! let mut params = blake2b_portable::Params::new();
//! params.hash_length(16);
//! params.key(b"The Magic Words are Squeamish Ossifrage");
//! let mut state = params.to_state().unwrap();
//! state.update(b"foo").unwrap();
//! state.update(b"bar").unwrap();
//! state.update(b"baz").unwrap();
//! let hash = state.finalize().unwrap();
//! assert_eq!(hash.as_bytes().len(), 16);
//! ```
//!
//! Or all at once:
//!
//! ```
//! let hex = blake2b_portable::hash_to_hex("", None, 64).unwrap();
//! assert_eq!(&hex[..16], "786a02f742015903");
//! ```

use arrayref::array_ref;
use arrayvec::ArrayString;
use byteorder::{ByteOrder, LittleEndian};
use core::cmp;
use core::fmt;
use tracing::{debug, trace};
use zeroize::Zeroize;

pub mod bytes;
mod error;
mod portable;


pub use crate::bytes::Input;
pub use crate::error::{Error, Parameter};

/// The number of bytes in one compressed block.
pub const BLOCKBYTES: usize = 128;
/// The max hash length.
pub const OUTBYTES: usize = 64;
/// The max key length.
pub const KEYBYTES: usize = 64;

const IV: StateWords = [
    0x6A09E667F3BCC908,
    0xBB67AE8584CAA73B,
    0x3C6EF372FE94F82B,
    0xA54FF53A5F1D36F1,
    0x510E527FADE682D1,
    0x9B05688C2B3E6C1F,
    0x1F83D9ABFB41BD6B,
    0x5BE0CD19137E2179,
];

const SIGMA: [[u8; 16]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
];

type StateWords = [u64; 8];
type Block = [u8; BLOCKBYTES];

/// Compute the BLAKE2b hash of a slice of bytes, using default parameters.
pub fn blake2b(input: &[u8]) -> Hash {
    let mut state = HashContext::new();
    state.absorb(input);
    state.finish()
}

/// Start a new hash with the given output length and optional key.
///
/// This is shorthand for configuring a [`Params`] and calling [`Params::to_state`]. The hash
/// length must be from 1 to `OUTBYTES` (64), and a key, if given, must be from 1 to `KEYBYTES`
/// (64) bytes long. Anything else is an [`Error::InvalidParameter`].
pub fn init(hash_length: usize, key: Option<&[u8]>) -> Result<HashContext, Error> {
    let mut params = Params::new();
    params.hash_length(hash_length);
    if let Some(key) = key {
        params.key(key);
    }
    params.to_state()
}

/// Hash a string or a byte slice all at once.
///
/// Strings are hashed as their UTF-8 bytes.
///
/// ```
/// let hash = blake2b_portable::hash(&[0u8], None, 64).unwrap();
/// assert_eq!(&hash.to_hex()[..16], "2fa3f686df876995");
/// ```
pub fn hash<'a>(
    input: impl Into<Input<'a>>,
    key: Option<&[u8]>,
    hash_length: usize,
) -> Result<Hash, Error> {
    let mut state = init(hash_length, key)?;
    state.absorb(bytes::normalize(input.into()));
    Ok(state.finish())
}

/// Like [`hash`], but render the result as a lowercase hex string.
pub fn hash_to_hex<'a>(
    input: impl Into<Input<'a>>,
    key: Option<&[u8]>,
    hash_length: usize,
) -> Result<String, Error> {
    let hash = hash(input, key, hash_length)?;
    Ok(bytes::to_hex(hash.as_bytes()))
}

/// A parameter builder for [`HashContext`].
///
/// Apart from `hash_length`, which controls the length of the final `Hash`, the key is mixed
/// into the hash as a full block of input ahead of everything else. Setters never fail; the
/// values are checked by [`to_state`](Params::to_state) and [`hash`](Params::hash).
///
/// # Example
///
/// ```
/// let mut params = blake2b_portable::Params::new();
/// params.hash_length(32);
/// let mut state = params.to_state().unwrap();
/// ```
#[derive(Clone)]
pub struct Params {
    hash_length: usize,
    key_length: Option<usize>,
    key: [u8; KEYBYTES],
}

impl Params {
    /// Equivalent to `Params::default()`.
    pub fn new() -> Self {
        Self {
            hash_length: OUTBYTES,
            key_length: None,
            key: [0; KEYBYTES],
        }
    }

    /// Set the length of the final hash, from 1 to `OUTBYTES` (64). Apart from controlling the
    /// length of the final `Hash`, this is also associated data, and changing it will result in a
    /// totally different hash.
    pub fn hash_length(&mut self, length: usize) -> &mut Self {
        self.hash_length = length;
        self
    }

    /// Use a secret key, so that BLAKE2b acts as a MAC. The key must be from 1 to `KEYBYTES` (64)
    /// bytes long. Note that an empty key is an error, not the same thing as having no key.
    pub fn key(&mut self, key: &[u8]) -> &mut Self {
        self.key.zeroize();
        self.key_length = Some(key.len());
        if key.len() <= KEYBYTES {
            self.key[..key.len()].copy_from_slice(key);
        }
        self
    }

    fn validate(&self) -> Result<(), Error> {
        if self.hash_length == 0 || self.hash_length > OUTBYTES {
            debug!(hash_length = self.hash_length, "rejecting BLAKE2b params");
            return Err(Parameter::HashLength(self.hash_length).into());
        }
        if let Some(key_length) = self.key_length {
            if key_length == 0 || key_length > KEYBYTES {
                debug!(key_length, "rejecting BLAKE2b params");
                return Err(Parameter::KeyLength(key_length).into());
            }
        }
        Ok(())
    }

    /// Construct a `HashContext` from these parameters.
    pub fn to_state(&self) -> Result<HashContext, Error> {
        self.validate()?;
        let key = self.key_length.map(|len| &self.key[..len]);
        Ok(HashContext::with_checked_params(self.hash_length as u8, key))
    }

    /// Hash an input all at once with these parameters.
    pub fn hash(&self, input: &[u8]) -> Result<Hash, Error> {
        let mut state = self.to_state()?;
        state.absorb(input);
        Ok(state.finish())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Params {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Params {{ hash_length: {}, key_length: {:?} }}",
            self.hash_length,
            // NB: Don't print the key itself. Debug shouldn't leak secrets.
            self.key_length,
        )
    }
}

/// An incremental hasher for BLAKE2b.
///
/// Feed it input with [`update`](HashContext::update) any number of times, then call
/// [`finalize`](HashContext::finalize) exactly once. After that the context is spent, and both
/// methods return [`Error::InvalidState`].
///
/// # Example
///
/// ```
/// let mut state = blake2b_portable::HashContext::new();
/// state.update(b"foo").unwrap().update(b"bar").unwrap();
/// let hash = state.finalize().unwrap();
/// assert_eq!(hash, blake2b_portable::blake2b(b"foobar"));
/// assert!(state.update(b"baz").is_err());
/// ```
#[derive(Clone)]
pub struct HashContext {
    h: StateWords,
    buf: Block,
    buflen: usize,
    count: u128,
    hash_length: u8,
    finalized: bool,
}

impl HashContext {
    /// Construct a new `HashContext` with default parameters: a 64-byte hash and no key.
    pub fn new() -> Self {
        Self::with_checked_params(OUTBYTES as u8, None)
    }

    fn with_checked_params(hash_length: u8, key: Option<&[u8]>) -> Self {
        let key_length = key.map_or(0, |k| k.len()) as u64;
        let mut h = IV;
        // Digest length, key length, fanout = 1, depth = 1. The rest of the
        // parameter block is zero.
        h[0] ^= 0x01010000 ^ (key_length << 8) ^ hash_length as u64;
        let mut state = Self {
            h,
            buf: [0; BLOCKBYTES],
            buflen: 0,
            count: 0,
            hash_length,
            finalized: false,
        };
        if let Some(key) = key {
            // The key block stays buffered, so it gets compressed as the last
            // block if no other input follows.
            let mut key_block = [0; BLOCKBYTES];
            key_block[..key.len()].copy_from_slice(key);
            state.absorb(&key_block);
            key_block.zeroize();
        }
        trace!(
            hash_length,
            keyed = key.is_some(),
            "initialized BLAKE2b context"
        );
        state
    }

    /// The length of the `Hash` this context will produce.
    pub fn hash_length(&self) -> usize {
        self.hash_length as usize
    }

    /// The total number of bytes absorbed so far, including the key block if there is one.
    pub fn count(&self) -> u128 {
        self.count
    }

    fn fill_buf(&mut self, input: &mut &[u8]) {
        let take = cmp::min(BLOCKBYTES - self.buflen, input.len());
        self.buf[self.buflen..self.buflen + take].copy_from_slice(&input[..take]);
        self.buflen += take;
        self.count += take as u128;
        *input = &input[take..];
    }

    fn absorb(&mut self, mut input: &[u8]) {
        // If we have a partial buffer, try to complete it. If we complete it and there's more
        // input waiting (so we know we don't need to finalize), compress it.
        if self.buflen > 0 {
            self.fill_buf(&mut input);
            if !input.is_empty() {
                portable::compress(&mut self.h, &self.buf, self.count, false);
                self.buflen = 0;
            }
        }
        // If there's more than a block of input left, compress it directly instead of buffering it.
        while input.len() > BLOCKBYTES {
            self.count += BLOCKBYTES as u128;
            let block = array_ref!(input, 0, BLOCKBYTES);
            portable::compress(&mut self.h, block, self.count, false);
            input = &input[BLOCKBYTES..];
        }
        // Buffer any remaining input, to be either compressed or finalized in a subsequent call.
        self.fill_buf(&mut input);
    }

    fn finish(&mut self) -> Hash {
        for b in &mut self.buf[self.buflen..] {
            *b = 0;
        }
        portable::compress(&mut self.h, &self.buf, self.count, true);
        let mut hash = Hash {
            bytes: [0; OUTBYTES],
            len: self.hash_length,
        };
        LittleEndian::write_u64_into(&self.h, &mut hash.bytes);
        trace!(count = %self.count, "finalized BLAKE2b context");
        self.finalized = true;
        self.h.zeroize();
        self.buf.zeroize();
        hash
    }

    /// Add input to the hash. You can call `update` any number of times before `finalize`.
    pub fn update(&mut self, input: &[u8]) -> Result<&mut Self, Error> {
        if self.finalized {
            return Err(Error::InvalidState);
        }
        self.absorb(input);
        Ok(self)
    }

    /// Finalize the state and return a `Hash`. This consumes the state's usefulness: any further
    /// call to `update` or `finalize` returns `Error::InvalidState`.
    pub fn finalize(&mut self) -> Result<Hash, Error> {
        if self.finalized {
            return Err(Error::InvalidState);
        }
        Ok(self.finish())
    }

    /// Whether `finalize` has already been called.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

impl Default for HashContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for HashContext {
    fn drop(&mut self) {
        // The buffer may still hold the key block.
        self.h.zeroize();
        self.buf.zeroize();
    }
}

impl std::io::Write for HashContext {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for HashContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // NB: Don't print the words. Leaking them would allow length extension.
        write!(
            f,
            "HashContext {{ count: {}, hash_length: {}, finalized: {} }}",
            self.count, self.hash_length, self.finalized,
        )
    }
}

/// A finalized BLAKE2b hash, with constant-time equality.
#[derive(Clone, Copy)]
pub struct Hash {
    bytes: [u8; OUTBYTES],
    len: u8,
}

impl Hash {
    /// Get the hash as a slice of bytes. Note that slices don't provide constant-time equality
    /// checks, so avoid this method if you're using BLAKE2b as a MAC.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Convert the hash to a lowercase hexadecimal
    /// [`ArrayString`](https://docs.rs/arrayvec/0.7/arrayvec/struct.ArrayString.html).
    pub fn to_hex(&self) -> ArrayString<{ 2 * OUTBYTES }> {
        let mut s = ArrayString::new();
        let table = b"0123456789abcdef";
        for &b in self.as_bytes() {
            s.push(table[(b >> 4) as usize] as char);
            s.push(table[(b & 0xf) as usize] as char);
        }
        s
    }
}

/// This implementation is constant time, if the two hashes are the same length.
impl PartialEq for Hash {
    fn eq(&self, other: &Hash) -> bool {
        constant_time_eq::constant_time_eq(self.as_bytes(), other.as_bytes())
    }
}

/// This implementation is constant time, if the slice is the same length as the hash.
impl PartialEq<[u8]> for Hash {
    fn eq(&self, other: &[u8]) -> bool {
        constant_time_eq::constant_time_eq(self.as_bytes(), other)
    }
}

impl Eq for Hash {}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Hash(0x{})", self.to_hex())
    }
}

// This module is pub for internal benchmarks only. Please don't use it.
#[doc(hidden)]
pub mod benchmarks {
    pub use crate::portable::compress as compress_portable;
}
