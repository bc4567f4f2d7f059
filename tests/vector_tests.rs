//! The tests in this file run two sets of test vectors:
//!
//! - blake2b-kat.json is laid out like the upstream known-answer file
//!   (https://github.com/BLAKE2/BLAKE2/blob/master/testvectors/blake2-kat.json): inputs
//!   00 01 02 .. up to 255 bytes long, unkeyed and keyed with 00 01 .. 3f.
//! - boundary-vectors.json covers inputs just around one and two block lengths, with a spread of
//!   hash lengths and keys. Those are the cases where the "full buffer, but is it the last block?"
//!   logic matters.

use lazy_static::lazy_static;
use serde::Deserialize;

lazy_static! {
    static ref KAT_CASES: Vec<TestCase> =
        serde_json::from_str(include_str!("blake2b-kat.json")).unwrap();
    static ref BOUNDARY_CASES: Vec<TestCase> =
        serde_json::from_str(include_str!("boundary-vectors.json")).unwrap();
}

#[derive(Debug, Deserialize)]
struct TestCase {
    #[serde(default)]
    hash: Option<String>,
    #[serde(rename = "in")]
    in_: String,
    key: String,
    out: String,
}

fn check_case(case: &TestCase) {
    let input_bytes = hex::decode(&case.in_).unwrap();
    let hash_length = case.out.len() / 2;
    let key_bytes = hex::decode(&case.key).unwrap();
    let key = if key_bytes.is_empty() {
        None
    } else {
        Some(&key_bytes[..])
    };

    // Assert the all-at-once result.
    assert_eq!(
        case.out,
        blake2b_portable::hash_to_hex(&input_bytes, key, hash_length).unwrap()
    );

    // Assert the Params result.
    let mut params = blake2b_portable::Params::new();
    params.hash_length(hash_length);
    if let Some(key) = key {
        params.key(key);
    }
    assert_eq!(case.out, &*params.hash(&input_bytes).unwrap().to_hex());

    // Assert the HashContext result, fed one byte at a time.
    let mut state = blake2b_portable::init(hash_length, key).unwrap();
    for byte in &input_bytes {
        state.update(&[*byte]).unwrap();
    }
    assert_eq!(case.out, &*state.finalize().unwrap().to_hex());
}

#[test]
fn blake2b_kat_vectors() {
    let mut count = 0u64;
    for case in KAT_CASES.iter() {
        if case.hash.as_deref() == Some("blake2b") {
            println!("case {}, input {:?}, key {:?}", count, case.in_, case.key);
            count += 1;
            check_case(case);
        }
    }

    // Make sure we don't accidentally skip all the tests somehow. If the number of test vectors
    // changes in the future, we'll need to update this count.
    assert_eq!(512, count);
}

#[test]
fn blake2b_boundary_vectors() {
    let mut count = 0u64;
    for case in BOUNDARY_CASES.iter() {
        println!(
            "case {}, input length {}, key length {}, hash length {}",
            count,
            case.in_.len() / 2,
            case.key.len() / 2,
            case.out.len() / 2,
        );
        count += 1;
        check_case(case);
    }

    // 7 input lengths, 5 hash lengths, 3 keys.
    assert_eq!(105, count);
}
