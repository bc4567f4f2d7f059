#![no_main]
use libfuzzer_sys::fuzz_target;

use blake2b_portable::{hash, init, KEYBYTES, OUTBYTES};

// The first byte picks the hash length, the second the key length (0 for no
// key), and the third the chunk size. The rest is key material followed by
// input.
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let hash_length = 1 + data[0] as usize % OUTBYTES;
    let key_length = data[1] as usize % (KEYBYTES + 1);
    let chunk_size = 1 + data[2] as usize;
    let rest = &data[3..];
    if rest.len() < key_length {
        return;
    }
    let (key, input) = rest.split_at(key_length);
    let key = if key.is_empty() { None } else { Some(key) };

    let expected = hash(input, key, hash_length).unwrap();
    let mut state = init(hash_length, key).unwrap();
    for chunk in input.chunks(chunk_size) {
        state.update(chunk).unwrap();
    }
    assert_eq!(expected, state.finalize().unwrap());
});
