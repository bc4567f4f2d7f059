use assert_cmd::Command;
use duct::cmd;
use std::io::prelude::*;
use tempfile::NamedTempFile;

const EMPTY_HASH: &str = "786a02f742015903c6c6fd852552d272912f4740e15847618a86e217f71f5419d25e1031afee585313896444934eb04b903a685b1448b755d56f701afe9be2ce";
const ABC_HASH: &str = "ba80a53f981c4d0d6a2797b69f12f6e94c212f14685ac4b74b12bb6fdbffa2d17d87c5392aab792dc252d5de4533cc9518d38aa8dbf1925ab92386edd4009923";

fn blake2_exe() -> &'static str {
    env!("CARGO_BIN_EXE_blake2")
}

fn abcdef_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"abcdef").unwrap();
    file.flush().unwrap();
    file
}

// Run the binary expecting failure, and return its stderr.
fn failure_stderr(args: &[&str]) -> String {
    let output = Command::new(blake2_exe()).args(args).output().unwrap();
    assert!(!output.status.success(), "expected failure for {:?}", args);
    assert!(output.stdout.is_empty());
    String::from_utf8(output.stderr).unwrap()
}

#[test]
fn test_stdin() {
    let output = cmd!(blake2_exe(), "--length=16")
        .stdin_bytes("abcdef")
        .read()
        .unwrap();
    assert_eq!("2465e7ee63a17b4b307c7792c432aef6", output);
}

#[test]
fn test_empty_stdin() {
    let output = cmd!(blake2_exe()).stdin_bytes("").read().unwrap();
    assert_eq!(EMPTY_HASH, output);
}

#[test]
fn test_text() {
    let output = cmd!(blake2_exe(), "--text", "abc").read().unwrap();
    assert_eq!(ABC_HASH, output);

    // Text is hashed as UTF-8.
    let output = cmd!(blake2_exe(), "--text", "héllo").read().unwrap();
    assert_eq!(
        "f5392b3e0fc55e0ecd8d462718e4c734f86bb10582144ee192594f4031ec64d8213903f58ab8177367c80fd74f603f8404f8fc5a7be6ec5b78cbef6f42d2ec73",
        output
    );
}

#[test]
fn test_multiple_text() {
    let output = cmd!(blake2_exe(), "--text", "abc", "--text", "")
        .read()
        .unwrap();
    assert_eq!(format!("{}\n{}", ABC_HASH, EMPTY_HASH), output);
}

#[test]
fn test_length_and_key() {
    let output = cmd!(blake2_exe(), "--text", "hello world", "--length", "32")
        .read()
        .unwrap();
    assert_eq!(
        "256c83b297114d201b30179f3f0ef0cace9783622da5974326b436178aeef610",
        output
    );

    // "secret key" in hex.
    let output = cmd!(
        blake2_exe(),
        "--text",
        "hello world",
        "--length",
        "32",
        "--key",
        "736563726574206b6579"
    )
    .read()
    .unwrap();
    assert_eq!(
        "612a5a7b4ac57f909bd3b43130676556620e13d2a86b55b028013751af06277d",
        output
    );
}

#[test]
fn test_key_with_empty_input() {
    let key: String = (0..64u8).map(|b| format!("{:02x}", b)).collect();
    let output = cmd!(blake2_exe(), "--key", key).stdin_bytes("").read().unwrap();
    assert_eq!(
        "10ebb67700b1868efb4417987acf4690ae9d972fb7a590c2f02871799aaa4786b5e996e8f0f4eb981fc214b005f42d2ff4233499391653df7aefcbc13fc51568",
        output
    );
}

#[test]
fn test_input_file() {
    let file = abcdef_file();
    let output = cmd!(blake2_exe(), "--length=16", file.path())
        .read()
        .unwrap();
    assert_eq!("2465e7ee63a17b4b307c7792c432aef6", output);
}

#[test]
fn test_input_file_mmap() {
    let file = abcdef_file();
    let output = cmd!(blake2_exe(), "--length=16", "--mmap", file.path())
        .read()
        .unwrap();
    assert_eq!("2465e7ee63a17b4b307c7792c432aef6", output);
}

#[test]
fn test_multiple_files() {
    let file1 = abcdef_file();
    let file2 = abcdef_file();
    let output = cmd!(blake2_exe(), "--length=16", file1.path(), file2.path())
        .read()
        .unwrap();
    let expected = format!(
        "2465e7ee63a17b4b307c7792c432aef6  {}\n2465e7ee63a17b4b307c7792c432aef6  {}",
        file1.path().to_string_lossy(),
        file2.path().to_string_lossy(),
    );
    assert_eq!(expected, output);
}

#[test]
fn test_bad_length() {
    for length in ["0", "65"] {
        let stderr = failure_stderr(&["--text", "abc", "--length", length]);
        assert!(stderr.contains("bad hash length"), "{}", stderr);
    }
}

#[test]
fn test_bad_key() {
    let stderr = failure_stderr(&["--text", "abc", "--key", "zz"]);
    assert!(stderr.contains("--key is not valid hex"), "{}", stderr);

    let stderr = failure_stderr(&["--text", "abc", "--key", ""]);
    assert!(stderr.contains("bad key length 0"), "{}", stderr);

    let too_long = "00".repeat(65);
    let stderr = failure_stderr(&["--text", "abc", "--key", &too_long]);
    assert!(stderr.contains("bad key length 65"), "{}", stderr);
}

#[test]
fn test_text_conflicts() {
    let file = abcdef_file();
    let path = file.path().to_str().unwrap();
    let stderr = failure_stderr(&["--text", "abc", path]);
    assert!(stderr.contains("can't be used together"), "{}", stderr);

    let stderr = failure_stderr(&["--text", "abc", "--mmap"]);
    assert!(stderr.contains("--mmap not supported"), "{}", stderr);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");
    let stderr = failure_stderr(&[missing.to_str().unwrap()]);
    assert!(stderr.starts_with("blake2: "), "{}", stderr);
}
