//! End-to-end tests driving the `pigzr` binary itself: a file goes in,
//! a `.gz` file comes out, and decompressing it with `-d` reproduces
//! the original bytes.

use std::fs;
use std::io::Write as _;
use std::process::Command;

use tempfile::tempdir;

fn pigzr() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pigzr"))
}

#[test]
fn compresses_and_decompresses_a_file_round_trip() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("input.txt");
    let contents = b"round trip through the pigzr binary. ".repeat(200);
    fs::File::create(&input_path).unwrap().write_all(&contents).unwrap();

    let status = pigzr().arg(&input_path).status().unwrap();
    assert!(status.success());

    let gz_path = dir.path().join("input.txt.gz");
    assert!(gz_path.exists());
    assert!(!input_path.exists(), "original should be removed without -k");

    let status = pigzr().arg("-d").arg(&gz_path).status().unwrap();
    assert!(status.success());
    assert!(input_path.exists());

    let round_tripped = fs::read(&input_path).unwrap();
    assert_eq!(round_tripped, contents);
}

#[test]
fn keep_flag_preserves_the_original_file() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("keepme.txt");
    fs::write(&input_path, b"do not delete me").unwrap();

    let status = pigzr().arg("-k").arg(&input_path).status().unwrap();
    assert!(status.success());

    assert!(input_path.exists());
    assert!(dir.path().join("keepme.txt.gz").exists());
}

#[test]
fn stdout_flag_writes_to_stdout_without_touching_the_input() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("stdout_test.txt");
    let contents = b"streamed straight to stdout";
    fs::write(&input_path, contents).unwrap();

    let output = pigzr().arg("-c").arg(&input_path).output().unwrap();
    assert!(output.status.success());
    assert!(input_path.exists(), "-c must not delete the input");
    assert_eq!(&output.stdout[0..2], &[0x1f, 0x8b]);
}
