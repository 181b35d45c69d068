use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn bin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sealkit"));
    cmd.env_remove("SEALKIT_PASSPHRASE")
        .env_remove("SEALKIT_ITERATIONS")
        .env_remove("SEALKIT_LOG");
    cmd
}

#[test]
fn encrypt_creates_skit_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, b"Hello, world.").unwrap();

    bin()
        .env("SEALKIT_PASSPHRASE", "pw")
        .arg("encrypt")
        .arg(&input)
        .arg("--iterations")
        .arg("1000")
        .assert()
        .success()
        .stdout(predicate::str::contains("encrypted"));

    let sealed = fs::read(dir.path().join("notes.txt.skit")).unwrap();
    assert_eq!(&sealed[..4], b"SKIT");
    assert_ne!(&sealed[..], b"Hello, world.");
}

#[test]
fn encrypt_and_decrypt_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    let sealed = dir.path().join("notes.txt.skit");
    let restored = dir.path().join("restored.txt");
    fs::write(&input, b"attack at dawn").unwrap();

    bin()
        .env("SEALKIT_PASSPHRASE", "pw")
        .arg("encrypt")
        .arg(&input)
        .arg("--iterations")
        .arg("1000")
        .assert()
        .success();

    bin()
        .env("SEALKIT_PASSPHRASE", "pw")
        .arg("decrypt")
        .arg(&sealed)
        .arg("-o")
        .arg(&restored)
        .assert()
        .success()
        .stdout(predicate::str::contains("decrypted"));

    assert_eq!(fs::read(&restored).unwrap(), b"attack at dawn");
}

#[test]
fn armoured_output_is_text() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.bin");
    let sealed = dir.path().join("data.asc");
    let restored = dir.path().join("data.out");
    fs::write(&input, [0u8, 1, 2, 255, 254]).unwrap();

    bin()
        .env("SEALKIT_PASSPHRASE", "pw")
        .arg("encrypt")
        .arg(&input)
        .arg("--armour")
        .arg("--iterations")
        .arg("1000")
        .arg("-o")
        .arg(&sealed)
        .assert()
        .success();

    // envelope starts after magic, version, iterations, salt length and salt
    let bytes = fs::read(&sealed).unwrap();
    let envelope = &bytes[4 + 1 + 4 + 1 + 16..];
    assert_eq!(envelope[0], b'A');
    assert!(envelope[1..].iter().all(|b| b.is_ascii_graphic()));

    bin()
        .env("SEALKIT_PASSPHRASE", "pw")
        .arg("decrypt")
        .arg(&sealed)
        .arg("-o")
        .arg(&restored)
        .assert()
        .success();

    assert_eq!(fs::read(&restored).unwrap(), [0u8, 1, 2, 255, 254]);
}

#[test]
fn wrong_passphrase_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, b"secret").unwrap();

    bin()
        .env("SEALKIT_PASSPHRASE", "pw")
        .arg("encrypt")
        .arg(&input)
        .arg("--iterations")
        .arg("1000")
        .assert()
        .success();

    bin()
        .env("SEALKIT_PASSPHRASE", "wrong_pw")
        .arg("decrypt")
        .arg(dir.path().join("notes.txt.skit"))
        .arg("-o")
        .arg(dir.path().join("out.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "invalid passphrase or corrupted data",
        ));

    assert!(!dir.path().join("out.txt").exists());
}

#[test]
fn encrypt_refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, b"secret").unwrap();

    bin()
        .env("SEALKIT_PASSPHRASE", "pw")
        .arg("encrypt")
        .arg(&input)
        .arg("--iterations")
        .arg("1000")
        .assert()
        .success();

    bin()
        .env("SEALKIT_PASSPHRASE", "pw")
        .arg("encrypt")
        .arg(&input)
        .arg("--iterations")
        .arg("1000")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    bin()
        .env("SEALKIT_PASSPHRASE", "pw")
        .arg("encrypt")
        .arg(&input)
        .arg("--iterations")
        .arg("1000")
        .arg("--force")
        .assert()
        .success();
}

#[test]
fn existing_output_is_refused_before_prompting() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    let output = dir.path().join("notes.txt.skit");
    fs::write(&input, b"secret").unwrap();
    fs::write(&output, b"keep me").unwrap();

    // no passphrase source at all: the overwrite check must fire first
    bin()
        .arg("encrypt")
        .arg(&input)
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("no passphrase provided").not());

    assert_eq!(fs::read(&output).unwrap(), b"keep me");
}

#[test]
fn oversized_iteration_header_is_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    let sealed = dir.path().join("notes.txt.skit");
    fs::write(&input, b"secret").unwrap();

    bin()
        .env("SEALKIT_PASSPHRASE", "pw")
        .arg("encrypt")
        .arg(&input)
        .arg("--iterations")
        .arg("1000")
        .assert()
        .success();

    let mut bytes = fs::read(&sealed).unwrap();
    bytes[5..9].copy_from_slice(&u32::MAX.to_le_bytes());
    fs::write(&sealed, &bytes).unwrap();

    bin()
        .env("SEALKIT_PASSPHRASE", "pw")
        .arg("decrypt")
        .arg(&sealed)
        .arg("-o")
        .arg(dir.path().join("out.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("iterations"));
}

#[test]
fn missing_input_fails() {
    let dir = tempdir().unwrap();

    bin()
        .env("SEALKIT_PASSPHRASE", "pw")
        .arg("decrypt")
        .arg(dir.path().join("missing.skit"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn weak_iterations_are_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, b"secret").unwrap();

    bin()
        .env("SEALKIT_PASSPHRASE", "pw")
        .arg("encrypt")
        .arg(&input)
        .arg("--iterations")
        .arg("10")
        .assert()
        .failure()
        .stderr(predicate::str::contains("iterations"));
}

#[test]
fn piped_passphrase_needs_confirmation() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, b"secret").unwrap();

    bin()
        .arg("encrypt")
        .arg(&input)
        .arg("--iterations")
        .arg("1000")
        .write_stdin("one\ntwo\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("passphrases do not match"));

    bin()
        .arg("encrypt")
        .arg(&input)
        .arg("--iterations")
        .arg("1000")
        .write_stdin("same\nsame\n")
        .assert()
        .success();

    bin()
        .arg("decrypt")
        .arg(dir.path().join("notes.txt.skit"))
        .arg("-o")
        .arg(dir.path().join("back.txt"))
        .write_stdin("same\n")
        .assert()
        .success();

    assert_eq!(fs::read(dir.path().join("back.txt")).unwrap(), b"secret");
}

#[test]
fn inspect_shows_header_without_passphrase() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, b"secret").unwrap();

    bin()
        .env("SEALKIT_PASSPHRASE", "pw")
        .arg("encrypt")
        .arg(&input)
        .arg("--iterations")
        .arg("2000")
        .arg("--salt-len")
        .arg("32")
        .assert()
        .success();

    bin()
        .arg("inspect")
        .arg(dir.path().join("notes.txt.skit"))
        .assert()
        .success()
        .stdout(predicate::str::contains("iterations     : 2000"))
        .stdout(predicate::str::contains("salt length    : 32 bytes"))
        .stdout(predicate::str::contains("encoding       : raw"));
}

#[test]
fn inspect_rejects_foreign_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("plain.txt");
    fs::write(&input, b"just some text").unwrap();

    bin()
        .arg("inspect")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a sealkit file"));
}
