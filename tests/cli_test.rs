use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

const SECTOR_SIZE: usize = 128;
const ENTRY_SIZE: usize = 32;

fn lbr_dir_entry(status: u8, name: &str, ext: &str, start: u16, len: u16, pad: u8) -> [u8; ENTRY_SIZE] {
    let mut e = [0u8; ENTRY_SIZE];
    e[0] = status;
    let name_b = format!("{:8}", name).into_bytes();
    let ext_b = format!("{:3}", ext).into_bytes();
    e[1..9].copy_from_slice(&name_b[..8]);
    e[9..12].copy_from_slice(&ext_b[..3]);
    e[12..14].copy_from_slice(&start.to_le_bytes());
    e[14..16].copy_from_slice(&len.to_le_bytes());
    e[25] = pad;
    e
}

fn single_member_lbr(payload: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&lbr_dir_entry(0x00, "", "", 0, 1, 0));
    data.extend_from_slice(&lbr_dir_entry(0x00, "GREET", "TXT", 1, 1, (SECTOR_SIZE - payload.len()) as u8));
    data.resize(SECTOR_SIZE, 0);
    data.extend_from_slice(payload);
    data.resize(2 * SECTOR_SIZE, 0);
    data
}

const ARC_MARKER: u8 = 0x1A;
const ARC_NAME_LEN: usize = 13;

fn single_stored_arc(name: &str, payload: &[u8]) -> Vec<u8> {
    let mut h = vec![ARC_MARKER, 2];
    let mut name_field = [0u8; ARC_NAME_LEN];
    name_field[..name.len()].copy_from_slice(name.as_bytes());
    h.extend_from_slice(&name_field);
    h.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    h.extend_from_slice(&0u16.to_le_bytes());
    h.extend_from_slice(&0u16.to_le_bytes());
    h.extend_from_slice(&0u16.to_le_bytes());
    h.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    h.extend_from_slice(payload);
    h.push(ARC_MARKER);
    h.push(0);
    h
}

#[test]
fn lists_lbr_member() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("archive.lbr");
    std::fs::write(&in_path, single_member_lbr(b"hello"))?;

    Command::cargo_bin("un80")?
        .arg("-l")
        .arg(&in_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("GREET.TXT"));
    Ok(())
}

#[test]
fn extracts_lbr_member_to_output_dir() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("archive.lbr");
    std::fs::write(&in_path, single_member_lbr(b"hello"))?;
    let out_dir = temp_dir.path().join("out");

    Command::cargo_bin("un80")?
        .arg(&in_path)
        .arg("-o")
        .arg(&out_dir)
        .assert()
        .success();

    let extracted = std::fs::read(out_dir.join("GREET.TXT"))?;
    assert_eq!(extracted, b"hello");
    Ok(())
}

#[test]
fn extracts_arc_stored_member() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("archive.arc");
    std::fs::write(&in_path, single_stored_arc("NOTES.TXT", b"payload-bytes"))?;
    let out_dir = temp_dir.path().join("out");

    Command::cargo_bin("un80")?
        .arg(&in_path)
        .arg("-o")
        .arg(&out_dir)
        .assert()
        .success();

    let extracted = std::fs::read(out_dir.join("NOTES.TXT"))?;
    assert_eq!(extracted, b"payload-bytes");
    Ok(())
}

#[test]
fn text_mode_strips_eof_marker_and_normalizes_line_endings() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("archive.arc");
    let raw = b"line one\r\nline two\r\n\x1a\x1a\x1a";
    std::fs::write(&in_path, single_stored_arc("README.TXT", raw))?;
    let out_dir = temp_dir.path().join("out");

    Command::cargo_bin("un80")?
        .arg(&in_path)
        .arg("-o")
        .arg(&out_dir)
        .arg("-t")
        .assert()
        .success();

    let extracted = std::fs::read(out_dir.join("README.TXT"))?;
    assert_eq!(extracted, b"line one\nline two\n");
    Ok(())
}

#[test]
fn unrecognized_format_is_a_clean_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("mystery.bin");
    std::fs::write(&in_path, b"not a known magic")?;

    Command::cargo_bin("un80")?
        .arg(&in_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not determine file format"));
    Ok(())
}

#[test]
fn forced_format_overrides_detection() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("archive.dat");
    std::fs::write(&in_path, single_stored_arc("X.TXT", b"abc"))?;

    Command::cargo_bin("un80")?
        .arg("-l")
        .arg("-f")
        .arg("arc")
        .arg(&in_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("X.TXT"));
    Ok(())
}
