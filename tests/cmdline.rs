#![cfg(not(target_arch = "wasm32"))]

use assert_cmd::{crate_name, Command};
use std::io::Write;
use svgpathops::cli::{run, Config};
use tempfile::NamedTempFile;

#[test]
fn test_cmdline_no_args() {
    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    cmd.assert().failure().code(2);
}

#[test]
fn test_cmdline_help() {
    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    let output = String::from_utf8(cmd.arg("-h").assert().success().get_output().stdout.clone())
        .expect("non-UTF8");
    assert!(output.contains("Usage"));
    assert!(output.contains("point-at-length"));
}

#[test]
fn test_cmdline_stdin() {
    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    cmd.arg("relative")
        .write_stdin("M10 10L20 20H5\n")
        .assert()
        .success()
        .stdout("M10 10l10 10h-15\n");

    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    cmd.args(["transform", "--translate", "5,5", "--origin", "0,0"])
        .write_stdin("M0 0L10 0")
        .assert()
        .success()
        .stdout("M5 5H15\n");

    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    cmd.args(["bbox", "--json"])
        .write_stdin("M0 0L10 0L10 10")
        .assert()
        .success()
        .stdout(r#"{"x":0.0,"y":0.0,"width":10.0,"height":10.0,"x2":10.0,"y2":10.0,"cx":5.0,"cy":5.0}"#.to_owned() + "\n");
}

#[test]
fn test_cmdline_path_per_line() {
    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    cmd.arg("absolute")
        .write_stdin("M0 0l10 10\n\nm5 5h1\n")
        .assert()
        .success()
        .stdout("M0 0L10 10\nM5 5H6\n");

    // a bad line fails the run after earlier lines were answered
    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    let output = cmd
        .arg("length")
        .write_stdin("M0 0H3\nH5\n")
        .assert()
        .failure()
        .get_output()
        .clone();
    assert_eq!(String::from_utf8(output.stdout).expect("non-UTF8"), "3\n");
    assert!(String::from_utf8(output.stderr)
        .expect("non-UTF8")
        .contains("line 2"));
}

#[test]
fn test_cmdline_invalid_path() {
    let mut cmd = Command::cargo_bin(crate_name!()).unwrap();
    let output = cmd
        .arg("absolute")
        .write_stdin("M0 0 L")
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8(output).expect("non-UTF8");
    assert!(stderr.contains("InvalidPathSyntax"));
}

#[test]
fn test_cmdline_config() {
    let config = Config::from_cmdline(&format!("{} --help", crate_name!()));
    assert!(config.is_err());

    let mut infile = NamedTempFile::new().expect("could not create tmpfile");
    write!(infile, "M0 0h10v10h-10z").expect("tmpfile write failed");
    let outfile = NamedTempFile::new().expect("could not create outfile");
    let config = Config::from_cmdline(&format!(
        "{} length {} -o {}",
        crate_name!(),
        infile.path().to_str().unwrap(),
        outfile.path().to_str().unwrap()
    ))
    .expect("cmdline should be valid");
    run(config).expect("run failed");
    let output = std::fs::read_to_string(outfile.path()).expect("output should be readable");
    assert_eq!(output, "40\n");

    // refuse to overwrite the input
    let config = Config::from_cmdline(&format!(
        "{} length {} -o {}",
        crate_name!(),
        infile.path().to_str().unwrap(),
        infile.path().to_str().unwrap()
    ));
    assert!(config.is_err());
}
