use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;

const PROGRAM: &str = "\
FUNCTION DOUBLE(N)
RETURN N * 2
ENDFUNCTION
LET X = DOUBLE(21)
PRINT X
";

const EXPECTED: &str = "\
#include <stdio.h>

int DOUBLE(int N) {
  return N * 2;
}

int main() {
  int X = DOUBLE(21);
  printf(\"%d\\n\", X);
  return 0;
}
";

fn basic_c() -> Command {
    Command::cargo_bin("basic-c").unwrap()
}

#[test]
fn test_translates_file_to_output_path() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("program.bas");
    let output = dir.path().join("program.c");
    fs::write(&input, PROGRAM).unwrap();

    let result = basic_c().arg(&input).arg("-o").arg(&output).output().unwrap();

    assert!(result.status.success());
    assert_eq!(fs::read_to_string(&output).unwrap(), EXPECTED);
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Translation complete. Output written to"));
}

#[test]
fn test_default_output_is_output_c() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("program.bas");
    fs::write(&input, PROGRAM).unwrap();

    let result = basic_c()
        .current_dir(dir.path())
        .arg(&input)
        .output()
        .unwrap();

    assert!(result.status.success());
    assert_eq!(
        fs::read_to_string(dir.path().join("output.c")).unwrap(),
        EXPECTED
    );
}

#[test]
fn test_reads_stdin_and_writes_stdout() {
    let result = basic_c()
        .args(["-o", "-"])
        .write_stdin(PROGRAM)
        .output()
        .unwrap();

    assert!(result.status.success());
    assert_eq!(String::from_utf8(result.stdout).unwrap(), EXPECTED);
}

#[test]
fn test_strict_blocks_flag() {
    let result = basic_c()
        .args(["--strict-blocks", "-o", "-"])
        .write_stdin("ENDFUNCTION\n")
        .output()
        .unwrap();

    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert!(stdout.contains("  // Syntax error: ENDFUNCTION outside of function\n"));
}

#[test]
fn test_missing_input_file_fails() {
    let dir = tempdir().unwrap();
    let result = basic_c()
        .arg(dir.path().join("missing.bas"))
        .arg("-o")
        .arg(dir.path().join("out.c"))
        .output()
        .unwrap();

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Cannot read"));
}
