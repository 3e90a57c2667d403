use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

use tempfile::TempDir;

fn bfc(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bfc"))
        .current_dir(dir)
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("bfc should start")
}

#[test]
fn unbalanced_file_fails_without_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.bf"), "comment line\n  +[>+<-]]\n").unwrap();

    let run = bfc(dir.path(), &["bad.bf", "-o", "out.c"]);

    let stderr = String::from_utf8_lossy(&run.stderr);
    assert!(!run.status.success());
    assert!(stderr.contains("Error"), "{stderr}");
    assert!(stderr.contains("failed to compile bad.bf"), "{stderr}");
    assert!(stderr.contains("unmatched `]` at line 2, column 10"), "{stderr}");
    assert!(!dir.path().join("out.c").exists());
    assert!(run.stdout.is_empty());
}

#[test]
fn writes_c_to_the_output_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("two.bf"), "++ print it .").unwrap();

    let run = bfc(dir.path(), &["two.bf", "-o", "out.c"]);

    assert!(run.status.success(), "{}", String::from_utf8_lossy(&run.stderr));
    assert!(run.stdout.is_empty());
    let c = fs::read_to_string(dir.path().join("out.c")).unwrap();
    assert!(c.starts_with("/* brainfuck code\n * from the file \"two.bf\"\n"), "{c}");
    assert!(c.contains("#define TAPE_LENGTH 65535\n"));
    assert!(c.ends_with("    p = mem;\n    *p += 2;\n    putchar(*p);\n    return 0;\n}\n"), "{c}");
}

#[test]
fn emits_to_stdout_by_default() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("two.bf"), "++.").unwrap();

    let run = bfc(dir.path(), &["two.bf", "--tape-length", "30000"]);

    assert!(run.status.success());
    let c = String::from_utf8(run.stdout).unwrap();
    assert!(c.contains("#define TAPE_LENGTH 30000\n"), "{c}");
}

#[test]
fn empty_tape_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("two.bf"), "++.").unwrap();

    let run = bfc(dir.path(), &["two.bf", "--tape-length", "0", "-o", "out.c"]);

    assert!(!run.status.success());
    assert!(String::from_utf8_lossy(&run.stderr).contains("the tape needs at least one cell"));
    assert!(!dir.path().join("out.c").exists());
}

#[test]
fn missing_file() {
    let dir = TempDir::new().unwrap();

    let run = bfc(dir.path(), &["nowhere.bf"]);

    assert!(!run.status.success());
    assert!(String::from_utf8_lossy(&run.stderr).contains("failed to read nowhere.bf"));
}
