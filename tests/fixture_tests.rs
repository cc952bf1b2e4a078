//! Fixture-driven document tests.
//!
//! Each case under `tests/fixtures/<case>/` provides:
//! - `input.<ext>`    document passed to dustpan
//! - `expected.<ext>` exact text expected on stdout
//! - `case.toml`      extra arguments and stderr assertions

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;

#[derive(Debug, Deserialize)]
struct Case {
    #[serde(default)]
    args: Vec<String>,
    #[serde(default = "default_exit_code")]
    expect_exit: i32,
    #[serde(default)]
    stderr_contains: Vec<String>,
}

fn default_exit_code() -> i32 {
    0
}

#[test]
fn test_document_fixtures() {
    let root = Path::new("tests").join("fixtures");
    assert!(root.exists(), "Fixture root missing: {}", root.display());

    let mut case_dirs: Vec<PathBuf> = fs::read_dir(&root)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    case_dirs.sort();
    assert!(!case_dirs.is_empty(), "No fixture cases found");

    for case_dir in case_dirs {
        run_case(&case_dir);
    }
}

fn find_by_stem(dir: &Path, stem: &str) -> Option<PathBuf> {
    fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| path.file_stem().and_then(|s| s.to_str()) == Some(stem))
}

fn run_case(case_dir: &Path) {
    let case_name = case_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown-case>");

    let input = find_by_stem(case_dir, "input")
        .unwrap_or_else(|| panic!("Case '{}' is missing input.*", case_name));
    let expected = find_by_stem(case_dir, "expected")
        .unwrap_or_else(|| panic!("Case '{}' is missing expected.*", case_name));
    let case_path = case_dir.join("case.toml");

    let case: Case = toml::from_str(&fs::read_to_string(&case_path).unwrap_or_else(|e| {
        panic!(
            "Case '{}' failed to read {}: {}",
            case_name,
            case_path.display(),
            e
        )
    }))
    .unwrap_or_else(|e| panic!("Case '{}' has invalid case.toml: {}", case_name, e));

    // Run from a scratch directory so no .dustpan.toml is discovered
    let temp = tempfile::TempDir::new().unwrap();
    let file_name = input.file_name().unwrap().to_owned();
    fs::copy(&input, temp.path().join(&file_name)).unwrap();

    let mut args = case.args.clone();
    args.push(file_name.to_string_lossy().to_string());
    let output = run_dustpan(temp.path(), &args);

    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    assert_eq!(
        code, case.expect_exit,
        "Case '{}' exit code mismatch.\nstdout:\n{}\nstderr:\n{}",
        case_name, stdout, stderr
    );

    let expected_text = fs::read_to_string(&expected).unwrap();
    assert_eq!(
        stdout, expected_text,
        "Case '{}' output mismatch.\nstderr:\n{}",
        case_name, stderr
    );

    for needle in &case.stderr_contains {
        assert!(
            stderr.contains(needle),
            "Case '{}' expected stderr to contain {:?}.\nstderr:\n{}",
            case_name,
            needle,
            stderr
        );
    }

    // The input file itself is never modified without --in-place
    assert_eq!(
        fs::read_to_string(temp.path().join(&file_name)).unwrap(),
        fs::read_to_string(&input).unwrap(),
        "Case '{}' modified its input",
        case_name
    );
}

fn run_dustpan(cwd: &Path, args: &[String]) -> Output {
    let mut cmd = std::process::Command::new(env!("CARGO_BIN_EXE_dustpan"));
    cmd.current_dir(cwd)
        .env_remove("DUSTPAN_CONFIG")
        .env_remove("RUST_LOG")
        .args(args);

    cmd.output().unwrap_or_else(|e| {
        panic!(
            "Failed to execute dustpan in {} with args {:?}: {}",
            cwd.display(),
            args,
            e
        )
    })
}
