use similar::TextDiff;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_shm-meta");

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn expected(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("expected")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("missing {}: {}", path.display(), e))
}

/// Lay out `<tmp>/include/<header>` and return it with `<tmp>/gen/<output>`.
fn workspace(tmp: &TempDir, header: &str, output: &str) -> (PathBuf, PathBuf) {
    let include = tmp.path().join("include");
    fs::create_dir_all(&include).unwrap();
    let input = include.join(header);
    fs::copy(fixture(header), &input).unwrap();
    (input, tmp.path().join("gen").join(output))
}

fn run(input: &Path, output: &Path, extra: &[&str]) -> Output {
    Command::new(BIN)
        .env_remove("RUST_LOG")
        .env_remove("SHM_META_CLANG")
        .arg("--input")
        .arg(input)
        .arg("--output")
        .arg(output)
        .args(extra)
        .output()
        .expect("Failed to execute shm-meta")
}

fn assert_matches_expected(actual: &str, expected_name: &str) {
    let expected = expected(expected_name);
    if actual != expected {
        let diff = TextDiff::from_lines(expected.as_str(), actual);
        println!("=== FIXTURE: {} ===", expected_name);
        println!("{}", diff.unified_diff().header("expected", "actual"));
        panic!("Output mismatch for '{}'. See diff above.", expected_name);
    }
}

/// Generate from a pre-dumped AST and compare with the expected header
fn test_fixture(header: &str, ast: &str, mode: &str, expected_name: &str) -> Output {
    let tmp = TempDir::new().unwrap();
    let (input, output) = workspace(&tmp, header, expected_name);
    let ast_path = fixture(ast);

    let result = run(
        &input,
        &output,
        &["--mode", mode, "--ast-file", ast_path.to_str().unwrap()],
    );
    if !result.status.success() {
        panic!(
            "shm-meta failed on {}: {}",
            ast,
            String::from_utf8_lossy(&result.stderr)
        );
    }

    let actual = fs::read_to_string(&output).expect("output header not written");
    assert_matches_expected(&actual, expected_name);
    result
}

#[test]
fn test_shm_structs_json_fixture() {
    test_fixture(
        "shm_structs.h",
        "shm_structs.ast.json",
        "json",
        "shm_structs_meta.h",
    );
}

/// Clang's `` `- `` last-child connector reads one level shallower, so each
/// struct's final field is reported as an orphan instead of recorded.
#[test]
fn test_shm_structs_text_fixture() {
    let result = test_fixture(
        "shm_structs.h",
        "shm_structs.ast.txt",
        "text",
        "shm_structs_text_meta.h",
    );
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert_eq!(
        stderr.matches("skip field without owner").count(),
        4,
        "{}",
        stderr
    );
    assert_eq!(stderr.matches("skip field without owner count").count(), 2);
    assert!(stderr.contains("skip field without owner values"));
    assert!(stderr.contains("skip field without owner price"));
}

#[test]
fn test_auto_mode_detects_dump_format() {
    test_fixture(
        "shm_structs.h",
        "shm_structs.ast.json",
        "auto",
        "shm_structs_meta.h",
    );
    test_fixture(
        "shm_structs.h",
        "shm_structs.ast.txt",
        "auto",
        "shm_structs_text_meta.h",
    );
}

#[test]
fn test_demo_fixture_reports_bitfield_after_success() {
    let result = test_fixture("demo.h", "demo.ast.json", "json", "demo_meta.h");
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert_eq!(stderr.matches("skip bitfield").count(), 1, "{}", stderr);
    assert!(stderr.contains("skip bitfield demo::Packed::a"), "{}", stderr);
}

#[test]
fn test_empty_result_fails_distinctly() {
    let tmp = TempDir::new().unwrap();
    let (input, output) = workspace(&tmp, "shm_structs.h", "empty_meta.h");
    let ast = tmp.path().join("empty.ast.json");
    fs::write(&ast, r#"{"kind": "TranslationUnitDecl", "inner": []}"#).unwrap();

    let result = run(&input, &output, &["--ast-file", ast.to_str().unwrap()]);
    assert_eq!(result.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&result.stderr).contains("no structs found"));
    assert!(!output.exists());
}

#[test]
fn test_empty_result_still_reports_warnings() {
    let tmp = TempDir::new().unwrap();
    let (input, output) = workspace(&tmp, "shm_structs.h", "orphan_meta.h");
    let ast = tmp.path().join("orphan.ast.txt");
    fs::write(
        &ast,
        "TranslationUnitDecl 0x1\n|-FieldDecl 0x2 <a.h:1:1, col:5> col:5 stray 'int'\n",
    )
    .unwrap();

    let result = run(&input, &output, &["--mode", "text", "--ast-file", ast.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert_eq!(result.status.code(), Some(2));
    assert!(stderr.contains("skip field without owner stray"), "{}", stderr);
    assert!(stderr.contains("no structs found"), "{}", stderr);
    assert!(!output.exists());
}

#[test]
fn test_malformed_json_dump_fails() {
    let tmp = TempDir::new().unwrap();
    let (input, output) = workspace(&tmp, "shm_structs.h", "bad_meta.h");
    let ast = tmp.path().join("bad.ast.json");
    fs::write(&ast, r#"{"kind": "TranslationUnitDecl", "inner": ["#).unwrap();

    let result = run(&input, &output, &["--mode", "json", "--ast-file", ast.to_str().unwrap()]);
    assert_eq!(result.status.code(), Some(1));
    assert!(!output.exists());
}

#[test]
fn test_missing_clang_is_a_tool_failure() {
    let tmp = TempDir::new().unwrap();
    let (input, output) = workspace(&tmp, "shm_structs.h", "meta.h");

    let result = run(
        &input,
        &output,
        &["--clang", "/nonexistent/shm-meta-test-clang"],
    );
    assert!(!result.status.success());
    assert_ne!(result.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&result.stderr).contains("clang failed"));
}

#[test]
fn test_missing_argument() {
    let output = Command::new(BIN)
        .output()
        .expect("Failed to execute shm-meta");

    assert!(!output.status.success());
}

#[test]
fn test_fixture_json_is_valid() {
    for name in ["shm_structs.ast.json", "demo.ast.json"] {
        let content = fs::read_to_string(fixture(name)).expect("Failed to read JSON file");
        let _: serde_json::Value =
            serde_json::from_str(&content).unwrap_or_else(|e| panic!("Invalid JSON in {}: {}", name, e));
    }
}
