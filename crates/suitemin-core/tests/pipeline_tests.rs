use std::fs;
use std::path::Path;

use suitemin_compiler::compile::CompileError;
use suitemin_compiler::writer::WriteError;
use suitemin_core::{run_formulation, PipelineError, Project};

const CONFIG: &str = include_str!("../../suitemin-ir/tests/fixtures/linear_so.json");

fn project(dir: &Path, config: &str) {
    fs::write(dir.join("config.json"), config).unwrap();
    fs::write(dir.join("cov.info"), "t1:1 2\nt2:2\nt3:3\n").unwrap();
    fs::write(dir.join("rtime.info"), "t1:100\nt2:300\nt3:50\n").unwrap();
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_formulation_writes_model() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path(), CONFIG);
    let report = run_formulation(tmp.path(), Path::new("config.json")).unwrap();
    assert_eq!(report.name, "linear_so");
    assert_eq!(report.written, vec![tmp.path().join("linear_so.lp_solve")]);

    let model = fs::read_to_string(tmp.path().join("linear_so.lp_solve")).unwrap();
    assert!(model.starts_with("/*objective function*/\nmin: "));
    assert!(model.contains("\nt1>=1;\nt1+t2>=1;\nt3>=1;\n"));
    assert!(model.contains("\n100 t1+300 t2+50 t3<=500;\n"));
    assert!(model.ends_with("int t1,t2,t3;\n"));
}

#[test]
fn test_compact_dialect_failure_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path(), &CONFIG.replace("lp_solve", "mints"));
    let before = files_in(tmp.path());
    let err = run_formulation(tmp.path(), Path::new("config.json")).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Compile(CompileError::Write(WriteError::NotSetCover { .. }))
    ));
    assert_eq!(files_in(tmp.path()), before);
}

#[test]
fn test_compact_dialect_writes_three_files() {
    let tmp = tempfile::tempdir().unwrap();
    let config = CONFIG
        .replace("lp_solve", "mints")
        .replace(
            r#",
        { "file": "rtime.info", "is_coefficient": true, "crio_type": "<=", "rhs": "500" }"#,
            "",
        );
    project(tmp.path(), &config);
    let report = run_formulation(tmp.path(), Path::new("config.json")).unwrap();
    assert_eq!(report.written.len(), 3);
    let absolute = fs::read_to_string(tmp.path().join("linear_so.absolute")).unwrap();
    assert_eq!(absolute, "b\n1\n1 0 0\nb\n1\n1 1 0\nb\n1\n0 0 1\n");
}

#[test]
fn test_missing_record_file() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path(), CONFIG);
    fs::remove_file(tmp.path().join("rtime.info")).unwrap();
    match run_formulation(tmp.path(), Path::new("config.json")).unwrap_err() {
        PipelineError::Io { path, .. } => assert!(path.ends_with("rtime.info")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_record_names_file() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path(), CONFIG);
    fs::write(tmp.path().join("rtime.info"), "t1:fast\n").unwrap();
    match run_formulation(tmp.path(), Path::new("config.json")).unwrap_err() {
        PipelineError::Record { file, .. } => assert_eq!(file, "rtime.info"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_config() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path(), "{ not json");
    assert!(matches!(
        run_formulation(tmp.path(), Path::new("config.json")),
        Err(PipelineError::Parse(_))
    ));
}

#[test]
fn test_tests_file_restricts_tests() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path(), &with_tests_file(CONFIG));
    fs::write(tmp.path().join("tests-ident-map.csv"), "id,test\nt1,a\nt3,c\n").unwrap();
    run_formulation(tmp.path(), Path::new("config.json")).unwrap();
    let model = fs::read_to_string(tmp.path().join("linear_so.lp_solve")).unwrap();
    assert!(model.ends_with("int t1,t3;\n"));
    assert!(!model.contains("t2"));
}

fn with_tests_file(config: &str) -> String {
    config.replace(
        r#""nonlinear": false,"#,
        r#""nonlinear": false, "tests_file": "tests-ident-map.csv","#,
    )
}

const FOUR_TESTS: &str = "id,test\nt1,a\nt2,b\nt3,c\nt4,d\n";

#[test]
fn test_listed_test_without_records_is_not_free() {
    let tmp = tempfile::tempdir().unwrap();
    project(tmp.path(), &with_tests_file(CONFIG));
    fs::write(tmp.path().join("tests-ident-map.csv"), FOUR_TESTS).unwrap();
    run_formulation(tmp.path(), Path::new("config.json")).unwrap();
    let model = fs::read_to_string(tmp.path().join("linear_so.lp_solve")).unwrap();
    assert!(model.contains("+0.000001 t4;\n"));
    assert!(model.ends_with("int t1,t2,t3,t4;\n"));
}

#[test]
fn test_compact_dialect_scores_listed_test_without_records() {
    let tmp = tempfile::tempdir().unwrap();
    let config = with_tests_file(&CONFIG.replace("lp_solve", "mints")).replace(
        r#",
        { "file": "rtime.info", "is_coefficient": true, "crio_type": "<=", "rhs": "500" }"#,
        "",
    );
    project(tmp.path(), &config);
    fs::write(tmp.path().join("tests-ident-map.csv"), FOUR_TESTS).unwrap();
    run_formulation(tmp.path(), Path::new("config.json")).unwrap();

    let relative = fs::read_to_string(tmp.path().join("linear_so.relative")).unwrap();
    let row: Vec<&str> = relative.lines().nth(1).unwrap().split(' ').collect();
    assert_eq!(row.len(), 4);
    assert_eq!(row[3], "1");
    let absolute = fs::read_to_string(tmp.path().join("linear_so.absolute")).unwrap();
    assert_eq!(absolute, "b\n1\n1 0 0 0\nb\n1\n1 1 0 0\nb\n1\n0 0 1 0\n");
}

#[test]
fn test_project_resolves_relative_paths() {
    let project = Project::new("/data/proj");
    assert_eq!(project.path("cov.info"), Path::new("/data/proj/cov.info"));
    assert_eq!(project.path("/abs/cov.info"), Path::new("/abs/cov.info"));
}
