use std::fs;
use std::path::Path;

use suitemin_ir::record::parse_test_list;
use suitemin_ir::{CostTable, CoverageTable};
use suitemin_normalize::{normalize, NormalizeError, NormalizeOptions, RequirementsStrategy};

fn write_inputs(dir: &Path, requirements: &str) -> NormalizeOptions {
    let all_tests = dir.join("all-tests.txt");
    let reqs = dir.join("requirements.csv");
    let violations = dir.join("violations.csv");
    let times = dir.join("times.csv");
    fs::write(&all_tests, "pkg.FooTest#testA\npkg.FooTest#testB\npkg.BarTest#testC\n").unwrap();
    fs::write(&reqs, requirements).unwrap();
    fs::write(
        &violations,
        "test,violations\npkg.FooTest#testB,NullCheck@12\npkg.BarTest#testC,NullCheck@12,Range@40\n",
    )
    .unwrap();
    fs::write(
        &times,
        "test,time(ns)\npkg.FooTest#testA,1200\npkg.FooTest#testB,800\npkg.Gone#test,5\npkg.BarTest#testC,300\n",
    )
    .unwrap();
    NormalizeOptions {
        all_tests,
        requirements: reqs,
        violations,
        times,
        out_dir: dir.join("project"),
        requirements_strategy: RequirementsStrategy::Interned,
    }
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn test_normalize_writes_all_outputs() {
    let tmp = tempfile::tempdir().unwrap();
    let options = write_inputs(
        tmp.path(),
        "pkg.FooTest#testA,Foo.java:10,Foo.java:11\npkg.FooTest#testB,Foo.java:11\npkg.BarTest#testC,\n",
    );
    let report = normalize(&options).unwrap();
    assert_eq!(report.tests, 3);
    assert_eq!(report.requirements, 2);
    assert_eq!(report.violations, 2);
    assert_eq!(report.timed_tests, 3);
    assert_eq!(report.written.len(), 6);

    let out = &options.out_dir;
    assert_eq!(
        read(out, "tests-ident-map.csv"),
        "id,test\nt1,pkg.FooTest#testA\nt2,pkg.FooTest#testB\nt3,pkg.BarTest#testC\n"
    );
    assert_eq!(read(out, "cov.info"), "t1:0 1 2\nt2:0 2\nt3:0\n");
    assert_eq!(
        read(out, "requirements-to-ident.csv"),
        "req,id\nFoo.java:10,1\nFoo.java:11,2\n"
    );
    assert_eq!(read(out, "fault.info"), "t2:0 1\nt3:0 1 2\n");
    assert_eq!(
        read(out, "violations-to-ident.csv"),
        "violation,id\nNullCheck@12,1\nRange@40,2\n"
    );
    assert_eq!(read(out, "rtime.info"), "t1:1200\nt2:800\nt3:300\n");
}

#[test]
fn test_outputs_are_formulator_readable() {
    let tmp = tempfile::tempdir().unwrap();
    let options = write_inputs(tmp.path(), "pkg.FooTest#testA,r1\npkg.BarTest#testC,r2,r1\n");
    normalize(&options).unwrap();
    let out = &options.out_dir;

    let coverage = CoverageTable::parse(&read(out, "cov.info")).unwrap();
    assert_eq!(coverage.distinct_items(), 3);
    let times = CostTable::parse(&read(out, "rtime.info")).unwrap();
    assert_eq!(times.total(), 2300);
    let tests = parse_test_list(&read(out, "tests-ident-map.csv"));
    let ids: Vec<&str> = tests.iter().map(|t| t.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2", "t3"]);
}

#[test]
fn test_legacy_requirements_strategy() {
    let tmp = tempfile::tempdir().unwrap();
    let mut options = write_inputs(tmp.path(), "pkg.FooTest#testA,tr4,tr7\npkg.FooTest#testB,tr7\n");
    options.requirements_strategy = RequirementsStrategy::LegacyTrSuffix;
    let report = normalize(&options).unwrap();
    assert_eq!(report.requirements, 2);
    assert_eq!(read(&options.out_dir, "cov.info"), "t1:4 7\nt2:7\n");
    assert!(!options.out_dir.join("requirements-to-ident.csv").exists());
}

#[test]
fn test_failed_conversion_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let mut options = write_inputs(tmp.path(), "pkg.FooTest#testA,bogus\n");
    options.requirements_strategy = RequirementsStrategy::LegacyTrSuffix;
    let err = normalize(&options).unwrap_err();
    assert!(matches!(err, NormalizeError::LegacyItem { .. }));
    assert!(!options.out_dir.exists());
}

#[test]
fn test_missing_input_reports_path() {
    let tmp = tempfile::tempdir().unwrap();
    let mut options = write_inputs(tmp.path(), "");
    options.times = tmp.path().join("nope.csv");
    let err = normalize(&options).unwrap_err();
    match err {
        NormalizeError::Io { path, .. } => assert!(path.ends_with("nope.csv")),
        other => panic!("unexpected error: {other}"),
    }
}
