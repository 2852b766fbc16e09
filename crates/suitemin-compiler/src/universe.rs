use suitemin_ir::record::RecordSet;
use suitemin_ir::types::{FormulatorConfig, RecordKind};

use crate::compile::CompileError;
use crate::model::TestUniverse;

/// Build the canonical test set.
///
/// An explicit test list wins. Otherwise every test heading a line of any
/// criterion file is canonical, in first-seen order over the files the config
/// reads (relative criteria first).
pub fn canonical_tests(
    config: &FormulatorConfig,
    records: &RecordSet,
) -> Result<TestUniverse, CompileError> {
    if let Some(list) = &records.test_list {
        return Ok(list.iter().collect());
    }

    let mut universe = TestUniverse::new();
    for (file, kind) in config.record_requirements() {
        match kind {
            RecordKind::Coverage => {
                for test in coverage(records, &file)?.tests() {
                    universe.insert(test);
                }
            }
            RecordKind::Cost => {
                for test in costs(records, &file)?.tests() {
                    universe.insert(test);
                }
            }
        }
    }
    Ok(universe)
}

pub(crate) fn coverage<'a>(
    records: &'a RecordSet,
    file: &str,
) -> Result<&'a suitemin_ir::CoverageTable, CompileError> {
    records
        .coverage(file)
        .ok_or_else(|| CompileError::MissingRecords {
            file: file.to_string(),
            kind: RecordKind::Coverage,
        })
}

pub(crate) fn costs<'a>(
    records: &'a RecordSet,
    file: &str,
) -> Result<&'a suitemin_ir::CostTable, CompileError> {
    records.costs(file).ok_or_else(|| CompileError::MissingRecords {
        file: file.to_string(),
        kind: RecordKind::Cost,
    })
}
