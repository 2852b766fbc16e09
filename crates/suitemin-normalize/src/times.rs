//! Execution-time CSV -> `rtime.info`.

use std::collections::HashMap;

use suitemin_ir::CostTable;

use crate::ident::IdentMap;
use crate::normalize::NormalizeError;

pub const TEST_COLUMN: &str = "test";
pub const TIME_COLUMN: &str = "time(ns)";

/// Read the `test` and `time(ns)` columns. Rows for tests outside `idents`
/// are dropped; a repeated test keeps its position and its last time.
pub fn convert_times(text: &str, idents: &IdentMap) -> Result<CostTable, NormalizeError> {
    let mut lines = text.lines().enumerate();
    let header: Vec<&str> = lines
        .next()
        .map(|(_, h)| h.split(',').map(str::trim).collect())
        .unwrap_or_default();
    let column = |name: &'static str| {
        header
            .iter()
            .position(|h| *h == name)
            .ok_or(NormalizeError::MissingColumn { column: name })
    };
    let test_col = column(TEST_COLUMN)?;
    let time_col = column(TIME_COLUMN)?;

    let mut rows: Vec<(suitemin_ir::TestId, i64)> = Vec::new();
    let mut slot_of: HashMap<suitemin_ir::TestId, usize> = HashMap::new();
    for (idx, raw) in lines {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
        let field = |col: usize, column: &'static str| {
            fields
                .get(col)
                .copied()
                .ok_or(NormalizeError::ShortRow { line, column })
        };
        let Some(id) = idents.get(field(test_col, TEST_COLUMN)?) else {
            continue;
        };
        let raw_time = field(time_col, TIME_COLUMN)?;
        let time = raw_time
            .parse::<i64>()
            .map_err(|_| NormalizeError::InvalidTime {
                line,
                value: raw_time.to_string(),
            })?;
        match slot_of.get(id) {
            Some(&slot) => rows[slot].1 = time,
            None => {
                slot_of.insert(id.clone(), rows.len());
                rows.push((id.clone(), time));
            }
        }
    }

    let mut table = CostTable::new();
    for (id, time) in rows {
        table.push(id, time);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_located_by_name() {
        let idents = IdentMap::build("a\nb\n");
        let csv = "time(ns),suite,test\n120,s,b\n75,s,a\n9,s,unlisted\n";
        let table = convert_times(csv, &idents).unwrap();
        assert_eq!(table.to_info_string(), "t2:120\nt1:75\n");
    }

    #[test]
    fn test_repeated_test_keeps_position_and_last_time() {
        let idents = IdentMap::build("a\nb\n");
        let csv = "test,time(ns)\na,10\nb,20\na,30\n";
        let table = convert_times(csv, &idents).unwrap();
        assert_eq!(table.to_info_string(), "t1:30\nt2:20\n");
    }

    #[test]
    fn test_missing_column() {
        let idents = IdentMap::build("a\n");
        let err = convert_times("test,duration\na,3\n", &idents).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingColumn { column: "time(ns)" }));
    }

    #[test]
    fn test_non_integer_time() {
        let idents = IdentMap::build("a\n");
        let err = convert_times("test,time(ns)\na,1.5\n", &idents).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidTime { line: 2, .. }));
    }
}
