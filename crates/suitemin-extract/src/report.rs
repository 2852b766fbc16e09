use std::collections::HashSet;
use std::fmt;

use suitemin_ir::{CostTable, CoverageTable, TestId};

/// One criterion measured over the original and the minimized suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriterionReport {
    pub label: String,
    pub original: i64,
    pub minimized: i64,
}

impl CriterionReport {
    /// Distinct items covered.
    pub fn coverage(label: &str, table: &CoverageTable, selected: &[TestId]) -> Self {
        let chosen: HashSet<&TestId> = selected.iter().collect();
        let minimized = table
            .iter()
            .filter(|(test, _)| chosen.contains(test))
            .flat_map(|(_, items)| items.iter())
            .collect::<HashSet<_>>()
            .len();
        Self {
            label: label.to_string(),
            original: table.distinct_items() as i64,
            minimized: minimized as i64,
        }
    }

    /// Summed values.
    pub fn cost(label: &str, table: &CostTable, selected: &[TestId]) -> Self {
        let minimized = selected.iter().filter_map(|t| table.value_of(t)).sum();
        Self {
            label: label.to_string(),
            original: table.total(),
            minimized,
        }
    }
}

impl fmt::Display for CriterionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} by original suite: {}", self.label, self.original)?;
        write!(f, "# {} by minimized suite: {}", self.label, self.minimized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<TestId> {
        names.iter().map(|n| TestId::new(*n)).collect()
    }

    #[test]
    fn test_coverage_counts_distinct_items() {
        let table = CoverageTable::parse("t1:1 2\nt2:2 3\nt3:4\n").unwrap();
        let report = CriterionReport::coverage("Statements", &table, &ids(&["t1", "t2"]));
        assert_eq!(report.original, 4);
        assert_eq!(report.minimized, 3);
    }

    #[test]
    fn test_cost_sums_selected_values() {
        let table = CostTable::parse("t1:10\nt2:5\nt3:1\n").unwrap();
        let report = CriterionReport::cost("Running time", &table, &ids(&["t3", "t1", "t9"]));
        assert_eq!(report.original, 16);
        assert_eq!(report.minimized, 11);
        assert_eq!(
            report.to_string(),
            "# Running time by original suite: 16\n# Running time by minimized suite: 11"
        );
    }
}
