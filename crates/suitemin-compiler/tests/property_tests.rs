use proptest::prelude::*;

use suitemin_compiler::model::{Objective, Var};
use suitemin_compiler::writer::mints::read_indicator_rows;
use suitemin_compiler::{compile, formulate};
use suitemin_ir::parse::parse_config;
use suitemin_ir::record::RecordSet;
use suitemin_ir::types::RecordKind;

fn coverage_text(rows: &[Vec<u8>]) -> String {
    rows.iter()
        .enumerate()
        .map(|(i, items)| {
            let items: Vec<String> = items.iter().map(|x| x.to_string()).collect();
            format!("t{}:{}\n", i + 1, items.join(" "))
        })
        .collect()
}

fn config(direction: &str, invert: bool, format: &str) -> suitemin_ir::FormulatorConfig {
    parse_config(&format!(
        r#"{{
            "name": "prop",
            "relative_cria": [{{ "file": "cov.info", "weight": 1, "invert": {invert}, "is_dependent": true }}],
            "absolute_cria": [{{ "file": "cov.info", "is_coefficient": false }}],
            "min_or_max": "{direction}",
            "output_format": "{format}"
        }}"#
    ))
    .unwrap()
}

fn rows_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(0u8..12, 0..6), 1..20)
}

proptest! {
    #[test]
    fn test_linear_coefficients_never_zero(
        rows in rows_strategy(),
        max in any::<bool>(),
        invert in any::<bool>(),
    ) {
        let direction = if max { "max" } else { "min" };
        let mut records = RecordSet::new();
        records
            .insert_text("cov.info", RecordKind::Coverage, &coverage_text(&rows))
            .unwrap();
        let model = compile(&config(direction, invert, "lp_solve"), &records).unwrap();
        let Objective::Linear(table) = &model.objective else {
            panic!("expected a linear objective");
        };
        prop_assert_eq!(table.len(), rows.len());
        for (var, coeff) in table.iter() {
            prop_assert!(coeff != 0.0, "{} has a zero coefficient", var);
            prop_assert!(matches!(var, Var::Test(_)));
        }
    }

    #[test]
    fn test_mints_rows_match_set_cover(rows in rows_strategy()) {
        let mut records = RecordSet::new();
        records
            .insert_text("cov.info", RecordKind::Coverage, &coverage_text(&rows))
            .unwrap();
        let model = compile(&config("min", false, "mints"), &records).unwrap();
        let artifacts = formulate(&config("min", false, "mints"), &records).unwrap();
        let indicator = read_indicator_rows(&artifacts[2].contents).unwrap();
        prop_assert_eq!(indicator.len(), model.constraints.len());
        for (row, constraint) in indicator.iter().zip(&model.constraints) {
            let selected: Vec<String> = row
                .iter()
                .enumerate()
                .filter(|(_, set)| **set)
                .map(|(i, _)| format!("t{}", i + 1))
                .collect();
            let expected: Vec<String> = constraint
                .set_cover_tests()
                .unwrap()
                .into_iter()
                .map(|t| t.to_string())
                .collect();
            prop_assert_eq!(selected, expected);
        }
    }
}
