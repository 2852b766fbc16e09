//! Requirement and violation listings -> coverage records.
//!
//! Raw lines read `test,item,item,…`. Two conversions exist:
//!
//! - [`convert_interned`]: items are interned to `1, 2, …` in first-seen
//!   order and every test also covers the placeholder item `0`, so a test
//!   with nothing listed still contributes a non-empty formula.
//! - [`convert_legacy_requirements`]: items are `tr<k>` and become `k`.

use std::collections::HashMap;
use std::convert::Infallible;

use suitemin_ir::CoverageTable;

use crate::ident::IdentMap;
use crate::normalize::NormalizeError;

pub const PLACEHOLDER_ITEM: &str = "0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Requirements,
    Violations,
}

impl Dimension {
    pub fn info_file(self) -> &'static str {
        match self {
            Dimension::Requirements => "cov.info",
            Dimension::Violations => "fault.info",
        }
    }

    pub fn mapping_file(self) -> &'static str {
        match self {
            Dimension::Requirements => "requirements-to-ident.csv",
            Dimension::Violations => "violations-to-ident.csv",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Dimension::Requirements => "req",
            Dimension::Violations => "violation",
        }
    }

    /// Violation listings start with a header row.
    fn has_header(self) -> bool {
        matches!(self, Dimension::Violations)
    }
}

/// Interned contents, in assignment order.
#[derive(Debug, Clone, Default)]
pub struct ContentIdents {
    order: Vec<(String, String)>,
    by_content: HashMap<String, String>,
}

impl ContentIdents {
    fn intern(&mut self, content: &str) -> String {
        if let Some(id) = self.by_content.get(content) {
            return id.clone();
        }
        let id = (self.order.len() + 1).to_string();
        self.by_content.insert(content.to_string(), id.clone());
        self.order.push((content.to_string(), id.clone()));
        id
    }

    pub fn get(&self, content: &str) -> Option<&str> {
        self.by_content.get(content).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ConvertedDimension {
    pub dimension: Dimension,
    pub records: CoverageTable,
    pub contents: ContentIdents,
}

impl ConvertedDimension {
    /// `<label>,id` CSV of the interned contents.
    pub fn mapping_csv(&self) -> String {
        let mut out = format!("{},id\n", self.dimension.label());
        for (content, id) in &self.contents.order {
            out.push_str(&format!("{content},{id}\n"));
        }
        out
    }
}

/// Raw lines grouped per test, first-seen order. `convert` runs on every
/// line in file order, overwritten lines included, and a repeated test keeps
/// its position with the result of its last line.
fn group_lines<'t, T, E>(
    text: &'t str,
    skip_header: bool,
    mut convert: impl FnMut(Vec<&'t str>) -> Result<T, E>,
) -> Result<Vec<(&'t str, T)>, E> {
    let mut rows: Vec<(&str, T)> = Vec::new();
    let mut slot_of: HashMap<&str, usize> = HashMap::new();
    let lines = text.lines().skip(usize::from(skip_header));
    for raw in lines {
        let mut fields = raw.trim().split(',');
        let test = fields.next().unwrap_or("").trim();
        if test.is_empty() {
            continue;
        }
        let items: Vec<&str> = fields.map(str::trim).filter(|c| !c.is_empty()).collect();
        let converted = convert(items)?;
        match slot_of.get(test) {
            Some(&slot) => rows[slot].1 = converted,
            None => {
                slot_of.insert(test, rows.len());
                rows.push((test, converted));
            }
        }
    }
    Ok(rows)
}

/// Interning conversion. Contents of tests outside `idents`, and of lines a
/// repeated test later replaces, are still interned so identifiers follow
/// the raw file order.
pub fn convert_interned(text: &str, dimension: Dimension, idents: &IdentMap) -> ConvertedDimension {
    let mut contents = ContentIdents::default();
    let grouped = group_lines(text, dimension.has_header(), |items| {
        let ids: Vec<String> = std::iter::once(PLACEHOLDER_ITEM.to_string())
            .chain(items.iter().map(|item| contents.intern(item)))
            .collect();
        Ok::<_, Infallible>(ids)
    });
    let rows = match grouped {
        Ok(rows) => rows,
        Err(never) => match never {},
    };

    let mut records = CoverageTable::new();
    let mut skipped = 0usize;
    for (test, ids) in rows {
        match idents.get(test) {
            Some(id) => records.push(id.clone(), ids),
            None => skipped += 1,
        }
    }
    tracing::debug!(
        file = dimension.info_file(),
        tests = records.len(),
        items = contents.len(),
        skipped,
        "converted dimension"
    );
    ConvertedDimension {
        dimension,
        records,
        contents,
    }
}

/// `tr<k>` conversion for requirement listings.
pub fn convert_legacy_requirements(
    text: &str,
    idents: &IdentMap,
) -> Result<CoverageTable, NormalizeError> {
    let rows = group_lines(text, false, |items| {
        items.into_iter().map(legacy_item).collect::<Result<Vec<_>, _>>()
    })?;
    let mut records = CoverageTable::new();
    for (test, ids) in rows {
        if let Some(id) = idents.get(test) {
            records.push(id.clone(), ids);
        }
    }
    Ok(records)
}

fn legacy_item(item: &str) -> Result<String, NormalizeError> {
    let invalid = || NormalizeError::LegacyItem {
        item: item.to_string(),
    };
    let digits = item.strip_prefix("tr").ok_or_else(invalid)?;
    let k: u64 = digits.parse().map_err(|_| invalid())?;
    Ok(k.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idents() -> IdentMap {
        IdentMap::build("a\nb\nc\n")
    }

    #[test]
    fn test_interned_requirements() {
        let out = convert_interned("a,x,y\nb,y\nc,\n", Dimension::Requirements, &idents());
        assert_eq!(out.records.to_info_string(), "t1:0 1 2\nt2:0 2\nt3:0\n");
        assert_eq!(out.mapping_csv(), "req,id\nx,1\ny,2\n");
    }

    #[test]
    fn test_violations_skip_header() {
        let out = convert_interned("test,violations\nb,v9\n", Dimension::Violations, &idents());
        assert_eq!(out.records.to_info_string(), "t2:0 1\n");
        assert_eq!(out.mapping_csv(), "violation,id\nv9,1\n");
    }

    #[test]
    fn test_unknown_tests_are_not_written_but_interned() {
        let out = convert_interned("zz,x\na,y\n", Dimension::Requirements, &idents());
        assert_eq!(out.records.to_info_string(), "t1:0 2\n");
        assert_eq!(out.contents.get("x"), Some("1"));
    }

    #[test]
    fn test_repeated_test_takes_last_line() {
        let out = convert_interned("a,x\nb,y\na,z\n", Dimension::Requirements, &idents());
        assert_eq!(out.records.to_info_string(), "t1:0 3\nt2:0 2\n");
        assert_eq!(out.mapping_csv(), "req,id\nx,1\ny,2\nz,3\n");
    }

    #[test]
    fn test_legacy_rejects_item_on_replaced_line() {
        let err = convert_legacy_requirements("a,bad\na,tr1\n", &idents()).unwrap_err();
        assert!(matches!(err, NormalizeError::LegacyItem { item } if item == "bad"));
    }

    #[test]
    fn test_legacy_strips_prefix() {
        let out = convert_legacy_requirements("a,tr3,tr010\nb,\n", &idents()).unwrap();
        assert_eq!(out.to_info_string(), "t1:3 10\nt2:\n");
    }

    #[test]
    fn test_legacy_rejects_other_items() {
        let err = convert_legacy_requirements("a,req3\n", &idents()).unwrap_err();
        assert!(matches!(err, NormalizeError::LegacyItem { item } if item == "req3"));
    }
}
