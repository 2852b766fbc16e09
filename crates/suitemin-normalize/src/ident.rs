use std::collections::HashMap;

use suitemin_ir::TestId;

pub const IDENT_MAP_FILE: &str = "tests-ident-map.csv";

/// Raw test name -> short identifier, in assignment order.
#[derive(Debug, Clone, Default)]
pub struct IdentMap {
    order: Vec<(TestId, String)>,
    by_name: HashMap<String, TestId>,
}

impl IdentMap {
    /// Assign `t1, t2, …` to the non-blank lines of an all-tests listing.
    /// A repeated name keeps its first identifier.
    pub fn build(all_tests: &str) -> Self {
        let mut map = Self::default();
        for raw in all_tests.lines() {
            let name = raw.trim();
            if name.is_empty() || map.by_name.contains_key(name) {
                continue;
            }
            let id = TestId::new(format!("t{}", map.order.len() + 1));
            map.by_name.insert(name.to_string(), id.clone());
            map.order.push((id, name.to_string()));
        }
        map
    }

    pub fn get(&self, name: &str) -> Option<&TestId> {
        self.by_name.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TestId, &str)> {
        self.order.iter().map(|(id, name)| (id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `id,test` CSV, readable back as a canonical test list.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("id,test\n");
        for (id, name) in &self.order {
            out.push_str(&format!("{id},{name}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_follow_listing_order() {
        let map = IdentMap::build("alpha\n\nbeta\nalpha\ngamma\n");
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("alpha").map(|t| t.as_str()), Some("t1"));
        assert_eq!(map.get("gamma").map(|t| t.as_str()), Some("t3"));
        assert_eq!(map.to_csv(), "id,test\nt1,alpha\nt2,beta\nt3,gamma\n");
    }
}
