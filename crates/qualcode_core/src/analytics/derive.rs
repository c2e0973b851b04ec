//! Pure derivations over the assignment table and audit log.
//!
//! Every function here is a total, side-effect-free function of its
//! arguments; `DerivedGraph` decides when to call them.

use crate::assignments::AssignmentTable;
use crate::audit::AuditLog;
use crate::model::{Code, CodeId, CodingAction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Stringified row id → codes assigned to that row, in code registry order.
pub type AssignmentsByRow = BTreeMap<String, Vec<CodeId>>;

/// Symmetric pair counts: `matrix[a][b]` rows carry both `a` and `b`.
pub type Cooccurrence = BTreeMap<CodeId, BTreeMap<CodeId, u32>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaturationTrend {
    ApproachingSaturation,
    Exploring,
}

impl Display for SaturationTrend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApproachingSaturation => f.write_str("Approaching saturation"),
            Self::Exploring => f.write_str("Exploring"),
        }
    }
}

/// Heuristic signal that new-code activity has slowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Saturation {
    pub total_codes: usize,
    pub recent_new_codes: usize,
    pub trend: SaturationTrend,
}

/// Window and threshold of the saturation heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaturationSettings {
    pub window: usize,
    pub threshold: usize,
}

/// Inverts the assignment table. Codes are visited in registry order, so
/// each row lists its codes in that order, each at most once, even when two
/// row ids stringify alike.
pub fn assignments_by_row(codes: &[Code], table: &AssignmentTable) -> AssignmentsByRow {
    let mut by_row = AssignmentsByRow::new();
    for code in codes {
        let Some(rows) = table.rows_for(&code.id) else {
            continue;
        };
        for row in rows {
            let listed = by_row.entry(row.to_string()).or_default();
            // Why: `Num(7)` and `Text("7")` share the key "7"; codes arrive in
            // registry order, so a repeat can only be the last entry.
            if listed.last() != Some(&code.id) {
                listed.push(code.id.clone());
            }
        }
    }
    by_row
}

/// Registry entries with `frequency` set to the live assignment count.
pub fn codes_with_frequency(codes: &[Code], table: &AssignmentTable) -> Vec<Code> {
    codes
        .iter()
        .map(|code| Code {
            frequency: table.frequency(&code.id),
            ..code.clone()
        })
        .collect()
}

/// Counts, for every unordered pair of distinct codes, the rows they share.
pub fn cooccurrence(by_row: &AssignmentsByRow) -> Cooccurrence {
    let mut matrix = Cooccurrence::new();
    for codes in by_row.values() {
        for (index, a) in codes.iter().enumerate() {
            for b in &codes[index + 1..] {
                if a == b {
                    continue;
                }
                *matrix.entry(a.clone()).or_default().entry(b.clone()).or_default() += 1;
                *matrix.entry(b.clone()).or_default().entry(a.clone()).or_default() += 1;
            }
        }
    }
    matrix
}

/// Counts `create` events in the log tail and classifies the trend.
pub fn saturation(codes: &[Code], log: &AuditLog, settings: SaturationSettings) -> Saturation {
    let recent_new_codes = log.count_recent(CodingAction::Create, settings.window);
    let trend = if recent_new_codes <= settings.threshold {
        SaturationTrend::ApproachingSaturation
    } else {
        SaturationTrend::Exploring
    };
    Saturation {
        total_codes: codes.len(),
        recent_new_codes,
        trend,
    }
}

#[cfg(test)]
mod tests {
    use super::{assignments_by_row, cooccurrence, SaturationTrend};
    use crate::assignments::AssignmentTable;
    use crate::model::{Code, CodeLevel, RowId};
    use chrono::Utc;

    fn code(id: &str) -> Code {
        Code {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            color: "#fff".to_string(),
            parent_id: None,
            level: CodeLevel::One,
            created_at: Utc::now(),
            created_by: None,
            frequency: 0,
            actor_type: None,
        }
    }

    #[test]
    fn by_row_follows_registry_order_not_assignment_order() {
        let codes = vec![code("code-a"), code("code-b")];
        let mut table = AssignmentTable::new();
        table.apply("code-b", &[RowId::Num(1)]);
        table.apply("code-a", &[RowId::Num(1)]);
        let by_row = assignments_by_row(&codes, &table);
        assert_eq!(by_row["1"], vec!["code-a", "code-b"]);
    }

    #[test]
    fn rows_with_equal_string_forms_list_each_code_once() {
        let codes = vec![code("code-a"), code("code-b")];
        let mut table = AssignmentTable::new();
        table.apply("code-a", &[RowId::Num(7), RowId::from("7")]);
        table.apply("code-b", &[RowId::from("7")]);
        let by_row = assignments_by_row(&codes, &table);
        assert_eq!(by_row["7"], vec!["code-a", "code-b"]);
        assert_eq!(cooccurrence(&by_row)["code-a"]["code-b"], 1);
    }

    #[test]
    fn three_codes_on_one_row_produce_three_symmetric_pairs() {
        let codes = vec![code("a"), code("b"), code("c")];
        let mut table = AssignmentTable::new();
        for id in ["a", "b", "c"] {
            table.apply(id, &[RowId::from("r")]);
        }
        let matrix = cooccurrence(&assignments_by_row(&codes, &table));
        for (x, y) in [("a", "b"), ("a", "c"), ("b", "c")] {
            assert_eq!(matrix[x][y], 1);
            assert_eq!(matrix[y][x], 1);
        }
        assert!(!matrix["a"].contains_key("a"));
    }

    #[test]
    fn trend_display_matches_ui_labels() {
        assert_eq!(
            SaturationTrend::ApproachingSaturation.to_string(),
            "Approaching saturation"
        );
        assert_eq!(SaturationTrend::Exploring.to_string(), "Exploring");
    }
}
