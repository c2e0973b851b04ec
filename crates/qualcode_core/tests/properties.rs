//! Property tests for derived analytics and assignment set semantics.

use qualcode_core::analytics::derive::{assignments_by_row, cooccurrence};
use qualcode_core::{CodeId, CodingStore, NewCode, RowId};
use proptest::prelude::*;
use std::collections::BTreeSet;

const CODE_COUNT: usize = 4;

#[derive(Clone, Debug)]
enum Op {
    Apply { code: usize, rows: Vec<RowId> },
    Remove { code: usize, rows: Vec<RowId> },
    Merge { source: usize, target: usize },
}

/// Numeric and text ids over one small key space, so `Num(n)` and
/// `Text("n")` collide once stringified.
fn row_strategy() -> impl Strategy<Value = RowId> {
    prop_oneof![
        (0i64..8).prop_map(RowId::Num),
        (0i64..8).prop_map(|n| RowId::Text(n.to_string())),
    ]
}

fn rows_strategy() -> impl Strategy<Value = Vec<RowId>> {
    proptest::collection::vec(row_strategy(), 0..4)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..CODE_COUNT, rows_strategy()).prop_map(|(code, rows)| Op::Apply { code, rows }),
        2 => (0..CODE_COUNT, rows_strategy()).prop_map(|(code, rows)| Op::Remove { code, rows }),
        1 => (0..CODE_COUNT, 0..CODE_COUNT).prop_map(|(source, target)| Op::Merge { source, target }),
    ]
}

fn seeded_store() -> (CodingStore, Vec<CodeId>) {
    let mut store: CodingStore = CodingStore::default();
    let ids = (0..CODE_COUNT)
        .map(|index| {
            store
                .create_code(NewCode::named(format!("code {index}")))
                .unwrap_or_else(|e| panic!("create code failed: {e}"))
                .id
        })
        .collect();
    (store, ids)
}

fn rows_of(store: &CodingStore, code_id: &str) -> BTreeSet<RowId> {
    store
        .assignments()
        .rows_for(code_id)
        .cloned()
        .unwrap_or_default()
}

fn run(store: &mut CodingStore, ids: &[CodeId], op: &Op) {
    let result = match op {
        Op::Apply { code, rows } => store.apply_code(&ids[*code], rows),
        Op::Remove { code, rows } => store.remove_code(&ids[*code], rows),
        Op::Merge { source, target } if source != target => store
            .merge_codes(&ids[*source], &ids[*target])
            .map(|_| ()),
        Op::Merge { .. } => Ok(()),
    };
    result.unwrap_or_else(|e| panic!("{op:?} failed: {e}"));
}

proptest! {
    #[test]
    fn prop_derived_values_replay_from_assignment_table(ops in proptest::collection::vec(op_strategy(), 0..24)) {
        let (mut store, ids) = seeded_store();
        for op in &ops {
            run(&mut store, &ids, op);

            let replayed = assignments_by_row(store.codes(), store.assignments());
            prop_assert_eq!(store.assignments_by_row(), &replayed);
            prop_assert_eq!(store.cooccurrence(), &cooccurrence(&replayed));

            for listed in store.assignments_by_row().values() {
                let unique: BTreeSet<&CodeId> = listed.iter().collect();
                prop_assert_eq!(unique.len(), listed.len());
            }

            for code in store.codes_with_frequency() {
                prop_assert_eq!(code.frequency, rows_of(&store, &code.id).len());
            }

            for (a, row) in store.cooccurrence() {
                for (b, count) in row {
                    prop_assert_ne!(a, b);
                    prop_assert_eq!(store.cooccurrence()[b][a], *count);
                }
            }
        }
    }

    #[test]
    fn prop_apply_is_idempotent(code in 0..CODE_COUNT, rows in rows_strategy()) {
        let (mut store, ids) = seeded_store();
        store.apply_code(&ids[code], &rows).unwrap();
        let once = store.assignments().clone();
        store.apply_code(&ids[code], &rows).unwrap();
        prop_assert_eq!(store.assignments(), &once);
    }

    #[test]
    fn prop_merge_preserves_row_membership(
        source_rows in rows_strategy(),
        target_rows in rows_strategy(),
    ) {
        let (mut store, ids) = seeded_store();
        store.apply_code(&ids[0], &source_rows).unwrap();
        store.apply_code(&ids[1], &target_rows).unwrap();
        let expected: BTreeSet<RowId> = rows_of(&store, &ids[0])
            .union(&rows_of(&store, &ids[1]))
            .cloned()
            .collect();

        store.merge_codes(&ids[0], &ids[1]).unwrap();
        prop_assert!(rows_of(&store, &ids[0]).is_empty());
        prop_assert_eq!(rows_of(&store, &ids[1]), expected);
    }
}
