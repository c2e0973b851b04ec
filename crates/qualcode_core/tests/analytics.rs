use chrono::{TimeZone, Utc};
use qualcode_core::{
    Change, CodingStore, ManualClock, NewCode, RowId, SaturationTrend, StoreConfig, Topic,
};
use std::cell::RefCell;
use std::rc::Rc;

const ALL_TOPICS: [Topic; 12] = [
    Topic::Codes,
    Topic::Memos,
    Topic::Relations,
    Topic::Actors,
    Topic::ActorLinks,
    Topic::TemporalCodes,
    Topic::Assignments,
    Topic::Events,
    Topic::AssignmentsByRow,
    Topic::CodesWithFrequency,
    Topic::Cooccurrence,
    Topic::Saturation,
];

fn store_with(config: StoreConfig) -> CodingStore<ManualClock> {
    let start = Utc.with_ymd_and_hms(2024, 5, 6, 9, 30, 0).unwrap();
    CodingStore::with_clock(config, ManualClock::starting_at(start)).unwrap()
}

fn store() -> CodingStore<ManualClock> {
    store_with(StoreConfig::default())
}

fn rows(ids: &[i64]) -> Vec<RowId> {
    ids.iter().copied().map(RowId::Num).collect()
}

fn is_derived(topic: Topic) -> bool {
    matches!(
        topic,
        Topic::AssignmentsByRow
            | Topic::CodesWithFrequency
            | Topic::Cooccurrence
            | Topic::Saturation
    )
}

#[test]
fn shared_rows_count_once_per_pair_in_both_directions() {
    let mut store = store();
    let a = store.create_code(NewCode::named("A")).unwrap();
    let b = store.create_code(NewCode::named("B")).unwrap();
    store.apply_code(&a.id, &[RowId::from("7")]).unwrap();
    store.apply_code(&b.id, &[RowId::from("7")]).unwrap();
    assert_eq!(store.cooccurrence()[&a.id][&b.id], 1);
    assert_eq!(store.cooccurrence()[&b.id][&a.id], 1);

    store.apply_code(&a.id, &[RowId::from("8")]).unwrap();
    store.apply_code(&b.id, &[RowId::from("8")]).unwrap();
    let matrix = store.cooccurrence();
    assert_eq!(matrix[&a.id][&b.id], 2);
    assert_eq!(matrix[&b.id][&a.id], 2);
    assert!(!matrix[&a.id].contains_key(&a.id));
    assert_eq!(store.assignments_by_row()["8"], vec![a.id.clone(), b.id.clone()]);

    store.remove_code(&b.id, &[RowId::from("7"), RowId::from("8")]).unwrap();
    assert!(store.cooccurrence().is_empty());
}

#[test]
fn numeric_and_text_rows_with_one_key_list_each_code_once() {
    let mut store = store();
    let a = store.create_code(NewCode::named("A")).unwrap();
    let b = store.create_code(NewCode::named("B")).unwrap();
    store.apply_code(&a.id, &[RowId::Num(7), RowId::from("7")]).unwrap();
    store.apply_code(&b.id, &[RowId::from("7")]).unwrap();

    assert_eq!(store.frequency(&a.id), 2);
    assert_eq!(store.assignments_by_row()["7"], vec![a.id.clone(), b.id.clone()]);
    assert_eq!(store.cooccurrence()[&a.id][&b.id], 1);
    assert_eq!(store.cooccurrence()[&b.id][&a.id], 1);

    store.remove_code(&a.id, &[RowId::Num(7)]).unwrap();
    assert_eq!(store.assignments_by_row()["7"], vec![a.id.clone(), b.id.clone()]);
    assert_eq!(store.cooccurrence()[&a.id][&b.id], 1);
}

#[test]
fn three_recent_creates_read_as_exploring() {
    let mut store = store();
    for name in ["A", "B", "C"] {
        store.create_code(NewCode::named(name)).unwrap();
    }
    let saturation = store.saturation();
    assert_eq!(saturation.total_codes, 3);
    assert_eq!(saturation.recent_new_codes, 3);
    assert_eq!(saturation.trend, SaturationTrend::Exploring);
}

#[test]
fn two_recent_creates_read_as_approaching_saturation() {
    let mut store = store();
    store.create_code(NewCode::named("A")).unwrap();
    store.create_code(NewCode::named("B")).unwrap();
    assert_eq!(store.saturation().trend, SaturationTrend::ApproachingSaturation);
}

#[test]
fn saturation_only_inspects_the_trailing_window() {
    let mut store = store();
    let first = store.create_code(NewCode::named("A")).unwrap();
    store.create_code(NewCode::named("B")).unwrap();
    store.create_code(NewCode::named("C")).unwrap();
    assert_eq!(store.saturation().trend, SaturationTrend::Exploring);

    for row in 0..48 {
        store.apply_code(&first.id, &rows(&[row])).unwrap();
    }
    assert_eq!(store.events().len(), 51);

    let saturation = store.saturation();
    assert_eq!(saturation.total_codes, 3);
    assert_eq!(saturation.recent_new_codes, 2);
    assert_eq!(saturation.trend, SaturationTrend::ApproachingSaturation);
}

#[test]
fn saturation_settings_come_from_config() {
    let config = StoreConfig {
        saturation_window: 2,
        saturation_threshold: 0,
        ..StoreConfig::default()
    };
    let mut store = store_with(config);
    let code = store.create_code(NewCode::named("A")).unwrap();
    assert_eq!(store.saturation().trend, SaturationTrend::Exploring);

    store.apply_code(&code.id, &rows(&[1])).unwrap();
    store.apply_code(&code.id, &rows(&[2])).unwrap();
    assert_eq!(store.saturation().recent_new_codes, 0);
    assert_eq!(store.saturation().trend, SaturationTrend::ApproachingSaturation);
}

#[test]
fn observers_receive_propagated_values_after_sources() {
    let mut store = store();
    let code = store.create_code(NewCode::named("A")).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    for topic in ALL_TOPICS {
        let seen = Rc::clone(&seen);
        store.observe(topic, move |change| seen.borrow_mut().push(change.topic()));
    }
    let frequencies = Rc::new(RefCell::new(Vec::new()));
    {
        let frequencies = Rc::clone(&frequencies);
        store.observe(Topic::CodesWithFrequency, move |change| {
            if let Change::CodesWithFrequency(codes) = change {
                frequencies.borrow_mut().push(codes[0].frequency);
            }
        });
    }

    store.apply_code(&code.id, &rows(&[1, 2])).unwrap();

    let topics = seen.borrow().clone();
    assert_eq!(&topics[..2], &[Topic::Assignments, Topic::Events]);
    assert!(topics[2..].iter().all(|topic| is_derived(*topic)));
    assert!(topics.contains(&Topic::AssignmentsByRow));
    assert!(topics.contains(&Topic::CodesWithFrequency));
    assert!(!topics.contains(&Topic::Cooccurrence), "single-code rows share no pairs");
    assert_eq!(*frequencies.borrow(), vec![2]);
}

#[test]
fn no_op_assignment_change_only_notifies_events() {
    let mut store = store();
    let code = store.create_code(NewCode::named("A")).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    for topic in ALL_TOPICS {
        let seen = Rc::clone(&seen);
        store.observe(topic, move |change| seen.borrow_mut().push(change.topic()));
    }

    store.remove_code(&code.id, &rows(&[42])).unwrap();
    assert_eq!(*seen.borrow(), vec![Topic::Events]);
}

#[test]
fn unobserved_callbacks_stop_firing() {
    let mut store = store();
    let calls = Rc::new(RefCell::new(0_u32));
    let id = {
        let calls = Rc::clone(&calls);
        store.observe(Topic::Codes, move |_| *calls.borrow_mut() += 1)
    };

    store.create_code(NewCode::named("A")).unwrap();
    assert!(store.unobserve(id));
    store.create_code(NewCode::named("B")).unwrap();

    assert_eq!(*calls.borrow(), 1);
    assert!(!store.unobserve(id));
}
