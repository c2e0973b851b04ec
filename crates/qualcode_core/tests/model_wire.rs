use chrono::{TimeZone, Utc};
use qualcode_core::{
    ActorType, Code, CodeLevel, CodeRelation, CodingAction, CodingEvent, MemoType, RelationType,
    RowId, TranslationType,
};
use serde_json::json;

fn sample_code() -> Code {
    Code {
        id: "code-1".to_string(),
        name: "Trust".to_string(),
        description: String::new(),
        color: "#1f77b4".to_string(),
        parent_id: None,
        level: CodeLevel::Two,
        created_at: Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap(),
        created_by: None,
        frequency: 0,
        actor_type: Some(ActorType::NonHuman),
    }
}

#[test]
fn code_serializes_camel_case_and_skips_absent_options() {
    let value = serde_json::to_value(sample_code()).unwrap();
    assert_eq!(value["level"], 2);
    assert_eq!(value["createdAt"], "2024-02-03T04:05:06Z");
    assert_eq!(value["actorType"], "non-human");
    assert!(value.get("parentId").is_none());
    assert!(value.get("createdBy").is_none());
}

#[test]
fn code_deserializes_without_frequency_and_rejects_bad_level() {
    let mut value = serde_json::to_value(sample_code()).unwrap();
    value.as_object_mut().unwrap().remove("frequency");
    let code: Code = serde_json::from_value(value.clone()).unwrap();
    assert_eq!(code, sample_code());

    value["level"] = json!(4);
    assert!(serde_json::from_value::<Code>(value).is_err());
}

#[test]
fn enum_wire_names_match_interchange_vocabulary() {
    assert_eq!(serde_json::to_value(MemoType::Methodological).unwrap(), "methodological");
    assert_eq!(serde_json::to_value(RelationType::IsA).unwrap(), "is-a");
    assert_eq!(
        serde_json::to_value(RelationType::AssociatesWith).unwrap(),
        "associates-with"
    );
    assert_eq!(serde_json::to_value(TranslationType::Enrolls).unwrap(), "enrolls");
    assert_eq!(serde_json::to_value(CodingAction::Split).unwrap(), "split");
}

#[test]
fn event_keeps_mixed_row_ids_as_json_scalars() {
    let event = CodingEvent::new(
        Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap(),
        CodingAction::Apply,
        "code-1",
        vec![RowId::Num(3), RowId::from("r-9")],
    )
    .with_notes("first pass");

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["dataPointIds"], json!([3, "r-9"]));
    assert_eq!(value["codeId"], "code-1");
    assert!(value.get("coder").is_none());

    let back: CodingEvent = serde_json::from_value(value).unwrap();
    assert_eq!(back, event);
}

#[test]
fn relation_strength_is_optional_on_the_wire() {
    let relation: CodeRelation = serde_json::from_value(json!({
        "id": "rel-1",
        "fromCode": "code-1",
        "toCode": "code-2",
        "relationType": "part-of",
    }))
    .unwrap();
    assert_eq!(relation.relation_type, RelationType::PartOf);
    assert_eq!(relation.strength, None);
    assert!(relation.touches("code-2"));
}
