use chrono::NaiveDate;
use contacts_core::{
    Contact, ContactCreate, ContactUpdate, ContactValidationError, RelationshipStatus,
    ValidationRule,
};
use uuid::Uuid;

#[test]
fn create_applies_defaults_and_trims_required_fields() {
    let draft = ContactCreate::new("  Juan Pérez ", " juan@x.com", "+1514 ")
        .validate()
        .unwrap();

    assert_eq!(draft.name, "Juan Pérez");
    assert_eq!(draft.email, "juan@x.com");
    assert_eq!(draft.phone, "+1514");
    assert_eq!(draft.relationship_status, RelationshipStatus::Prospect);
    assert!(draft.tags.is_empty());
    assert_eq!(draft.notes, "");
    assert_eq!(draft.company, None);
    assert_eq!(draft.last_contact_date, None);
}

#[test]
fn create_rejects_each_missing_required_field() {
    for (input, field) in [
        (ContactCreate::new("", "a@a.com", "1"), "name"),
        (ContactCreate::new("A", "  ", "1"), "email"),
        (ContactCreate::new("A", "a@a.com", ""), "phone"),
    ] {
        let err = input.validate().unwrap_err();
        assert_eq!(err, ContactValidationError::new(field, ValidationRule::Required));
    }
}

#[test]
fn create_from_json_without_email_names_the_email_field() {
    let input: ContactCreate = serde_json::from_value(serde_json::json!({
        "name": "Juan",
        "phone": "+1514"
    }))
    .unwrap();

    let err = input.validate().unwrap_err();
    assert_eq!(err.field, "email");
    assert_eq!(err.rule, ValidationRule::Required);
    assert_eq!(err.to_string(), "email is required");
}

#[test]
fn create_rejects_malformed_email() {
    let err = ContactCreate::new("A", "not-an-email", "1")
        .validate()
        .unwrap_err();
    assert_eq!(err.field, "email");
    assert!(matches!(err.rule, ValidationRule::InvalidEmail(_)));
}

#[test]
fn create_rejects_unknown_relationship_status() {
    let mut input = ContactCreate::new("A", "a@a.com", "1");
    input.relationship_status = Some("friend".to_string());

    let err = input.validate().unwrap_err();
    assert_eq!(err.field, "relationship_status");
    assert_eq!(
        err.rule,
        ValidationRule::UnknownRelationshipStatus("friend".to_string())
    );
}

#[test]
fn create_keeps_blank_tags_verbatim() {
    let mut input = ContactCreate::new("A", "a@a.com", "1");
    input.tags = vec!["ok".to_string(), "".to_string(), " ".to_string()];
    let draft = input.validate().unwrap();
    assert_eq!(draft.tags, vec!["ok", "", " "]);

    let patch = ContactUpdate {
        tags: Some(vec![String::new()]),
        ..ContactUpdate::default()
    }
    .validate()
    .unwrap();
    assert_eq!(patch.tags, Some(vec![String::new()]));
}

#[test]
fn create_rejects_impossible_dates() {
    let mut input = ContactCreate::new("A", "a@a.com", "1");
    input.last_contact_date = Some("2024-02-30".to_string());
    let err = input.validate().unwrap_err();
    assert_eq!(err.field, "last_contact_date");
}

#[test]
fn create_keeps_tag_order_and_duplicates() {
    let mut input = ContactCreate::new("A", "a@a.com", "1");
    input.tags = vec!["b".to_string(), "a".to_string(), "b".to_string()];
    let draft = input.validate().unwrap();
    assert_eq!(draft.tags, vec!["b", "a", "b"]);
}

#[test]
fn update_validates_only_present_fields() {
    let patch = ContactUpdate {
        company: Some("InnovaAI".to_string()),
        ..ContactUpdate::default()
    }
    .validate()
    .unwrap();
    assert_eq!(patch.company, Some(Some("InnovaAI".to_string())));
    assert_eq!(patch.name, None);
    assert_eq!(patch.email, None);

    let err = ContactUpdate {
        email: Some("broken@".to_string()),
        ..ContactUpdate::default()
    }
    .validate()
    .unwrap_err();
    assert_eq!(err.field, "email");

    let err = ContactUpdate {
        name: Some("   ".to_string()),
        ..ContactUpdate::default()
    }
    .validate()
    .unwrap_err();
    assert_eq!(err, ContactValidationError::new("name", ValidationRule::Required));
}

#[test]
fn empty_update_yields_empty_patch() {
    let patch = ContactUpdate::default().validate().unwrap();
    assert!(patch.is_empty());
}

#[test]
fn apply_patch_changes_only_present_fields_and_clears_blank_optionals() {
    let mut contact = sample_contact();
    let before = contact.clone();
    let patch = ContactUpdate {
        company: Some("".to_string()),
        relationship_status: Some("active".to_string()),
        last_contact_date: Some("2025-03-14".to_string()),
        ..ContactUpdate::default()
    }
    .validate()
    .unwrap();

    contact.apply_patch(&patch);

    assert_eq!(contact.company, None);
    assert_eq!(contact.relationship_status, RelationshipStatus::Active);
    assert_eq!(
        contact.last_contact_date,
        NaiveDate::from_ymd_opt(2025, 3, 14)
    );
    assert_eq!(contact.id, before.id);
    assert_eq!(contact.name, before.name);
    assert_eq!(contact.tags, before.tags);
    assert_eq!(contact.notes, before.notes);
}

#[test]
fn contact_serialization_uses_expected_wire_fields() {
    let mut contact = sample_contact();
    contact.last_contact_date = NaiveDate::from_ymd_opt(2025, 1, 31);

    let json = serde_json::to_value(&contact).unwrap();
    assert_eq!(json["id"], contact.id.to_string());
    assert_eq!(json["name"], "Juan Pérez");
    assert_eq!(json["tags"], serde_json::json!(["ai", "startup"]));
    assert_eq!(json["relationship_status"], "prospect");
    assert_eq!(json["last_contact_date"], "2025-01-31");
    assert_eq!(json["linkedin"], serde_json::Value::Null);

    let decoded: Contact = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, contact);
}

#[test]
fn relationship_status_parses_known_values_only() {
    assert_eq!(
        "active".parse::<RelationshipStatus>().unwrap(),
        RelationshipStatus::Active
    );
    assert_eq!(
        " inactive ".parse::<RelationshipStatus>().unwrap(),
        RelationshipStatus::Inactive
    );
    assert_eq!(
        "prospect".parse::<RelationshipStatus>().unwrap(),
        RelationshipStatus::Prospect
    );
    assert!("Active".parse::<RelationshipStatus>().is_err());
}

fn sample_contact() -> Contact {
    Contact {
        id: Uuid::new_v4(),
        name: "Juan Pérez".to_string(),
        email: "juan@x.com".to_string(),
        phone: "+1514".to_string(),
        company: Some("Acme".to_string()),
        position: None,
        linkedin: None,
        tags: vec!["ai".to_string(), "startup".to_string()],
        notes: "intro call".to_string(),
        last_contact_date: None,
        relationship_status: RelationshipStatus::Prospect,
    }
}
