use contacts_core::db::open_db_in_memory;
use contacts_core::{
    Contact, ContactCreate, ContactQuery, ContactRepository, ContactService, ContactServiceError,
    ContactUpdate, InMemoryContactRepository, RelationshipStatus, SqliteContactRepository,
};
use std::collections::HashSet;
use uuid::Uuid;

fn input(name: &str, email: &str, phone: &str, tags: &[&str]) -> ContactCreate {
    let mut input = ContactCreate::new(name, email, phone);
    input.tags = tags.iter().map(|tag| tag.to_string()).collect();
    input
}

fn ids(contacts: &[Contact]) -> Vec<Uuid> {
    contacts.iter().map(|contact| contact.id).collect()
}

fn juan_scenario<R: ContactRepository>(service: &mut ContactService<R>) {
    let created = service
        .create_contact(input("Juan Pérez", "juan@x.com", "+1514", &["ai", "startup"]))
        .unwrap();
    assert_eq!(created.relationship_status, RelationshipStatus::Prospect);

    let updated = service
        .update_contact(
            &created.id.to_string(),
            ContactUpdate {
                company: Some("InnovaAI".to_string()),
                ..ContactUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.company.as_deref(), Some("InnovaAI"));
    assert_eq!(updated.name, "Juan Pérez");
    assert_eq!(updated.tags, vec!["ai", "startup"]);

    let by_tag = service.search_contacts_by_tag("ai").unwrap();
    assert!(by_tag.iter().any(|contact| contact.id == created.id));
    let by_upper = service.search_contacts_by_tag("AI").unwrap();
    assert!(by_upper.iter().all(|contact| contact.id != created.id));
}

fn crud_properties<R: ContactRepository>(service: &mut ContactService<R>) {
    let mut seen = HashSet::new();
    for idx in 0..5 {
        let created = service
            .create_contact(input(
                &format!("Person {idx}"),
                &format!("p{idx}@a.com"),
                "1",
                &[],
            ))
            .unwrap();
        assert!(!created.id.to_string().is_empty());
        assert!(seen.insert(created.id));

        let fetched = service.get_contact(&created.id.to_string()).unwrap();
        assert_eq!(fetched, created);
    }

    let target = service
        .create_contact(input("Ana", "ana@a.com", "+34", &["vip"]))
        .unwrap();
    let target_id = target.id.to_string();

    let updated = service
        .update_contact(
            &target_id,
            ContactUpdate {
                notes: Some("prefers email".to_string()),
                ..ContactUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(
        updated,
        Contact {
            notes: "prefers email".to_string(),
            ..target.clone()
        }
    );

    let unchanged = service
        .update_contact(&target_id, ContactUpdate::default())
        .unwrap();
    assert_eq!(unchanged, updated);

    service.delete_contact(&target_id).unwrap();
    assert!(matches!(
        service.get_contact(&target_id),
        Err(ContactServiceError::NotFound(id)) if id == target_id
    ));
    assert!(matches!(
        service.delete_contact(&target_id),
        Err(ContactServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.update_contact(
            &target_id,
            ContactUpdate {
                notes: Some("late".to_string()),
                ..ContactUpdate::default()
            }
        ),
        Err(ContactServiceError::NotFound(_))
    ));
}

fn search_properties<R: ContactRepository>(service: &mut ContactService<R>) {
    let maria = service
        .create_contact(input("María", "m@a.com", "111", &["tech"]))
        .unwrap();
    let mut pedro_input = input("Pedro", "p@a.com", "222", &["sales"]);
    pedro_input.company = Some("Globex Corp".to_string());
    let pedro = service.create_contact(pedro_input).unwrap();

    let everything = service.list_contacts().unwrap();
    assert_eq!(ids(&service.search_contacts("").unwrap()), ids(&everything));
    assert_eq!(ids(&service.search_contacts("   ").unwrap()), ids(&everything));

    assert_eq!(ids(&service.search_contacts("pedro").unwrap()), vec![pedro.id]);
    assert_eq!(ids(&service.search_contacts("GLOBEX").unwrap()), vec![pedro.id]);
    assert_eq!(ids(&service.search_contacts("tech").unwrap()), vec![maria.id]);
    assert!(service.search_contacts("zzz-no-match").unwrap().is_empty());

    assert_eq!(ids(&service.search_contacts_by_tag("tech").unwrap()), vec![maria.id]);
    assert!(service.search_contacts_by_tag("tec").unwrap().is_empty());
    assert!(service.search_contacts_by_tag("Tech").unwrap().is_empty());

    let combined = service
        .find_contacts(&ContactQuery {
            search: Some("a.com".to_string()),
            tag: Some("sales".to_string()),
        })
        .unwrap();
    assert_eq!(ids(&combined), vec![pedro.id]);
    assert_eq!(
        ids(&service.find_contacts(&ContactQuery::default()).unwrap()),
        ids(&everything)
    );

    assert_eq!(service.list_tags().unwrap(), vec!["sales", "tech"]);
}

fn query_whitespace_is_significant<R: ContactRepository>(service: &mut ContactService<R>) {
    let bob = service
        .create_contact(input("Bob", "bob@a.com", "333", &["ai"]))
        .unwrap();

    assert_eq!(ids(&service.search_contacts("ai").unwrap()), vec![bob.id]);
    assert!(service.search_contacts(" ai").unwrap().is_empty());
    assert!(service.search_contacts("ai ").unwrap().is_empty());
}

fn validation_properties<R: ContactRepository>(service: &mut ContactService<R>) {
    let err = service
        .create_contact(input("Juan", "", "+1514", &[]))
        .unwrap_err();
    match err {
        ContactServiceError::Validation(err) => assert_eq!(err.field, "email"),
        other => panic!("unexpected error: {other}"),
    }

    let created = service
        .create_contact(input("Juan", "juan@x.com", "+1514", &[]))
        .unwrap();
    let err = service
        .update_contact(
            &created.id.to_string(),
            ContactUpdate {
                relationship_status: Some("friend".to_string()),
                ..ContactUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(&err, ContactServiceError::Validation(inner) if inner.field == "relationship_status"));
    assert_eq!(err.status_hint(), 422);

    assert_eq!(
        service.get_contact(&created.id.to_string()).unwrap(),
        created,
        "rejected update must leave the record unchanged"
    );
    assert_eq!(service.list_contacts().unwrap().len(), 1);
}

fn sqlite_service(conn: &mut rusqlite::Connection) -> ContactService<SqliteContactRepository<'_>> {
    ContactService::new(SqliteContactRepository::try_new(conn).unwrap())
}

#[test]
fn juan_scenario_on_sqlite() {
    let mut conn = open_db_in_memory().unwrap();
    juan_scenario(&mut sqlite_service(&mut conn));
}

#[test]
fn juan_scenario_in_memory() {
    juan_scenario(&mut ContactService::new(InMemoryContactRepository::new()));
}

#[test]
fn crud_properties_on_sqlite() {
    let mut conn = open_db_in_memory().unwrap();
    crud_properties(&mut sqlite_service(&mut conn));
}

#[test]
fn crud_properties_in_memory() {
    crud_properties(&mut ContactService::new(InMemoryContactRepository::new()));
}

#[test]
fn search_properties_on_sqlite() {
    let mut conn = open_db_in_memory().unwrap();
    search_properties(&mut sqlite_service(&mut conn));
}

#[test]
fn search_properties_in_memory() {
    search_properties(&mut ContactService::new(InMemoryContactRepository::new()));
}

#[test]
fn query_whitespace_is_significant_on_sqlite() {
    let mut conn = open_db_in_memory().unwrap();
    query_whitespace_is_significant(&mut sqlite_service(&mut conn));
}

#[test]
fn query_whitespace_is_significant_in_memory() {
    query_whitespace_is_significant(&mut ContactService::new(InMemoryContactRepository::new()));
}

#[test]
fn validation_properties_on_sqlite() {
    let mut conn = open_db_in_memory().unwrap();
    validation_properties(&mut sqlite_service(&mut conn));
}

#[test]
fn validation_properties_in_memory() {
    validation_properties(&mut ContactService::new(InMemoryContactRepository::new()));
}

#[test]
fn malformed_id_is_reported_as_not_found() {
    let mut service = ContactService::new(InMemoryContactRepository::new());
    let err = service.get_contact("nope").unwrap_err();
    assert!(matches!(&err, ContactServiceError::NotFound(id) if id == "nope"));
    assert_eq!(err.status_hint(), 404);
    assert!(matches!(
        service.delete_contact("nope"),
        Err(ContactServiceError::NotFound(_))
    ));
}
