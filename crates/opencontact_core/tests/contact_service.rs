use opencontact_core::db::open_db_in_memory;
use opencontact_core::{
    Agenda, AgendaRepository, ContactInfo, ContactService, ContactSort, ContactType, PageRequest,
    ServiceError, Sort, SqliteAgendaRepository, SqliteContactRepository, ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn service(
    conn: &Connection,
) -> ContactService<SqliteContactRepository<'_>, SqliteAgendaRepository<'_>> {
    ContactService::new(
        SqliteContactRepository::try_new(conn).unwrap(),
        SqliteAgendaRepository::try_new(conn).unwrap(),
    )
}

fn agenda(conn: &Connection, name: &str) -> Agenda {
    SqliteAgendaRepository::try_new(conn)
        .unwrap()
        .create_agenda(name)
        .unwrap()
}

fn mobile(name: &str, area_code: &str, phone_number: &str) -> ContactInfo {
    ContactInfo::new(name, ContactType::Mobile, area_code, phone_number)
}

fn names(page: &opencontact_core::Page<opencontact_core::Contact>) -> Vec<&str> {
    page.content.iter().map(|c| c.info.name.as_str()).collect()
}

#[test]
fn create_stores_contact_under_agenda() {
    let conn = setup();
    let contacts = service(&conn);
    let family = agenda(&conn, "Familia");

    let created = contacts
        .create(family.id, &mobile("Marco", "11", "987654321"))
        .unwrap();
    assert_eq!(created.agenda_id, family.id);
    assert_eq!(created.info.name, "Marco");
    assert_eq!(created.info.kind, ContactType::Mobile);
    assert_eq!(created.info.area_code, "11");
    assert_eq!(created.info.phone_number, "987654321");

    assert_eq!(contacts.find_by_id(created.id).unwrap(), created);
}

#[test]
fn create_rejects_duplicate_phone_in_same_agenda() {
    let conn = setup();
    let contacts = service(&conn);
    let family = agenda(&conn, "Familia");

    contacts
        .create(family.id, &mobile("Marco", "11", "987654321"))
        .unwrap();
    let err = contacts
        .create(family.id, &mobile("Outro", "11", "987654321"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::PhoneConflict { .. }));
    assert_eq!(
        err.to_string(),
        "Phone number already registered in this agenda."
    );
}

#[test]
fn same_phone_is_allowed_in_different_agendas() {
    let conn = setup();
    let contacts = service(&conn);
    let family = agenda(&conn, "Familia");
    let work = agenda(&conn, "Trabalho");

    contacts
        .create(family.id, &mobile("Marco", "11", "987654321"))
        .unwrap();
    contacts
        .create(work.id, &mobile("Marco", "11", "987654321"))
        .unwrap();
}

#[test]
fn create_in_unknown_agenda_is_not_found() {
    let conn = setup();
    let contacts = service(&conn);
    let missing = Uuid::new_v4();

    let err = contacts
        .create(missing, &mobile("Marco", "11", "987654321"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::AgendaNotFound(id) if id == missing));
}

#[test]
fn create_validates_before_touching_storage() {
    let conn = setup();
    let contacts = service(&conn);

    let err = contacts
        .create(Uuid::new_v4(), &mobile("Marco", "1", "987654321"))
        .unwrap_err();
    match err {
        ServiceError::Validation(ValidationError::Pattern { field, .. }) => {
            assert_eq!(field, "areaCode")
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = contacts
        .create(Uuid::new_v4(), &mobile("Marco", "11", "1234567"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn update_replaces_fields_and_keeps_agenda() {
    let conn = setup();
    let contacts = service(&conn);
    let family = agenda(&conn, "Familia");

    let created = contacts
        .create(family.id, &mobile("Marco", "11", "987654321"))
        .unwrap();
    let updated = contacts
        .update(
            created.id,
            ContactInfo::new("Marco Antonio", ContactType::FixedLine, "21", "33334444"),
        )
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.agenda_id, family.id);
    assert_eq!(updated.info.name, "Marco Antonio");
    assert_eq!(updated.info.kind, ContactType::FixedLine);
    assert_eq!(updated.info.area_code, "21");
    assert_eq!(updated.info.phone_number, "33334444");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[test]
fn update_may_keep_own_phone() {
    let conn = setup();
    let contacts = service(&conn);
    let family = agenda(&conn, "Familia");

    let created = contacts
        .create(family.id, &mobile("Marco", "11", "987654321"))
        .unwrap();
    let updated = contacts
        .update(created.id, mobile("Marco Renamed", "11", "987654321"))
        .unwrap();
    assert_eq!(updated.info.name, "Marco Renamed");
}

#[test]
fn update_rejects_phone_held_by_another_contact() {
    let conn = setup();
    let contacts = service(&conn);
    let family = agenda(&conn, "Familia");

    contacts
        .create(family.id, &mobile("Marco", "11", "987654321"))
        .unwrap();
    let john = contacts
        .create(family.id, &mobile("John", "11", "912345678"))
        .unwrap();

    let err = contacts
        .update(john.id, mobile("John", "11", "987654321"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::PhoneConflict { .. }));
    assert_eq!(
        contacts.find_by_id(john.id).unwrap().info.phone_number,
        "912345678"
    );
}

#[test]
fn update_and_delete_unknown_contact_are_not_found() {
    let conn = setup();
    let contacts = service(&conn);
    let missing = Uuid::new_v4();

    assert!(matches!(
        contacts
            .update(missing, mobile("Marco", "11", "987654321"))
            .unwrap_err(),
        ServiceError::ContactNotFound(id) if id == missing
    ));
    assert!(matches!(
        contacts.delete(missing).unwrap_err(),
        ServiceError::ContactNotFound(_)
    ));
    assert!(matches!(
        contacts.find_by_id(missing).unwrap_err(),
        ServiceError::ContactNotFound(_)
    ));
}

#[test]
fn delete_removes_contact() {
    let conn = setup();
    let contacts = service(&conn);
    let family = agenda(&conn, "Familia");

    let created = contacts
        .create(family.id, &mobile("Marco", "11", "987654321"))
        .unwrap();
    contacts.delete(created.id).unwrap();
    assert!(matches!(
        contacts.find_by_id(created.id).unwrap_err(),
        ServiceError::ContactNotFound(_)
    ));
}

#[test]
fn find_all_by_criteria_filters_by_name_and_phone() {
    let conn = setup();
    let contacts = service(&conn);
    let family = agenda(&conn, "Familia");
    let work = agenda(&conn, "Trabalho");

    contacts
        .create(family.id, &mobile("Marco", "11", "987654321"))
        .unwrap();
    contacts
        .create(family.id, &mobile("John", "21", "912345678"))
        .unwrap();
    contacts
        .create(family.id, &mobile("MARIA", "31", "88887777"))
        .unwrap();
    contacts
        .create(work.id, &mobile("Mario", "11", "987654321"))
        .unwrap();

    let request = PageRequest::<ContactSort>::default();

    let by_name = contacts
        .find_all_by_criteria(family.id, Some("ar"), None, &request)
        .unwrap();
    assert_eq!(names(&by_name), ["Marco", "MARIA"]);
    assert_eq!(by_name.total_elements, 2);

    let by_phone = contacts
        .find_all_by_criteria(family.id, None, Some("9876"), &request)
        .unwrap();
    assert_eq!(names(&by_phone), ["Marco"]);

    // Matches across the area code / number boundary.
    let across = contacts
        .find_all_by_criteria(family.id, None, Some("1198"), &request)
        .unwrap();
    assert_eq!(names(&across), ["Marco"]);

    let both = contacts
        .find_all_by_criteria(family.id, Some("mar"), Some("888"), &request)
        .unwrap();
    assert_eq!(names(&both), ["MARIA"]);

    let blank = contacts
        .find_all_by_criteria(family.id, Some("  "), Some(""), &request)
        .unwrap();
    assert_eq!(blank.total_elements, 3);
}

#[test]
fn find_all_by_criteria_name_filter_folds_accented_letters() {
    let conn = setup();
    let contacts = service(&conn);
    let family = agenda(&conn, "Família");

    contacts
        .create(family.id, &mobile("ÉRICA", "11", "987654321"))
        .unwrap();
    contacts
        .create(family.id, &mobile("Ângela", "11", "987654322"))
        .unwrap();
    contacts
        .create(family.id, &mobile("Erica", "11", "987654323"))
        .unwrap();

    let request = PageRequest::<ContactSort>::default();

    let lower_needle = contacts
        .find_all_by_criteria(family.id, Some("éri"), None, &request)
        .unwrap();
    assert_eq!(lower_needle.total_elements, 1);
    assert_eq!(names(&lower_needle), ["ÉRICA"]);

    let upper_needle = contacts
        .find_all_by_criteria(family.id, Some("ÂNG"), None, &request)
        .unwrap();
    assert_eq!(names(&upper_needle), ["Ângela"]);

    // Accents are not stripped; only case is folded.
    let plain = contacts
        .find_all_by_criteria(family.id, Some("eri"), None, &request)
        .unwrap();
    assert_eq!(names(&plain), ["Erica"]);
}

#[test]
fn find_all_by_criteria_pages_and_sorts() {
    let conn = setup();
    let contacts = service(&conn);
    let family = agenda(&conn, "Familia");

    for (i, name) in ["Eva", "ana", "Caio", "bruno", "Dora"].iter().enumerate() {
        contacts
            .create(family.id, &mobile(name, "11", &format!("9000000{i}0")))
            .unwrap();
    }

    let first = contacts
        .find_all_by_criteria(
            family.id,
            None,
            None,
            &PageRequest::new(0, Some(2), Sort::asc(ContactSort::Name)),
        )
        .unwrap();
    assert_eq!(names(&first), ["ana", "bruno"]);
    assert_eq!(first.total_pages, 3);

    let by_phone_desc = contacts
        .find_all_by_criteria(
            family.id,
            None,
            None,
            &PageRequest::new(0, Some(1), Sort::desc(ContactSort::PhoneNumber)),
        )
        .unwrap();
    assert_eq!(names(&by_phone_desc), ["Dora"]);
}

#[test]
fn find_all_by_criteria_unknown_agenda_is_not_found() {
    let conn = setup();
    let contacts = service(&conn);

    let err = contacts
        .find_all_by_criteria(Uuid::new_v4(), None, None, &PageRequest::default())
        .unwrap_err();
    assert!(matches!(err, ServiceError::AgendaNotFound(_)));
}

#[test]
fn delete_by_name_prefix_ignores_case_and_stays_in_agenda() {
    let conn = setup();
    let contacts = service(&conn);
    let family = agenda(&conn, "Familia");
    let work = agenda(&conn, "Trabalho");

    contacts
        .create(family.id, &mobile("Marco", "11", "987654321"))
        .unwrap();
    contacts
        .create(family.id, &mobile("maria", "11", "987654322"))
        .unwrap();
    contacts
        .create(family.id, &mobile("Ana Maria", "11", "987654323"))
        .unwrap();
    contacts
        .create(work.id, &mobile("Mario", "11", "987654324"))
        .unwrap();

    let deleted = contacts
        .delete_contacts_by_name_prefix(family.id, "MA")
        .unwrap();
    assert_eq!(deleted, 2);

    let remaining = contacts
        .find_all_by_criteria(family.id, None, None, &PageRequest::default())
        .unwrap();
    assert_eq!(names(&remaining), ["Ana Maria"]);

    let other = contacts
        .find_all_by_criteria(work.id, None, None, &PageRequest::default())
        .unwrap();
    assert_eq!(other.total_elements, 1);

    assert_eq!(
        contacts
            .delete_contacts_by_name_prefix(family.id, "zz")
            .unwrap(),
        0
    );
}

#[test]
fn delete_by_name_prefix_folds_accented_letters() {
    let conn = setup();
    let contacts = service(&conn);
    let family = agenda(&conn, "Família");

    contacts
        .create(family.id, &mobile("Érica", "11", "987654321"))
        .unwrap();
    contacts
        .create(family.id, &mobile("ÉRICO", "11", "987654322"))
        .unwrap();
    contacts
        .create(family.id, &mobile("Eric", "11", "987654323"))
        .unwrap();

    let deleted = contacts
        .delete_contacts_by_name_prefix(family.id, "éRI")
        .unwrap();
    assert_eq!(deleted, 2);

    let remaining = contacts
        .find_all_by_criteria(family.id, None, None, &PageRequest::default())
        .unwrap();
    assert_eq!(names(&remaining), ["Eric"]);
}

#[test]
fn delete_by_name_prefix_in_unknown_agenda_is_not_found() {
    let conn = setup();
    let contacts = service(&conn);

    let err = contacts
        .delete_contacts_by_name_prefix(Uuid::new_v4(), "Ma")
        .unwrap_err();
    assert!(matches!(err, ServiceError::AgendaNotFound(_)));
}
