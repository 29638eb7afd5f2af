use opencontact_core::db::{
    open_db, open_db_in_memory, read_transaction, write_transaction, ConstraintKind,
};
use opencontact_core::{
    AgendaRepository, AgendaService, ContactInfo, ContactRepository, ContactType, RepoError,
    ServiceError, SqliteAgendaRepository, SqliteContactRepository,
};
use uuid::Uuid;

fn mobile(name: &str, phone_number: &str) -> ContactInfo {
    ContactInfo::new(name, ContactType::Mobile, "11", phone_number)
}

#[test]
fn unique_name_index_backs_up_the_service_check() {
    let conn = open_db_in_memory().unwrap();
    let agendas = SqliteAgendaRepository::try_new(&conn).unwrap();

    agendas.create_agenda("Familia").unwrap();
    let err = agendas.create_agenda("fAmIlIa").unwrap_err();
    assert_eq!(err.constraint(), Some(ConstraintKind::Unique));
}

#[test]
fn unique_phone_constraint_backs_up_the_service_check() {
    let conn = open_db_in_memory().unwrap();
    let agendas = SqliteAgendaRepository::try_new(&conn).unwrap();
    let contacts = SqliteContactRepository::try_new(&conn).unwrap();
    let family = agendas.create_agenda("Familia").unwrap();

    contacts
        .create_contact(family.id, &mobile("Marco", "987654321"))
        .unwrap();
    let err = contacts
        .create_contact(family.id, &mobile("Outro", "987654321"))
        .unwrap_err();
    assert_eq!(err.constraint(), Some(ConstraintKind::Unique));
}

#[test]
fn foreign_key_rejects_orphan_contacts_and_owned_agenda_delete() {
    let conn = open_db_in_memory().unwrap();
    let agendas = SqliteAgendaRepository::try_new(&conn).unwrap();
    let contacts = SqliteContactRepository::try_new(&conn).unwrap();

    let err = contacts
        .create_contact(Uuid::new_v4(), &mobile("Marco", "987654321"))
        .unwrap_err();
    assert_eq!(err.constraint(), Some(ConstraintKind::ForeignKey));

    let family = agendas.create_agenda("Familia").unwrap();
    contacts
        .create_contact(family.id, &mobile("Marco", "987654321"))
        .unwrap();
    let err = agendas.delete_by_id(family.id).unwrap_err();
    assert_eq!(err.constraint(), Some(ConstraintKind::ForeignKey));
    assert!(agendas.exists_by_id(family.id).unwrap());
}

#[test]
fn repository_validates_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let agendas = SqliteAgendaRepository::try_new(&conn).unwrap();

    let err = agendas.create_agenda("").unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn delete_missing_rows_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let agendas = SqliteAgendaRepository::try_new(&conn).unwrap();
    let contacts = SqliteContactRepository::try_new(&conn).unwrap();

    assert!(matches!(
        agendas.delete_by_id(Uuid::new_v4()).unwrap_err(),
        RepoError::NotFound {
            table: "agendas",
            ..
        }
    ));
    assert!(matches!(
        contacts.delete_by_id(Uuid::new_v4()).unwrap_err(),
        RepoError::NotFound {
            table: "contacts",
            ..
        }
    ));
}

#[test]
fn failed_use_case_rolls_back_its_writes() {
    let mut conn = open_db_in_memory().unwrap();

    let result: Result<(), ServiceError> = write_transaction(&mut conn, |tx| {
        let agendas = AgendaService::new(
            SqliteAgendaRepository::try_new(tx)?,
            SqliteContactRepository::try_new(tx)?,
        );
        agendas.create("Familia")?;
        agendas.create("FAMILIA")?;
        Ok(())
    });
    assert!(matches!(result, Err(ServiceError::NameConflict(_))));

    let exists = read_transaction(&mut conn, |tx| -> Result<bool, RepoError> {
        SqliteAgendaRepository::try_new(tx)?.exists_by_name_ignore_case("familia")
    })
    .unwrap();
    assert!(!exists);
}

#[test]
fn committed_use_case_is_visible_to_other_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("opencontact.db");
    let mut writer = open_db(&path).unwrap();

    let created = write_transaction(&mut writer, |tx| -> Result<_, ServiceError> {
        AgendaService::new(
            SqliteAgendaRepository::try_new(tx)?,
            SqliteContactRepository::try_new(tx)?,
        )
        .create("Familia")
    })
    .unwrap();

    let reader = open_db(&path).unwrap();
    let loaded = SqliteAgendaRepository::try_new(&reader)
        .unwrap()
        .find_by_id(created.id)
        .unwrap();
    assert_eq!(loaded, Some(created));
}
