use clientbook_core::db::open_db_in_memory;
use clientbook_core::{
    CustomerInput, CustomerService, CustomerServiceError, PhoneRepository,
    SqliteCustomerRepository, SqlitePhoneRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn service(
    conn: &Connection,
) -> CustomerService<SqliteCustomerRepository<'_>, SqlitePhoneRepository<'_>> {
    CustomerService::new(
        SqliteCustomerRepository::try_new(conn).unwrap(),
        SqlitePhoneRepository::try_new(conn).unwrap(),
    )
}

fn input(name: &str, phones: &[&str]) -> CustomerInput {
    CustomerInput {
        name: name.to_string(),
        address: "addr".to_string(),
        district: "east".to_string(),
        phones: phones.iter().map(|number| number.to_string()).collect(),
    }
}

#[test]
fn insert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let created = service
        .insert(&input("John Doe", &["12345678910"]))
        .unwrap();
    assert_eq!(created.name, "John Doe");
    assert_eq!(created.numbers(), vec!["12345678910"]);

    let fetched = service.get(created.id).unwrap();
    assert_eq!(fetched.name, "John Doe");
    assert_eq!(fetched.address, "addr");
    assert_eq!(fetched.district, "east");
    assert_eq!(fetched.numbers(), vec!["12345678910"]);
    assert_eq!(fetched.phones, created.phones);
}

#[test]
fn insert_preserves_submission_order_of_phones() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let created = service
        .insert(&input("multi", &["1111111111", "3333333333", "2222222222"]))
        .unwrap();
    assert_eq!(
        created.numbers(),
        vec!["1111111111", "3333333333", "2222222222"]
    );

    let fetched = service.get(created.id).unwrap();
    assert_eq!(fetched.phones, created.phones);
}

#[test]
fn insert_rejects_empty_and_all_blank_phone_lists() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service.insert(&input("empty", &[])).unwrap_err();
    assert!(matches!(err, CustomerServiceError::PhoneEmpty));

    let err = service.insert(&input("blank", &["", "  "])).unwrap_err();
    assert!(matches!(err, CustomerServiceError::PhoneEmpty));

    assert!(service.get_all().unwrap().is_empty());
}

#[test]
fn insert_rejects_invalid_format_carrying_the_number() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service
        .insert(&input("bad", &["123456a8910"]))
        .unwrap_err();
    match err {
        CustomerServiceError::PhoneFormatInvalid(number) => {
            assert_eq!(number, "123456a8910");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(service.get_all().unwrap().is_empty());
}

#[test]
fn insert_rejects_already_used_number_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let first = service
        .insert(&input("first", &["12345678910"]))
        .unwrap();

    let err = service
        .insert(&input("second", &["12345678910"]))
        .unwrap_err();
    match err {
        CustomerServiceError::PhoneAlreadyLinked(number) => {
            assert_eq!(number, "12345678910");
        }
        other => panic!("unexpected error: {other}"),
    }

    let all = service.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, first.id);

    let phones = SqlitePhoneRepository::try_new(&conn).unwrap();
    let owner = phones.find_by_number("12345678910").unwrap().unwrap();
    assert_eq!(owner.owner_id, first.id);
}

#[test]
fn insert_checks_each_number_fully_before_the_next() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    service.insert(&input("holder", &["1234567890"])).unwrap();

    // The first submitted number hits the linkage conflict before the
    // malformed second number is ever looked at.
    let err = service
        .insert(&input("late", &["1234567890", "bad"]))
        .unwrap_err();
    assert!(matches!(err, CustomerServiceError::PhoneAlreadyLinked(_)));
}

#[test]
fn insert_deduplicates_repeated_numbers_in_one_submission() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let created = service
        .insert(&input("dup", &["1234567890", "1234567890"]))
        .unwrap();
    assert_eq!(created.numbers(), vec!["1234567890"]);
}

#[test]
fn get_unknown_id_fails_with_customer_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let missing = Uuid::new_v4();
    let err = service.get(missing).unwrap_err();
    assert!(matches!(err, CustomerServiceError::CustomerNotFound(id) if id == missing));
}

#[test]
fn get_all_lists_customers_with_their_own_phones() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let alpha = service.insert(&input("alpha", &["1111111111"])).unwrap();
    let beta = service
        .insert(&input("beta", &["2222222222", "3333333333"]))
        .unwrap();

    let all = service.get_all().unwrap();
    assert_eq!(all.len(), 2);

    let listed_alpha = all.iter().find(|record| record.id == alpha.id).unwrap();
    let listed_beta = all.iter().find(|record| record.id == beta.id).unwrap();
    assert_eq!(listed_alpha.numbers(), vec!["1111111111"]);
    assert_eq!(listed_beta.numbers(), vec!["2222222222", "3333333333"]);
}

#[test]
fn delete_removes_customer_and_cascades_to_phones() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let created = service
        .insert(&input("doomed", &["1111111111", "2222222222"]))
        .unwrap();

    service.delete(created.id).unwrap();

    let err = service.get(created.id).unwrap_err();
    assert!(matches!(err, CustomerServiceError::CustomerNotFound(_)));

    let phones = SqlitePhoneRepository::try_new(&conn).unwrap();
    assert!(phones.find_by_owner(created.id).unwrap().is_empty());
    assert!(phones.find_by_number("1111111111").unwrap().is_none());
    assert!(phones.find_by_number("2222222222").unwrap().is_none());
}

#[test]
fn delete_unknown_id_fails_with_customer_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let missing = Uuid::new_v4();
    let err = service.delete(missing).unwrap_err();
    assert!(matches!(err, CustomerServiceError::CustomerNotFound(id) if id == missing));
}

#[test]
fn freed_number_can_be_claimed_after_owner_deletion() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let first = service.insert(&input("first", &["1234567890"])).unwrap();
    service.delete(first.id).unwrap();

    let second = service.insert(&input("second", &["1234567890"])).unwrap();
    assert_eq!(second.numbers(), vec!["1234567890"]);
}

#[test]
fn record_serializes_without_owner_backreference() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let created = service.insert(&input("shape", &["1234567890"])).unwrap();
    let value = serde_json::to_value(&created).unwrap();

    assert_eq!(value["name"], "shape");
    assert_eq!(value["phones"][0]["number"], "1234567890");
    assert!(value["phones"][0].get("owner_id").is_none());
}
