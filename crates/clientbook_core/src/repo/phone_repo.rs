//! Phone repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide lookup-by-number and lookup-by-owner access to `phones` rows.
//! - Assign phone ids and per-owner attachment order at the write boundary.
//!
//! # Invariants
//! - Owner listing order is deterministic: `sort_order ASC, uuid ASC`.
//! - The schema-level UNIQUE index on `phones.number` is the authoritative
//!   global-uniqueness guard; a violating insert surfaces as a DB error, not
//!   a business error.

use crate::model::customer::CustomerId;
use crate::model::phone::{Phone, PhoneId};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const PHONE_SELECT_SQL: &str = "SELECT
    uuid,
    number,
    owner_uuid,
    sort_order
FROM phones";

const PHONE_COLUMNS: &[&str] = &[
    "uuid",
    "number",
    "owner_uuid",
    "sort_order",
    "created_at",
    "updated_at",
];

/// Repository interface for phone rows.
pub trait PhoneRepository {
    /// Loads the phone holding `number`, regardless of owner.
    fn find_by_number(&self, number: &str) -> RepoResult<Option<Phone>>;
    /// Lists all phones owned by one customer in attachment order.
    fn find_by_owner(&self, owner_id: CustomerId) -> RepoResult<Vec<Phone>>;
    /// Inserts one phone attached to `owner_id` and returns it.
    fn insert(&self, owner_id: CustomerId, number: &str) -> RepoResult<Phone>;
    /// Inserts one phone per number in submission order.
    fn insert_all(&self, owner_id: CustomerId, numbers: &[String]) -> RepoResult<Vec<Phone>>;
    /// Re-saves an existing phone (number, owner, order).
    fn update(&self, phone: &Phone) -> RepoResult<()>;
    /// Deletes one phone row.
    fn delete(&self, id: PhoneId) -> RepoResult<()>;
}

/// SQLite-backed phone repository.
pub struct SqlitePhoneRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePhoneRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "phones", PHONE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl PhoneRepository for SqlitePhoneRepository<'_> {
    fn find_by_number(&self, number: &str) -> RepoResult<Option<Phone>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PHONE_SELECT_SQL} WHERE number = ?1;"))?;

        let mut rows = stmt.query([number])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_phone_row(row)?));
        }

        Ok(None)
    }

    fn find_by_owner(&self, owner_id: CustomerId) -> RepoResult<Vec<Phone>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PHONE_SELECT_SQL}
             WHERE owner_uuid = ?1
             ORDER BY sort_order ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([owner_id.to_string()])?;
        let mut phones = Vec::new();
        while let Some(row) = rows.next()? {
            phones.push(parse_phone_row(row)?);
        }

        Ok(phones)
    }

    fn insert(&self, owner_id: CustomerId, number: &str) -> RepoResult<Phone> {
        let id = Uuid::new_v4();
        let sort_order = next_sort_order(self.conn, owner_id)?;
        self.conn.execute(
            "INSERT INTO phones (uuid, number, owner_uuid, sort_order)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                number,
                owner_id.to_string(),
                sort_order,
            ],
        )?;

        Ok(Phone {
            id,
            number: number.to_string(),
            owner_id,
            sort_order,
        })
    }

    fn insert_all(&self, owner_id: CustomerId, numbers: &[String]) -> RepoResult<Vec<Phone>> {
        let mut phones = Vec::with_capacity(numbers.len());
        for number in numbers {
            phones.push(self.insert(owner_id, number)?);
        }
        Ok(phones)
    }

    fn update(&self, phone: &Phone) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE phones
             SET
                number = ?2,
                owner_uuid = ?3,
                sort_order = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                phone.id.to_string(),
                phone.number,
                phone.owner_id.to_string(),
                phone.sort_order,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::PhoneNotFound(phone.id));
        }

        Ok(())
    }

    fn delete(&self, id: PhoneId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM phones WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::PhoneNotFound(id));
        }

        Ok(())
    }
}

fn next_sort_order(conn: &Connection, owner_id: CustomerId) -> RepoResult<i64> {
    let next = conn.query_row(
        "SELECT COALESCE(MAX(sort_order), -1) + 1
         FROM phones
         WHERE owner_uuid = ?1;",
        [owner_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(next)
}

fn parse_phone_row(row: &Row<'_>) -> RepoResult<Phone> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "phones.uuid")?;

    let owner_text: String = row.get("owner_uuid")?;
    let owner_id = parse_uuid(&owner_text, "phones.owner_uuid")?;

    Ok(Phone {
        id,
        number: row.get("number")?,
        owner_id,
        sort_order: row.get("sort_order")?,
    })
}
