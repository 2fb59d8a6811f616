//! Customer repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide key-based CRUD over `customers` rows.
//! - Assign stable customer ids at the write boundary.
//!
//! # Invariants
//! - `find_all` listing order is deterministic: `created_at ASC, uuid ASC`.
//! - `insert` is the only place a customer id is created; callers never pick
//!   their own.

use crate::model::customer::{Customer, CustomerId};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const CUSTOMER_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    address,
    district,
    created_at,
    updated_at
FROM customers";

const CUSTOMER_COLUMNS: &[&str] = &[
    "uuid",
    "name",
    "address",
    "district",
    "created_at",
    "updated_at",
];

/// Repository interface for customer rows.
pub trait CustomerRepository {
    /// Inserts one customer and returns it with the storage-assigned id.
    fn insert(&self, name: &str, address: &str, district: &str) -> RepoResult<Customer>;
    /// Overwrites the mutable attributes of an existing customer.
    fn update(&self, customer: &Customer) -> RepoResult<()>;
    /// Loads one customer by id.
    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>>;
    /// Lists every customer in stable creation order.
    fn find_all(&self) -> RepoResult<Vec<Customer>>;
    /// Deletes one customer row.
    fn delete(&self, id: CustomerId) -> RepoResult<()>;
}

/// SQLite-backed customer repository.
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "customers", CUSTOMER_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn insert(&self, name: &str, address: &str, district: &str) -> RepoResult<Customer> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO customers (uuid, name, address, district)
             VALUES (?1, ?2, ?3, ?4);",
            params![id.to_string(), name, address, district],
        )?;
        load_required_customer(self.conn, id)
    }

    fn update(&self, customer: &Customer) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE customers
             SET
                name = ?2,
                address = ?3,
                district = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                customer.id.to_string(),
                customer.name,
                customer.address,
                customer.district,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::CustomerNotFound(customer.id));
        }

        Ok(())
    }

    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CUSTOMER_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_customer_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Customer>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CUSTOMER_SELECT_SQL} ORDER BY created_at ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut customers = Vec::new();
        while let Some(row) = rows.next()? {
            customers.push(parse_customer_row(row)?);
        }

        Ok(customers)
    }

    fn delete(&self, id: CustomerId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM customers WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::CustomerNotFound(id));
        }

        Ok(())
    }
}

fn load_required_customer(conn: &Connection, id: CustomerId) -> RepoResult<Customer> {
    let mut stmt = conn.prepare(&format!("{CUSTOMER_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_customer_row(row);
    }
    Err(RepoError::CustomerNotFound(id))
}

fn parse_customer_row(row: &Row<'_>) -> RepoResult<Customer> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "customers.uuid")?;

    Ok(Customer {
        id,
        name: row.get("name")?,
        address: row.get("address")?,
        district: row.get("district")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
