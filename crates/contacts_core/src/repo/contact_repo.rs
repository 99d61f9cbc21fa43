//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and filtered listing over the `contacts` table.
//! - Own tag persistence in `contact_tags`, preserving tag order.
//!
//! # Invariants
//! - Write paths call `Contact::validate()` before SQL mutations.
//! - Every write runs in one `IMMEDIATE` transaction; readers never observe
//!   a contact without its tags.
//! - Listing order is insertion order (`seq ASC`).
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::contact::{
    format_contact_date, parse_contact_date, Contact, ContactDraft, ContactId, ContactPatch,
    ContactValidationError, RelationshipStatus,
};
use crate::search::filter::ContactFilter;
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const CONTACT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    email,
    phone,
    company,
    position,
    linkedin,
    notes,
    last_contact_date,
    relationship_status
FROM contacts";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ContactValidationError),
    Db(DbError),
    NotFound(ContactId),
    InvalidData(String),
    /// Connection was not migrated to the contact schema.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<ContactValidationError> for RepoError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for contact storage.
///
/// Mutating operations take `&mut self` so writes through one handle are
/// serialized by the borrow checker.
pub trait ContactRepository {
    /// Assigns a fresh, never-used id and stores the draft.
    fn insert_contact(&mut self, draft: ContactDraft) -> RepoResult<Contact>;
    /// Loads one live contact; `NotFound` when absent.
    fn get_contact(&self, id: ContactId) -> RepoResult<Contact>;
    /// Merges present patch fields over the stored record.
    fn update_contact(&mut self, id: ContactId, patch: &ContactPatch) -> RepoResult<Contact>;
    /// Permanently removes one contact; `NotFound` when absent.
    fn delete_contact(&mut self, id: ContactId) -> RepoResult<()>;
    /// Lists contacts accepted by `filter` (all when `None`) in insertion order.
    fn list_contacts(&self, filter: Option<&ContactFilter>) -> RepoResult<Vec<Contact>>;
    /// Returns distinct tags in use, sorted ascending.
    fn list_tags(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when the contact schema is absent.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in ["contacts", "contact_tags"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }

    fn begin_write(&mut self) -> RepoResult<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn insert_contact(&mut self, draft: ContactDraft) -> RepoResult<Contact> {
        let contact = Contact::from_draft(Uuid::new_v4(), draft);
        contact.validate()?;
        let id_text = contact.id.to_string();

        let tx = self.begin_write()?;
        tx.execute(
            "INSERT INTO contacts (
                uuid,
                name,
                email,
                phone,
                company,
                position,
                linkedin,
                notes,
                last_contact_date,
                relationship_status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                id_text.as_str(),
                contact.name.as_str(),
                contact.email.as_str(),
                contact.phone.as_str(),
                contact.company.as_deref(),
                contact.position.as_deref(),
                contact.linkedin.as_deref(),
                contact.notes.as_str(),
                contact.last_contact_date.map(format_contact_date),
                contact.relationship_status.as_str(),
            ],
        )?;
        replace_tags_in_tx(&tx, id_text.as_str(), &contact.tags)?;
        tx.commit()?;

        debug!(
            "event=contact_insert module=repo status=ok contact_id={} tag_count={}",
            contact.id,
            contact.tags.len()
        );
        Ok(contact)
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Contact> {
        load_contact(self.conn, id)?.ok_or(RepoError::NotFound(id))
    }

    fn update_contact(&mut self, id: ContactId, patch: &ContactPatch) -> RepoResult<Contact> {
        if patch.is_empty() {
            return self.get_contact(id);
        }

        let tx = self.begin_write()?;
        let mut contact = load_contact(&tx, id)?.ok_or(RepoError::NotFound(id))?;

        contact.apply_patch(patch);
        contact.validate()?;
        let id_text = id.to_string();

        tx.execute(
            "UPDATE contacts
             SET
                name = ?2,
                email = ?3,
                phone = ?4,
                company = ?5,
                position = ?6,
                linkedin = ?7,
                notes = ?8,
                last_contact_date = ?9,
                relationship_status = ?10,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                id_text.as_str(),
                contact.name.as_str(),
                contact.email.as_str(),
                contact.phone.as_str(),
                contact.company.as_deref(),
                contact.position.as_deref(),
                contact.linkedin.as_deref(),
                contact.notes.as_str(),
                contact.last_contact_date.map(format_contact_date),
                contact.relationship_status.as_str(),
            ],
        )?;
        if patch.tags.is_some() {
            replace_tags_in_tx(&tx, id_text.as_str(), &contact.tags)?;
        }
        tx.commit()?;

        debug!("event=contact_update module=repo status=ok contact_id={id}");
        Ok(contact)
    }

    fn delete_contact(&mut self, id: ContactId) -> RepoResult<()> {
        let id_text = id.to_string();
        let tx = self.begin_write()?;
        tx.execute(
            "DELETE FROM contact_tags WHERE contact_uuid = ?1;",
            [id_text.as_str()],
        )?;
        let changed = tx.execute("DELETE FROM contacts WHERE uuid = ?1;", [id_text.as_str()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        tx.commit()?;

        debug!("event=contact_delete module=repo status=ok contact_id={id}");
        Ok(())
    }

    fn list_contacts(&self, filter: Option<&ContactFilter>) -> RepoResult<Vec<Contact>> {
        let mut sql = format!("{CONTACT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        // Exact tag match is pushed down to the `contact_tags(tag)` index.
        if let Some(tag) = filter.and_then(ContactFilter::required_tag) {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM contact_tags ct
                    WHERE ct.contact_uuid = contacts.uuid
                      AND ct.tag = ?
                )",
            );
            bind_values.push(Value::Text(tag.to_string()));
        }
        sql.push_str(" ORDER BY seq ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            let contact = parse_contact_row(self.conn, row)?;
            // SQLite `lower()` only folds ASCII, so text matching stays in Rust.
            if filter.map_or(true, |filter| filter.matches_text(&contact)) {
                contacts.push(contact);
            }
        }

        Ok(contacts)
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT tag FROM contact_tags ORDER BY tag ASC;")?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(row.get(0)?);
        }
        Ok(tags)
    }
}

fn load_contact(conn: &Connection, id: ContactId) -> RepoResult<Option<Contact>> {
    let mut stmt = conn.prepare(&format!("{CONTACT_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_contact_row(conn, row)?));
    }
    Ok(None)
}

fn parse_contact_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Contact> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in contacts.uuid"))
    })?;

    let status_text: String = row.get("relationship_status")?;
    let relationship_status = status_text.parse::<RelationshipStatus>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid relationship status `{status_text}` in contacts.relationship_status"
        ))
    })?;

    let last_contact_date = match row.get::<_, Option<String>>("last_contact_date")? {
        Some(value) => Some(parse_contact_date(&value).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid date `{value}` in contacts.last_contact_date"
            ))
        })?),
        None => None,
    };

    let contact = Contact {
        id,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        company: row.get("company")?,
        position: row.get("position")?,
        linkedin: row.get("linkedin")?,
        tags: load_tags(conn, uuid_text.as_str())?,
        notes: row.get("notes")?,
        last_contact_date,
        relationship_status,
    };
    contact
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("contact {id}: {err}")))?;
    Ok(contact)
}

fn load_tags(conn: &Connection, contact_uuid: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT tag
         FROM contact_tags
         WHERE contact_uuid = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([contact_uuid])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row.get(0)?);
    }
    Ok(tags)
}

fn replace_tags_in_tx(tx: &Transaction<'_>, contact_uuid: &str, tags: &[String]) -> RepoResult<()> {
    tx.execute(
        "DELETE FROM contact_tags WHERE contact_uuid = ?1;",
        [contact_uuid],
    )?;
    for (position, tag) in tags.iter().enumerate() {
        tx.execute(
            "INSERT INTO contact_tags (contact_uuid, position, tag) VALUES (?1, ?2, ?3);",
            params![contact_uuid, position as i64, tag.as_str()],
        )?;
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
