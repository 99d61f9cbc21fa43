//! Contact domain model and input validation.
//!
//! # Responsibility
//! - Define the canonical `Contact` record and its creation/update shapes.
//! - Turn raw caller input into typed drafts and patches in one place.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes afterwards.
//! - `name`, `email` and `phone` are never empty on a persisted record.
//! - `relationship_status` is always one of the enumerated values.
//! - `tags` is always present (possibly empty) and never holds blank tokens.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("valid email regex")
});

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stable identifier assigned to a contact on creation.
pub type ContactId = Uuid;

/// Relationship lifecycle state of a contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    Active,
    Inactive,
    /// Default for newly created contacts.
    #[default]
    Prospect,
}

impl RelationshipStatus {
    /// Stable string id used in storage and wire payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Prospect => "prospect",
        }
    }
}

impl Display for RelationshipStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipStatus {
    type Err = ContactValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "prospect" => Ok(Self::Prospect),
            other => Err(ContactValidationError::new(
                "relationship_status",
                ValidationRule::UnknownRelationshipStatus(other.to_string()),
            )),
        }
    }
}

/// Canonical contact record as stored and returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub linkedin: Option<String>,
    /// Insertion order is preserved; duplicates are kept as given.
    pub tags: Vec<String>,
    pub notes: String,
    /// Only changed by an explicit update, never by reads.
    pub last_contact_date: Option<NaiveDate>,
    pub relationship_status: RelationshipStatus,
}

impl Contact {
    /// Materializes a stored record from a validated draft and assigned id.
    pub fn from_draft(id: ContactId, draft: ContactDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            company: draft.company,
            position: draft.position,
            linkedin: draft.linkedin,
            tags: draft.tags,
            notes: draft.notes,
            last_contact_date: draft.last_contact_date,
            relationship_status: draft.relationship_status,
        }
    }

    /// Applies present patch fields over this record.
    ///
    /// Absent fields keep their prior value; `id` is never touched.
    pub fn apply_patch(&mut self, patch: &ContactPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = phone.clone();
        }
        if let Some(company) = &patch.company {
            self.company = company.clone();
        }
        if let Some(position) = &patch.position {
            self.position = position.clone();
        }
        if let Some(linkedin) = &patch.linkedin {
            self.linkedin = linkedin.clone();
        }
        if let Some(tags) = &patch.tags {
            self.tags = tags.clone();
        }
        if let Some(notes) = &patch.notes {
            self.notes = notes.clone();
        }
        if let Some(date) = patch.last_contact_date {
            self.last_contact_date = Some(date);
        }
        if let Some(status) = patch.relationship_status {
            self.relationship_status = status;
        }
    }

    /// Checks record-level invariants before persistence.
    ///
    /// Drafts and patches are validated at the service boundary; this guards
    /// repository writes from records assembled elsewhere.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ] {
            if value.trim().is_empty() {
                return Err(ContactValidationError::new(field, ValidationRule::Required));
            }
        }
        if !is_valid_email(&self.email) {
            return Err(ContactValidationError::new(
                "email",
                ValidationRule::InvalidEmail(self.email.clone()),
            ));
        }
        Ok(())
    }
}

/// Raw creation input.
///
/// Required text fields default to empty on deserialization so a missing
/// field is reported by [`ContactCreate::validate`] with its name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactCreate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub linkedin: Option<String>,
    pub tags: Vec<String>,
    pub notes: String,
    pub last_contact_date: Option<String>,
    pub relationship_status: Option<String>,
}

/// Raw partial-update input. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub linkedin: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    pub last_contact_date: Option<String>,
    pub relationship_status: Option<String>,
}

/// Validated contact without an id, ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub linkedin: Option<String>,
    pub tags: Vec<String>,
    pub notes: String,
    pub last_contact_date: Option<NaiveDate>,
    pub relationship_status: RelationshipStatus,
}

/// Validated partial update.
///
/// Optional text fields use a nested option: `Some(None)` clears the stored
/// value, `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<Option<String>>,
    pub position: Option<Option<String>>,
    pub linkedin: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    pub last_contact_date: Option<NaiveDate>,
    pub relationship_status: Option<RelationshipStatus>,
}

impl ContactPatch {
    /// Returns whether this patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Rule violated by a rejected input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationRule {
    /// Field is missing or blank.
    Required,
    /// Value is not a syntactically valid email address.
    InvalidEmail(String),
    UnknownRelationshipStatus(String),
    /// Value is not a `YYYY-MM-DD` calendar date.
    InvalidDate(String),
}

/// Validation failure naming the offending field and the violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactValidationError {
    pub field: &'static str,
    pub rule: ValidationRule,
}

impl ContactValidationError {
    pub fn new(field: &'static str, rule: ValidationRule) -> Self {
        Self { field, rule }
    }
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.rule {
            ValidationRule::Required => write!(f, "{} is required", self.field),
            ValidationRule::InvalidEmail(value) => {
                write!(f, "{}: `{value}` is not a valid email address", self.field)
            }
            ValidationRule::UnknownRelationshipStatus(value) => write!(
                f,
                "{}: unsupported value `{value}`; expected active|inactive|prospect",
                self.field
            ),
            ValidationRule::InvalidDate(value) => {
                write!(f, "{}: `{value}` is not a YYYY-MM-DD date", self.field)
            }
        }
    }
}

impl Error for ContactValidationError {}

impl ContactCreate {
    /// Creates input with the three required fields set.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// Validates creation input and applies defaults.
    ///
    /// # Errors
    /// - `Required` when `name`, `email` or `phone` is blank.
    /// - `InvalidEmail`, `UnknownRelationshipStatus`, `InvalidDate` for
    ///   malformed values.
    ///
    /// Tags are kept verbatim, blank and duplicate entries included.
    pub fn validate(self) -> Result<ContactDraft, ContactValidationError> {
        let name = required_text("name", &self.name)?;
        let email = validate_email(&self.email)?;
        let phone = required_text("phone", &self.phone)?;
        let last_contact_date = self
            .last_contact_date
            .as_deref()
            .map(parse_contact_date)
            .transpose()?;
        let relationship_status = match self.relationship_status.as_deref() {
            Some(value) => value.parse::<RelationshipStatus>()?,
            None => RelationshipStatus::default(),
        };

        Ok(ContactDraft {
            name,
            email,
            phone,
            company: optional_text(self.company.as_deref()),
            position: optional_text(self.position.as_deref()),
            linkedin: optional_text(self.linkedin.as_deref()),
            tags: self.tags,
            notes: self.notes,
            last_contact_date,
            relationship_status,
        })
    }
}

impl ContactUpdate {
    /// Validates only the fields that are present.
    pub fn validate(self) -> Result<ContactPatch, ContactValidationError> {
        Ok(ContactPatch {
            name: self
                .name
                .as_deref()
                .map(|value| required_text("name", value))
                .transpose()?,
            email: self.email.as_deref().map(validate_email).transpose()?,
            phone: self
                .phone
                .as_deref()
                .map(|value| required_text("phone", value))
                .transpose()?,
            company: self.company.as_deref().map(|value| optional_text(Some(value))),
            position: self
                .position
                .as_deref()
                .map(|value| optional_text(Some(value))),
            linkedin: self
                .linkedin
                .as_deref()
                .map(|value| optional_text(Some(value))),
            tags: self.tags,
            notes: self.notes,
            last_contact_date: self
                .last_contact_date
                .as_deref()
                .map(parse_contact_date)
                .transpose()?,
            relationship_status: self
                .relationship_status
                .as_deref()
                .map(str::parse::<RelationshipStatus>)
                .transpose()?,
        })
    }
}

/// Returns whether `value` is a syntactically valid email address.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Parses a `YYYY-MM-DD` date as used by `last_contact_date`.
pub fn parse_contact_date(value: &str) -> Result<NaiveDate, ContactValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ContactValidationError::new(
            "last_contact_date",
            ValidationRule::InvalidDate(value.to_string()),
        )
    })
}

/// Formats a date in the storage/wire form.
pub fn format_contact_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn required_text(field: &'static str, value: &str) -> Result<String, ContactValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ContactValidationError::new(field, ValidationRule::Required));
    }
    Ok(trimmed.to_string())
}

fn validate_email(value: &str) -> Result<String, ContactValidationError> {
    let email = required_text("email", value)?;
    if !is_valid_email(&email) {
        return Err(ContactValidationError::new(
            "email",
            ValidationRule::InvalidEmail(email),
        ));
    }
    Ok(email)
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}
