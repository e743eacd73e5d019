//! Repository layer — entity-scoped database operations.
//!
//! Free functions over a borrowed `Connection`, one sub-module per table
//! group. All public functions are re-exported here.

mod consultation;
mod patient;
mod reminder;
mod treatment;

use uuid::Uuid;

use super::DatabaseError;

pub use consultation::*;
pub use patient::*;
pub use reminder::*;
pub use treatment::*;

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value).map_err(|_| DatabaseError::InvalidId {
        field: field.into(),
        value: value.into(),
    })
}

fn parse_optional_uuid(field: &str, value: Option<String>) -> Result<Option<Uuid>, DatabaseError> {
    value.map(|v| parse_uuid(field, &v)).transpose()
}
