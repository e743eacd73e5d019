use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::{format_instant, parse_instant, DatabaseError};
use crate::models::Patient;

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, name, created_at) VALUES (?1, ?2, ?3)",
        params![
            patient.id.to_string(),
            patient.name,
            format_instant(&patient.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, created_at FROM patients WHERE id = ?1",
            params![id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()?;

    row.map(|(id, name, created_at)| -> Result<Patient, DatabaseError> {
        Ok(Patient {
            id: parse_uuid("patients.id", &id)?,
            name,
            created_at: parse_instant("patients.created_at", &created_at)?,
        })
    })
    .transpose()
}
