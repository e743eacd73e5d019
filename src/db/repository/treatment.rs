use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{parse_optional_uuid, parse_uuid};
use crate::db::DatabaseError;
use crate::models::Treatment;

pub fn insert_treatment(conn: &Connection, treatment: &Treatment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO treatments (id, organization_id, name, dosage, frequency_hours,
         duration_days, instructions)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            treatment.id.to_string(),
            treatment.organization_id.map(|id| id.to_string()),
            treatment.name,
            treatment.dosage,
            treatment.frequency_hours,
            treatment.duration_days,
            treatment.instructions,
        ],
    )?;
    Ok(())
}

pub fn get_treatment(conn: &Connection, id: &Uuid) -> Result<Option<Treatment>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, organization_id, name, dosage, frequency_hours, duration_days, instructions
             FROM treatments WHERE id = ?1",
            params![id.to_string()],
            |row| {
                Ok(TreatmentRow {
                    id: row.get(0)?,
                    organization_id: row.get(1)?,
                    name: row.get(2)?,
                    dosage: row.get(3)?,
                    frequency_hours: row.get(4)?,
                    duration_days: row.get(5)?,
                    instructions: row.get(6)?,
                })
            },
        )
        .optional()?;

    row.map(treatment_from_row).transpose()
}

// Internal row type for Treatment mapping
struct TreatmentRow {
    id: String,
    organization_id: Option<String>,
    name: String,
    dosage: String,
    frequency_hours: Option<u32>,
    duration_days: Option<u32>,
    instructions: Option<String>,
}

fn treatment_from_row(row: TreatmentRow) -> Result<Treatment, DatabaseError> {
    Ok(Treatment {
        id: parse_uuid("treatments.id", &row.id)?,
        organization_id: parse_optional_uuid("treatments.organization_id", row.organization_id)?,
        name: row.name,
        dosage: row.dosage,
        frequency_hours: row.frequency_hours,
        duration_days: row.duration_days,
        instructions: row.instructions,
    })
}
