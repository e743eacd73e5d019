use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{parse_optional_uuid, parse_uuid};
use crate::db::{format_instant, is_unique_violation, parse_instant, DatabaseError};
use crate::models::{Consultation, ConsultationTreatment};

pub fn insert_consultation(conn: &Connection, consultation: &Consultation) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO consultations (id, patient_id, organization_id, consultation_date, reason)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            consultation.id.to_string(),
            consultation.patient_id.map(|id| id.to_string()),
            consultation.organization_id.map(|id| id.to_string()),
            format_instant(&consultation.consultation_date),
            consultation.reason,
        ],
    )?;
    Ok(())
}

pub fn get_consultation(conn: &Connection, id: &Uuid) -> Result<Option<Consultation>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_id, organization_id, consultation_date, reason
             FROM consultations WHERE id = ?1",
            params![id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            },
        )
        .optional()?;

    row.map(|(id, patient_id, organization_id, date, reason)| -> Result<Consultation, DatabaseError> {
        Ok(Consultation {
            id: parse_uuid("consultations.id", &id)?,
            patient_id: parse_optional_uuid("consultations.patient_id", patient_id)?,
            organization_id: parse_optional_uuid("consultations.organization_id", organization_id)?,
            consultation_date: parse_instant("consultations.consultation_date", &date)?,
            reason,
        })
    })
    .transpose()
}

/// Link a treatment to a consultation. A second link for the same pair
/// is a `ConstraintViolation`.
pub fn insert_consultation_treatment(
    conn: &Connection,
    link: &ConsultationTreatment,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO consultation_treatments (consultation_id, treatment_id, assigned_at)
         VALUES (?1, ?2, ?3)",
        params![
            link.consultation_id.to_string(),
            link.treatment_id.to_string(),
            format_instant(&link.assigned_at),
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            DatabaseError::ConstraintViolation(format!(
                "treatment {} already assigned to consultation {}",
                link.treatment_id, link.consultation_id
            ))
        } else {
            DatabaseError::Sqlite(e)
        }
    })?;
    Ok(())
}

pub fn get_consultation_treatments(
    conn: &Connection,
    consultation_id: &Uuid,
) -> Result<Vec<ConsultationTreatment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT consultation_id, treatment_id, assigned_at
         FROM consultation_treatments WHERE consultation_id = ?1
         ORDER BY assigned_at ASC",
    )?;

    let rows = stmt.query_map(params![consultation_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut links = Vec::new();
    for row in rows {
        let (consultation_id, treatment_id, assigned_at) = row?;
        links.push(ConsultationTreatment {
            consultation_id: parse_uuid("consultation_treatments.consultation_id", &consultation_id)?,
            treatment_id: parse_uuid("consultation_treatments.treatment_id", &treatment_id)?,
            assigned_at: parse_instant("consultation_treatments.assigned_at", &assigned_at)?,
        });
    }
    Ok(links)
}
