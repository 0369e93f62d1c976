use crate::db::{DatabaseError, DocumentStore};
use crate::models::{Appointment, AppointmentDraft, AppointmentStatus};

use super::{missing_field, new_document_id, not_found};

pub fn list_appointments(store: &DocumentStore) -> Result<Vec<Appointment>, DatabaseError> {
    store.list()
}

pub fn get_appointment(store: &DocumentStore, id: &str) -> Result<Appointment, DatabaseError> {
    store
        .get::<Appointment>(id)?
        .ok_or_else(|| not_found("appointment", id))
}

pub fn create_appointment(
    store: &DocumentStore,
    draft: AppointmentDraft,
) -> Result<Appointment, DatabaseError> {
    let appointment =
        Appointment::from_draft(new_document_id(), draft).map_err(missing_field)?;
    store.insert(&appointment)?;
    tracing::info!(id = %appointment.id, "Appointment created");
    Ok(appointment)
}

pub fn update_appointment(
    store: &DocumentStore,
    id: &str,
    draft: AppointmentDraft,
) -> Result<Appointment, DatabaseError> {
    store
        .modify::<Appointment, _>(id, |appointment| {
            appointment.apply(draft);
            Ok(())
        })
        .map_err(|e| rename_not_found(e, id))
}

/// Mark an appointment cancelled. Cancelling twice is a no-op.
pub fn cancel_appointment(store: &DocumentStore, id: &str) -> Result<Appointment, DatabaseError> {
    let appointment = store
        .modify::<Appointment, _>(id, |appointment| {
            appointment.status = AppointmentStatus::Cancelled;
            Ok(())
        })
        .map_err(|e| rename_not_found(e, id))?;
    tracing::info!(id = %id, "Appointment cancelled");
    Ok(appointment)
}

fn rename_not_found(err: DatabaseError, id: &str) -> DatabaseError {
    match err {
        DatabaseError::NotFound { .. } => not_found("appointment", id),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookedTreatment;
    use chrono::Utc;

    fn draft() -> AppointmentDraft {
        AppointmentDraft {
            patient: Some("p1".into()),
            provider: Some("dr1".into()),
            treatment: Some(BookedTreatment {
                id: "t1".into(),
                name: "Microneedling".into(),
                duration: 60,
            }),
            date: Some(Utc::now()),
            ..Default::default()
        }
    }

    #[test]
    fn create_assigns_id_and_defaults() {
        let store = DocumentStore::open_in_memory().unwrap();
        let created = create_appointment(&store, draft()).unwrap();
        assert_eq!(created.id.len(), 32);
        assert_eq!(created.status, AppointmentStatus::Scheduled);
        assert_eq!(get_appointment(&store, &created.id).unwrap(), created);
    }

    #[test]
    fn create_without_patient_is_rejected() {
        let store = DocumentStore::open_in_memory().unwrap();
        let mut d = draft();
        d.patient = None;
        let err = create_appointment(&store, d).unwrap_err();
        assert_eq!(err.to_string(), "Constraint violated: patient is required");
        assert!(list_appointments(&store).unwrap().is_empty());
    }

    #[test]
    fn update_merges_partial_record() {
        let store = DocumentStore::open_in_memory().unwrap();
        let created = create_appointment(&store, draft()).unwrap();
        let updated = update_appointment(
            &store,
            &created.id,
            AppointmentDraft {
                location: Some("Suite B".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.location.as_deref(), Some("Suite B"));
        assert_eq!(updated.patient, "p1");
        assert_eq!(list_appointments(&store).unwrap().len(), 1);
    }

    #[test]
    fn cancel_sets_status() {
        let store = DocumentStore::open_in_memory().unwrap();
        let created = create_appointment(&store, draft()).unwrap();
        let cancelled = cancel_appointment(&store, &created.id).unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
        let again = cancel_appointment(&store, &created.id).unwrap();
        assert_eq!(again.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = DocumentStore::open_in_memory().unwrap();
        assert!(matches!(
            get_appointment(&store, "missing"),
            Err(DatabaseError::NotFound { .. })
        ));
        let err = cancel_appointment(&store, "missing").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Entity not found: appointment with id missing"
        );
    }
}
