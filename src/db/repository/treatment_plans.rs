use chrono::Utc;

use crate::db::{DatabaseError, DocumentStore};
use crate::models::{NewProgressEntry, TreatmentPlan, TreatmentPlanDraft};

use super::{missing_field, new_document_id, not_found};

pub fn list_treatment_plans(store: &DocumentStore) -> Result<Vec<TreatmentPlan>, DatabaseError> {
    store.list()
}

pub fn get_treatment_plan(store: &DocumentStore, id: &str) -> Result<TreatmentPlan, DatabaseError> {
    store
        .get::<TreatmentPlan>(id)?
        .ok_or_else(|| not_found("treatment plan", id))
}

pub fn create_treatment_plan(
    store: &DocumentStore,
    draft: TreatmentPlanDraft,
) -> Result<TreatmentPlan, DatabaseError> {
    let plan = TreatmentPlan::from_draft(new_document_id(), draft, Utc::now())
        .map_err(missing_field)?;
    store.insert(&plan)?;
    tracing::info!(id = %plan.id, "Treatment plan created");
    Ok(plan)
}

pub fn update_treatment_plan(
    store: &DocumentStore,
    id: &str,
    draft: TreatmentPlanDraft,
) -> Result<TreatmentPlan, DatabaseError> {
    store
        .modify::<TreatmentPlan, _>(id, |plan| {
            plan.apply(draft);
            Ok(())
        })
        .map_err(|e| rename_not_found(e, id))
}

/// Append a dated progress entry to the plan's history.
pub fn add_progress_entry(
    store: &DocumentStore,
    id: &str,
    entry: NewProgressEntry,
) -> Result<TreatmentPlan, DatabaseError> {
    if entry.notes.trim().is_empty() {
        return Err(missing_field("notes"));
    }
    store
        .modify::<TreatmentPlan, _>(id, |plan| {
            plan.record_progress(entry, Utc::now());
            Ok(())
        })
        .map_err(|e| rename_not_found(e, id))
}

fn rename_not_found(err: DatabaseError, id: &str) -> DatabaseError {
    match err {
        DatabaseError::NotFound { .. } => not_found("treatment plan", id),
        other => other,
    }
}
