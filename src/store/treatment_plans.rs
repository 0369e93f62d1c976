use super::{EntitySlice, RootState, Selection, Store};
use crate::client::OperationError;
use crate::models::{NewProgressEntry, TreatmentPlan, TreatmentPlanDraft};

const FETCH_ALL_FAILED: &str = "Failed to fetch treatment plans";
const FETCH_ONE_FAILED: &str = "Failed to fetch treatment plan";
const CREATE_FAILED: &str = "Failed to create treatment plan";
const UPDATE_FAILED: &str = "Failed to update treatment plan";
const PROGRESS_FAILED: &str = "Failed to add progress tracking entry";

fn treatment_plans(state: &mut RootState) -> &mut EntitySlice<TreatmentPlan> {
    &mut state.treatment_plans
}

impl Store {
    pub async fn fetch_treatment_plans(&self) -> Result<Vec<TreatmentPlan>, OperationError> {
        self.run(
            "treatmentPlans/fetchAll",
            treatment_plans,
            FETCH_ALL_FAILED,
            self.client.get("/api/treatment-plans".to_string()),
            |slice, list| slice.receive_all(list),
        )
        .await
    }

    pub async fn fetch_treatment_plan_by_id(
        &self,
        id: &str,
    ) -> Result<TreatmentPlan, OperationError> {
        self.run(
            "treatmentPlans/fetchById",
            treatment_plans,
            FETCH_ONE_FAILED,
            self.client.get(format!("/api/treatment-plans/{id}")),
            |slice, plan| slice.receive_one(plan),
        )
        .await
    }

    pub async fn create_treatment_plan(
        &self,
        draft: &TreatmentPlanDraft,
    ) -> Result<TreatmentPlan, OperationError> {
        self.run(
            "treatmentPlans/create",
            treatment_plans,
            CREATE_FAILED,
            self.client.post("/api/treatment-plans".to_string(), draft),
            |slice, plan| slice.receive_created(plan),
        )
        .await
    }

    pub async fn update_treatment_plan(
        &self,
        id: &str,
        draft: &TreatmentPlanDraft,
    ) -> Result<TreatmentPlan, OperationError> {
        self.run(
            "treatmentPlans/update",
            treatment_plans,
            UPDATE_FAILED,
            self.client.put(format!("/api/treatment-plans/{id}"), draft),
            |slice, plan| slice.receive_updated(plan, Selection::Replace),
        )
        .await
    }

    /// `POST /api/treatment-plans/:id/progress`: the server appends the
    /// entry and returns the whole plan.
    pub async fn add_progress_entry(
        &self,
        id: &str,
        entry: &NewProgressEntry,
    ) -> Result<TreatmentPlan, OperationError> {
        self.run(
            "treatmentPlans/addProgressTracking",
            treatment_plans,
            PROGRESS_FAILED,
            self.client.post(format!("/api/treatment-plans/{id}/progress"), entry),
            |slice, plan| slice.receive_updated(plan, Selection::Replace),
        )
        .await
    }
}
