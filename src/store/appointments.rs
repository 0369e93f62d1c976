use serde_json::json;

use super::{EntitySlice, RootState, Selection, Store};
use crate::client::OperationError;
use crate::models::{Appointment, AppointmentDraft};

const FETCH_ALL_FAILED: &str = "Failed to fetch appointments";
const FETCH_ONE_FAILED: &str = "Failed to fetch appointment";
const CREATE_FAILED: &str = "Failed to create appointment";
const UPDATE_FAILED: &str = "Failed to update appointment";
const CANCEL_FAILED: &str = "Failed to cancel appointment";

fn appointments(state: &mut RootState) -> &mut EntitySlice<Appointment> {
    &mut state.appointments
}

impl Store {
    /// `GET /api/appointments`: replaces the collection.
    pub async fn fetch_appointments(&self) -> Result<Vec<Appointment>, OperationError> {
        self.run(
            "appointments/fetchAll",
            appointments,
            FETCH_ALL_FAILED,
            self.client.get("/api/appointments".to_string()),
            |slice, list| slice.receive_all(list),
        )
        .await
    }

    /// `GET /api/appointments/:id`: replaces the selection.
    pub async fn fetch_appointment_by_id(&self, id: &str) -> Result<Appointment, OperationError> {
        self.run(
            "appointments/fetchById",
            appointments,
            FETCH_ONE_FAILED,
            self.client.get(format!("/api/appointments/{id}")),
            |slice, appointment| slice.receive_one(appointment),
        )
        .await
    }

    /// `POST /api/appointments`: appends and selects the created record.
    pub async fn create_appointment(
        &self,
        draft: &AppointmentDraft,
    ) -> Result<Appointment, OperationError> {
        self.run(
            "appointments/create",
            appointments,
            CREATE_FAILED,
            self.client.post("/api/appointments".to_string(), draft),
            |slice, appointment| slice.receive_created(appointment),
        )
        .await
    }

    /// `PUT /api/appointments/:id`
    pub async fn update_appointment(
        &self,
        id: &str,
        draft: &AppointmentDraft,
    ) -> Result<Appointment, OperationError> {
        self.run(
            "appointments/update",
            appointments,
            UPDATE_FAILED,
            self.client.put(format!("/api/appointments/{id}"), draft),
            |slice, appointment| slice.receive_updated(appointment, Selection::Replace),
        )
        .await
    }

    /// `PUT /api/appointments/:id/cancel`: the selection is refreshed only
    /// when it is the cancelled appointment.
    pub async fn cancel_appointment(&self, id: &str) -> Result<Appointment, OperationError> {
        self.run(
            "appointments/cancel",
            appointments,
            CANCEL_FAILED,
            self.client.put(format!("/api/appointments/{id}/cancel"), &json!({})),
            |slice, appointment| slice.receive_updated(appointment, Selection::IfSelected),
        )
        .await
    }
}
