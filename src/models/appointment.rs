use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;
use super::Entity;

/// Treatment booked by an appointment, embedded as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookedTreatment {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Minutes.
    pub duration: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentNotes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_appointment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_appointment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    #[serde(default)]
    pub recommended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_after: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_treatment: Option<String>,
    #[serde(default)]
    pub booked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_appointment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: String,
    pub patient: String,
    pub provider: String,
    pub treatment: BookedTreatment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment_plan: Option<String>,
    pub date: DateTime<Utc>,
    /// Minutes.
    pub duration: u32,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<AppointmentNotes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<FollowUp>,
    #[serde(default)]
    pub feedback_submitted: bool,
}

impl Entity for Appointment {
    const COLLECTION: &'static str = "appointments";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Partial appointment sent by the client on create and update.
/// Absent fields are left untouched by an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<BookedTreatment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<AppointmentNotes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<FollowUp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_submitted: Option<bool>,
}

impl Appointment {
    /// Build the canonical record for a new appointment.
    ///
    /// Returns the name of the first missing required field on failure.
    /// Duration defaults to the booked treatment's duration.
    pub fn from_draft(id: String, draft: AppointmentDraft) -> Result<Self, &'static str> {
        let patient = draft.patient.ok_or("patient")?;
        let provider = draft.provider.ok_or("provider")?;
        let treatment = draft.treatment.ok_or("treatment")?;
        let date = draft.date.ok_or("date")?;
        let duration = draft.duration.unwrap_or(treatment.duration);

        Ok(Self {
            id,
            patient,
            provider,
            treatment,
            treatment_plan: draft.treatment_plan,
            date,
            duration,
            status: draft.status.unwrap_or_default(),
            notes: draft.notes,
            location: draft.location,
            follow_up: draft.follow_up,
            feedback_submitted: draft.feedback_submitted.unwrap_or(false),
        })
    }

    /// Overwrite every field present in `draft`. The id never changes.
    pub fn apply(&mut self, draft: AppointmentDraft) {
        if let Some(patient) = draft.patient {
            self.patient = patient;
        }
        if let Some(provider) = draft.provider {
            self.provider = provider;
        }
        if let Some(treatment) = draft.treatment {
            self.treatment = treatment;
        }
        if draft.treatment_plan.is_some() {
            self.treatment_plan = draft.treatment_plan;
        }
        if let Some(date) = draft.date {
            self.date = date;
        }
        if let Some(duration) = draft.duration {
            self.duration = duration;
        }
        if let Some(status) = draft.status {
            self.status = status;
        }
        if draft.notes.is_some() {
            self.notes = draft.notes;
        }
        if draft.location.is_some() {
            self.location = draft.location;
        }
        if draft.follow_up.is_some() {
            self.follow_up = draft.follow_up;
        }
        if let Some(submitted) = draft.feedback_submitted {
            self.feedback_submitted = submitted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn botox() -> BookedTreatment {
        BookedTreatment {
            id: "t1".into(),
            name: "Botox".into(),
            duration: 30,
        }
    }

    #[test]
    fn deserializes_server_shape() {
        let json = serde_json::json!({
            "_id": "a1",
            "patient": "p1",
            "provider": "dr1",
            "treatment": { "_id": "t1", "name": "Botox", "duration": 30 },
            "date": "2024-05-01T10:00:00Z",
            "duration": 30,
            "status": "no-show",
            "followUp": { "recommended": true, "daysAfter": 14, "booked": false },
            "feedbackSubmitted": false
        });
        let appt: Appointment = serde_json::from_value(json).unwrap();
        assert_eq!(appt.id, "a1");
        assert_eq!(appt.status, AppointmentStatus::NoShow);
        assert_eq!(appt.follow_up.unwrap().days_after, Some(14));
        assert!(appt.notes.is_none());
    }

    #[test]
    fn serializes_id_as_underscore_id() {
        let appt = Appointment::from_draft(
            "a1".into(),
            AppointmentDraft {
                patient: Some("p1".into()),
                provider: Some("dr1".into()),
                treatment: Some(botox()),
                date: Some(Utc::now()),
                ..Default::default()
            },
        )
        .unwrap();
        let value = serde_json::to_value(&appt).unwrap();
        assert_eq!(value["_id"], "a1");
        assert_eq!(value["feedbackSubmitted"], false);
        assert!(value.get("location").is_none());
    }

    #[test]
    fn from_draft_applies_defaults() {
        let appt = Appointment::from_draft(
            "a1".into(),
            AppointmentDraft {
                patient: Some("p1".into()),
                provider: Some("dr1".into()),
                treatment: Some(botox()),
                date: Some(Utc::now()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(appt.status, AppointmentStatus::Scheduled);
        assert_eq!(appt.duration, 30);
        assert!(!appt.feedback_submitted);
    }

    #[test]
    fn from_draft_reports_missing_field() {
        let err = Appointment::from_draft(
            "a1".into(),
            AppointmentDraft {
                patient: Some("p1".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err, "provider");
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut appt = Appointment::from_draft(
            "a1".into(),
            AppointmentDraft {
                patient: Some("p1".into()),
                provider: Some("dr1".into()),
                treatment: Some(botox()),
                date: Some(Utc::now()),
                location: Some("Room 2".into()),
                ..Default::default()
            },
        )
        .unwrap();
        appt.apply(AppointmentDraft {
            status: Some(AppointmentStatus::Confirmed),
            duration: Some(45),
            ..Default::default()
        });
        assert_eq!(appt.id, "a1");
        assert_eq!(appt.status, AppointmentStatus::Confirmed);
        assert_eq!(appt.duration, 45);
        assert_eq!(appt.location.as_deref(), Some("Room 2"));
        assert_eq!(appt.patient, "p1");
    }
}
