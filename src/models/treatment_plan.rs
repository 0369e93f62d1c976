use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{DiscountType, PaymentStatus, TreatmentPlanStatus};
use super::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedTreatment {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
}

/// One line item of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTreatment {
    pub treatment: PricedTreatment,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub scheduled: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    #[serde(rename = "type")]
    pub kind: DiscountType,
    pub value: f64,
}

impl Discount {
    pub fn apply_to(&self, total: f64) -> f64 {
        let discounted = match self.kind {
            DiscountType::Percentage => total * (1.0 - self.value / 100.0),
            DiscountType::Fixed => total - self.value,
        };
        discounted.max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub date: DateTime<Utc>,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
}

/// Body of `POST /api/treatment-plans/:id/progress`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProgressEntry {
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentPlan {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub patient: String,
    pub provider: String,
    pub goal: String,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub status: TreatmentPlanStatus,
    #[serde(default)]
    pub treatments: Vec<PlanTreatment>,
    pub total_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    pub final_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Append-only, oldest first.
    #[serde(default)]
    pub progress_tracking: Vec<ProgressEntry>,
}

impl Entity for TreatmentPlan {
    const COLLECTION: &'static str = "treatment_plans";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Partial treatment plan sent by the client on create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentPlanDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TreatmentPlanStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatments: Option<Vec<PlanTreatment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Sum of price × quantity over all line items.
pub fn line_items_total(treatments: &[PlanTreatment]) -> f64 {
    treatments
        .iter()
        .map(|t| t.treatment.price * f64::from(t.quantity))
        .sum()
}

impl TreatmentPlan {
    /// Build the canonical record for a new plan.
    ///
    /// Missing prices are derived from the line items and the discount.
    pub fn from_draft(
        id: String,
        draft: TreatmentPlanDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, &'static str> {
        let name = draft.name.ok_or("name")?;
        let patient = draft.patient.ok_or("patient")?;
        let provider = draft.provider.ok_or("provider")?;
        let goal = draft.goal.ok_or("goal")?;
        let treatments = draft.treatments.unwrap_or_default();
        let total_price = draft
            .total_price
            .unwrap_or_else(|| line_items_total(&treatments));
        let final_price = draft.final_price.unwrap_or_else(|| match &draft.discount {
            Some(discount) => discount.apply_to(total_price),
            None => total_price,
        });

        Ok(Self {
            id,
            name,
            patient,
            provider,
            goal,
            start_date: draft.start_date.unwrap_or(now),
            end_date: draft.end_date,
            status: draft.status.unwrap_or_default(),
            treatments,
            total_price,
            discount: draft.discount,
            final_price,
            payment_method: draft.payment_method,
            payment_status: draft.payment_status.unwrap_or_default(),
            notes: draft.notes,
            progress_tracking: Vec::new(),
        })
    }

    /// Overwrite every field present in `draft`, then re-derive prices the
    /// draft changed the inputs of without pinning explicitly.
    pub fn apply(&mut self, draft: TreatmentPlanDraft) {
        let treatments_changed = draft.treatments.is_some();
        let pricing_changed =
            treatments_changed || draft.discount.is_some() || draft.total_price.is_some();

        if let Some(name) = draft.name {
            self.name = name;
        }
        if let Some(patient) = draft.patient {
            self.patient = patient;
        }
        if let Some(provider) = draft.provider {
            self.provider = provider;
        }
        if let Some(goal) = draft.goal {
            self.goal = goal;
        }
        if let Some(start) = draft.start_date {
            self.start_date = start;
        }
        if draft.end_date.is_some() {
            self.end_date = draft.end_date;
        }
        if let Some(status) = draft.status {
            self.status = status;
        }
        if let Some(treatments) = draft.treatments {
            self.treatments = treatments;
        }
        if draft.discount.is_some() {
            self.discount = draft.discount;
        }
        if draft.payment_method.is_some() {
            self.payment_method = draft.payment_method;
        }
        if let Some(payment) = draft.payment_status {
            self.payment_status = payment;
        }
        if draft.notes.is_some() {
            self.notes = draft.notes;
        }

        match draft.total_price {
            Some(total) => self.total_price = total,
            None if treatments_changed => self.total_price = line_items_total(&self.treatments),
            None => {}
        }
        match draft.final_price {
            Some(final_price) => self.final_price = final_price,
            None if pricing_changed => {
                self.final_price = match &self.discount {
                    Some(discount) => discount.apply_to(self.total_price),
                    None => self.total_price,
                };
            }
            None => {}
        }
    }

    pub fn record_progress(&mut self, entry: NewProgressEntry, date: DateTime<Utc>) {
        self.progress_tracking.push(ProgressEntry {
            date,
            notes: entry.notes,
            image_urls: entry.image_urls.unwrap_or_default(),
        });
    }
}
