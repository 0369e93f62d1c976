use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string that names no variant of the target status enum.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The string form is also the JSON wire form.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(AppointmentStatus {
    Scheduled => "scheduled",
    Confirmed => "confirmed",
    Completed => "completed",
    Cancelled => "cancelled",
    NoShow => "no-show",
});

str_enum!(TreatmentPlanStatus {
    Active => "active",
    Completed => "completed",
    Cancelled => "cancelled",
    OnHold => "on-hold",
});

str_enum!(PaymentStatus {
    Unpaid => "unpaid",
    Partial => "partial",
    Paid => "paid",
});

str_enum!(DiscountType {
    Percentage => "percentage",
    Fixed => "fixed",
});

str_enum!(NotificationKind {
    Success => "success",
    Error => "error",
    Info => "info",
    Warning => "warning",
});

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::Scheduled
    }
}

impl Default for TreatmentPlanStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Unpaid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn appointment_status_uses_hyphenated_no_show() {
        assert_eq!(AppointmentStatus::NoShow.as_str(), "no-show");
        assert_eq!(
            AppointmentStatus::from_str("no-show").unwrap(),
            AppointmentStatus::NoShow
        );
        let json = serde_json::to_string(&AppointmentStatus::NoShow).unwrap();
        assert_eq!(json, "\"no-show\"");
    }

    #[test]
    fn treatment_plan_status_on_hold_wire_form() {
        let parsed: TreatmentPlanStatus = serde_json::from_str("\"on-hold\"").unwrap();
        assert_eq!(parsed, TreatmentPlanStatus::OnHold);
        assert_eq!(parsed.to_string(), "on-hold");
    }

    #[test]
    fn defaults_match_server_side_creation() {
        assert_eq!(AppointmentStatus::default(), AppointmentStatus::Scheduled);
        assert_eq!(TreatmentPlanStatus::default(), TreatmentPlanStatus::Active);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Unpaid);
    }

    #[test]
    fn unknown_value_names_the_enum() {
        let err = AppointmentStatus::from_str("noshow").unwrap_err();
        assert_eq!(err.kind, "AppointmentStatus");
        assert_eq!(err.to_string(), "Unknown AppointmentStatus value: \"noshow\"");
        assert!(TreatmentPlanStatus::from_str("on_hold").is_err());
        assert!(NotificationKind::from_str("").is_err());
        assert!(serde_json::from_str::<PaymentStatus>("\"refunded\"").is_err());
    }
}
