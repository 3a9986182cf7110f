use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::error::AppError;

/// Fixed set of staff states. Stored and sent over the wire as the short
/// Portuguese labels the front-end already uses.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    EnumString,
    AsRefStr,
    Display,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum StaffStatus {
    #[default]
    #[serde(rename = "ativo")]
    #[strum(serialize = "ativo")]
    Active,
    #[serde(rename = "ferias")]
    #[strum(serialize = "ferias")]
    Vacation,
    #[serde(rename = "atestado")]
    #[strum(serialize = "atestado")]
    MedicalLeave,
    #[serde(rename = "folga")]
    #[strum(serialize = "folga")]
    DayOff,
    #[serde(rename = "folga_compensatoria")]
    #[strum(serialize = "folga_compensatoria")]
    CompensatoryDayOff,
    #[serde(rename = "ausente")]
    #[strum(serialize = "ausente")]
    Away,
}

// used by the FromRow derive to decode the `status` TEXT column
impl TryFrom<String> for StaffStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl StaffStatus {
    /// Missing or blank input falls back to `Active`.
    pub fn parse_input(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(StaffStatus::Active),
            Some(value) => value
                .parse()
                .map_err(|_| AppError::Validation(format!("Invalid status: {}", value))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "name": "Maria Souza",
        "status": "ativo",
        "checkedIn": true
    })
)]
pub struct StaffRecord {
    #[schema(example = 7)]
    pub id: i64,

    #[sqlx(rename = "nome")]
    #[schema(example = "Maria Souza")]
    pub name: String,

    #[sqlx(try_from = "String")]
    pub status: StaffStatus,

    #[sqlx(rename = "logado")]
    #[serde(rename = "checkedIn")]
    #[schema(example = true)]
    pub checked_in: bool,
}

/// Validated name/status pair used by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffDraft {
    pub name: String,
    pub status: StaffStatus,
}

impl StaffDraft {
    pub fn new(name: Option<&str>, status: Option<&str>) -> Result<Self, AppError> {
        let name = name.map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            status: StaffStatus::parse_input(status)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn status_labels_parse_back() {
        for status in StaffStatus::iter() {
            assert_eq!(status.as_ref().parse::<StaffStatus>().unwrap(), status);
        }
        assert_eq!("FERIAS".parse::<StaffStatus>().unwrap(), StaffStatus::Vacation);
    }

    #[test]
    fn missing_status_defaults_to_active() {
        assert_eq!(StaffStatus::parse_input(None).unwrap(), StaffStatus::Active);
        assert_eq!(StaffStatus::parse_input(Some("  ")).unwrap(), StaffStatus::Active);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = StaffStatus::parse_input(Some("promoted")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn draft_trims_and_requires_name() {
        let draft = StaffDraft::new(Some("  Ana  "), Some("atestado")).unwrap();
        assert_eq!(draft.name, "Ana");
        assert_eq!(draft.status, StaffStatus::MedicalLeave);

        assert!(matches!(
            StaffDraft::new(Some("   "), None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(StaffDraft::new(None, None), Err(AppError::Validation(_))));
    }

    #[test]
    fn record_serializes_checked_in_in_camel_case() {
        let record = StaffRecord {
            id: 3,
            name: "Rui".to_string(),
            status: StaffStatus::DayOff,
            checked_in: false,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": 3, "name": "Rui", "status": "folga", "checkedIn": false})
        );
    }
}
