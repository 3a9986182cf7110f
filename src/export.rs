use csv::{QuoteStyle, Terminator, WriterBuilder};
use strum_macros::{AsRefStr, EnumString};

use crate::error::AppError;
use crate::model::staff::StaffRecord;

/// Which side of the checked-in split to export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportKind {
    #[default]
    Logados,
    Nao,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportKind {
    pub fn parse_input(raw: Option<&str>) -> Result<Self, AppError> {
        parse_or_default(raw, "type")
    }

    pub fn select(self, records: Vec<StaffRecord>) -> Vec<StaffRecord> {
        let want_checked_in = self == ExportKind::Logados;
        records
            .into_iter()
            .filter(|r| r.checked_in == want_checked_in)
            .collect()
    }

    pub fn file_name(self, format: ExportFormat) -> String {
        format!("{}-logados.{}", self.as_ref(), format.as_ref())
    }
}

impl ExportFormat {
    pub fn parse_input(raw: Option<&str>) -> Result<Self, AppError> {
        parse_or_default(raw, "format")
    }
}

fn parse_or_default<T>(raw: Option<&str>, field: &str) -> Result<T, AppError>
where
    T: std::str::FromStr + Default,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(value) => value
            .parse()
            .map_err(|_| AppError::Validation(format!("Invalid export {}: {}", field, value))),
    }
}

/// Every field quoted, embedded quotes doubled.
pub fn to_csv(records: &[StaffRecord]) -> Result<String, AppError> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(["id", "name", "status", "checkedIn"])?;

    for r in records {
        wtr.write_record([
            r.id.to_string(),
            r.name.clone(),
            r.status.as_ref().to_string(),
            if r.checked_in { "1" } else { "0" }.to_string(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Export(csv::Error::from(e.into_error())))?;

    String::from_utf8(bytes).map_err(|e| {
        AppError::Export(csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e,
        )))
    })
}
