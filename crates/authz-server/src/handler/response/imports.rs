//! Staff import and export response types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ValidationErrorDetail;
use crate::handler::request::STAFF_CSV_HEADER;

/// Outcome of validating a staff CSV file without writing.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportValidation {
    /// Number of data rows in the file.
    pub row_count: usize,
    /// Whether the file can be imported as is.
    pub is_valid: bool,
    /// Every problem found, keyed by row and column.
    pub errors: Vec<ValidationErrorDetail>,
}

/// Outcome of a completed staff import.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Number of imported rows.
    pub row_count: usize,
    /// Number of persons created because their code was unknown.
    pub created_users: usize,
    /// Number of memberships created.
    pub created_institution_users: usize,
    /// Number of departments created for unknown names.
    pub created_departments: usize,
}

/// One row of a staff CSV export.
///
/// Serialized with the same header the import accepts, so an export can be
/// edited and imported into another institution.
#[derive(Debug, Clone, Serialize)]
pub struct StaffExportRow {
    pub personal_identification_code: String,
    pub forename: String,
    pub surname: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub roles: String,
}

/// Writes export rows as CSV with the import header.
pub fn write_staff_csv(rows: &[StaffExportRow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(STAFF_CSV_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|error| csv::Error::from(error.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::request::StaffImport;

    #[test]
    fn export_can_be_imported() -> anyhow::Result<()> {
        let rows = vec![StaffExportRow {
            personal_identification_code: "37605030299".to_owned(),
            forename: "Mari".to_owned(),
            surname: "Maasikas".to_owned(),
            email: "mari@example.ee".to_owned(),
            phone: None,
            department: Some("Tõlkeosakond".to_owned()),
            roles: "Tõlkija;Toimetaja".to_owned(),
        }];

        let bytes = write_staff_csv(&rows)?;
        let import = StaffImport::parse(&bytes);

        assert!(import.is_valid(), "{:?}", import.errors);
        assert_eq!(import.rows.len(), 1);
        assert_eq!(import.rows[0].1.role_names(), vec!["Tõlkija", "Toimetaja"]);
        Ok(())
    }
}
