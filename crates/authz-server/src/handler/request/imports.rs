//! Staff CSV import parsing.
//!
//! The file is comma separated with a header row:
//!
//! ```text
//! personal_identification_code,forename,surname,email,phone,department,roles
//! 37605030299,Mari,Maasikas,mari@example.ee,,Tõlkeosakond,Tõlkija;Toimetaja
//! ```
//!
//! `roles` holds role names separated by `;`. Empty `phone` and `department`
//! cells are allowed.

use std::collections::HashMap;

use serde::Deserialize;
use validator::Validate;

use super::validations::{
    validate_not_blank, validate_personal_identification_code, validate_phone_number,
};
use crate::handler::response::ValidationErrorDetail;

/// Expected header of a staff CSV file.
pub const STAFF_CSV_HEADER: [&str; 7] = [
    "personal_identification_code",
    "forename",
    "surname",
    "email",
    "phone",
    "department",
    "roles",
];

/// Separator of role names within the `roles` cell.
pub const ROLE_SEPARATOR: char = ';';

/// One parsed row of a staff CSV file.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StaffImportRow {
    #[validate(custom(function = "validate_personal_identification_code"))]
    pub personal_identification_code: String,
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub forename: String,
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub surname: String,
    #[validate(email, length(min = 3, max = 320))]
    pub email: String,
    #[validate(length(max = 50), custom(function = "validate_phone_number"))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub department: Option<String>,
    #[serde(default)]
    pub roles: String,
}

impl StaffImportRow {
    /// Returns the trimmed, non-empty role names of the row.
    pub fn role_names(&self) -> Vec<String> {
        self.roles
            .split(ROLE_SEPARATOR)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Returns whether the row names the person as `forename surname`,
    /// ignoring case and surrounding whitespace.
    pub fn names_match(&self, forename: &str, surname: &str) -> bool {
        let same = |a: &str, b: &str| a.trim().to_lowercase() == b.trim().to_lowercase();
        same(&self.forename, forename) && same(&self.surname, surname)
    }

    /// Returns the trimmed department name, if any.
    pub fn department_name(&self) -> Option<&str> {
        self.department
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Rows of a staff CSV file together with every row-level error.
#[derive(Debug, Default)]
pub struct StaffImport {
    /// Rows that passed field validation, with their zero-based row index.
    pub rows: Vec<(usize, StaffImportRow)>,
    /// Problems found while parsing and validating.
    pub errors: Vec<ValidationErrorDetail>,
    /// Number of data rows in the file.
    pub row_count: usize,
}

impl StaffImport {
    /// Parses and validates a staff CSV file.
    ///
    /// Parsing never stops at the first problem: every row is checked so that
    /// a dry run can report all errors at once.
    pub fn parse(data: &[u8]) -> Self {
        let mut import = Self::default();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(data);

        match reader.headers() {
            Ok(headers) if headers.iter().eq(STAFF_CSV_HEADER) => {}
            Ok(headers) => {
                import.errors.push(ValidationErrorDetail::new(
                    "header",
                    "invalid_header",
                    format!(
                        "Expected header `{}`, found `{}`",
                        STAFF_CSV_HEADER.join(","),
                        headers.iter().collect::<Vec<_>>().join(",")
                    ),
                ));
                return import;
            }
            Err(error) => {
                import.errors.push(ValidationErrorDetail::new(
                    "header",
                    "unreadable_csv",
                    error.to_string(),
                ));
                return import;
            }
        }

        let mut seen_codes: HashMap<String, usize> = HashMap::new();

        for (index, record) in reader.deserialize::<StaffImportRow>().enumerate() {
            import.row_count += 1;

            let row = match record {
                Ok(row) => row,
                Err(error) => {
                    import.errors.push(row_error(index, "row", "unreadable_row", error.to_string()));
                    continue;
                }
            };

            if let Err(errors) = row.validate() {
                for (field, field_errors) in errors.field_errors() {
                    for error in field_errors {
                        let message = error
                            .message
                            .as_ref()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| format!("Invalid value for {field}"));
                        import.errors.push(row_error(index, &field, &error.code, message));
                    }
                }
                continue;
            }

            if let Some(first) = seen_codes.get(&row.personal_identification_code) {
                import.errors.push(row_error(
                    index,
                    "personal_identification_code",
                    "duplicate_personal_identification_code",
                    format!("Personal identification code already appears on row {}", first + 1),
                ));
                continue;
            }
            seen_codes.insert(row.personal_identification_code.clone(), index);

            import.rows.push((index, row));
        }

        import
    }

    /// Returns whether no errors were found.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the distinct role names referenced by valid rows.
    pub fn role_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .rows
            .iter()
            .flat_map(|(_, row)| row.role_names())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

/// Builds an error for the data row at zero-based `index`.
pub fn row_error(
    index: usize,
    field: &str,
    code: &str,
    message: impl Into<String>,
) -> ValidationErrorDetail {
    ValidationErrorDetail::new(format!("rows[{index}].{field}"), code, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "personal_identification_code,forename,surname,email,phone,department,roles\n";

    #[test]
    fn parses_valid_rows() {
        let csv = format!(
            "{HEADER}37605030299,Mari,Maasikas,mari@example.ee,,Tõlkeosakond,Tõlkija; Toimetaja\n\
             49403136526,Jaan,Tamm,jaan@example.ee,+372 5555 5555,,Tõlkija\n"
        );

        let import = StaffImport::parse(csv.as_bytes());
        assert!(import.is_valid(), "{:?}", import.errors);
        assert_eq!(import.row_count, 2);
        assert_eq!(import.rows.len(), 2);

        let (_, first) = &import.rows[0];
        assert_eq!(first.role_names(), vec!["Tõlkija", "Toimetaja"]);
        assert_eq!(first.department_name(), Some("Tõlkeosakond"));
        assert_eq!(first.phone, None);

        let (_, second) = &import.rows[1];
        assert_eq!(second.department_name(), None);
        assert_eq!(import.role_names(), vec!["Toimetaja", "Tõlkija"]);
    }

    #[test]
    fn reports_every_invalid_row() {
        let csv = format!(
            "{HEADER}37605030291,Mari,Maasikas,mari@example.ee,,,Tõlkija\n\
             49403136526,,Tamm,not-an-email,,,Tõlkija\n"
        );

        let import = StaffImport::parse(csv.as_bytes());
        assert!(!import.is_valid());
        assert!(import.rows.is_empty());

        let fields: Vec<&str> = import.errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"rows[0].personal_identification_code"));
        assert!(fields.contains(&"rows[1].forename"));
        assert!(fields.contains(&"rows[1].email"));
    }

    #[test]
    fn rejects_duplicate_codes() {
        let csv = format!(
            "{HEADER}37605030299,Mari,Maasikas,mari@example.ee,,,Tõlkija\n\
             37605030299,Mari,Maasikas,mari2@example.ee,,,Tõlkija\n"
        );

        let import = StaffImport::parse(csv.as_bytes());
        assert_eq!(import.rows.len(), 1);
        assert_eq!(import.errors.len(), 1);
        assert_eq!(import.errors[0].code, "duplicate_personal_identification_code");
    }

    #[test]
    fn names_compare_loosely() {
        let csv = format!("{HEADER}37605030299, mari ,MAASIKAS,mari@example.ee,,,Tõlkija\n");
        let import = StaffImport::parse(csv.as_bytes());
        let (_, row) = &import.rows[0];

        assert!(row.names_match("Mari", "Maasikas"));
        assert!(!row.names_match("Mari", "Mustikas"));
        assert!(!row.names_match("Maria", "Maasikas"));
    }

    #[test]
    fn rejects_unexpected_header() {
        let import = StaffImport::parse(b"isikukood,nimi\n37605030299,Mari\n");
        assert_eq!(import.errors.len(), 1);
        assert_eq!(import.errors[0].field, "header");
        assert_eq!(import.row_count, 0);
    }
}
