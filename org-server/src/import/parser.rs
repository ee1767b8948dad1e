//! CSV parsing and row validation (phase 1)
//!
//! Each header is classified once into a [`Column`]; every cell is then
//! dispatched on that classification. Row problems become [`RowError`]s and
//! never abort the file. Only a structurally unusable file fails as a whole.

use std::collections::{HashMap, HashSet};

use csv::{ReaderBuilder, StringRecord, Trim};
use shared::error::{AppError, ErrorCode};
use shared::models::{Department, EmployeeCreate, Location};
use shared::util::{normalize_date, normalize_key};
use thiserror::Error;

use super::linkage::ManagerRef;
use crate::utils::validation::validate_employee_create;

// ===== Column classification =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    FirstName,
    LastName,
    Email,
    JobDescription,
    ManagementCategory,
    ServiceAssignmentCode,
    Gender,
    Phone,
    ImageUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    StartDate,
    Birthday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceField {
    DepartmentId,
    DepartmentName,
    LocationId,
    LocationName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationField {
    ManagerEmail,
    ManagerCode,
}

/// What a CSV column feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Identity(IdentityField),
    Date(DateField),
    Reference(ReferenceField),
    Relation(RelationField),
    Ignored,
}

impl Column {
    /// Case-insensitive, punctuation-blind header match
    pub fn classify(header: &str) -> Self {
        use IdentityField::*;
        match normalize_key(header).as_str() {
            "firstname" => Column::Identity(FirstName),
            "lastname" => Column::Identity(LastName),
            "professionalemail" | "professionnalemail" | "email" => Column::Identity(Email),
            "jobdescription" | "jobtitle" => Column::Identity(JobDescription),
            "managementcategory" => Column::Identity(ManagementCategory),
            "serviceassignmentcode" => Column::Identity(ServiceAssignmentCode),
            "gender" => Column::Identity(Gender),
            "phonenumber" | "phone" => Column::Identity(Phone),
            "imageurl" | "image" => Column::Identity(ImageUrl),
            "startdate" => Column::Date(DateField::StartDate),
            "birthday" | "birthdate" => Column::Date(DateField::Birthday),
            "departmentid" => Column::Reference(ReferenceField::DepartmentId),
            "departmentname" | "department" => Column::Reference(ReferenceField::DepartmentName),
            "locationid" => Column::Reference(ReferenceField::LocationId),
            "locationname" | "location" => Column::Reference(ReferenceField::LocationName),
            "manageremail" => Column::Relation(RelationField::ManagerEmail),
            "managercode" | "managerserviceassignmentcode" => {
                Column::Relation(RelationField::ManagerCode)
            }
            _ => Column::Ignored,
        }
    }
}

/// Columns every file must carry, with the name reported when absent
const REQUIRED_COLUMNS: [(IdentityField, &str); 4] = [
    (IdentityField::FirstName, "firstname"),
    (IdentityField::LastName, "lastname"),
    (IdentityField::Email, "professionalEmail"),
    (IdentityField::JobDescription, "jobDescription"),
];

// ===== Errors =====

/// The whole file is unusable; nothing is imported
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV file is empty")]
    EmptyFile,

    #[error("CSV header is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),

    #[error("CSV header could not be read: {0}")]
    Header(#[from] csv::Error),
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match &err {
            ImportError::EmptyFile => AppError::new(ErrorCode::ImportEmptyFile),
            ImportError::MissingColumns(missing) => {
                AppError::with_message(ErrorCode::ImportMissingColumns, err.to_string())
                    .with_detail("missing", missing.clone())
            }
            ImportError::Header(_) => AppError::with_message(ErrorCode::InvalidFormat, err.to_string()),
        }
    }
}

/// One skipped row
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("line {line}: missing required field '{field}'")]
    MissingField { line: u64, field: &'static str },

    #[error("line {line}: unreadable record: {message}")]
    Malformed { line: u64, message: String },

    /// Same rules as a manually created member
    #[error("line {line}: {message}")]
    Invalid { line: u64, message: String },
}

// ===== Reference catalog =====

/// Departments and locations known before the import starts
#[derive(Debug, Default)]
pub struct ReferenceCatalog {
    department_ids: HashSet<i64>,
    department_names: HashMap<String, i64>,
    location_ids: HashSet<i64>,
    location_names: HashMap<String, i64>,
}

impl ReferenceCatalog {
    pub fn new(departments: &[Department], locations: &[Location]) -> Self {
        Self {
            department_ids: departments.iter().map(|d| d.id).collect(),
            department_names: departments
                .iter()
                .map(|d| (d.name.trim().to_lowercase(), d.id))
                .collect(),
            location_ids: locations.iter().map(|l| l.id).collect(),
            location_names: locations
                .iter()
                .map(|l| (l.name.trim().to_lowercase(), l.id))
                .collect(),
        }
    }

    fn resolve(
        ids: &HashSet<i64>,
        names: &HashMap<String, i64>,
        id: Option<&str>,
        name: Option<&str>,
        kind: &str,
        line: u64,
    ) -> Option<i64> {
        if let Some(raw) = id {
            match raw.parse::<i64>() {
                Ok(v) if ids.contains(&v) => return Some(v),
                _ => tracing::warn!(line, kind, id = raw, "Unknown id, field left unset"),
            }
        }
        let name = name?;
        let found = names.get(&name.to_lowercase()).copied();
        if found.is_none() {
            tracing::warn!(line, kind, name, "Unknown name, field left unset");
        }
        found
    }
}

// ===== Parsed output =====

/// A validated row, ready for bulk creation
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub line: u64,
    /// Never carries `manager_id`; the manager link is deferred
    pub payload: EmployeeCreate,
    pub manager: Option<ManagerRef>,
}

#[derive(Debug, Default)]
pub struct ParsedCsv {
    pub delimiter: u8,
    pub rows: Vec<ParsedRow>,
    pub errors: Vec<RowError>,
}

/// Cell values of one record, grouped by column category
#[derive(Debug, Default)]
struct RowDraft {
    identity: HashMap<IdentityField, String>,
    dates: HashMap<DateField, String>,
    references: HashMap<ReferenceField, String>,
    relations: HashMap<RelationField, String>,
}

impl RowDraft {
    fn collect(columns: &[Column], record: &StringRecord) -> Self {
        let mut draft = Self::default();
        for (column, value) in columns.iter().zip(record.iter()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let value = value.to_string();
            match *column {
                Column::Identity(f) => {
                    draft.identity.insert(f, value);
                }
                Column::Date(f) => {
                    draft.dates.insert(f, value);
                }
                Column::Reference(f) => {
                    draft.references.insert(f, value);
                }
                Column::Relation(f) => {
                    draft.relations.insert(f, value);
                }
                Column::Ignored => {}
            }
        }
        draft
    }

    fn is_blank(&self) -> bool {
        self.identity.is_empty()
            && self.dates.is_empty()
            && self.references.is_empty()
            && self.relations.is_empty()
    }

    fn date(&mut self, field: DateField, line: u64) -> Option<String> {
        let raw = self.dates.remove(&field)?;
        let normalized = normalize_date(&raw);
        if normalized.is_none() {
            tracing::warn!(line, field = ?field, value = %raw, "Invalid date, field left unset");
        }
        normalized
    }

    fn finish(
        mut self,
        line: u64,
        catalog: &ReferenceCatalog,
        code: impl FnOnce() -> String,
    ) -> Result<ParsedRow, RowError> {
        let mut required = |field: IdentityField, name: &'static str| {
            self.identity
                .remove(&field)
                .ok_or(RowError::MissingField { line, field: name })
        };
        let firstname = required(IdentityField::FirstName, "firstname")?;
        let lastname = required(IdentityField::LastName, "lastname")?;
        let professional_email = required(IdentityField::Email, "professionalEmail")?;
        let job_description = required(IdentityField::JobDescription, "jobDescription")?;

        let start_date = self.date(DateField::StartDate, line);
        let birthday = self.date(DateField::Birthday, line);

        let department_id = ReferenceCatalog::resolve(
            &catalog.department_ids,
            &catalog.department_names,
            self.references.get(&ReferenceField::DepartmentId).map(String::as_str),
            self.references.get(&ReferenceField::DepartmentName).map(String::as_str),
            "department",
            line,
        );
        let location_id = ReferenceCatalog::resolve(
            &catalog.location_ids,
            &catalog.location_names,
            self.references.get(&ReferenceField::LocationId).map(String::as_str),
            self.references.get(&ReferenceField::LocationName).map(String::as_str),
            "location",
            line,
        );

        let manager = match (
            self.relations.remove(&RelationField::ManagerEmail),
            self.relations.remove(&RelationField::ManagerCode),
        ) {
            (Some(email), _) => Some(ManagerRef::Email(email)),
            (None, Some(code)) => Some(ManagerRef::Code(code)),
            (None, None) => None,
        };

        let service_assignment_code = self
            .identity
            .remove(&IdentityField::ServiceAssignmentCode)
            .unwrap_or_else(code);

        let payload = EmployeeCreate {
            firstname,
            lastname,
            gender: self.identity.remove(&IdentityField::Gender),
            start_date,
            birthday,
            job_description,
            management_category: self.identity.remove(&IdentityField::ManagementCategory),
            service_assignment_code: Some(service_assignment_code),
            professional_email,
            phone_number: self.identity.remove(&IdentityField::Phone),
            image_url: self.identity.remove(&IdentityField::ImageUrl),
            department_id,
            location_id,
            manager_id: None,
        };
        validate_employee_create(&payload).map_err(|e| RowError::Invalid {
            line,
            message: e.message,
        })?;

        Ok(ParsedRow {
            line,
            payload,
            manager,
        })
    }
}

// ===== Parsing =====

/// `;` when the header has more semicolons than commas, `,` otherwise
pub fn detect_delimiter(header_line: &str) -> u8 {
    let commas = header_line.matches(',').count();
    let semicolons = header_line.matches(';').count();
    if semicolons > commas { b';' } else { b',' }
}

/// Re-split a record that collapsed into one field because it uses the other delimiter
fn resplit(record: StringRecord, delimiter: u8) -> StringRecord {
    let other = if delimiter == b',' { b';' } else { b',' };
    if record.len() != 1 || !record[0].contains(other as char) {
        return record;
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(other)
        .from_reader(record[0].as_bytes());
    match reader.records().next() {
        Some(Ok(resplit)) => resplit,
        _ => record,
    }
}

/// Parse the whole file.
///
/// `next_code` produces the placeholder service assignment code for a row
/// that has none; it receives the 1-based count of valid rows so far.
pub fn parse(
    text: &str,
    catalog: &ReferenceCatalog,
    mut next_code: impl FnMut(usize) -> String,
) -> Result<ParsedCsv, ImportError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let header_line = text
        .lines()
        .find(|l| !l.trim().is_empty())
        .ok_or(ImportError::EmptyFile)?;
    let delimiter = detect_delimiter(header_line);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_reader(text.trim_start().as_bytes());

    let columns: Vec<Column> = reader.headers()?.iter().map(Column::classify).collect();
    let missing: Vec<&'static str> = REQUIRED_COLUMNS
        .iter()
        .filter(|(field, _)| !columns.contains(&Column::Identity(*field)))
        .map(|(_, name)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }

    let mut parsed = ParsedCsv {
        delimiter,
        ..Default::default()
    };
    for (idx, result) in reader.records().enumerate() {
        // header is line 1
        let fallback_line = idx as u64 + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
                parsed.errors.push(RowError::Malformed {
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);
        let record = resplit(record, delimiter);

        let draft = RowDraft::collect(&columns, &record);
        if draft.is_blank() {
            continue;
        }
        let counter = parsed.rows.len() + 1;
        match draft.finish(line, catalog, || next_code(counter)) {
            Ok(row) => parsed.rows.push(row),
            Err(e) => parsed.errors.push(e),
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ReferenceCatalog {
        let departments = vec![Department {
            id: 10,
            name: "Engineering".into(),
            created_at: 0,
            updated_at: 0,
        }];
        let locations = vec![Location {
            id: 20,
            name: "Paris".into(),
            created_at: 0,
            updated_at: 0,
        }];
        ReferenceCatalog::new(&departments, &locations)
    }

    fn codes(n: usize) -> String {
        format!("GEN-{n}")
    }

    #[test]
    fn test_classify_headers() {
        assert_eq!(
            Column::classify("First Name"),
            Column::Identity(IdentityField::FirstName)
        );
        assert_eq!(
            Column::classify("FIRST_NAME"),
            Column::Identity(IdentityField::FirstName)
        );
        assert_eq!(
            Column::classify("professionnalEmail"),
            Column::Identity(IdentityField::Email)
        );
        assert_eq!(
            Column::classify("Department-ID"),
            Column::Reference(ReferenceField::DepartmentId)
        );
        assert_eq!(
            Column::classify("manager service assignment code"),
            Column::Relation(RelationField::ManagerCode)
        );
        assert_eq!(Column::classify("favourite colour"), Column::Ignored);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("firstname;lastname;email"), b';');
        assert_eq!(detect_delimiter("firstname,lastname,email"), b',');
        assert_eq!(detect_delimiter("firstname"), b',');
        assert_eq!(detect_delimiter("a;b,c"), b',');
    }

    #[test]
    fn test_parse_full_row() {
        let text = "firstname,lastname,email,jobDescription,department,locationId,startDate,birthday,managerEmail,serviceAssignmentCode\n\
                    Ada,Lovelace,ada@x.com,Engineer,engineering,20,2020-01-15,not-a-date,boss@x.com,ENG 01\n";
        let parsed = parse(text, &catalog(), codes).unwrap();
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.rows.len(), 1);

        let row = &parsed.rows[0];
        assert_eq!(row.line, 2);
        assert_eq!(row.payload.firstname, "Ada");
        assert_eq!(row.payload.department_id, Some(10));
        assert_eq!(row.payload.location_id, Some(20));
        assert_eq!(row.payload.start_date.as_deref(), Some("2020-01-15"));
        assert_eq!(row.payload.birthday, None);
        assert_eq!(row.payload.service_assignment_code.as_deref(), Some("ENG 01"));
        assert_eq!(row.payload.manager_id, None);
        assert_eq!(row.manager, Some(ManagerRef::Email("boss@x.com".into())));
    }

    #[test]
    fn test_unknown_references_are_left_unset() {
        let text = "firstname,lastname,email,jobtitle,departmentId,location\n\
                    Ada,Lovelace,ada@x.com,Engineer,999,Tokyo\n";
        let parsed = parse(text, &catalog(), codes).unwrap();
        let row = &parsed.rows[0];
        assert_eq!(row.payload.department_id, None);
        assert_eq!(row.payload.location_id, None);
    }

    #[test]
    fn test_placeholder_code_uses_running_counter() {
        let text = "firstname,lastname,email,jobtitle,serviceAssignmentCode\n\
                    A,One,a@x.com,Eng,\n\
                    B,Two,b@x.com,Eng,OWN-2\n\
                    C,Three,c@x.com,Eng,\n";
        let parsed = parse(text, &catalog(), codes).unwrap();
        let codes: Vec<_> = parsed
            .rows
            .iter()
            .map(|r| r.payload.service_assignment_code.clone().unwrap())
            .collect();
        assert_eq!(codes, vec!["GEN-1", "OWN-2", "GEN-3"]);
    }

    #[test]
    fn test_missing_value_skips_row_only() {
        let text = "firstname,lastname,email,jobtitle\n\
                    A,One,a@x.com,Eng\n\
                    B,,b@x.com,Eng\n\
                    C,Three,c@x.com,Eng\n";
        let parsed = parse(text, &catalog(), codes).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(
            parsed.errors,
            vec![RowError::MissingField {
                line: 3,
                field: "lastname"
            }]
        );
    }

    #[test]
    fn test_rows_get_member_validation() {
        let long_name = "x".repeat(5000);
        let text = format!(
            "firstname,lastname,email,jobtitle\n\
             {long_name},One,a@x.com,Eng\n\
             B,Two,not-an-email,Eng\n\
             C,Three,c@x.com,Eng\n"
        );
        let parsed = parse(&text, &catalog(), codes).unwrap();

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].payload.firstname, "C");
        // the surviving row still gets the first placeholder code
        assert_eq!(
            parsed.rows[0].payload.service_assignment_code.as_deref(),
            Some("GEN-1")
        );
        assert_eq!(parsed.errors.len(), 2);
        assert!(matches!(
            &parsed.errors[0],
            RowError::Invalid { line: 2, message } if message.contains("firstname")
        ));
        assert!(matches!(
            &parsed.errors[1],
            RowError::Invalid { line: 3, message } if message.contains("not-an-email")
        ));
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(
            parse("", &catalog(), codes),
            Err(ImportError::EmptyFile)
        ));
        assert!(matches!(
            parse(" \n\n", &catalog(), codes),
            Err(ImportError::EmptyFile)
        ));

        let err = parse("firstname,email\nA,a@x.com\n", &catalog(), codes).unwrap_err();
        match err {
            ImportError::MissingColumns(missing) => {
                assert_eq!(missing, vec!["lastname", "jobDescription"]);
            }
            other => panic!("unexpected error: {other}"),
        }

        let app: AppError = ImportError::MissingColumns(vec!["lastname"]).into();
        assert_eq!(app.code, ErrorCode::ImportMissingColumns);
    }

    #[test]
    fn test_mixed_delimiter_row_is_resplit() {
        let text = "firstname,lastname,email,jobtitle\n\
                    A,One,a@x.com,Eng\n\
                    B;Two;b@x.com;Eng\n";
        let parsed = parse(text, &catalog(), codes).unwrap();
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1].payload.lastname, "Two");
    }

    #[test]
    fn test_bom_and_blank_lines() {
        let text = "\u{feff}\nfirstname;lastname;email;jobtitle\n\nA;One;a@x.com;Eng\n;;;\n";
        let parsed = parse(text, &catalog(), codes).unwrap();
        assert_eq!(parsed.delimiter, b';');
        assert_eq!(parsed.rows.len(), 1);
        assert!(parsed.errors.is_empty());
    }
}
