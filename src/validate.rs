use crate::error::GradeError;
use crate::types::REQUIRED_COLUMNS;
use csv::StringRecord;

fn occurrences(headers: &StringRecord, column: &str) -> usize {
    headers.iter().filter(|h| *h == column).count()
}

/// Check that every required column is present in the header exactly once.
///
/// All absent columns are reported together, in the order of
/// `REQUIRED_COLUMNS`, not just the first one found missing. Repeated
/// required columns are reported the same way once nothing is missing.
pub fn validate_columns(headers: &StringRecord) -> Result<(), GradeError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| occurrences(headers, required) == 0)
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(GradeError::MissingFields(missing));
    }
    let repeated: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| occurrences(headers, required) > 1)
        .map(|c| c.to_string())
        .collect();
    if repeated.is_empty() {
        Ok(())
    } else {
        Err(GradeError::DuplicateColumns(repeated))
    }
}
