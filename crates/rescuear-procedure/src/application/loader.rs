//! Loading procedures from YAML.

use std::path::Path;

use rescuear_core::error::DomainError;
use tracing::info;

use crate::domain::document::ProcedureDocument;
use crate::domain::procedure::Procedure;

/// Parses and validates a procedure from YAML source.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the YAML is malformed or describes an
/// invalid procedure.
pub fn parse_procedure_yaml(source: &str) -> Result<Procedure, DomainError> {
    let document: ProcedureDocument = serde_yaml::from_str(source)
        .map_err(|e| DomainError::Validation(format!("procedure YAML parse error: {e}")))?;
    Procedure::try_from(document)
}

/// Reads and parses a procedure file.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the file cannot be read and
/// `DomainError::Validation` if its content is invalid.
pub fn load_procedure(path: &Path) -> Result<Procedure, DomainError> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        DomainError::Infrastructure(format!("cannot read procedure {}: {e}", path.display()))
    })?;
    let procedure = parse_procedure_yaml(&source)?;
    info!(
        path = %path.display(),
        name = procedure.name(),
        steps = procedure.len(),
        "procedure loaded"
    );
    Ok(procedure)
}
