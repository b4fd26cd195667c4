use crate::params::Field;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(Field),
    #[error("'{input}' is not a valid URL")]
    InvalidUrl { input: String },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::MissingField(field) => *field,
            ValidationError::InvalidUrl { .. } => Field::Url,
        }
    }
}

/// Every validation failure found in one pass, ordered by field.
#[derive(Debug, Clone, PartialEq, Eq, Default, thiserror::Error)]
#[error("invalid campaign parameters: {}", join_messages(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

fn join_messages(errors: &[ValidationError]) -> String {
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    messages.join("; ")
}

impl ValidationErrors {
    pub(crate) fn push(&mut self, error: ValidationError) {
        self.0.push(error);
        self.0.sort_by_key(ValidationError::field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn for_field(&self, field: Field) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field() == field)
    }

    pub fn fields(&self) -> Vec<Field> {
        self.0.iter().map(ValidationError::field).collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum UtmError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("could not parse '{url}' as a URL: {source}")]
    UnparseableUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_are_ordered_by_field() {
        let mut errors = ValidationErrors::default();
        errors.push(ValidationError::MissingField(Field::Campaign));
        errors.push(ValidationError::InvalidUrl {
            input: "http://".to_string(),
        });
        errors.push(ValidationError::MissingField(Field::Source));

        assert_eq!(
            errors.fields(),
            vec![Field::Url, Field::Source, Field::Campaign]
        );
        assert!(errors.for_field(Field::Medium).is_none());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ValidationError::MissingField(Field::Medium).to_string(),
            "medium is required"
        );

        let mut errors = ValidationErrors::default();
        errors.push(ValidationError::MissingField(Field::Source));
        assert_eq!(
            errors.to_string(),
            "invalid campaign parameters: source is required"
        );

        let err = UtmError::ClipboardUnavailable("no display".to_string());
        assert_eq!(err.to_string(), "clipboard unavailable: no display");
    }
}
