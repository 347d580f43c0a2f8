use thiserror::Error;

/// Boxed error returned by external collaborators (PDF embedders, validators).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building, finalizing or rendering an invoice.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoiceError {
    /// Caller configuration defect: missing lines or totals for the selected
    /// profile, an unknown code value, a rejected profile. Never retriable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// XML generation error inside a document generator.
    #[error("XML error: {0}")]
    Xml(String),

    /// Error raised by an external collaborator, passed through unchanged.
    #[error("{0}")]
    Collaborator(#[source] BoxError),
}

impl InvoiceError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// True for errors caused by how the invoice was configured.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// A single structural finding with field path, message and rule id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the offending element (e.g. "seller.name").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Business rule ID if applicable (e.g. "BR-16").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule ID.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error with a business rule ID.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }

    /// Key under which this finding appears in a violation report.
    pub fn report_key(&self) -> String {
        match &self.rule {
            Some(rule) => rule.clone(),
            None => self.field.clone(),
        }
    }
}
