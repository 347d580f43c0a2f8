//! Traits at the edges of the crate: document generators, PDF embedders and
//! validators.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{BoxError, InvoiceError, ValidationError};
use super::profile::Profile;
use super::snapshot::InvoiceSnapshot;

/// Serializes a normalized [`InvoiceSnapshot`] into one XML syntax.
///
/// Generators never see the builder. They must not re-derive totals or
/// re-apply gating: the snapshot already carries exactly what may be written.
pub trait DocumentGenerator {
    fn render(&self, snapshot: &InvoiceSnapshot) -> Result<String, InvoiceError>;
}

/// Metadata handed to a [`PdfEmbedder`] alongside the XML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfMetadata {
    /// Seller name.
    pub author: String,
    /// `"{seller} : {document type} {invoice number}"`.
    pub title: String,
    /// `"Factur-X {document type} {invoice number} dated {YYYY-MM-DD} issued by {seller}"`.
    pub subject: String,
    /// `"{document type}, Factur-X"`.
    pub keywords: String,
    pub created: NaiveDate,
}

impl PdfMetadata {
    pub fn new(seller: &str, document_type: &str, number: &str, issue_date: NaiveDate) -> Self {
        Self {
            author: seller.to_string(),
            title: format!("{seller} : {document_type} {number}"),
            subject: format!(
                "Factur-X {document_type} {number} dated {} issued by {seller}",
                issue_date.format("%Y-%m-%d")
            ),
            keywords: format!("{document_type}, Factur-X"),
            created: issue_date,
        }
    }
}

/// Attaches the XML to a PDF/A-3 document. Implementations live outside this crate.
pub trait PdfEmbedder {
    fn embed(&self, pdf: &[u8], xml: &str, metadata: &PdfMetadata) -> Result<Vec<u8>, BoxError>;
}

/// Rule id → message. Empty means the document passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationReport(BTreeMap<String, String>);

impl ViolationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Record a violation. A second message for the same rule is appended.
    pub fn insert(&mut self, rule: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        self.0
            .entry(rule.into())
            .and_modify(|existing| {
                existing.push_str("; ");
                existing.push_str(&message);
            })
            .or_insert(message);
    }

    pub fn get(&self, rule: &str) -> Option<&str> {
        self.0.get(rule).map(String::as_str)
    }

    pub fn contains(&self, rule: &str) -> bool {
        self.0.contains_key(rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<ValidationError> for ViolationReport {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        let mut report = Self::new();
        for e in iter {
            report.insert(e.report_key(), format!("{}: {}", e.field, e.message));
        }
        report
    }
}

/// Checks a finished document. Remote or schema-based validators implement
/// this outside the crate; [`crate::StructuralValidator`] is the local one.
pub trait Validator {
    fn validate(&self, xml: &str, profile: &Profile) -> Result<ViolationReport, BoxError>;
}
