//! Local structural checks on a rendered document.
//!
//! This is not an XSD or Schematron engine. It confirms the XML is
//! well-formed and re-checks a handful of EN 16931 business rules that the
//! generators are expected to satisfy. Works on CII (both revisions) and UBL.

use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::events::Event;
use rust_decimal::Decimal;

use crate::core::currencies::is_known_currency_code;
use crate::core::*;

/// [`Validator`] backed by the quick-xml reader. Never fails; all findings
/// go into the report.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

#[derive(Debug, Default)]
struct Facts {
    guideline: Option<String>,
    number: Option<String>,
    currency: Option<String>,
    lines: usize,
    tax_basis_total: Option<Decimal>,
    tax_total: Option<Decimal>,
    grand_total: Option<Decimal>,
}

impl Facts {
    fn handle_start(&mut self, name: &str) {
        if name == "ram:IncludedSupplyChainTradeLineItem" || name == "cac:InvoiceLine" {
            self.lines += 1;
        }
    }

    fn handle_text(&mut self, path: &[String], text: &str) {
        let Some(name) = path.last().map(String::as_str) else {
            return;
        };
        let parent = path
            .len()
            .checked_sub(2)
            .and_then(|i| path.get(i))
            .map(String::as_str)
            .unwrap_or("");

        match (parent, name) {
            ("ram:GuidelineSpecifiedDocumentContextParameter", "ram:ID")
            | (_, "cbc:CustomizationID") => {
                self.guideline = Some(text.to_string());
            }
            ("rsm:ExchangedDocument" | "rsm:HeaderExchangedDocument", "ram:ID") => {
                self.number = Some(text.to_string());
            }
            (_, "cbc:ID") if path.len() == 2 => self.number = Some(text.to_string()),
            (_, "ram:InvoiceCurrencyCode" | "cbc:DocumentCurrencyCode") => {
                self.currency = Some(text.to_string());
            }
            (_, "ram:TaxBasisTotalAmount" | "cbc:TaxExclusiveAmount") => {
                self.tax_basis_total = Decimal::from_str(text).ok();
            }
            (_, "ram:TaxTotalAmount") | ("cac:TaxTotal", "cbc:TaxAmount") => {
                if self.tax_total.is_none() {
                    self.tax_total = Decimal::from_str(text).ok();
                }
            }
            (_, "ram:GrandTotalAmount" | "cbc:TaxInclusiveAmount") => {
                self.grand_total = Decimal::from_str(text).ok();
            }
            _ => {}
        }
    }
}

impl StructuralValidator {
    /// Run every check and return the findings.
    pub fn check(&self, xml: &str, profile: &Profile) -> Vec<ValidationError> {
        let facts = match scan(xml) {
            Ok(facts) => facts,
            Err(message) => {
                return vec![ValidationError::with_rule("document", message, "XML")];
            }
        };
        let mut errors = Vec::new();

        // BR-01: specification identifier
        let expected = match profile {
            Profile::Ubl(preset) => preset.customization_id(),
            other => Some(other.identifier()),
        };
        if let Some(expected) = expected {
            match facts.guideline.as_deref() {
                None => errors.push(ValidationError::with_rule(
                    "context.guideline",
                    "specification identifier (BT-24) is missing",
                    "BR-01",
                )),
                Some(found) if found != expected => errors.push(ValidationError::with_rule(
                    "context.guideline",
                    format!(
                        "specification identifier '{found}' does not match profile '{expected}'"
                    ),
                    "BR-01",
                )),
                Some(_) => {}
            }
        }

        // BR-02: invoice number
        if facts.number.as_deref().is_none_or(|n| n.trim().is_empty()) {
            errors.push(ValidationError::with_rule(
                "header.number",
                "invoice number (BT-1) is missing",
                "BR-02",
            ));
        }

        // BR-05: document currency
        match facts.currency.as_deref() {
            None => errors.push(ValidationError::with_rule(
                "header.currency",
                "invoice currency (BT-5) is missing",
                "BR-05",
            )),
            Some(code) if !is_known_currency_code(code) => errors.push(ValidationError::with_rule(
                "header.currency",
                format!("'{code}' is not an ISO 4217 code"),
                "BR-05",
            )),
            Some(_) => {}
        }

        // BR-16: lines, for profiles that carry them
        if ProfileRegistry::is_at_least(profile, ConformanceLevel::Basic) && facts.lines == 0 {
            errors.push(ValidationError::with_rule(
                "lines",
                "at least one invoice line (BG-25) is required",
                "BR-16",
            ));
        }

        if facts.tax_basis_total.is_none() {
            errors.push(ValidationError::with_rule(
                "totals.tax_basis_total",
                "total without tax (BT-109) is missing",
                "BR-13",
            ));
        }
        if facts.grand_total.is_none() {
            errors.push(ValidationError::with_rule(
                "totals.grand_total",
                "total with tax (BT-112) is missing",
                "BR-14",
            ));
        }

        // BR-CO-15: grand total = basis + tax
        if let (Some(basis), Some(tax), Some(grand)) =
            (facts.tax_basis_total, facts.tax_total, facts.grand_total)
        {
            if basis + tax != grand {
                errors.push(ValidationError::with_rule(
                    "totals.grand_total",
                    format!("{grand} != {basis} + {tax}"),
                    "BR-CO-15",
                ));
            }
        }

        errors
    }
}

impl Validator for StructuralValidator {
    fn validate(&self, xml: &str, profile: &Profile) -> Result<ViolationReport, BoxError> {
        let report: ViolationReport = self.check(xml, profile).into_iter().collect();
        if !report.is_valid() {
            tracing::debug!(
                profile = %profile,
                violations = report.len(),
                "structural check failed"
            );
        }
        Ok(report)
    }
}

fn scan(xml: &str) -> Result<Facts, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut facts = Facts::default();
    let mut path: Vec<String> = Vec::new();
    let mut seen_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                facts.handle_start(&name);
                path.push(name);
                seen_root = true;
            }
            Ok(Event::Empty(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                facts.handle_start(&name);
                seen_root = true;
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().map_err(|err| {
                    format!("bad text at byte {}: {err}", reader.buffer_position())
                })?;
                if !text.is_empty() {
                    facts.handle_text(&path, &text);
                }
            }
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "not well-formed at byte {}: {e}",
                    reader.buffer_position()
                ));
            }
            _ => {}
        }
    }

    if !seen_root {
        return Err("document has no root element".to_string());
    }
    if let Some(open) = path.last() {
        return Err(format!("element <{open}> is never closed"));
    }
    Ok(facts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_CII: &str = r#"<?xml version="1.0"?>
<rsm:CrossIndustryInvoice xmlns:rsm="a" xmlns:ram="b">
  <rsm:ExchangedDocumentContext>
    <ram:GuidelineSpecifiedDocumentContextParameter>
      <ram:ID>urn:factur-x.eu:1p0:minimum</ram:ID>
    </ram:GuidelineSpecifiedDocumentContextParameter>
  </rsm:ExchangedDocumentContext>
  <rsm:ExchangedDocument><ram:ID>F-1</ram:ID></rsm:ExchangedDocument>
  <ram:InvoiceCurrencyCode>EUR</ram:InvoiceCurrencyCode>
  <ram:TaxBasisTotalAmount>100.00</ram:TaxBasisTotalAmount>
  <ram:TaxTotalAmount currencyID="EUR">20.00</ram:TaxTotalAmount>
  <ram:GrandTotalAmount>120.00</ram:GrandTotalAmount>
</rsm:CrossIndustryInvoice>"#;

    #[test]
    fn minimal_document_passes() {
        let errors = StructuralValidator.check(MINIMAL_CII, &CiiProfile::Minimum.into());
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn malformed_xml_is_reported() {
        let errors = StructuralValidator.check("<a><b></a>", &CiiProfile::Minimum.into());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule.as_deref(), Some("XML"));
    }

    #[test]
    fn wrong_guideline_and_sum() {
        let xml = MINIMAL_CII.replace("120.00", "121.00");
        let errors = StructuralValidator.check(&xml, &CiiProfile::BasicWl.into());
        let rules: Vec<_> = errors.iter().filter_map(|e| e.rule.as_deref()).collect();
        assert!(rules.contains(&"BR-01"));
        assert!(rules.contains(&"BR-CO-15"));
    }
}
