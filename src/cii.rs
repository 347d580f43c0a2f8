//! Writers shared by the two CII syntaxes (Factur-X D16B and ZUGFeRD 1.0).
//!
//! Both use the `ram:` vocabulary for parties, addresses and trade taxes;
//! they differ in the envelope and in a few element names.

use crate::core::amount::format_rate;
use crate::core::*;
use crate::xml_utils::XmlWriter;

/// The CII revision being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    /// Factur-X / ZUGFeRD 2.x.
    D16B,
    /// ZUGFeRD 1.0.
    Zugferd1,
}

impl Dialect {
    fn rate_element(self) -> &'static str {
        match self {
            Self::D16B => "ram:RateApplicablePercent",
            Self::Zugferd1 => "ram:ApplicablePercent",
        }
    }
}

pub(crate) fn require<'a>(party: &'a Option<Party>, role: &str) -> Result<&'a Party, InvoiceError> {
    party
        .as_ref()
        .ok_or_else(|| InvoiceError::config(format!("{role} is required to render the document")))
}

/// Element order: ID, GlobalID, Name, SpecifiedLegalOrganization,
/// DefinedTradeContact, PostalTradeAddress, URIUniversalCommunication,
/// SpecifiedTaxRegistration.
pub(crate) fn write_party(
    w: &mut XmlWriter,
    party: &Party,
    element: &str,
) -> Result<(), InvoiceError> {
    w.start_element(element)?;
    if let Some(id) = &party.id {
        w.text_element("ram:ID", &id.value)?;
    }
    for gid in &party.identifiers {
        match &gid.scheme {
            Some(scheme) => {
                w.text_element_with_attrs("ram:GlobalID", &gid.value, &[("schemeID", scheme)])?
            }
            None => w.text_element("ram:GlobalID", &gid.value)?,
        };
    }
    w.text_element("ram:Name", &party.name)?;

    if party.legal_id.is_some() || party.trading_name.is_some() {
        w.start_element("ram:SpecifiedLegalOrganization")?;
        if let Some(legal) = &party.legal_id {
            match &legal.scheme {
                Some(scheme) => {
                    w.text_element_with_attrs("ram:ID", &legal.value, &[("schemeID", scheme)])?
                }
                None => w.text_element("ram:ID", &legal.value)?,
            };
        }
        w.opt_text_element("ram:TradingBusinessName", party.trading_name.as_deref())?;
        w.end_element("ram:SpecifiedLegalOrganization")?;
    }

    if let Some(contact) = &party.contact {
        w.start_element("ram:DefinedTradeContact")?;
        w.opt_text_element("ram:PersonName", contact.person_name.as_deref())?;
        w.opt_text_element("ram:DepartmentName", contact.department.as_deref())?;
        if let Some(phone) = &contact.phone {
            w.start_element("ram:TelephoneUniversalCommunication")?;
            w.text_element("ram:CompleteNumber", phone)?;
            w.end_element("ram:TelephoneUniversalCommunication")?;
        }
        if let Some(email) = &contact.email {
            w.start_element("ram:EmailURIUniversalCommunication")?;
            w.text_element("ram:URIID", email)?;
            w.end_element("ram:EmailURIUniversalCommunication")?;
        }
        w.end_element("ram:DefinedTradeContact")?;
    }

    if let Some(address) = &party.address {
        write_address(w, address)?;
    }

    if let Some(ea) = &party.electronic_address {
        w.start_element("ram:URIUniversalCommunication")?;
        let scheme = ea.scheme.as_deref().unwrap_or("EM");
        w.text_element_with_attrs("ram:URIID", &ea.value, &[("schemeID", scheme)])?;
        w.end_element("ram:URIUniversalCommunication")?;
    }

    for reg in &party.tax_registrations {
        w.start_element("ram:SpecifiedTaxRegistration")?;
        let scheme = reg.scheme.as_deref().unwrap_or("VA");
        w.text_element_with_attrs("ram:ID", &reg.value, &[("schemeID", scheme)])?;
        w.end_element("ram:SpecifiedTaxRegistration")?;
    }

    w.end_element(element)?;
    Ok(())
}

pub(crate) fn write_address(w: &mut XmlWriter, address: &Address) -> Result<(), InvoiceError> {
    w.start_element("ram:PostalTradeAddress")?;
    w.opt_text_element("ram:PostcodeCode", address.postal_code.as_deref())?;
    w.opt_text_element("ram:LineOne", address.line_one.as_deref())?;
    w.opt_text_element("ram:LineTwo", address.line_two.as_deref())?;
    w.opt_text_element("ram:LineThree", address.line_three.as_deref())?;
    w.opt_text_element("ram:CityName", address.city.as_deref())?;
    w.text_element("ram:CountryID", &address.country_code)?;
    w.opt_text_element("ram:CountrySubDivisionName", address.subdivision.as_deref())?;
    w.end_element("ram:PostalTradeAddress")?;
    Ok(())
}

/// One `ram:ApplicableTradeTax` entry of the header breakdown.
/// ZUGFeRD 1.0 amounts carry the document currency.
pub(crate) fn write_trade_tax(
    w: &mut XmlWriter,
    dialect: Dialect,
    entry: &TaxBreakdown,
    currency: &str,
) -> Result<(), InvoiceError> {
    w.start_element("ram:ApplicableTradeTax")?;
    match dialect {
        Dialect::D16B => w.amount("ram:CalculatedAmount", entry.tax)?,
        Dialect::Zugferd1 => w.amount_element("ram:CalculatedAmount", entry.tax, currency)?,
    };
    w.text_element("ram:TypeCode", "VAT")?;
    w.opt_text_element("ram:ExemptionReason", entry.exemption_reason.as_deref())?;
    match dialect {
        Dialect::D16B => w.amount("ram:BasisAmount", entry.basis)?,
        Dialect::Zugferd1 => w.amount_element("ram:BasisAmount", entry.basis, currency)?,
    };
    w.text_element("ram:CategoryCode", entry.category.code())?;
    w.text_element(dialect.rate_element(), &format_rate(entry.rate))?;
    w.end_element("ram:ApplicableTradeTax")?;
    Ok(())
}

pub(crate) fn write_payment_means(
    w: &mut XmlWriter,
    means: &PaymentMeans,
) -> Result<(), InvoiceError> {
    w.start_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
    w.text_element("ram:TypeCode", &means.code.code().to_string())?;
    if means.account_id.is_some() || means.account_name.is_some() {
        w.start_element("ram:PayeePartyCreditorFinancialAccount")?;
        w.opt_text_element("ram:IBANID", means.account_id.as_deref())?;
        w.opt_text_element("ram:AccountName", means.account_name.as_deref())?;
        w.end_element("ram:PayeePartyCreditorFinancialAccount")?;
    }
    if let Some(bic) = &means.bic {
        w.start_element("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
        w.text_element("ram:BICID", bic)?;
        w.end_element("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
    }
    w.end_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
    Ok(())
}

pub(crate) fn write_payment_terms(
    w: &mut XmlWriter,
    terms: &SnapshotPaymentTerms,
) -> Result<(), InvoiceError> {
    w.start_element("ram:SpecifiedTradePaymentTerms")?;
    w.opt_text_element("ram:Description", terms.description.as_deref())?;
    if let Some(due) = terms.due_date {
        w.cii_date("ram:DueDateDateTime", due)?;
    }
    w.end_element("ram:SpecifiedTradePaymentTerms")?;
    Ok(())
}

/// Line-level tax: type, category and rate only.
pub(crate) fn write_line_tax(
    w: &mut XmlWriter,
    dialect: Dialect,
    category: VatCategory,
    rate: rust_decimal::Decimal,
) -> Result<(), InvoiceError> {
    w.start_element("ram:ApplicableTradeTax")?;
    w.text_element("ram:TypeCode", "VAT")?;
    w.text_element("ram:CategoryCode", category.code())?;
    w.text_element(dialect.rate_element(), &format_rate(rate))?;
    w.end_element("ram:ApplicableTradeTax")?;
    Ok(())
}

pub(crate) fn write_notes(w: &mut XmlWriter, notes: &[Note]) -> Result<(), InvoiceError> {
    for note in notes {
        w.start_element("ram:IncludedNote")?;
        w.text_element("ram:Content", &note.content)?;
        w.opt_text_element("ram:SubjectCode", note.subject_code.as_deref())?;
        w.end_element("ram:IncludedNote")?;
    }
    Ok(())
}

