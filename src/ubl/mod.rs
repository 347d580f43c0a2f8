//! OASIS UBL 2.1 invoice generator with national presets.
//!
//! The preset decides the `CustomizationID` / `ProfileID` pair. MALAYSIA
//! (MyInvois) carries no customization id and uses its own e-invoice type
//! codes (`01` invoice, `02` credit note, `11` self-billed).

use crate::core::*;
use crate::xml_utils::{XmlWriter, iso_date};

pub mod ns {
    pub const INVOICE: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2";
    pub const CAC: &str =
        "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";
    pub const CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";
}

/// Renders UBL `Invoice` documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct UblGenerator;

/// Invoice type code as written for `preset`.
pub fn type_code_for(preset: Option<UblPreset>, code: InvoiceTypeCode) -> String {
    match preset {
        Some(UblPreset::Malaysia) => match code {
            InvoiceTypeCode::CreditNote => "02",
            InvoiceTypeCode::SelfBilled => "11",
            _ => "01",
        }
        .to_string(),
        _ => code.code().to_string(),
    }
}

impl DocumentGenerator for UblGenerator {
    fn render(&self, snapshot: &InvoiceSnapshot) -> Result<String, InvoiceError> {
        let preset = match &snapshot.profile {
            Profile::Ubl(p) => Some(*p),
            _ => None,
        };
        let seller = snapshot
            .seller
            .as_ref()
            .ok_or_else(|| InvoiceError::config("seller is required to render the document"))?;
        let buyer = snapshot
            .buyer
            .as_ref()
            .ok_or_else(|| InvoiceError::config("buyer is required to render the document"))?;
        let header = &snapshot.header;
        let currency = header.currency.as_str();
        let totals = &snapshot.totals;

        let mut w = XmlWriter::new()?;
        w.start_element_with_attrs(
            "Invoice",
            &[
                ("xmlns", ns::INVOICE),
                ("xmlns:cac", ns::CAC),
                ("xmlns:cbc", ns::CBC),
            ],
        )?;

        w.text_element("cbc:UBLVersionID", "2.1")?;
        w.opt_text_element("cbc:CustomizationID", preset.and_then(|p| p.customization_id()))?;
        w.opt_text_element("cbc:ProfileID", preset.and_then(|p| p.profile_id()))?;
        w.text_element("cbc:ID", &header.number)?;
        w.text_element("cbc:IssueDate", &iso_date(header.issue_date))?;
        if let Some(due) = snapshot.payment_terms.as_ref().and_then(|t| t.due_date) {
            w.text_element("cbc:DueDate", &iso_date(due))?;
        }
        let type_code = type_code_for(preset, header.type_code);
        if preset == Some(UblPreset::Malaysia) {
            w.text_element_with_attrs(
                "cbc:InvoiceTypeCode",
                &type_code,
                &[("listVersionID", "1.0")],
            )?;
        } else {
            w.text_element("cbc:InvoiceTypeCode", &type_code)?;
        }
        for note in &header.notes {
            w.text_element("cbc:Note", &note.content)?;
        }
        w.text_element("cbc:DocumentCurrencyCode", currency)?;
        w.opt_text_element("cbc:BuyerReference", header.buyer_reference.as_deref())?;

        w.start_element("cac:AccountingSupplierParty")?;
        write_party(&mut w, seller)?;
        w.end_element("cac:AccountingSupplierParty")?;
        w.start_element("cac:AccountingCustomerParty")?;
        write_party(&mut w, buyer)?;
        w.end_element("cac:AccountingCustomerParty")?;

        if let Some(payee) = &snapshot.payee {
            w.start_element("cac:PayeeParty")?;
            if let Some(id) = &payee.id {
                w.start_element("cac:PartyIdentification")?;
                write_id(&mut w, "cbc:ID", id)?;
                w.end_element("cac:PartyIdentification")?;
            }
            w.start_element("cac:PartyName")?;
            w.text_element("cbc:Name", &payee.name)?;
            w.end_element("cac:PartyName")?;
            w.end_element("cac:PayeeParty")?;
        }

        if header.delivery_date.is_some() || snapshot.ship_to.is_some() {
            w.start_element("cac:Delivery")?;
            if let Some(date) = header.delivery_date {
                w.text_element("cbc:ActualDeliveryDate", &iso_date(date))?;
            }
            if let Some(ship_to) = &snapshot.ship_to {
                if let Some(address) = &ship_to.address {
                    w.start_element("cac:DeliveryLocation")?;
                    write_address(&mut w, "cac:Address", address)?;
                    w.end_element("cac:DeliveryLocation")?;
                }
                w.start_element("cac:DeliveryParty")?;
                w.start_element("cac:PartyName")?;
                w.text_element("cbc:Name", &ship_to.name)?;
                w.end_element("cac:PartyName")?;
                w.end_element("cac:DeliveryParty")?;
            }
            w.end_element("cac:Delivery")?;
        }

        if let Some(means) = &snapshot.payment_means {
            w.start_element("cac:PaymentMeans")?;
            w.text_element("cbc:PaymentMeansCode", &means.code.code().to_string())?;
            if let Some(account) = &means.account_id {
                w.start_element("cac:PayeeFinancialAccount")?;
                w.text_element("cbc:ID", account)?;
                w.opt_text_element("cbc:Name", means.account_name.as_deref())?;
                if let Some(bic) = &means.bic {
                    w.start_element("cac:FinancialInstitutionBranch")?;
                    w.text_element("cbc:ID", bic)?;
                    w.end_element("cac:FinancialInstitutionBranch")?;
                }
                w.end_element("cac:PayeeFinancialAccount")?;
            }
            w.end_element("cac:PaymentMeans")?;
        }

        if let Some(description) = snapshot
            .payment_terms
            .as_ref()
            .and_then(|t| t.description.as_deref())
        {
            w.start_element("cac:PaymentTerms")?;
            w.text_element("cbc:Note", description)?;
            w.end_element("cac:PaymentTerms")?;
        }

        w.start_element("cac:TaxTotal")?;
        w.amount_element("cbc:TaxAmount", totals.tax_total, currency)?;
        for entry in &snapshot.tax_breakdown {
            w.start_element("cac:TaxSubtotal")?;
            w.amount_element("cbc:TaxableAmount", entry.basis, currency)?;
            w.amount_element("cbc:TaxAmount", entry.tax, currency)?;
            write_tax_category(
                &mut w,
                "cac:TaxCategory",
                entry.category,
                entry.rate,
                entry.exemption_reason.as_deref(),
            )?;
            w.end_element("cac:TaxSubtotal")?;
        }
        w.end_element("cac:TaxTotal")?;

        w.start_element("cac:LegalMonetaryTotal")?;
        w.amount_element(
            "cbc:LineExtensionAmount",
            snapshot.line_total.unwrap_or(totals.tax_basis_total),
            currency,
        )?;
        w.amount_element("cbc:TaxExclusiveAmount", totals.tax_basis_total, currency)?;
        w.amount_element("cbc:TaxInclusiveAmount", totals.grand_total, currency)?;
        w.amount_element("cbc:PayableAmount", totals.due_payable, currency)?;
        w.end_element("cac:LegalMonetaryTotal")?;

        for line in &snapshot.lines {
            write_line(&mut w, line, currency)?;
        }

        w.end_element("Invoice")?;
        w.into_string()
    }
}

fn write_id(w: &mut XmlWriter, name: &str, id: &Identifier) -> Result<(), InvoiceError> {
    match &id.scheme {
        Some(scheme) => w.text_element_with_attrs(name, &id.value, &[("schemeID", scheme)])?,
        None => w.text_element(name, &id.value)?,
    };
    Ok(())
}

fn write_party(w: &mut XmlWriter, party: &Party) -> Result<(), InvoiceError> {
    w.start_element("cac:Party")?;
    if let Some(endpoint) = &party.electronic_address {
        write_id(w, "cbc:EndpointID", endpoint)?;
    }
    for id in party.id.iter().chain(&party.identifiers) {
        w.start_element("cac:PartyIdentification")?;
        write_id(w, "cbc:ID", id)?;
        w.end_element("cac:PartyIdentification")?;
    }
    if let Some(trading) = &party.trading_name {
        w.start_element("cac:PartyName")?;
        w.text_element("cbc:Name", trading)?;
        w.end_element("cac:PartyName")?;
    }
    if let Some(address) = &party.address {
        write_address(w, "cac:PostalAddress", address)?;
    }
    for reg in &party.tax_registrations {
        w.start_element("cac:PartyTaxScheme")?;
        w.text_element("cbc:CompanyID", &reg.value)?;
        w.start_element("cac:TaxScheme")?;
        let scheme = if reg.scheme.as_deref() == Some("FC") { "FC" } else { "VAT" };
        w.text_element("cbc:ID", scheme)?;
        w.end_element("cac:TaxScheme")?;
        w.end_element("cac:PartyTaxScheme")?;
    }
    w.start_element("cac:PartyLegalEntity")?;
    w.text_element("cbc:RegistrationName", &party.name)?;
    if let Some(legal) = &party.legal_id {
        write_id(w, "cbc:CompanyID", legal)?;
    }
    w.end_element("cac:PartyLegalEntity")?;
    if let Some(contact) = &party.contact {
        w.start_element("cac:Contact")?;
        w.opt_text_element("cbc:Name", contact.person_name.as_deref())?;
        w.opt_text_element("cbc:Telephone", contact.phone.as_deref())?;
        w.opt_text_element("cbc:ElectronicMail", contact.email.as_deref())?;
        w.end_element("cac:Contact")?;
    }
    w.end_element("cac:Party")?;
    Ok(())
}

fn write_address(w: &mut XmlWriter, element: &str, address: &Address) -> Result<(), InvoiceError> {
    w.start_element(element)?;
    w.opt_text_element("cbc:StreetName", address.line_one.as_deref())?;
    w.opt_text_element("cbc:AdditionalStreetName", address.line_two.as_deref())?;
    w.opt_text_element("cbc:CityName", address.city.as_deref())?;
    w.opt_text_element("cbc:PostalZone", address.postal_code.as_deref())?;
    w.opt_text_element("cbc:CountrySubentity", address.subdivision.as_deref())?;
    if let Some(line) = &address.line_three {
        w.start_element("cac:AddressLine")?;
        w.text_element("cbc:Line", line)?;
        w.end_element("cac:AddressLine")?;
    }
    w.start_element("cac:Country")?;
    w.text_element("cbc:IdentificationCode", &address.country_code)?;
    w.end_element("cac:Country")?;
    w.end_element(element)?;
    Ok(())
}

fn write_tax_category(
    w: &mut XmlWriter,
    element: &str,
    category: VatCategory,
    rate: rust_decimal::Decimal,
    exemption_reason: Option<&str>,
) -> Result<(), InvoiceError> {
    w.start_element(element)?;
    w.text_element("cbc:ID", category.code())?;
    w.text_element("cbc:Percent", &amount::format_rate(rate))?;
    w.opt_text_element("cbc:TaxExemptionReason", exemption_reason)?;
    w.start_element("cac:TaxScheme")?;
    w.text_element("cbc:ID", "VAT")?;
    w.end_element("cac:TaxScheme")?;
    w.end_element(element)?;
    Ok(())
}

fn write_line(w: &mut XmlWriter, line: &SnapshotLine, currency: &str) -> Result<(), InvoiceError> {
    w.start_element("cac:InvoiceLine")?;
    w.text_element("cbc:ID", &line.id)?;
    w.quantity_element("cbc:InvoicedQuantity", line.quantity, &line.unit)?;
    w.amount_element("cbc:LineExtensionAmount", line.net_amount, currency)?;

    w.start_element("cac:Item")?;
    w.opt_text_element("cbc:Description", line.description.as_deref())?;
    w.text_element("cbc:Name", &line.name)?;
    if let Some(gid) = &line.global_id {
        w.start_element("cac:StandardItemIdentification")?;
        write_id(w, "cbc:ID", gid)?;
        w.end_element("cac:StandardItemIdentification")?;
    }
    write_tax_category(w, "cac:ClassifiedTaxCategory", line.category, line.tax_rate, None)?;
    w.end_element("cac:Item")?;

    w.start_element("cac:Price")?;
    w.amount_element("cbc:PriceAmount", line.net_price, currency)?;
    if let Some(gross) = line.gross_price.filter(|g| *g != line.net_price) {
        w.start_element("cac:AllowanceCharge")?;
        w.text_element("cbc:ChargeIndicator", "false")?;
        w.amount_element("cbc:Amount", gross - line.net_price, currency)?;
        w.amount_element("cbc:BaseAmount", gross, currency)?;
        w.end_element("cac:AllowanceCharge")?;
    }
    w.end_element("cac:Price")?;

    w.end_element("cac:InvoiceLine")?;
    Ok(())
}
