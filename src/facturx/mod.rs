//! Factur-X / ZUGFeRD 2.x generator (UN/CEFACT CII D16B).
//!
//! | Profile | Level | Lines | Breakdown |
//! |---------|-------|-------|-----------|
//! | Minimum | 0 | no | no |
//! | BasicWl | 1 | no | yes |
//! | Basic | 2 | yes | yes |
//! | EN16931 / Extended / XRechnung | 3 | yes | yes |

use crate::cii::{self, Dialect};
use crate::core::*;
use crate::xml_utils::XmlWriter;

/// The embedded XML filename per Factur-X 1.0.
pub const FACTURX_FILENAME: &str = "factur-x.xml";

pub mod ns {
    pub const RSM: &str = "urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100";
    pub const QDT: &str = "urn:un:unece:uncefact:data:standard:QualifiedDataType:100";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:100";
}

/// Renders `rsm:CrossIndustryInvoice` documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacturXGenerator;

impl DocumentGenerator for FacturXGenerator {
    fn render(&self, snapshot: &InvoiceSnapshot) -> Result<String, InvoiceError> {
        let seller = cii::require(&snapshot.seller, "seller")?;
        let buyer = cii::require(&snapshot.buyer, "buyer")?;
        let header = &snapshot.header;
        let currency = header.currency.as_str();
        let totals = &snapshot.totals;

        let mut w = XmlWriter::new()?;
        w.start_element_with_attrs(
            "rsm:CrossIndustryInvoice",
            &[
                ("xmlns:rsm", ns::RSM),
                ("xmlns:ram", ns::RAM),
                ("xmlns:qdt", ns::QDT),
                ("xmlns:udt", ns::UDT),
            ],
        )?;

        w.start_element("rsm:ExchangedDocumentContext")?;
        if let Profile::Cii(CiiProfile::XRechnung) = snapshot.profile {
            w.start_element("ram:BusinessProcessSpecifiedDocumentContextParameter")?;
            w.text_element("ram:ID", "urn:fdc:peppol.eu:2017:poacc:billing:01:1.0")?;
            w.end_element("ram:BusinessProcessSpecifiedDocumentContextParameter")?;
        }
        w.start_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
        w.text_element("ram:ID", snapshot.profile.identifier())?;
        w.end_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
        w.end_element("rsm:ExchangedDocumentContext")?;

        w.start_element("rsm:ExchangedDocument")?;
        w.text_element("ram:ID", &header.number)?;
        w.text_element("ram:TypeCode", &header.type_code.code().to_string())?;
        w.cii_date("ram:IssueDateTime", header.issue_date)?;
        cii::write_notes(&mut w, &header.notes)?;
        w.end_element("rsm:ExchangedDocument")?;

        w.start_element("rsm:SupplyChainTradeTransaction")?;
        for line in &snapshot.lines {
            write_line(&mut w, line)?;
        }

        w.start_element("ram:ApplicableHeaderTradeAgreement")?;
        w.opt_text_element("ram:BuyerReference", header.buyer_reference.as_deref())?;
        cii::write_party(&mut w, seller, "ram:SellerTradeParty")?;
        cii::write_party(&mut w, buyer, "ram:BuyerTradeParty")?;
        w.end_element("ram:ApplicableHeaderTradeAgreement")?;

        w.start_element("ram:ApplicableHeaderTradeDelivery")?;
        if let Some(ship_to) = &snapshot.ship_to {
            cii::write_party(&mut w, ship_to, "ram:ShipToTradeParty")?;
        }
        if let Some(delivered) = header.delivery_date {
            w.start_element("ram:ActualDeliverySupplyChainEvent")?;
            w.cii_date("ram:OccurrenceDateTime", delivered)?;
            w.end_element("ram:ActualDeliverySupplyChainEvent")?;
        }
        w.end_element("ram:ApplicableHeaderTradeDelivery")?;

        w.start_element("ram:ApplicableHeaderTradeSettlement")?;
        w.text_element("ram:InvoiceCurrencyCode", currency)?;
        if let Some(payee) = &snapshot.payee {
            cii::write_party(&mut w, payee, "ram:PayeeTradeParty")?;
        }
        if let Some(means) = &snapshot.payment_means {
            cii::write_payment_means(&mut w, means)?;
        }
        for entry in &snapshot.tax_breakdown {
            cii::write_trade_tax(&mut w, Dialect::D16B, entry, currency)?;
        }
        if let Some(terms) = &snapshot.payment_terms {
            cii::write_payment_terms(&mut w, terms)?;
        }

        w.start_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;
        if let Some(line_total) = snapshot.line_total {
            w.amount("ram:LineTotalAmount", line_total)?;
        }
        w.amount("ram:TaxBasisTotalAmount", totals.tax_basis_total)?;
        w.amount_element("ram:TaxTotalAmount", totals.tax_total, currency)?;
        w.amount("ram:GrandTotalAmount", totals.grand_total)?;
        w.amount("ram:DuePayableAmount", totals.due_payable)?;
        w.end_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;

        w.end_element("ram:ApplicableHeaderTradeSettlement")?;
        w.end_element("rsm:SupplyChainTradeTransaction")?;
        w.end_element("rsm:CrossIndustryInvoice")?;
        w.into_string()
    }
}

fn write_line(w: &mut XmlWriter, line: &SnapshotLine) -> Result<(), InvoiceError> {
    w.start_element("ram:IncludedSupplyChainTradeLineItem")?;

    w.start_element("ram:AssociatedDocumentLineDocument")?;
    w.text_element("ram:LineID", &line.id)?;
    w.end_element("ram:AssociatedDocumentLineDocument")?;

    w.start_element("ram:SpecifiedTradeProduct")?;
    if let Some(gid) = &line.global_id {
        let scheme = gid.scheme.as_deref().unwrap_or(schemes::GTIN);
        w.text_element_with_attrs("ram:GlobalID", &gid.value, &[("schemeID", scheme)])?;
    }
    w.text_element("ram:Name", &line.name)?;
    w.opt_text_element("ram:Description", line.description.as_deref())?;
    w.end_element("ram:SpecifiedTradeProduct")?;

    w.start_element("ram:SpecifiedLineTradeAgreement")?;
    if let Some(gross) = line.gross_price {
        w.start_element("ram:GrossPriceProductTradePrice")?;
        w.amount("ram:ChargeAmount", gross)?;
        w.end_element("ram:GrossPriceProductTradePrice")?;
    }
    w.start_element("ram:NetPriceProductTradePrice")?;
    w.amount("ram:ChargeAmount", line.net_price)?;
    w.end_element("ram:NetPriceProductTradePrice")?;
    w.end_element("ram:SpecifiedLineTradeAgreement")?;

    w.start_element("ram:SpecifiedLineTradeDelivery")?;
    w.quantity_element("ram:BilledQuantity", line.quantity, &line.unit)?;
    w.end_element("ram:SpecifiedLineTradeDelivery")?;

    w.start_element("ram:SpecifiedLineTradeSettlement")?;
    cii::write_line_tax(w, Dialect::D16B, line.category, line.tax_rate)?;
    w.start_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    w.amount("ram:LineTotalAmount", line.net_amount)?;
    w.end_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    w.end_element("ram:SpecifiedLineTradeSettlement")?;

    w.end_element("ram:IncludedSupplyChainTradeLineItem")?;
    Ok(())
}
