//! Legacy ZUGFeRD 1.0 generator (`rsm:CrossIndustryDocument`).
//!
//! Profiles BASIC, COMFORT and EXTENDED. Amounts in the monetary summation
//! carry a `currencyID` attribute, unlike Factur-X.

use crate::cii::{self, Dialect};
use crate::core::*;
use crate::xml_utils::XmlWriter;

/// The embedded XML filename for ZUGFeRD 1.0 PDFs.
pub const ZUGFERD_FILENAME: &str = "ZUGFeRD-invoice.xml";

pub mod ns {
    pub const RSM: &str = "urn:ferd:CrossIndustryDocument:invoice:1p0";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:12";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:15";
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ZugferdGenerator;

impl DocumentGenerator for ZugferdGenerator {
    fn render(&self, snapshot: &InvoiceSnapshot) -> Result<String, InvoiceError> {
        let seller = cii::require(&snapshot.seller, "seller")?;
        let buyer = cii::require(&snapshot.buyer, "buyer")?;
        let header = &snapshot.header;
        let currency = header.currency.as_str();
        let totals = &snapshot.totals;

        let mut w = XmlWriter::new()?;
        w.start_element_with_attrs(
            "rsm:CrossIndustryDocument",
            &[
                ("xmlns:rsm", ns::RSM),
                ("xmlns:ram", ns::RAM),
                ("xmlns:udt", ns::UDT),
            ],
        )?;

        w.start_element("rsm:SpecifiedExchangedDocumentContext")?;
        w.start_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
        w.text_element("ram:ID", snapshot.profile.identifier())?;
        w.end_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
        w.end_element("rsm:SpecifiedExchangedDocumentContext")?;

        w.start_element("rsm:HeaderExchangedDocument")?;
        w.text_element("ram:ID", &header.number)?;
        w.text_element("ram:Name", header.type_code.display_name())?;
        w.text_element("ram:TypeCode", &header.type_code.code().to_string())?;
        w.cii_date("ram:IssueDateTime", header.issue_date)?;
        cii::write_notes(&mut w, &header.notes)?;
        w.end_element("rsm:HeaderExchangedDocument")?;

        w.start_element("rsm:SpecifiedSupplyChainTradeTransaction")?;

        w.start_element("ram:ApplicableSupplyChainTradeAgreement")?;
        w.opt_text_element("ram:BuyerReference", header.buyer_reference.as_deref())?;
        cii::write_party(&mut w, seller, "ram:SellerTradeParty")?;
        cii::write_party(&mut w, buyer, "ram:BuyerTradeParty")?;
        w.end_element("ram:ApplicableSupplyChainTradeAgreement")?;

        w.start_element("ram:ApplicableSupplyChainTradeDelivery")?;
        if let Some(ship_to) = &snapshot.ship_to {
            cii::write_party(&mut w, ship_to, "ram:ShipToTradeParty")?;
        }
        if let Some(delivered) = header.delivery_date {
            w.start_element("ram:ActualDeliverySupplyChainEvent")?;
            w.cii_date("ram:OccurrenceDateTime", delivered)?;
            w.end_element("ram:ActualDeliverySupplyChainEvent")?;
        }
        w.end_element("ram:ApplicableSupplyChainTradeDelivery")?;

        w.start_element("ram:ApplicableSupplyChainTradeSettlement")?;
        w.text_element("ram:InvoiceCurrencyCode", currency)?;
        if let Some(payee) = &snapshot.payee {
            cii::write_party(&mut w, payee, "ram:PayeeTradeParty")?;
        }
        if let Some(means) = &snapshot.payment_means {
            cii::write_payment_means(&mut w, means)?;
        }
        for entry in &snapshot.tax_breakdown {
            cii::write_trade_tax(&mut w, Dialect::Zugferd1, entry, currency)?;
        }
        if let Some(terms) = &snapshot.payment_terms {
            cii::write_payment_terms(&mut w, terms)?;
        }

        w.start_element("ram:SpecifiedTradeSettlementMonetarySummation")?;
        if let Some(line_total) = snapshot.line_total {
            w.amount_element("ram:LineTotalAmount", line_total, currency)?;
        }
        w.amount_element("ram:TaxBasisTotalAmount", totals.tax_basis_total, currency)?;
        w.amount_element("ram:TaxTotalAmount", totals.tax_total, currency)?;
        w.amount_element("ram:GrandTotalAmount", totals.grand_total, currency)?;
        w.amount_element("ram:DuePayableAmount", totals.due_payable, currency)?;
        w.end_element("ram:SpecifiedTradeSettlementMonetarySummation")?;
        w.end_element("ram:ApplicableSupplyChainTradeSettlement")?;

        for line in &snapshot.lines {
            write_line(&mut w, line, currency)?;
        }

        w.end_element("rsm:SpecifiedSupplyChainTradeTransaction")?;
        w.end_element("rsm:CrossIndustryDocument")?;
        w.into_string()
    }
}

fn write_line(w: &mut XmlWriter, line: &SnapshotLine, currency: &str) -> Result<(), InvoiceError> {
    w.start_element("ram:IncludedSupplyChainTradeLineItem")?;

    w.start_element("ram:AssociatedDocumentLineDocument")?;
    w.text_element("ram:LineID", &line.id)?;
    w.end_element("ram:AssociatedDocumentLineDocument")?;

    w.start_element("ram:SpecifiedSupplyChainTradeAgreement")?;
    if let Some(gross) = line.gross_price {
        w.start_element("ram:GrossPriceProductTradePrice")?;
        w.amount_element("ram:ChargeAmount", gross, currency)?;
        w.end_element("ram:GrossPriceProductTradePrice")?;
    }
    w.start_element("ram:NetPriceProductTradePrice")?;
    w.amount_element("ram:ChargeAmount", line.net_price, currency)?;
    w.end_element("ram:NetPriceProductTradePrice")?;
    w.end_element("ram:SpecifiedSupplyChainTradeAgreement")?;

    w.start_element("ram:SpecifiedSupplyChainTradeDelivery")?;
    w.quantity_element("ram:BilledQuantity", line.quantity, &line.unit)?;
    w.end_element("ram:SpecifiedSupplyChainTradeDelivery")?;

    w.start_element("ram:SpecifiedSupplyChainTradeSettlement")?;
    cii::write_line_tax(w, Dialect::Zugferd1, line.category, line.tax_rate)?;
    w.start_element("ram:SpecifiedTradeSettlementMonetarySummation")?;
    w.amount_element("ram:LineTotalAmount", line.net_amount, currency)?;
    w.end_element("ram:SpecifiedTradeSettlementMonetarySummation")?;
    w.end_element("ram:SpecifiedSupplyChainTradeSettlement")?;

    w.start_element("ram:SpecifiedTradeProduct")?;
    if let Some(gid) = &line.global_id {
        let scheme = gid.scheme.as_deref().unwrap_or(schemes::GTIN);
        w.text_element_with_attrs("ram:GlobalID", &gid.value, &[("schemeID", scheme)])?;
    }
    w.text_element("ram:Name", &line.name)?;
    w.opt_text_element("ram:Description", line.description.as_deref())?;
    w.end_element("ram:SpecifiedTradeProduct")?;

    w.end_element("ram:IncludedSupplyChainTradeLineItem")?;
    Ok(())
}
