#![cfg(feature = "zugferd")]

use chrono::NaiveDate;
use digital_invoice::zugferd::{ZUGFERD_FILENAME, ZugferdGenerator, ns};
use digital_invoice::*;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn invoice(profile: CiiProfile) -> InvoiceBuilder {
    let mut b = InvoiceBuilder::new("RE-2014-7", date(2014, 11, 5), profile);
    b.seller(
        PartyBuilder::new("Lieferant GmbH")
            .address(
                AddressBuilder::new("München", "80333", "DE")
                    .street("Lieferantenstraße 20")
                    .build(),
            )
            .vat_id("DE123456789")
            .tax_number("201/113/40209")
            .build(),
    )
    .buyer(
        "GE2020211",
        PartyBuilder::new("Kunden AG Mitte")
            .address(AddressBuilder::new("Frankfurt", "69876", "DE").build())
            .build(),
    )
    .add_line(
        LineItemBuilder::new("Trennblätter A4", dec!(20), "H87", dec!(9.90))
            .tax_rate(dec!(19))
            .gross_price(dec!(9.90))
            .build(),
    )
    .add_line(
        LineItemBuilder::new("Joghurt Banane", dec!(50), "H87", dec!(5.50))
            .tax_rate(dec!(7))
            .build(),
    );
    b
}

#[test]
fn filename() {
    assert_eq!(ZUGFERD_FILENAME, "ZUGFeRD-invoice.xml");
}

#[test]
fn document_root_and_header() {
    let mut b = invoice(CiiProfile::ZugferdBasic);
    let xml = b.to_xml().unwrap();
    assert!(xml.contains("<rsm:CrossIndustryDocument"));
    assert!(xml.contains(ns::RSM));
    assert!(xml.contains("<ram:ID>urn:ferd:CrossIndustryDocument:invoice:1p0:basic</ram:ID>"));
    assert!(xml.contains("<rsm:HeaderExchangedDocument>"));
    assert!(xml.contains("<ram:Name>Invoice</ram:Name>"));
    assert!(xml.contains("<ram:TypeCode>380</ram:TypeCode>"));
}

#[test]
fn summation_amounts_carry_currency() {
    let mut b = invoice(CiiProfile::ZugferdComfort);
    let xml = b.to_xml().unwrap();
    // 20 × 9.90 = 198.00 @ 19 % → 37.62; 50 × 5.50 = 275.00 @ 7 % → 19.25
    assert!(xml.contains("<ram:LineTotalAmount currencyID=\"EUR\">473.00</ram:LineTotalAmount>"));
    assert!(
        xml.contains("<ram:TaxBasisTotalAmount currencyID=\"EUR\">473.00</ram:TaxBasisTotalAmount>")
    );
    assert!(xml.contains("<ram:TaxTotalAmount currencyID=\"EUR\">56.87</ram:TaxTotalAmount>"));
    assert!(xml.contains("<ram:GrandTotalAmount currencyID=\"EUR\">529.87</ram:GrandTotalAmount>"));
    assert!(xml.contains("<ram:SpecifiedTradeSettlementMonetarySummation>"));
}

#[test]
fn trade_tax_uses_applicable_percent() {
    let mut b = invoice(CiiProfile::ZugferdComfort);
    let xml = b.to_xml().unwrap();
    assert!(xml.contains("<ram:ApplicablePercent>19.00</ram:ApplicablePercent>"));
    assert!(xml.contains("<ram:ApplicablePercent>7.00</ram:ApplicablePercent>"));
    assert!(!xml.contains("RateApplicablePercent"));
    assert!(xml.contains("<ram:CalculatedAmount currencyID=\"EUR\">37.62</ram:CalculatedAmount>"));
}

#[test]
fn lines_follow_settlement() {
    let mut b = invoice(CiiProfile::ZugferdExtended);
    let xml = b.to_xml().unwrap();
    let settlement = xml.find("<ram:ApplicableSupplyChainTradeSettlement>").unwrap();
    let line = xml.find("<ram:IncludedSupplyChainTradeLineItem>").unwrap();
    assert!(settlement < line);
    assert_eq!(xml.matches("<ram:IncludedSupplyChainTradeLineItem>").count(), 2);
}

#[test]
fn basic_omits_gross_price_and_comfort_keeps_it() {
    let basic = invoice(CiiProfile::ZugferdBasic).to_xml().unwrap();
    assert!(!basic.contains("GrossPriceProductTradePrice"));
    let comfort = invoice(CiiProfile::ZugferdComfort).to_xml().unwrap();
    assert!(comfort.contains("<ram:GrossPriceProductTradePrice>"));
}

#[test]
fn tax_number_registration_scheme() {
    let xml = invoice(CiiProfile::ZugferdBasic).to_xml().unwrap();
    assert!(xml.contains("<ram:ID schemeID=\"FC\">201/113/40209</ram:ID>"));
    assert!(xml.contains("<ram:ID schemeID=\"VA\">DE123456789</ram:ID>"));
}

#[test]
fn credit_note_name() {
    let mut b = invoice(CiiProfile::ZugferdBasic);
    b.invoice_type(InvoiceTypeCode::CreditNote);
    let snapshot = b.snapshot().unwrap();
    let xml = ZugferdGenerator.render(&snapshot).unwrap();
    assert!(xml.contains("<ram:Name>Credit Note</ram:Name>"));
    assert!(xml.contains("<ram:TypeCode>381</ram:TypeCode>"));
}

#[test]
fn rendered_document_passes_structural_checks() {
    for profile in [
        CiiProfile::ZugferdBasic,
        CiiProfile::ZugferdComfort,
        CiiProfile::ZugferdExtended,
    ] {
        let mut b = invoice(profile);
        let report = b.validate(&StructuralValidator).unwrap();
        assert!(report.is_valid(), "{profile:?}: {report:?}");
    }
}
