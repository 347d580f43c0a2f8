#![cfg(feature = "core")]

use chrono::NaiveDate;
use digital_invoice::gating::gate;
use digital_invoice::*;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seller() -> Party {
    PartyBuilder::new("Seller SAS")
        .address(
            AddressBuilder::new("Paris", "75001", "FR")
                .street("1 rue de la paie")
                .build(),
        )
        .legal_id("123456782", "0002")
        .vat_id("FR11123456782")
        .contact(Contact {
            person_name: Some("Jeanne Martin".into()),
            phone: Some("+33 1 23 45 67 89".into()),
            email: Some("billing@seller.fr".into()),
            department: None,
        })
        .build()
}

fn buyer() -> Party {
    PartyBuilder::new("Buyer SARL")
        .address(AddressBuilder::new("Lyon", "69001", "FR").build())
        .id(Identifier::new("CUST-42"))
        .identifier("3026990099715", "0088")
        .build()
}

/// An invoice that supplies every gated field.
fn full_invoice(profile: CiiProfile) -> InvoiceBuilder {
    let mut b = InvoiceBuilder::new("F-2024-100", date(2024, 3, 1), profile);
    b.seller(seller())
        .buyer("PO-1", buyer())
        .payee(PartyBuilder::new("Factor SA").build())
        .ship_to(
            PartyBuilder::new("Warehouse")
                .address(AddressBuilder::new("Lille", "59000", "FR").build())
                .build(),
        )
        .note("Thank you")
        .add_line(
            LineItemBuilder::new("Consulting", dec!(2), "DAY", dec!(750))
                .gross_price(dec!(800))
                .tax_rate(dec!(20))
                .build(),
        )
        .payment_means(PaymentMeans {
            code: PaymentMeansCode::SepaCreditTransfer,
            account_id: Some("FR7630006000011234567890189".into()),
            account_name: Some("Seller SAS".into()),
            bic: Some("AGRIFRPP".into()),
        })
        .payment_terms(date(2024, 3, 31), Some("30 days net".into()));
    b
}

const TIERS: [(CiiProfile, ConformanceLevel); 4] = [
    (CiiProfile::Minimum, ConformanceLevel::Minimum),
    (CiiProfile::BasicWl, ConformanceLevel::BasicWl),
    (CiiProfile::Basic, ConformanceLevel::Basic),
    (CiiProfile::En16931, ConformanceLevel::En16931),
];

fn present(s: &InvoiceSnapshot, field: Field) -> bool {
    let seller = s.seller.as_ref().unwrap();
    let buyer = s.buyer.as_ref().unwrap();
    match field {
        Field::PostalAddressDetail => seller.address.as_ref().unwrap().city.is_some(),
        Field::BuyerIdentifiers => buyer.id.is_some() && !buyer.identifiers.is_empty(),
        Field::SellerContact => seller.contact.is_some(),
        Field::PayeeParty => s.payee.is_some(),
        Field::GrossPrice => s.lines.iter().any(|l| l.gross_price.is_some()),
        Field::PaymentTermsDueDate => {
            s.payment_terms.as_ref().is_some_and(|t| t.due_date.is_some())
        }
        Field::PaymentTermsDescription => {
            s.payment_terms.as_ref().is_some_and(|t| t.description.is_some())
        }
        Field::PaymentMeans => s.payment_means.is_some(),
        Field::PaymentAccountName => s
            .payment_means
            .as_ref()
            .is_some_and(|m| m.account_name.is_some()),
        Field::LineItems => !s.lines.is_empty(),
        Field::TaxBreakdown => !s.tax_breakdown.is_empty(),
        Field::LineTotalAmount => s.line_total.is_some(),
        Field::Notes => !s.header.notes.is_empty(),
        Field::ShipToParty => s.ship_to.is_some(),
        Field::NetPrice | Field::ManualTotals => unreachable!(),
    }
}

/// Fields observable on a snapshot built from [`full_invoice`]. Net price
/// travels with the lines and declared totals are covered by the aggregator tests.
const OBSERVABLE: [Field; 14] = [
    Field::PostalAddressDetail,
    Field::BuyerIdentifiers,
    Field::SellerContact,
    Field::PayeeParty,
    Field::GrossPrice,
    Field::PaymentTermsDueDate,
    Field::PaymentTermsDescription,
    Field::PaymentMeans,
    Field::PaymentAccountName,
    Field::LineItems,
    Field::TaxBreakdown,
    Field::LineTotalAmount,
    Field::Notes,
    Field::ShipToParty,
];

#[test]
fn snapshot_presence_follows_gating_table() {
    for (profile, level) in TIERS {
        let snapshot = full_invoice(profile).snapshot().unwrap();
        assert_eq!(snapshot.level, level);
        for field in OBSERVABLE {
            assert_eq!(
                present(&snapshot, field),
                gate(field).allows(level),
                "{field:?} at {level:?}"
            );
        }
    }
}

#[test]
fn presence_is_monotonic_in_level() {
    for field in OBSERVABLE {
        let mut seen = false;
        for (profile, _) in TIERS {
            let here = present(&full_invoice(profile).snapshot().unwrap(), field);
            assert!(!(seen && !here), "{field:?} disappeared at {profile:?}");
            seen |= here;
        }
        assert!(seen, "{field:?} never present");
    }
}

#[test]
fn country_code_survives_every_level() {
    for (profile, _) in TIERS {
        let s = full_invoice(profile).snapshot().unwrap();
        assert_eq!(s.seller.unwrap().address.unwrap().country_code, "FR");
        assert_eq!(s.buyer.unwrap().address.unwrap().country_code, "FR");
    }
}

#[test]
fn minimum_keeps_totals_and_drops_breakdown() {
    let s = full_invoice(CiiProfile::Minimum).snapshot().unwrap();
    assert!(s.tax_breakdown.is_empty());
    assert_eq!(s.totals.tax_basis_total, dec!(1500.00));
    assert_eq!(s.totals.grand_total, dec!(1800.00));
}

#[test]
fn extended_and_xrechnung_behave_like_en16931() {
    for profile in [CiiProfile::Extended, CiiProfile::XRechnung, CiiProfile::ZugferdComfort] {
        let s = full_invoice(profile).snapshot().unwrap();
        assert_eq!(s.level, ConformanceLevel::En16931);
        assert!(s.seller.unwrap().contact.is_some());
    }
}

#[test]
fn zugferd_basic_sits_at_basic() {
    let s = full_invoice(CiiProfile::ZugferdBasic).snapshot().unwrap();
    assert_eq!(s.level, ConformanceLevel::Basic);
    assert!(!s.lines.is_empty());
    assert!(s.lines[0].gross_price.is_none());
}

#[test]
fn unregistered_profile_defaults_to_minimum() {
    let mut b = InvoiceBuilder::new(
        "X-1",
        date(2024, 1, 1),
        Profile::from_identifier("urn:example:custom-profile"),
    );
    b.seller(seller()).buyer("R", buyer()).set_manual_totals(dec!(100), dec!(10));
    let s = b.snapshot().unwrap();
    assert_eq!(s.level, ConformanceLevel::Minimum);
    assert!(s.seller.unwrap().contact.is_none());
}

#[test]
fn unregistered_profile_rejected_on_request() {
    let mut b = InvoiceBuilder::new("X-1", date(2024, 1, 1), Profile::Unregistered("foo".into()));
    b.unknown_profile_policy(UnknownProfilePolicy::Reject)
        .set_manual_totals(dec!(100), dec!(10));
    assert!(b.snapshot().unwrap_err().is_configuration());
    assert!(b.compute().unwrap_err().is_configuration());
}

#[test]
fn snapshot_serializes_to_json() {
    let s = full_invoice(CiiProfile::Basic).snapshot().unwrap();
    let json = serde_json::to_value(&s).unwrap();
    assert_eq!(json["header"]["number"], "F-2024-100");
    assert_eq!(json["level"], "Basic");
    assert_eq!(json["lines"].as_array().unwrap().len(), 1);
}

#[test]
fn payee_is_seller_above_minimum() {
    for (profile, level) in TIERS {
        let mut b = full_invoice(profile);
        b.payee_is_seller();
        let s = b.snapshot().unwrap();
        if level == ConformanceLevel::Minimum {
            assert!(s.payee.is_none(), "{profile:?}");
        } else {
            assert!(s.payee.is_some(), "{profile:?}");
            assert_eq!(s.payee, s.seller, "{profile:?}");
        }
    }
}
