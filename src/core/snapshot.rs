//! The normalized, immutable view of an invoice that generators serialize.
//!
//! A snapshot is built once per finalize from the builder's state. Level
//! gating has already been applied: a field absent here must not be written.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::gating::{Capabilities, Field};
use super::profile::{ConformanceLevel, Profile};
use super::schemes;
use super::tax::{MonetaryTotals, TaxBreakdown};
use super::types::*;

/// Document header fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHeader {
    /// BT-1: Invoice number.
    pub number: String,
    /// BT-2: Issue date.
    pub issue_date: NaiveDate,
    /// BT-72: Actual delivery date.
    pub delivery_date: Option<NaiveDate>,
    /// BT-3: Document type.
    pub type_code: InvoiceTypeCode,
    /// BT-5: Currency, normalized upper case.
    pub currency: String,
    /// BT-10: Buyer reference.
    pub buyer_reference: Option<String>,
    pub notes: Vec<Note>,
}

/// A line as it appears in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLine {
    /// BT-126: Sequential line id, starting at "1".
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub net_price: Decimal,
    pub gross_price: Option<Decimal>,
    pub quantity: Decimal,
    pub unit: String,
    pub tax_rate: Decimal,
    pub category: VatCategory,
    /// BT-131: quantity × net price, two decimals.
    pub net_amount: Decimal,
    pub global_id: Option<Identifier>,
}

/// Payment terms after gating: either part may be dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotPaymentTerms {
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSnapshot {
    pub profile: Profile,
    pub level: ConformanceLevel,
    pub header: DocumentHeader,
    pub seller: Option<Party>,
    pub buyer: Option<Party>,
    pub payee: Option<Party>,
    pub ship_to: Option<Party>,
    /// Empty below BASIC.
    pub lines: Vec<SnapshotLine>,
    /// Empty at MINIMUM.
    pub tax_breakdown: Vec<TaxBreakdown>,
    pub totals: MonetaryTotals,
    /// BT-106, absent at MINIMUM.
    pub line_total: Option<Decimal>,
    pub payment_means: Option<PaymentMeans>,
    pub payment_terms: Option<SnapshotPaymentTerms>,
}

impl InvoiceSnapshot {
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_level(self.level)
    }
}

/// Which role a party plays; decides the gates applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PartyRole {
    Seller,
    Buyer,
    Other,
}

pub(crate) fn project_party(party: &Party, role: PartyRole, caps: Capabilities) -> Party {
    let mut p = party.clone();
    if !caps.allows(Field::PostalAddressDetail) {
        p.address = p.address.as_ref().map(Address::country_only);
    }
    match role {
        PartyRole::Seller => p.contact = caps.keep(Field::SellerContact, p.contact),
        PartyRole::Buyer if !caps.allows(Field::BuyerIdentifiers) => {
            p.id = None;
            p.identifiers.clear();
        }
        _ => {}
    }
    p
}

pub(crate) fn project_line(
    index: usize,
    line: &LineItem,
    exemption: Option<&TaxExemption>,
    caps: Capabilities,
) -> SnapshotLine {
    let category = if line.tax_rate.is_zero() {
        exemption.map_or(VatCategory::ZeroRated, |e| e.category)
    } else {
        VatCategory::Standard
    };
    SnapshotLine {
        id: (index + 1).to_string(),
        name: line.name.clone(),
        description: line.description.clone(),
        net_price: line.unit_price,
        gross_price: caps.keep(
            Field::GrossPrice,
            Some(line.gross_price.unwrap_or(line.unit_price)),
        ),
        quantity: line.quantity,
        unit: line.unit.clone(),
        tax_rate: line.tax_rate,
        category,
        // Overflowing lines are rejected at add time and never reach here.
        net_amount: line.net_amount().unwrap_or(Decimal::ZERO),
        global_id: line.global_id.clone(),
    }
}

pub(crate) fn project_terms(
    terms: Option<&PaymentTerms>,
    caps: Capabilities,
) -> Option<SnapshotPaymentTerms> {
    let terms = terms?;
    let projected = SnapshotPaymentTerms {
        due_date: caps.keep(Field::PaymentTermsDueDate, Some(terms.due_date)),
        description: caps.keep(Field::PaymentTermsDescription, terms.description.clone()),
    };
    (projected.due_date.is_some() || projected.description.is_some()).then_some(projected)
}

pub(crate) fn project_payment_means(
    means: Option<&PaymentMeans>,
    caps: Capabilities,
) -> Option<PaymentMeans> {
    let mut means = caps.keep(Field::PaymentMeans, means.cloned())?;
    means.account_name = caps.keep(Field::PaymentAccountName, means.account_name);
    Some(means)
}

/// Every identifier scheme problem found on a party, prefixed with `path`.
pub(crate) fn party_scheme_problems(path: &str, party: &Party) -> Vec<String> {
    let mut problems = Vec::new();
    let mut check = |field: &str, id: &Identifier| {
        if let Some(scheme) = &id.scheme {
            problems.extend(schemes::scheme_problem(&format!("{path}.{field}"), scheme));
        }
    };
    if let Some(id) = &party.legal_id {
        check("legal_id", id);
    }
    if let Some(id) = &party.id {
        check("id", id);
    }
    for id in &party.identifiers {
        check("identifiers", id);
    }
    if let Some(id) = &party.electronic_address {
        check("electronic_address", id);
    }
    problems
}
