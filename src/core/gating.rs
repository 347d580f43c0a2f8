//! Level-gated field visibility.
//!
//! Which optional data a document may carry is decided by a single
//! declarative table of `(field, minimum level, maximum level)` entries.
//! The snapshot projection consults it for every optional field; nothing
//! else in the crate compares conformance levels directly.

use serde::{Deserialize, Serialize};

use super::profile::ConformanceLevel;

/// An optional data group whose presence depends on the conformance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Address lines one to three, postcode, city and subdivision.
    PostalAddressDetail,
    /// Buyer party identifier and additional buyer identifiers.
    BuyerIdentifiers,
    /// Seller contact block (person, department, phone, email).
    SellerContact,
    /// Payee party linked to the seller.
    PayeeParty,
    /// Line gross price (before line discount).
    GrossPrice,
    /// Line net price.
    NetPrice,
    PaymentTermsDueDate,
    PaymentTermsDescription,
    PaymentMeans,
    /// Account holder name on the payee account.
    PaymentAccountName,
    /// Line items carried in the document.
    LineItems,
    /// Per-rate tax breakdown.
    TaxBreakdown,
    /// Sum of line net amounts in the monetary summation.
    LineTotalAmount,
    /// Directly declared basis and tax totals.
    ManualTotals,
    Notes,
    ShipToParty,
}

/// One row of the gating table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    pub field: Field,
    pub min: ConformanceLevel,
    pub max: Option<ConformanceLevel>,
}

impl Gate {
    const fn at_least(field: Field, min: ConformanceLevel) -> Self {
        Self {
            field,
            min,
            max: None,
        }
    }

    const fn between(field: Field, min: ConformanceLevel, max: ConformanceLevel) -> Self {
        Self {
            field,
            min,
            max: Some(max),
        }
    }

    pub fn allows(&self, level: ConformanceLevel) -> bool {
        level.is_at_least(self.min) && self.max.is_none_or(|max| level <= max)
    }
}

use ConformanceLevel::{Basic, BasicWl, En16931, Minimum};

/// The gating table. Every [`Field`] has exactly one row.
pub static GATES: &[Gate] = &[
    Gate::at_least(Field::PostalAddressDetail, BasicWl),
    Gate::at_least(Field::BuyerIdentifiers, BasicWl),
    Gate::at_least(Field::SellerContact, En16931),
    Gate::at_least(Field::PayeeParty, BasicWl),
    Gate::at_least(Field::GrossPrice, En16931),
    Gate::at_least(Field::NetPrice, Minimum),
    Gate::at_least(Field::PaymentTermsDueDate, BasicWl),
    // strictly above BASIC, narrower than the due date
    Gate::at_least(Field::PaymentTermsDescription, En16931),
    Gate::at_least(Field::PaymentMeans, BasicWl),
    Gate::at_least(Field::PaymentAccountName, En16931),
    Gate::at_least(Field::LineItems, Basic),
    Gate::at_least(Field::TaxBreakdown, BasicWl),
    Gate::at_least(Field::LineTotalAmount, BasicWl),
    Gate::between(Field::ManualTotals, Minimum, BasicWl),
    Gate::at_least(Field::Notes, Minimum),
    Gate::at_least(Field::ShipToParty, Minimum),
];

/// Look up the gate for a field.
pub fn gate(field: Field) -> Gate {
    GATES
        .iter()
        .copied()
        .find(|g| g.field == field)
        .unwrap_or(Gate::at_least(field, Minimum))
}

/// The set of fields permitted at one conformance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    level: ConformanceLevel,
}

impl Capabilities {
    pub fn for_level(level: ConformanceLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> ConformanceLevel {
        self.level
    }

    pub fn allows(&self, field: Field) -> bool {
        gate(field).allows(self.level)
    }

    /// Keep `value` only if `field` is permitted at this level.
    pub fn keep<T>(&self, field: Field, value: Option<T>) -> Option<T> {
        value.filter(|_| self.allows(field))
    }
}
