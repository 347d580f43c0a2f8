use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::InvoiceError;

/// Party identifier with an optional scheme (ISO 6523 ICD or national scheme).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub value: String,
    pub scheme: Option<String>,
}

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            scheme: None,
        }
    }

    pub fn with_scheme(value: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            scheme: Some(scheme.into()),
        }
    }
}

/// Seller or buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// BT-27 / BT-44: Name.
    pub name: String,
    /// BT-30 / BT-47: Legal registration identifier.
    pub legal_id: Option<Identifier>,
    /// BT-28 / BT-45: Trading name.
    pub trading_name: Option<String>,
    /// BT-29 / BT-46: Party identifier.
    pub id: Option<Identifier>,
    /// Additional identifiers (e.g. TIN, NRIC, BRN).
    pub identifiers: Vec<Identifier>,
    /// BT-31 / BT-32 / BT-48: Tax registrations (scheme "VA" = VAT, "FC" = tax number).
    pub tax_registrations: Vec<Identifier>,
    /// BG-5 / BG-8: Postal address.
    pub address: Option<Address>,
    /// BG-6 / BG-9: Contact.
    pub contact: Option<Contact>,
    /// BT-34 / BT-49: Electronic address.
    pub electronic_address: Option<Identifier>,
}

/// Postal address. Only the country code is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line_one: Option<String>,
    pub line_two: Option<String>,
    pub line_three: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    /// Country code (ISO 3166-1; alpha-3 accepted for presets that need it).
    pub country_code: String,
    /// Country subdivision (state code, Bundesland).
    pub subdivision: Option<String>,
}

impl Address {
    /// Strip everything but the country code.
    pub fn country_only(&self) -> Self {
        Self {
            line_one: None,
            line_two: None,
            line_three: None,
            postal_code: None,
            city: None,
            country_code: self.country_code.clone(),
            subdivision: None,
        }
    }
}

/// Contact information.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contact {
    pub person_name: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// An invoice line as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// BT-153: Item name.
    pub name: String,
    /// BT-154: Item description.
    pub description: Option<String>,
    /// BT-146: Net price per unit.
    pub unit_price: Decimal,
    /// BT-148: Gross price (before line discount). Defaults to the net price.
    pub gross_price: Option<Decimal>,
    /// BT-129: Quantity.
    pub quantity: Decimal,
    /// BT-130: Unit code (UN/ECE Rec 20).
    pub unit: String,
    /// BT-152: Tax rate percentage.
    pub tax_rate: Decimal,
    /// BT-157: Standard item identifier (e.g. GTIN with scheme "0160").
    pub global_id: Option<Identifier>,
}

impl LineItem {
    /// Line net amount: quantity × unit price, rounded to two decimals.
    ///
    /// `None` when the product does not fit a `Decimal`.
    pub fn net_amount(&self) -> Option<Decimal> {
        self.quantity
            .checked_mul(self.unit_price)
            .map(|net| super::amount::round_half_up(net, 2))
    }
}

/// UNTDID 5305 tax category codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VatCategory {
    /// S: Standard rate.
    Standard,
    /// Z: Zero rated goods.
    ZeroRated,
    /// E: Exempt from tax.
    Exempt,
    /// AE: Reverse charge.
    ReverseCharge,
    /// K: Intra-community supply.
    IntraCommunity,
    /// G: Export outside the EU.
    Export,
    /// O: Not subject to VAT.
    OutsideScope,
}

impl VatCategory {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Standard => "S",
            Self::ZeroRated => "Z",
            Self::Exempt => "E",
            Self::ReverseCharge => "AE",
            Self::IntraCommunity => "K",
            Self::Export => "G",
            Self::OutsideScope => "O",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(Self::Standard),
            "Z" => Some(Self::ZeroRated),
            "E" => Some(Self::Exempt),
            "AE" => Some(Self::ReverseCharge),
            "K" => Some(Self::IntraCommunity),
            "G" => Some(Self::Export),
            "O" => Some(Self::OutsideScope),
            _ => None,
        }
    }
}

/// Category and reason applied to zero-rated tax lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxExemption {
    pub category: VatCategory,
    pub reason: String,
}

/// UNTDID 1001 document type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceTypeCode {
    /// 380: Commercial invoice.
    Invoice,
    /// 381: Credit note.
    CreditNote,
    /// 384: Corrected invoice.
    Corrected,
    /// 386: Prepayment invoice.
    Prepayment,
    /// 389: Self-billed invoice.
    SelfBilled,
    /// 326: Partial invoice.
    Partial,
}

impl InvoiceTypeCode {
    pub fn code(&self) -> u16 {
        match self {
            Self::Invoice => 380,
            Self::CreditNote => 381,
            Self::Corrected => 384,
            Self::Prepayment => 386,
            Self::SelfBilled => 389,
            Self::Partial => 326,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            380 => Some(Self::Invoice),
            381 => Some(Self::CreditNote),
            384 => Some(Self::Corrected),
            386 => Some(Self::Prepayment),
            389 => Some(Self::SelfBilled),
            326 => Some(Self::Partial),
            _ => None,
        }
    }

    /// Document type name used in PDF metadata.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Invoice => "Invoice",
            Self::CreditNote => "Credit Note",
            Self::Corrected => "Corrected Invoice",
            Self::Prepayment => "Prepayment Invoice",
            Self::SelfBilled => "Self-billed Invoice",
            Self::Partial => "Partial Invoice",
        }
    }
}

impl std::str::FromStr for InvoiceTypeCode {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u16>()
            .ok()
            .and_then(Self::from_code)
            .ok_or_else(|| InvoiceError::config(format!("'{s}' is not a valid invoice type")))
    }
}

/// UNTDID 4461 payment means codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMeansCode {
    /// 1: Instrument not defined.
    NotDefined,
    /// 10: Cash.
    Cash,
    /// 20: Cheque.
    Cheque,
    /// 30: Credit transfer.
    CreditTransfer,
    /// 42: Payment to bank account.
    PaymentToBankAccount,
    /// 48: Bank card.
    BankCard,
    /// 49: Direct debit.
    DirectDebit,
    /// 57: Standing agreement.
    StandingAgreement,
    /// 58: SEPA credit transfer.
    SepaCreditTransfer,
    /// 59: SEPA direct debit.
    SepaDirectDebit,
}

impl PaymentMeansCode {
    pub fn code(&self) -> u16 {
        match self {
            Self::NotDefined => 1,
            Self::Cash => 10,
            Self::Cheque => 20,
            Self::CreditTransfer => 30,
            Self::PaymentToBankAccount => 42,
            Self::BankCard => 48,
            Self::DirectDebit => 49,
            Self::StandingAgreement => 57,
            Self::SepaCreditTransfer => 58,
            Self::SepaDirectDebit => 59,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(Self::NotDefined),
            10 => Some(Self::Cash),
            20 => Some(Self::Cheque),
            30 => Some(Self::CreditTransfer),
            42 => Some(Self::PaymentToBankAccount),
            48 => Some(Self::BankCard),
            49 => Some(Self::DirectDebit),
            57 => Some(Self::StandingAgreement),
            58 => Some(Self::SepaCreditTransfer),
            59 => Some(Self::SepaDirectDebit),
            _ => None,
        }
    }
}

impl std::str::FromStr for PaymentMeansCode {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u16>()
            .ok()
            .and_then(Self::from_code)
            .ok_or_else(|| InvoiceError::config(format!("'{s}' is not a valid payment means code")))
    }
}

/// Payment instructions: means code plus the payee account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMeans {
    pub code: PaymentMeansCode,
    /// BT-84: IBAN or account identifier.
    pub account_id: Option<String>,
    /// BT-85: Account name.
    pub account_name: Option<String>,
    /// BT-86: BIC.
    pub bic: Option<String>,
}

/// Payment terms: due date and free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTerms {
    /// BT-9: Due date.
    pub due_date: NaiveDate,
    /// BT-20: Payment terms text.
    pub description: Option<String>,
}

/// BT-22: Document note with optional subject code (UNTDID 4451).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub content: String,
    pub subject_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn invoice_type_codes_parse() {
        assert_eq!("380".parse::<InvoiceTypeCode>().unwrap(), InvoiceTypeCode::Invoice);
        assert_eq!("381".parse::<InvoiceTypeCode>().unwrap(), InvoiceTypeCode::CreditNote);
        assert!("999".parse::<InvoiceTypeCode>().unwrap_err().is_configuration());
        assert!("abc".parse::<InvoiceTypeCode>().is_err());
    }

    #[test]
    fn payment_means_parse() {
        assert_eq!(
            "58".parse::<PaymentMeansCode>().unwrap(),
            PaymentMeansCode::SepaCreditTransfer
        );
        assert!("77".parse::<PaymentMeansCode>().is_err());
    }

    #[test]
    fn vat_category_codes() {
        for c in ["S", "Z", "E", "AE", "K", "G", "O"] {
            assert_eq!(VatCategory::from_code(c).unwrap().code(), c);
        }
        assert_eq!(VatCategory::from_code("X"), None);
    }

    #[test]
    fn line_net_amount() {
        let line = LineItem {
            name: "Consulting".into(),
            description: None,
            unit_price: dec!(750),
            gross_price: None,
            quantity: dec!(2.5),
            unit: "DAY".into(),
            tax_rate: dec!(10),
            global_id: None,
        };
        assert_eq!(line.net_amount(), Some(dec!(1875.00)));
    }

    #[test]
    fn line_net_amount_rounds_and_reports_overflow() {
        let mut line = LineItem {
            name: "Third".into(),
            description: None,
            unit_price: dec!(0.333),
            gross_price: None,
            quantity: dec!(1),
            unit: "C62".into(),
            tax_rate: dec!(20),
            global_id: None,
        };
        assert_eq!(line.net_amount(), Some(dec!(0.33)));
        line.unit_price = Decimal::MAX;
        line.quantity = dec!(2);
        assert_eq!(line.net_amount(), None);
    }

    #[test]
    fn country_only_address() {
        let a = Address {
            line_one: Some("1 rue de la paie".into()),
            line_two: Some("Bat. B".into()),
            line_three: None,
            postal_code: Some("90000".into()),
            city: Some("Paris".into()),
            country_code: "FR".into(),
            subdivision: None,
        };
        let stripped = a.country_only();
        assert_eq!(stripped.country_code, "FR");
        assert!(stripped.city.is_none() && stripped.postal_code.is_none());
        assert!(stripped.line_one.is_none() && stripped.line_two.is_none());
    }
}
