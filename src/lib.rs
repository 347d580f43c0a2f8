//! # digital-invoice
//!
//! One builder for three e-invoice syntaxes: Factur-X / ZUGFeRD 2.x (CII
//! D16B), legacy ZUGFeRD 1.0, and UBL 2.1 with national presets (Peppol,
//! NLCIUS, CIUS-RO, CIUS-IT, CIUS-ES-FACe, CIUS-AT, Malaysia).
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Which optional fields a document carries is decided by one gating table
//! keyed on the profile's conformance level (see [`gating`]), and totals come
//! from a single [`TaxAggregator`].
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use digital_invoice::*;
//! use rust_decimal_macros::dec;
//!
//! let mut invoice = InvoiceBuilder::new(
//!     "F-2024-001",
//!     NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
//!     CiiProfile::Basic,
//! );
//! invoice
//!     .seller(PartyBuilder::new("Seller SAS")
//!         .address(AddressBuilder::new("Paris", "75001", "FR").build())
//!         .vat_id("FR11123456782")
//!         .build())
//!     .buyer("PO-77", PartyBuilder::new("Buyer SARL")
//!         .address(AddressBuilder::new("Lyon", "69001", "FR").build())
//!         .build())
//!     .add_line(LineItemBuilder::new("Service", dec!(2), "HUR", dec!(100))
//!         .tax_rate(dec!(20))
//!         .build());
//!
//! let totals = invoice.compute().unwrap();
//! assert_eq!(totals.grand_total, dec!(240.00));
//! let xml = invoice.to_xml().unwrap();
//! assert!(xml.contains("<ram:GrandTotalAmount>240.00</ram:GrandTotalAmount>"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Profiles, gating, tax aggregation, builder, traits |
//! | `facturx` (default) | Factur-X / ZUGFeRD 2.x CII generator |
//! | `zugferd` (default) | ZUGFeRD 1.0 CII generator |
//! | `ubl` (default) | UBL 2.1 generator with presets |
//! | `all` | Everything |
//!
//! The `StructuralValidator` is available whenever any generator is enabled.
//! PDF embedding and remote validation are traits ([`PdfEmbedder`],
//! [`Validator`]) implemented outside this crate.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (an unregistered profile falling back
//! to MINIMUM, ignored declared totals, XML cache hits) and never installs a
//! subscriber.

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod render;

#[cfg(any(feature = "facturx", feature = "zugferd", feature = "ubl"))]
mod xml_utils;

#[cfg(any(feature = "facturx", feature = "zugferd"))]
mod cii;

#[cfg(feature = "facturx")]
pub mod facturx;

#[cfg(feature = "zugferd")]
pub mod zugferd;

#[cfg(feature = "ubl")]
pub mod ubl;

#[cfg(any(feature = "facturx", feature = "zugferd", feature = "ubl"))]
mod structural;

#[cfg(any(feature = "facturx", feature = "zugferd", feature = "ubl"))]
pub use structural::StructuralValidator;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
