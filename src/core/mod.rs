//! Profile registry, level gating, tax aggregation and the invoice builder.
//!
//! Everything here is syntax-independent. Generators in the feature modules
//! only ever see an [`InvoiceSnapshot`].

pub mod amount;
mod boundary;
mod builder;
pub mod currencies;
mod error;
pub mod gating;
mod profile;
pub mod schemes;
mod snapshot;
mod tax;
mod types;
pub mod units;

pub use boundary::*;
pub use builder::*;
pub use error::*;
pub use gating::{Capabilities, Field};
pub use profile::*;
pub use snapshot::{DocumentHeader, InvoiceSnapshot, SnapshotLine, SnapshotPaymentTerms};
pub use tax::*;
pub use types::*;
pub use units::{is_known_unit_code, unit_name};
