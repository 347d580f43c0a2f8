//! Dispatch from a profile's syntax to the generator compiled into the crate.

use crate::core::{DocumentGenerator, InvoiceError, Syntax};

/// The generator for `syntax`, or a configuration error when its cargo
/// feature is disabled.
pub fn generator_for(syntax: Syntax) -> Result<Box<dyn DocumentGenerator>, InvoiceError> {
    match syntax {
        #[cfg(feature = "facturx")]
        Syntax::FacturX => Ok(Box::new(crate::facturx::FacturXGenerator)),
        #[cfg(feature = "zugferd")]
        Syntax::Zugferd => Ok(Box::new(crate::zugferd::ZugferdGenerator)),
        #[cfg(feature = "ubl")]
        Syntax::Ubl => Ok(Box::new(crate::ubl::UblGenerator)),
        #[allow(unreachable_patterns)]
        other => Err(InvoiceError::config(format!(
            "no generator for {other:?}: enable the matching cargo feature"
        ))),
    }
}
