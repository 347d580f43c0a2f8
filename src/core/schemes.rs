//! Identifier scheme code lists.
//!
//! Party and item identifiers carry an ISO 6523 ICD code, a Peppol EAS code
//! (electronic addresses) or one of the Malaysian MyInvois scheme names.

/// GS1 GTIN, the default scheme for line item global identifiers.
pub const GTIN: &str = "0160";

/// Check whether `scheme` is a known identifier scheme.
pub fn is_known_scheme(scheme: &str) -> bool {
    ICD_CODES.binary_search(&scheme).is_ok()
        || EAS_ONLY_CODES.binary_search(&scheme).is_ok()
        || MALAYSIAN_SCHEMES.binary_search(&scheme).is_ok()
}

/// Malaysian schemes are only meaningful for the MALAYSIA UBL preset.
pub fn is_malaysian_scheme(scheme: &str) -> bool {
    MALAYSIAN_SCHEMES.binary_search(&scheme).is_ok()
}

pub(crate) fn scheme_problem(path: &str, scheme: &str) -> Option<String> {
    (!is_known_scheme(scheme)).then(|| format!("unknown identifier scheme '{scheme}' on {path}"))
}

/// ISO 6523 ICD subset. Sorted for binary search.
static ICD_CODES: &[&str] = &[
    "0002", // SIRENE
    "0007", // Swedish organisation number
    "0009", // SIRET
    "0037", // Finnish OVT
    "0060", // DUNS
    "0088", // GS1 GLN
    "0096", // Danish P-number
    "0097", // FTI (Italy)
    "0106", // Dutch KvK
    "0130", // EU directorates
    "0135", // SIA object identifiers
    "0142", // SECETI
    "0151", // Australian ABN
    "0160", // GS1 GTIN
    "0183", // Swiss UIDB
    "0184", // DIGSTORG
    "0188", // Japanese corporate number
    "0190", // Dutch OIN
    "0191", // Estonian company code
    "0192", // Norwegian organisation number
    "0193", // UBL.BE party identifier
    "0195", // Singapore UEN
    "0196", // Icelandic kennitala
    "0198", // Danish ERSTORG
    "0199", // Legal Entity Identifier
    "0200", // Lithuanian legal entity code
    "0201", // Italian IPA code
    "0204", // German Leitweg-ID
    "0208", // Belgian enterprise number
    "0209", // GS1 identification keys
    "0210", // Italian Codice Fiscale
    "0211", // Italian Partita IVA
    "0212", // Finnish organisation identifier
    "0213", // Finnish VAT
    "0215", // Net service ID
    "0216", // OVTcode
    "0221", // Japanese registered invoice issuer number
    "0230", // Malaysian national e-invoicing framework
];

/// Electronic address schemes outside the ICD range. Sorted.
static EAS_ONLY_CODES: &[&str] = &[
    "9901", // Danish CVR
    "9906", // Italian VAT
    "9910", // Hungarian VAT
    "9914", // Austrian VAT
    "9915", // Austrian government
    "9918", // IBAN
    "9919", // Austrian Firmenbuch
    "9920", // Spanish VAT
    "9925", // Belgian VAT
    "9930", // German VAT
    "9944", // Dutch VAT
    "9957", // French VAT
    "EM",   // Email
];

/// MyInvois identifier types. Sorted.
static MALAYSIAN_SCHEMES: &[&str] = &[
    "ARMY",     // Army number
    "BRN",      // Business registration number
    "NRIC",     // National registration identity card
    "PASSPORT", // Passport number
    "TIN",      // Tax identification number
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_sorted() {
        for list in [ICD_CODES, EAS_ONLY_CODES, MALAYSIAN_SCHEMES] {
            for w in list.windows(2) {
                assert!(w[0] < w[1], "{} >= {}", w[0], w[1]);
            }
        }
    }

    #[test]
    fn known_schemes() {
        assert!(is_known_scheme(GTIN));
        assert!(is_known_scheme("0088"));
        assert!(is_known_scheme("9930"));
        assert!(is_known_scheme("EM"));
        assert!(is_known_scheme("BRN"));
        assert!(is_malaysian_scheme("NRIC"));
        assert!(!is_malaysian_scheme("0088"));
    }

    #[test]
    fn unknown_scheme_is_described() {
        assert!(scheme_problem("seller.id", "9999").unwrap().contains("seller.id"));
        assert_eq!(scheme_problem("seller.id", "0204"), None);
    }
}
