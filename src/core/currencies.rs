//! ISO 4217 currency codes accepted for the document currency.

/// Check whether `code` is a known ISO 4217 currency code.
pub fn is_known_currency_code(code: &str) -> bool {
    CURRENCY_CODES.binary_search(&code).is_ok()
}

/// Normalize a caller-supplied currency code.
///
/// Input is trimmed and upper-cased before the lookup, so `"eur"` is accepted.
pub fn normalize_currency(code: &str) -> Result<String, String> {
    let normalized = code.trim().to_ascii_uppercase();
    if is_known_currency_code(&normalized) {
        Ok(normalized)
    } else {
        Err(format!("unknown currency code '{code}'"))
    }
}

/// Sorted for binary search.
static CURRENCY_CODES: &[&str] = &[
    "AED", // UAE Dirham
    "AUD", // Australian Dollar
    "BGN", // Bulgarian Lev
    "BRL", // Brazilian Real
    "CAD", // Canadian Dollar
    "CHF", // Swiss Franc
    "CNY", // Chinese Yuan
    "CZK", // Czech Koruna
    "DKK", // Danish Krone
    "EUR", // Euro
    "GBP", // Pound Sterling
    "HKD", // Hong Kong Dollar
    "HUF", // Hungarian Forint
    "IDR", // Indonesian Rupiah
    "INR", // Indian Rupee
    "ISK", // Icelandic Krona
    "JPY", // Japanese Yen
    "MXN", // Mexican Peso
    "MYR", // Malaysian Ringgit
    "NOK", // Norwegian Krone
    "NZD", // New Zealand Dollar
    "PHP", // Philippine Peso
    "PLN", // Polish Zloty
    "RON", // Romanian Leu
    "SAR", // Saudi Riyal
    "SEK", // Swedish Krona
    "SGD", // Singapore Dollar
    "THB", // Thai Baht
    "TRY", // Turkish Lira
    "USD", // US Dollar
    "VND", // Vietnamese Dong
    "ZAR", // South African Rand
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_currency("eur").unwrap(), "EUR");
        assert_eq!(normalize_currency(" MYR ").unwrap(), "MYR");
    }

    #[test]
    fn rejects_unknown() {
        assert!(normalize_currency("EURO").is_err());
        assert!(normalize_currency("").is_err());
        assert!(!is_known_currency_code("XYZ"));
    }

    #[test]
    fn list_is_sorted() {
        for window in CURRENCY_CODES.windows(2) {
            assert!(window[0] < window[1], "{} >= {}", window[0], window[1]);
        }
    }
}
