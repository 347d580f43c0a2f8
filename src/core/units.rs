//! Unit of measure codes accepted on invoice lines: UN/ECE Recommendation 20
//! units plus the Recommendation 21 package codes (`X` prefix).

/// Known codes with their English names, sorted by code.
static UNITS: &[(&str, &str)] = &[
    ("ANN", "year"),
    ("C62", "one"),
    ("CMT", "centimetre"),
    ("CT", "carton"),
    ("DAY", "day"),
    ("DZN", "dozen"),
    ("E48", "service unit"),
    ("EA", "each"),
    ("FOT", "foot"),
    ("GLL", "US gallon"),
    ("GRM", "gram"),
    ("H87", "piece"),
    ("HAR", "hectare"),
    ("HUR", "hour"),
    ("INH", "inch"),
    ("KGM", "kilogram"),
    ("KMH", "kilometre per hour"),
    ("KMT", "kilometre"),
    ("KWH", "kilowatt hour"),
    ("KWT", "kilowatt"),
    ("LBR", "pound"),
    ("LM", "linear metre"),
    ("LS", "lump sum"),
    ("LTR", "litre"),
    ("MGM", "milligram"),
    ("MIN", "minute"),
    ("MLT", "millilitre"),
    ("MMT", "millimetre"),
    ("MON", "month"),
    ("MTK", "square metre"),
    ("MTQ", "cubic metre"),
    ("MTR", "metre"),
    ("MWH", "megawatt hour"),
    ("NAR", "number of articles"),
    ("NPR", "number of pairs"),
    ("P1", "percent"),
    ("PR", "pair"),
    ("QTI", "quarter"),
    ("SEC", "second"),
    ("SET", "set"),
    ("SMI", "mile"),
    ("TNE", "tonne"),
    ("WEE", "week"),
    ("XBD", "bundle"),
    ("XBG", "bag"),
    ("XBX", "box"),
    ("XCT", "carton"),
    ("XPA", "packet"),
    ("XPK", "package"),
    ("XPX", "pallet"),
    ("XRO", "roll"),
    ("XSA", "sack"),
    ("XST", "sheet"),
    ("YRD", "yard"),
];

/// English name of a unit code, `None` if the code is not accepted.
pub fn unit_name(code: &str) -> Option<&'static str> {
    UNITS
        .binary_search_by(|(known, _)| known.cmp(&code))
        .ok()
        .map(|i| UNITS[i].1)
}

pub fn is_known_unit_code(code: &str) -> bool {
    unit_name(code).is_some()
}

/// Describe an unaccepted unit code. Codes are case sensitive; a code that
/// only differs by case or padding gets a suggestion.
pub(crate) fn unit_code_problem(code: &str) -> Option<String> {
    if is_known_unit_code(code) {
        return None;
    }
    let canonical = code.trim().to_ascii_uppercase();
    Some(match unit_name(&canonical) {
        Some(name) => {
            format!("unknown unit of measure '{code}', did you mean '{canonical}' ({name})?")
        }
        None => format!("unknown unit of measure '{code}'"),
    })
}
