#![no_main]

use chrono::NaiveDate;
use digital_invoice::*;
use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;

fuzz_target!(|input: (&str, &str, &str, i32, u8)| {
    let (currency, type_code, unit, cents, rate) = input;
    let Some(date) = NaiveDate::from_ymd_opt(2024, 1, 1) else {
        return;
    };
    let price = Decimal::new(cents.into(), 2);

    let mut b = InvoiceBuilder::new("FUZZ-1", date, CiiProfile::En16931);
    b.currency(currency)
        .type_code(type_code)
        .seller(PartyBuilder::new("S").address(AddressBuilder::country("FR").build()).build())
        .buyer("R", PartyBuilder::new("B").build())
        .add_line(
            LineItemBuilder::new("x", Decimal::ONE, unit, price)
                .tax_rate(Decimal::from(rate))
                .build(),
        );

    // Whatever the inputs, a rendered document must pass the local checks.
    if let Ok(xml) = b.to_xml() {
        let errors = StructuralValidator.check(&xml, b.profile());
        assert!(errors.is_empty(), "{errors:?}");
    }
});
