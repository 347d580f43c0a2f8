#![no_main]

use digital_invoice::{CiiProfile, Profile, StructuralValidator, UblPreset};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Findings are fine, panics are bugs.
        for profile in [
            Profile::from(CiiProfile::En16931),
            Profile::from(CiiProfile::ZugferdBasic),
            Profile::from(UblPreset::Malaysia),
        ] {
            let _ = StructuralValidator.check(s, &profile);
        }
    }
});
