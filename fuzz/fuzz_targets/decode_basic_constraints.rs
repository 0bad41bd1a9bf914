#![no_main]

use libfuzzer_sys::fuzz_target;
use bcder_basic_constraints::{basic, BasicConstraints, Mode, Variant};

fuzz_target!(|data: &[u8]| {
    for variant in [Variant::Legacy, Variant::V2] {
        let der = BasicConstraints::decode(variant, data);
        let ber = BasicConstraints::decode_in_mode(variant, data, Mode::Ber);

        // Everything that is valid DER is also valid BER.
        if let Ok(der) = der.as_ref() {
            assert_eq!(Ok(der), ber.as_ref());
        }

        if let Ok(value) = ber {
            if !value.has_path_len_constraint() {
                assert_eq!(value.path_len_constraint(), 0);
            }
            assert!(value.path_len_constraint() >= 0);

            // Re-encoding gives canonical DER which decodes to the same.
            let encoded = basic::encode(
                value.ca(),
                value.has_path_len_constraint(),
                value.path_len_constraint()
            ).unwrap();
            assert_eq!(
                basic::decode(Variant::V2, encoded.as_slice()).unwrap(),
                value
            );
            if variant == Variant::V2 && der.is_ok() {
                assert_eq!(encoded.as_slice(), data);
            }
        }
    }
});
