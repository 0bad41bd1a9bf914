#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use bcder_basic_constraints::{BasicConstraintsExtension, Extension, Mode};
use bcder_basic_constraints::encode::Values;

fuzz_target!(|data: &[u8]| {
    let data = Bytes::copy_from_slice(data);
    for mode in [Mode::Ber, Mode::Der] {
        let ext = match Extension::decode(data.clone(), mode) {
            Ok(ext) => ext,
            Err(_) => continue
        };
        if mode == Mode::Der {
            assert_eq!(ext.encode().to_vec(), data.as_ref());
        }
        if let Some(mut basic) = BasicConstraintsExtension::from_extension(
            &ext
        ) {
            let first = basic.decoded();
            assert_eq!(basic.is_decoded(), first.is_ok());
            assert_eq!(basic.decoded(), first);
            assert_eq!(basic.to_extension(), ext);
        }
    }
});
