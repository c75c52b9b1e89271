#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfcombine::merge::encode_text;

fuzz_target!(|text: &str| {
    let encoded = encode_text(text);

    if let Some(hex) = encoded.strip_prefix("<FEFF").and_then(|s| s.strip_suffix('>')) {
        let units: Vec<u16> = hex
            .as_bytes()
            .chunks(4)
            .map(|chunk| u16::from_str_radix(std::str::from_utf8(chunk).unwrap(), 16).unwrap())
            .collect();
        assert_eq!(String::from_utf16(&units).unwrap(), text);
    } else {
        assert!(encoded.starts_with('(') && encoded.ends_with(')'));
        assert!(encoded.is_ascii());
    }
});
