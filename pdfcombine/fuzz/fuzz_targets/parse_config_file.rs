#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfcombine::Config;
use pdfcombine::config::file::ConfigFile;
use std::path::PathBuf;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Arbitrary YAML must be rejected with an error, never a panic
    if let Ok(file) = ConfigFile::parse(text) {
        let mut config = Config::new(Vec::new(), PathBuf::from("binder.pdf"));
        if file.apply_to(&mut config).is_ok() {
            let _ = config.validate();
            let _ = config.bookmark_labels();
        }
    }
});
