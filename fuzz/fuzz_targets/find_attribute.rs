#![no_main]
use libfuzzer_sys::fuzz_target;
use rillow::{from_xml_str_with_config, ResponseConfig, SimplifyOptions};

fuzz_target!(|data: &[u8]| {
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };
    let Ok(s) = std::str::from_utf8(rest) else {
        return;
    };
    let config = ResponseConfig {
        simplify: SimplifyOptions {
            keep_root: flags & 1 != 0,
            force_array: flags & 2 != 0,
            ..SimplifyOptions::default()
        },
        ..ResponseConfig::default()
    };
    if let Ok(doc) = from_xml_str_with_config(s, &config) {
        for name in ["zpid", "code", "content", "response"] {
            let _ = doc.find_attribute(name);
        }
    }
});
