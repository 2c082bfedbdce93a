use std::fs;

use rillow::{
    from_xml_str, from_xml_str_with_config, ErrorKind, ParserConfig, ResponseConfig,
    SimplifyOptions,
};

const INVALID: &[&str] = &["truncated.xml"];

#[test]
fn test_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let content = fs::read_to_string(&path)?;
        let invalid = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| INVALID.contains(&name));

        match (from_xml_str(&content), invalid) {
            (Ok(_), true) => {
                return Err(std::io::Error::other(format!(
                    "Should fail to parse invalid file: {path:?}"
                ))
                .into())
            }
            (Err(err), false) => {
                return Err(std::io::Error::other(format!(
                    "Failed to parse valid file {path:?}: {err}"
                ))
                .into())
            }
            _ => {}
        }
    }
    Ok(())
}

#[test]
fn test_keep_root_and_force_array_on_response() -> Result<(), Box<dyn std::error::Error>> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/zestimate.xml");
    let content = fs::read_to_string(path)?;
    let config = ResponseConfig {
        simplify: SimplifyOptions {
            keep_root: true,
            force_array: true,
            ..SimplifyOptions::default()
        },
        ..ResponseConfig::default()
    };

    let doc = from_xml_str_with_config(&content, &config)?;
    let tree = doc.to_plain_structure();
    let root = tree.get("Zestimate:zestimate").and_then(rillow::Node::as_sequence);
    assert_eq!(root.map(rillow::Sequence::len), Some(1));

    // every element value is wrapped, so the first zpid hit is a sequence
    let zpid = doc.find_attribute("zpid");
    assert_eq!(
        zpid.and_then(rillow::Node::as_sequence)
            .and_then(|s| s.get(0))
            .and_then(rillow::Node::as_str),
        Some("48749425")
    );
    Ok(())
}

#[test]
fn test_deep_nesting_is_an_error_not_a_crash() {
    let depth = 200_000;
    let body = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
    let config = ResponseConfig {
        parser: ParserConfig::unlimited(),
        ..ResponseConfig::default()
    };

    let err = from_xml_str_with_config(&body, &config).err();
    assert_eq!(
        err.map(|e| e.kind().clone()),
        Some(ErrorKind::MaxDepthExceeded {
            max: rillow::xml::MAX_DEPTH_CAP
        })
    );
}

#[test]
fn test_byte_order_mark_response() -> Result<(), Box<dyn std::error::Error>> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/zestimate.xml");
    let content = format!("\u{FEFF}{}", fs::read_to_string(path)?);
    let doc = from_xml_str(&content)?;
    assert_eq!(doc.find_text("zpid"), Some("48749425"));
    Ok(())
}
