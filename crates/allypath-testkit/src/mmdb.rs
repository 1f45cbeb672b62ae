//! Minimal MaxMind DB images
//!
//! Real GeoLite2 files are too large to check in. The image built here is a
//! valid IPv4 database with a single search-tree node: addresses in
//! `0.0.0.0/1` resolve to one country, everything else is absent.

const METADATA_MARKER: &[u8] = b"\xAB\xCD\xEFMaxMind.com";

/// Database placing `0.0.0.0/1` in `country` (two ASCII letters).
pub fn single_country_mmdb(country: &str) -> Vec<u8> {
    assert_eq!(country.len(), 2, "country code must be two letters");
    let mut db = Vec::new();

    // Search tree: node_count 1, 24-bit records. The left record points at
    // data offset 0 (node_count + 16 + 0), the right one equals node_count,
    // which means "not found".
    db.extend_from_slice(&[0x00, 0x00, 0x11, 0x00, 0x00, 0x01]);
    db.extend_from_slice(&[0u8; 16]);

    // { "country": { "iso_code": <country> } }
    db.push(0xE1);
    push_str(&mut db, "country");
    db.push(0xE1);
    push_str(&mut db, "iso_code");
    push_str(&mut db, country);

    db.extend_from_slice(METADATA_MARKER);
    db.push(0xE9);
    push_str(&mut db, "binary_format_major_version");
    db.extend_from_slice(&[0xA1, 0x02]);
    push_str(&mut db, "binary_format_minor_version");
    db.push(0xA0);
    push_str(&mut db, "build_epoch");
    db.extend_from_slice(&[0x00, 0x02]);
    push_str(&mut db, "database_type");
    push_str(&mut db, "Test");
    push_str(&mut db, "description");
    db.push(0xE0);
    push_str(&mut db, "ip_version");
    db.extend_from_slice(&[0xA1, 0x04]);
    push_str(&mut db, "languages");
    db.extend_from_slice(&[0x00, 0x04]);
    push_str(&mut db, "node_count");
    db.extend_from_slice(&[0xC1, 0x01]);
    push_str(&mut db, "record_size");
    db.extend_from_slice(&[0xA1, 0x18]);
    db
}

/// UTF-8 string field; short strings only.
fn push_str(db: &mut Vec<u8>, value: &str) {
    assert!(value.len() < 29);
    db.push(0x40 | value.len() as u8);
    db.extend_from_slice(value.as_bytes());
}
