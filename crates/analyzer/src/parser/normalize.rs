//! Field-name normalization.
//!
//! Log producers spell the same field many ways (`src-ip`, `source_ip`,
//! `SRC_IP`...). Everything downstream only ever sees the canonical spelling.

/// Map a raw field name onto its canonical spelling.
///
/// Lower-cases and trims the key, then folds known variants onto one of
/// `src_ip`, `dst_ip`, `src_port`, `dst_port`, `protocol`, `bytes`, `timestamp`.
/// Unknown keys come back lower-cased and trimmed but otherwise untouched.
pub fn normalize_key(raw: &str) -> String {
    let key = raw.trim().to_lowercase();

    let canonical = match key.as_str() {
        "source_ip" | "source-ip" | "src-ip" => "src_ip",
        "destination_ip" | "destination-ip" | "dst-ip" => "dst_ip",
        "source_port" | "source-port" | "src-port" => "src_port",
        "destination_port" | "destination-port" | "dst-port" => "dst_port",
        "proto" => "protocol",
        "byte" => "bytes",
        "time" => "timestamp",
        _ => return key,
    };

    canonical.to_string()
}

/// The canonical fields a [`TrafficRecord`](super::model::TrafficRecord) carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Timestamp,
    SrcIp,
    DstIp,
    SrcPort,
    DstPort,
    Protocol,
    Bytes,
    Other,
}

impl CanonicalField {
    /// Classify an already-normalized key
    pub fn from_key(key: &str) -> Self {
        match key {
            "timestamp" => CanonicalField::Timestamp,
            "src_ip" => CanonicalField::SrcIp,
            "dst_ip" => CanonicalField::DstIp,
            "src_port" => CanonicalField::SrcPort,
            "dst_port" => CanonicalField::DstPort,
            "protocol" => CanonicalField::Protocol,
            "bytes" => CanonicalField::Bytes,
            _ => CanonicalField::Other,
        }
    }

    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            CanonicalField::Timestamp => Some("timestamp"),
            CanonicalField::SrcIp => Some("src_ip"),
            CanonicalField::DstIp => Some("dst_ip"),
            CanonicalField::SrcPort => Some("src_port"),
            CanonicalField::DstPort => Some("dst_port"),
            CanonicalField::Protocol => Some("protocol"),
            CanonicalField::Bytes => Some("bytes"),
            CanonicalField::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_variants() {
        let cases = vec![
            ("source_ip", "src_ip"),
            ("source-ip", "src_ip"),
            ("src-ip", "src_ip"),
            ("src_ip", "src_ip"),
            ("destination_ip", "dst_ip"),
            ("Destination-IP", "dst_ip"),
            ("dst-ip", "dst_ip"),
            ("source_port", "src_port"),
            ("src-port", "src_port"),
            ("destination-port", "dst_port"),
            ("dst-port", "dst_port"),
            ("PROTO", "protocol"),
            ("protocol", "protocol"),
            ("byte", "bytes"),
            ("bytes", "bytes"),
            ("time", "timestamp"),
            ("Timestamp", "timestamp"),
        ];

        for (raw, expected) in cases {
            assert_eq!(normalize_key(raw), expected, "normalizing {}", raw);
        }
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_key("  src-ip \t"), "src_ip");
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        assert_eq!(normalize_key("in-interface"), "in-interface");
        assert_eq!(normalize_key(" Chain "), "chain");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_canonical_field_classification() {
        assert_eq!(CanonicalField::from_key("src_ip"), CanonicalField::SrcIp);
        assert_eq!(CanonicalField::from_key("bytes"), CanonicalField::Bytes);
        assert_eq!(CanonicalField::from_key("src-ip"), CanonicalField::Other);
        assert_eq!(CanonicalField::from_key("chain"), CanonicalField::Other);

        for key in ["timestamp", "src_ip", "dst_ip", "src_port", "dst_port", "protocol", "bytes"] {
            assert_eq!(CanonicalField::from_key(key).as_str(), Some(key));
        }
        assert_eq!(CanonicalField::Other.as_str(), None);
    }
}
