//! URI record: an identifier code abbreviating a well-known prefix, then the rest of the URI.

use crate::ndef::types::error;
use crate::{Reason, Result};

/// Prefixes abbreviated by the identifier codes, indexed by code.
const PREFIXES: [&str; 0x24] = [
    "",
    "http://www.",
    "https://www.",
    "http://",
    "https://",
    "tel:",
    "mailto:",
    "ftp://anonymous:anonymous@",
    "ftp://ftp.",
    "ftps://",
    "sftp://",
    "smb://",
    "nfs://",
    "ftp://",
    "dav://",
    "news:",
    "telnet://",
    "imap:",
    "rtsp://",
    "urn:",
    "pop:",
    "sip:",
    "sips:",
    "tftp:",
    "btspp://",
    "btl2cap://",
    "btgoep://",
    "tcpobex://",
    "irdaobex://",
    "file://",
    "urn:epc:id:",
    "urn:epc:tag:",
    "urn:epc:pat:",
    "urn:epc:raw:",
    "urn:epc:",
    "urn:nfc:",
];

#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct UriRecord {
    pub identifier_code: u8,
    /// The URI with the prefix of the identifier code stripped.
    pub uri: String,
}

impl UriRecord {
    pub const TYPE: &'static [u8] = b"U";

    pub fn new(identifier_code: u8, uri: impl Into<String>) -> Self {
        Self {
            identifier_code,
            uri: uri.into(),
        }
    }

    /// Abbreviates the URI with the longest matching prefix.
    pub fn from_uri(uri: &str) -> Self {
        let (code, prefix) = PREFIXES
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, prefix)| uri.starts_with(*prefix))
            .max_by_key(|(_, prefix)| prefix.len())
            .unwrap_or((0, &""));

        Self::new(code as u8, &uri[prefix.len()..])
    }

    /// Expands the identifier code back into the full URI. Reserved codes expand to nothing.
    pub fn to_uri(&self) -> String {
        let prefix = PREFIXES
            .get(self.identifier_code as usize)
            .copied()
            .unwrap_or_default();

        format!("{}{}", prefix, self.uri)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::with_capacity(1 + self.uri.len());
        payload.push(self.identifier_code);
        payload.extend_from_slice(self.uri.as_bytes());

        Ok(payload)
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        let (code, uri) = payload
            .split_first()
            .ok_or_else(|| error("decode", Reason::IllegalArgument))?;
        let uri = std::str::from_utf8(uri).map_err(|_| error("decode", Reason::IllegalArgument))?;

        Ok(Self::new(*code, uri))
    }
}
