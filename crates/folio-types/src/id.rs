use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Shortest name identifier accepted, in hex characters.
pub const MIN_NAME_ID_LEN: usize = 8;
/// Longest name identifier accepted (a full 32-byte digest).
pub const MAX_NAME_ID_LEN: usize = 64;
/// Name identifier length used unless configured otherwise.
pub const DEFAULT_NAME_ID_LEN: usize = 20;

/// Identifier of a directory or file within its parent directory.
///
/// A `NameId` is the lowercase hex rendering of a digest of the entry's name,
/// truncated to a fixed length. The same name always produces the same
/// `NameId`, so identifiers handed out to clients stay valid across re-scans
/// as long as the names on disk do not change.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NameId(String);

impl NameId {
    /// Build a `NameId` from a digest, keeping the first `len` hex characters.
    ///
    /// `len` is clamped to `MIN_NAME_ID_LEN..=MAX_NAME_ID_LEN`; use
    /// [`NameId::check_len`] to reject bad lengths up front.
    pub fn from_digest(digest: &[u8; 32], len: usize) -> Self {
        let mut hex = hex::encode(digest);
        hex.truncate(len.clamp(MIN_NAME_ID_LEN, MAX_NAME_ID_LEN));
        Self(hex)
    }

    /// Validate a name identifier length.
    pub fn check_len(len: usize) -> Result<(), TypeError> {
        if !(MIN_NAME_ID_LEN..=MAX_NAME_ID_LEN).contains(&len) {
            return Err(TypeError::InvalidNameIdLength {
                actual: len,
                min: MIN_NAME_ID_LEN,
                max: MAX_NAME_ID_LEN,
            });
        }
        Ok(())
    }

    /// Parse a textual identifier, as received from a client.
    ///
    /// Only lowercase hex within the accepted length range is valid.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        Self::check_len(s.len())?;
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(TypeError::InvalidHex(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in hex characters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a `NameId` has at least [`MIN_NAME_ID_LEN`] characters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameId({})", self.0)
    }
}

impl fmt::Display for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NameId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NameId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<NameId> for String {
    fn from(id: NameId) -> Self {
        id.0
    }
}

/// Content-addressed identifier of a file.
///
/// A `ContentId` is the full digest of a file's bytes. Byte-identical files
/// share a `ContentId` regardless of where they live, which is what the
/// external metadata store keys on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId([u8; 32]);

impl ContentId {
    /// Create a `ContentId` from a pre-computed hash.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.short_hex())
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for ContentId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<String> for ContentId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> Self {
        id.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn name_id_truncates_digest() {
        let id = NameId::from_digest(&[0xab; 32], 20);
        assert_eq!(id.as_str(), "abababababababababab");
        assert_eq!(id.len(), 20);
    }

    #[test]
    fn check_len_rejects_out_of_range() {
        assert!(matches!(
            NameId::check_len(4),
            Err(TypeError::InvalidNameIdLength { actual: 4, .. })
        ));
        assert!(NameId::check_len(65).is_err());
        assert!(NameId::check_len(64).is_ok());
        assert!(NameId::check_len(MIN_NAME_ID_LEN).is_ok());
    }

    #[test]
    fn from_digest_clamps_length() {
        assert_eq!(NameId::from_digest(&[0; 32], 2).len(), MIN_NAME_ID_LEN);
        assert_eq!(NameId::from_digest(&[0; 32], 100).len(), MAX_NAME_ID_LEN);
    }

    #[test]
    fn name_id_parse_rejects_uppercase_and_non_hex() {
        assert!(NameId::parse("0123456789abcdef0123").is_ok());
        assert!(matches!(
            NameId::parse("0123456789ABCDEF0123"),
            Err(TypeError::InvalidHex(_))
        ));
        assert!(NameId::parse("not-an-identifier!!!").is_err());
        assert!(NameId::parse("abc").is_err());
    }

    #[test]
    fn name_id_serializes_as_plain_string() {
        let id = NameId::parse("00112233445566778899").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00112233445566778899\"");
        let back: NameId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<NameId>("\"zz\"").is_err());
    }

    #[test]
    fn content_id_hex_roundtrip() {
        let id = ContentId::from_hash([7; 32]);
        assert_eq!(ContentId::from_hex(&id.to_hex()).unwrap(), id);
        assert_eq!(format!("{id}").len(), 64);
        assert_eq!(id.short_hex().len(), 8);
    }

    #[test]
    fn content_id_rejects_short_hex() {
        assert_eq!(
            ContentId::from_hex("abcd"),
            Err(TypeError::InvalidLength {
                expected: 32,
                actual: 2
            })
        );
    }

    #[test]
    fn content_id_serializes_as_hex() {
        let id = ContentId::from_hash([1; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.to_hex()));
    }

    proptest! {
        #[test]
        fn any_digest_prefix_parses_back(bytes in any::<[u8; 32]>(), len in MIN_NAME_ID_LEN..=MAX_NAME_ID_LEN) {
            let id = NameId::from_digest(&bytes, len);
            prop_assert_eq!(id.len(), len);
            prop_assert_eq!(NameId::parse(id.as_str()).unwrap(), id);
        }
    }
}
