use paragen_error::{ParagenResult, paragen_bail, paragen_err};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// How candidates are encoded for checkpoints and broker payloads.
///
/// All three tokens are understood at the framing layer for wire interop.
/// `Text` encodes as JSON and `Binary` as CBOR; `Xml` can be parsed and
/// forwarded but has no bundled encoder, so using it for actual payloads is
/// an error. The checkpoint mode and the wire mode are configured
/// independently and never need to agree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SerializationMode {
    #[default]
    Text,
    Xml,
    Binary,
}

impl SerializationMode {
    /// The wire token for this mode.
    pub fn as_token(&self) -> &'static str {
        match self {
            SerializationMode::Text => "text",
            SerializationMode::Xml => "xml",
            SerializationMode::Binary => "binary",
        }
    }

    pub fn from_token(token: &str) -> ParagenResult<Self> {
        match token {
            "text" => Ok(SerializationMode::Text),
            "xml" => Ok(SerializationMode::Xml),
            "binary" => Ok(SerializationMode::Binary),
            other => Err(paragen_err!(Protocol: "unknown serialization mode token {:?}", other)),
        }
    }

    pub fn to_bytes<T: Serialize>(&self, value: &T) -> ParagenResult<Vec<u8>> {
        match self {
            SerializationMode::Text => serde_json::to_vec(value)
                .map_err(|e| paragen_err!(Serde: "json encoding failed: {}", e)),
            SerializationMode::Binary => {
                let mut bytes = Vec::new();
                ciborium::ser::into_writer(value, &mut bytes)
                    .map_err(|e| paragen_err!(Serde: "cbor encoding failed: {}", e))?;
                Ok(bytes)
            }
            SerializationMode::Xml => {
                paragen_bail!(Serde: "no xml encoder is bundled; use text or binary")
            }
        }
    }

    pub fn from_bytes<T: DeserializeOwned>(&self, bytes: &[u8]) -> ParagenResult<T> {
        match self {
            SerializationMode::Text => serde_json::from_slice(bytes)
                .map_err(|e| paragen_err!(Serde: "json decoding failed: {}", e)),
            SerializationMode::Binary => ciborium::de::from_reader(bytes)
                .map_err(|e| paragen_err!(Serde: "cbor decoding failed: {}", e)),
            SerializationMode::Xml => {
                paragen_bail!(Serde: "no xml decoder is bundled; use text or binary")
            }
        }
    }
}

impl std::fmt::Display for SerializationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

impl std::str::FromStr for SerializationMode {
    type Err = paragen_error::ParagenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SerializationMode::from_token(s)
    }
}
