use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use bytes::Bytes;
use thiserror::Error;

/// Opaque position in a paged scan.
///
/// On the wire it is the store's paging state in URL-safe base64 with
/// padding. Clients must hand it back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingCursor(Bytes);

#[derive(Debug, Error)]
pub enum CursorError {
    #[error("paging_state is not valid base64: {0}")]
    Malformed(#[from] base64::DecodeError),
}

impl PagingCursor {
    /// Empty paging state means "no more pages".
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Option<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            None
        } else {
            Some(Self(bytes))
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn encode(&self) -> String {
        URL_SAFE.encode(&self.0)
    }

    /// Parse a client token. An empty token asks for the first page.
    pub fn decode(token: &str) -> Result<Option<Self>, CursorError> {
        if token.is_empty() {
            return Ok(None);
        }
        let bytes = URL_SAFE.decode(token)?;
        Ok(Self::from_bytes(bytes))
    }
}

/// Token for the response body; empty when the scan is done.
pub fn encode_token(cursor: Option<&PagingCursor>) -> String {
    cursor.map(PagingCursor::encode).unwrap_or_default()
}
