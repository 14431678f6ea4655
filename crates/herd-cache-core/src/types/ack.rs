//! Store write acknowledgement

use std::fmt;

/// Status a store returned for a write
///
/// Stores speak a textual protocol (`SET ... -> OK`). The status is kept as
/// the store sent it so a rejected write can be reported verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAck(String);

impl WriteAck {
    /// Token a store answers with when a write is applied
    pub const SUCCESS: &'static str = "OK";

    /// Wrap a raw status
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    /// The success acknowledgement
    pub fn ok() -> Self {
        Self(Self::SUCCESS.to_string())
    }

    /// Raw status as received
    pub fn status(&self) -> &str {
        &self.0
    }

    /// Case-insensitive match against [`WriteAck::SUCCESS`]
    pub fn is_success(&self) -> bool {
        self.0.eq_ignore_ascii_case(Self::SUCCESS)
    }
}

impl fmt::Display for WriteAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
