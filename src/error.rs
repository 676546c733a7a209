//! Error types for the iprank library.
//!
//! ## Key Components
//!
//! - [`InvalidAddressFormat`]: Returned by the address parser when a string is
//!   not exactly four dot-separated decimal octets in `[0, 255]`.
//! - [`ConfigError`]: Returned when ranking configuration parameters are
//!   invalid (e.g. zero capacity).
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (debug-only `check_invariants` methods).
//!
//! The counting core itself has no failure modes: every `u32` is a valid key
//! and every operation is a pure in-memory mutation.
//!
//! ## Example Usage
//!
//! ```
//! use iprank::addr::Ipv4Key;
//! use iprank::error::AddressFormatIssue;
//!
//! let err = "10.0.0.256".parse::<Ipv4Key>().unwrap_err();
//! assert_eq!(err.input(), "10.0.0.256");
//! assert_eq!(err.issue(), AddressFormatIssue::OctetOutOfRange { position: 3 });
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvalidAddressFormat
// ---------------------------------------------------------------------------

/// Why an address string was rejected.
///
/// Octet positions are zero-based, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFormatIssue {
    /// The input did not split into exactly four `.`-separated fields.
    WrongFieldCount { found: usize },
    /// A field between dots was empty.
    EmptyOctet { position: usize },
    /// A field contained something other than ASCII digits, or more than
    /// three digits.
    InvalidDigit { position: usize },
    /// A field parsed to a value above 255.
    OctetOutOfRange { position: usize },
}

impl fmt::Display for AddressFormatIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFormatIssue::WrongFieldCount { found } => {
                write!(f, "expected 4 octets, found {}", found)
            },
            AddressFormatIssue::EmptyOctet { position } => {
                write!(f, "octet {} is empty", position)
            },
            AddressFormatIssue::InvalidDigit { position } => {
                write!(f, "octet {} is not a 1-3 digit decimal number", position)
            },
            AddressFormatIssue::OctetOutOfRange { position } => {
                write!(f, "octet {} is greater than 255", position)
            },
        }
    }
}

/// Error returned when a textual IPv4 address is malformed.
///
/// Produced by [`Ipv4Key::parse`](crate::addr::Ipv4Key::parse) and the
/// `FromStr` impl. Carries the rejected input and the first issue found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAddressFormat {
    input: String,
    issue: AddressFormatIssue,
}

impl InvalidAddressFormat {
    /// Creates a new `InvalidAddressFormat` for `input`.
    #[inline]
    pub fn new(input: impl Into<String>, issue: AddressFormatIssue) -> Self {
        Self {
            input: input.into(),
            issue,
        }
    }

    /// Returns the rejected input.
    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the reason the input was rejected.
    #[inline]
    pub fn issue(&self) -> AddressFormatIssue {
        self.issue
    }
}

impl fmt::Display for InvalidAddressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid IPv4 address {:?}: {}", self.input, self.issue)
    }
}

impl std::error::Error for InvalidAddressFormat {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when ranking configuration parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`RankedCounter::try_new`](crate::tracker::RankedCounter::try_new) and
/// [`RankingBuilder::try_build`](crate::builder::RankingBuilder::try_build).
///
/// # Example
///
/// ```
/// use iprank::tracker::TopAddresses;
///
/// let err = TopAddresses::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal invariants are violated.
///
/// Produced by debug-only `check_invariants` methods
/// (e.g. [`TopK::check_invariants`](crate::ds::TopK::check_invariants)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- InvalidAddressFormat ---------------------------------------------

    #[test]
    fn address_display_names_input_and_issue() {
        let err = InvalidAddressFormat::new(
            "1.2.3",
            AddressFormatIssue::WrongFieldCount { found: 3 },
        );
        let msg = err.to_string();
        assert!(msg.contains("\"1.2.3\""));
        assert!(msg.contains("expected 4 octets, found 3"));
    }

    #[test]
    fn address_accessors() {
        let err = InvalidAddressFormat::new("a.b.c.d", AddressFormatIssue::InvalidDigit {
            position: 0,
        });
        assert_eq!(err.input(), "a.b.c.d");
        assert_eq!(err.issue(), AddressFormatIssue::InvalidDigit { position: 0 });
    }

    #[test]
    fn address_issue_display_variants() {
        assert_eq!(
            AddressFormatIssue::EmptyOctet { position: 2 }.to_string(),
            "octet 2 is empty"
        );
        assert_eq!(
            AddressFormatIssue::OctetOutOfRange { position: 1 }.to_string(),
            "octet 1 is greater than 255"
        );
    }

    #[test]
    fn address_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvalidAddressFormat>();
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("capacity must be > 0");
        assert_eq!(err.to_string(), "capacity must be > 0");
    }

    #[test]
    fn config_message_accessor() {
        let err = ConfigError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn config_clone_and_eq() {
        let a = ConfigError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ConfigError>();
    }

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("index out of sync");
        assert_eq!(err.to_string(), "index out of sync");
    }

    #[test]
    fn invariant_debug_includes_message() {
        let err = InvariantError::new("bad order");
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("bad order"));
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
    }
}
