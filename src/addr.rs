//! Compact IPv4 address keys.
//!
//! [`Ipv4Key`] is the identity the counting and ranking structures operate on:
//! a `u32` holding the four octets in big-endian order
//! (`a << 24 | b << 16 | c << 8 | d`). Every `u32` is a valid key, so the core
//! never validates; only the textual parser can fail.
//!
//! ## Example Usage
//!
//! ```
//! use iprank::addr::Ipv4Key;
//!
//! let key: Ipv4Key = "192.168.0.1".parse().unwrap();
//! assert_eq!(key.as_u32(), 0xC0A8_0001);
//! assert_eq!(key.octets(), [192, 168, 0, 1]);
//! assert_eq!(key.to_string(), "192.168.0.1");
//!
//! assert!("192.168.0".parse::<Ipv4Key>().is_err());
//! assert!("192.168.0.256".parse::<Ipv4Key>().is_err());
//! ```
//!
//! ## Accepted Syntax
//!
//! Exactly four `.`-separated fields, each one to three ASCII digits with a
//! value in `[0, 255]`. Leading zeros are accepted (`"010"` is `10`). Signs,
//! whitespace, empty fields and extra fields are rejected.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::{AddressFormatIssue, InvalidAddressFormat};

/// An IPv4 address encoded as a big-endian `u32`.
///
/// Ordering follows the numeric value, so `0.0.0.0 < 0.0.0.1 < 255.255.255.255`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Ipv4Key(u32);

impl Ipv4Key {
    /// `0.0.0.0`
    pub const UNSPECIFIED: Ipv4Key = Ipv4Key(0);
    /// `255.255.255.255`
    pub const BROADCAST: Ipv4Key = Ipv4Key(u32::MAX);

    /// Wraps a raw big-endian key.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Builds a key from its four octets, most significant first.
    ///
    /// # Example
    ///
    /// ```
    /// use iprank::addr::Ipv4Key;
    ///
    /// let key = Ipv4Key::from_octets(8, 8, 8, 8);
    /// assert_eq!(key.as_u32(), 0x0808_0808);
    /// ```
    #[inline]
    pub const fn from_octets(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self(u32::from_be_bytes([a, b, c, d]))
    }

    /// Returns the raw key.
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the four octets, most significant first.
    #[inline]
    pub const fn octets(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Parses a dotted-quad string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAddressFormat`] if `input` is not exactly four
    /// dot-separated decimal octets in `[0, 255]`.
    ///
    /// # Example
    ///
    /// ```
    /// use iprank::addr::Ipv4Key;
    /// use iprank::error::AddressFormatIssue;
    ///
    /// assert_eq!(Ipv4Key::parse("127.0.0.1").unwrap(), Ipv4Key::from_octets(127, 0, 0, 1));
    ///
    /// let err = Ipv4Key::parse("127.0..1").unwrap_err();
    /// assert_eq!(err.issue(), AddressFormatIssue::EmptyOctet { position: 2 });
    /// ```
    pub fn parse(input: &str) -> Result<Self, InvalidAddressFormat> {
        let found = input.split('.').count();
        if found != 4 {
            return Err(InvalidAddressFormat::new(
                input,
                AddressFormatIssue::WrongFieldCount { found },
            ));
        }

        let mut octets = [0u8; 4];
        for (position, field) in input.split('.').enumerate() {
            octets[position] = parse_octet(field, position)
                .map_err(|issue| InvalidAddressFormat::new(input, issue))?;
        }
        Ok(Self(u32::from_be_bytes(octets)))
    }
}

fn parse_octet(field: &str, position: usize) -> Result<u8, AddressFormatIssue> {
    if field.is_empty() {
        return Err(AddressFormatIssue::EmptyOctet { position });
    }
    if field.len() > 3 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddressFormatIssue::InvalidDigit { position });
    }
    let value = field
        .bytes()
        .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'));
    u8::try_from(value).map_err(|_| AddressFormatIssue::OctetOutOfRange { position })
}

impl FromStr for Ipv4Key {
    type Err = InvalidAddressFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Ipv4Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets();
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

impl fmt::Debug for Ipv4Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ipv4Key({})", self)
    }
}

impl From<u32> for Ipv4Key {
    #[inline]
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<Ipv4Key> for u32 {
    #[inline]
    fn from(key: Ipv4Key) -> Self {
        key.0
    }
}

impl From<[u8; 4]> for Ipv4Key {
    #[inline]
    fn from(octets: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(octets))
    }
}

impl From<Ipv4Addr> for Ipv4Key {
    #[inline]
    fn from(addr: Ipv4Addr) -> Self {
        Self(u32::from(addr))
    }
}

impl From<Ipv4Key> for Ipv4Addr {
    #[inline]
    fn from(key: Ipv4Key) -> Self {
        Ipv4Addr::from(key.0)
    }
}
