#![no_main]

use std::net::Ipv4Addr;

use iprank::addr::Ipv4Key;
use libfuzzer_sys::fuzz_target;

// Fuzz the dotted-quad parser
//
// Arbitrary input must never panic. Accepted input must render back to a
// canonical form that std agrees with, and canonical std output must always
// be accepted.
fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(key) = Ipv4Key::parse(text) {
            let canonical = key.to_string();
            assert_eq!(canonical.parse::<Ipv4Addr>().map(Ipv4Key::from), Ok(key));
            assert_eq!(Ipv4Key::parse(&canonical), Ok(key));
        }
    }

    if data.len() >= 4 {
        let octets = [data[0], data[1], data[2], data[3]];
        let text = Ipv4Addr::from(octets).to_string();
        assert_eq!(Ipv4Key::parse(&text), Ok(Ipv4Key::from(octets)));
    }
});
