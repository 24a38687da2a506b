//! Network indicator extraction.
//!
//! Pulls dotted-quad IPv4 literals out of the raw buffer. The regex only
//! nominates candidates; each one must parse as a real address before it is
//! reported (conservative pattern, token validation after).

use std::net::Ipv4Addr;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::core::report::{IndicatorOrigin, NetworkIndicator};

static RE_IPV4_CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("valid ipv4 candidate regex"));

/// Extract up to `max` observed indicators in buffer order.
///
/// Addresses in 0.0.0.0/8 and the loopback literal are discarded; they show
/// up constantly in benign binaries and say nothing about infrastructure.
pub fn extract_indicators(data: &[u8], max: usize) -> Vec<NetworkIndicator> {
    let mut out = Vec::new();
    for m in RE_IPV4_CANDIDATE.find_iter(data) {
        if out.len() >= max {
            break;
        }
        let Ok(text) = std::str::from_utf8(m.as_bytes()) else {
            continue;
        };
        let Ok(addr) = Ipv4Addr::from_str(text) else {
            continue;
        };
        if addr.octets()[0] == 0 || addr == Ipv4Addr::LOCALHOST {
            continue;
        }
        out.push(NetworkIndicator {
            ip: text.to_string(),
            proto: "TCP".to_string(),
            origin: IndicatorOrigin::Observed,
        });
    }
    out
}

/// The placeholder indicator shown when a high-suspicion artifact yields no
/// extractable address. Display-only; its origin marks it as fabricated.
pub fn placeholder_indicator() -> NetworkIndicator {
    NetworkIndicator {
        ip: "103.20.10.5".to_string(),
        proto: "Hidden".to_string(),
        origin: IndicatorOrigin::Synthetic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_in_buffer_order() {
        let data = b"beacon to 45.77.1.9 then 185.220.101.4 done";
        let hits = extract_indicators(data, 5);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].ip, "45.77.1.9");
        assert_eq!(hits[1].ip, "185.220.101.4");
        assert!(hits.iter().all(|h| h.proto == "TCP"));
        assert!(hits.iter().all(|h| h.origin == IndicatorOrigin::Observed));
    }

    #[test]
    fn test_filters_loopback_and_zero_net() {
        let data = b"127.0.0.1 0.0.0.0 0.1.2.3 10.0.0.5";
        let hits = extract_indicators(data, 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].ip, "10.0.0.5");
    }

    #[test]
    fn test_rejects_out_of_range_quads() {
        let data = b"version 999.720.1.1 and 256.1.1.1";
        assert!(extract_indicators(data, 5).is_empty());
    }

    #[test]
    fn test_caps_at_max() {
        let data = b"1.1.1.1 2.2.2.2 3.3.3.3 4.4.4.4 5.5.5.5 6.6.6.6 7.7.7.7";
        let hits = extract_indicators(data, 5);
        assert_eq!(hits.len(), 5);
        assert_eq!(hits.last().unwrap().ip, "5.5.5.5");
    }

    #[test]
    fn test_placeholder_is_marked_synthetic() {
        let p = placeholder_indicator();
        assert_eq!(p.ip, "103.20.10.5");
        assert_eq!(p.proto, "Hidden");
        assert_eq!(p.origin, IndicatorOrigin::Synthetic);
    }
}
