//! Supplemental intelligence sweep.
//!
//! Collects non-network artifacts (email addresses, cryptocurrency wallet
//! candidates) straight from the buffer. These never move the score; they
//! only populate the report's intelligence section.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::core::finding::{Ioc, IocKind};

static RE_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i-u)\b[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}\b").expect("valid email regex")
});

// Legacy BTC address shape; bech32 is out of scope for a byte sweep.
static RE_BTC_WALLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[13][a-km-zA-HJ-NP-Z1-9]{25,34}\b").expect("valid wallet regex")
});

const MAX_PER_KIND: usize = 16;

/// Extract wallet and email indicators, deduplicated, in buffer order.
pub fn sweep(data: &[u8]) -> Vec<Ioc> {
    let mut out = Vec::new();
    collect(data, &RE_EMAIL, IocKind::Email, &mut out);
    collect(data, &RE_BTC_WALLET, IocKind::Wallet, &mut out);
    out
}

fn collect(data: &[u8], re: &Regex, kind: IocKind, out: &mut Vec<Ioc>) {
    let mut count = 0usize;
    for m in re.find_iter(data) {
        if count >= MAX_PER_KIND {
            break;
        }
        let Ok(text) = std::str::from_utf8(m.as_bytes()) else {
            continue;
        };
        let ioc = Ioc {
            kind,
            value: text.to_string(),
        };
        if !out.contains(&ioc) {
            out.push(ioc);
            count += 1;
        }
    }
}
