// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Matching a host name against stored record sites.
//!
//! Both sides are normalized and compared by substring containment in
//! either direction, so `example.com` matches `login.example.com` and
//! `https://www.example.com/account`.

use tinyvault_core::DecryptedRecord;

/// Lowercase `input`, strip a leading `http://`/`https://` and `www.`, and
/// drop any path, query, or fragment.
pub fn normalize_site(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let rest = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    rest[..end].to_string()
}

/// First record whose normalized site contains, or is contained in, the
/// normalized `host`.
pub fn find_for_host<'a>(records: &'a [DecryptedRecord], host: &str) -> Option<&'a DecryptedRecord> {
    let host = normalize_site(host);
    if host.is_empty() {
        return None;
    }
    records.iter().find(|record| {
        let site = normalize_site(&record.site);
        !site.is_empty() && (site.contains(&host) || host.contains(&site))
    })
}
