//! Tenant resolution from the request host.
//!
//! Each tenant's site is served from `{subdomain}.{root_domain}`. The apex
//! domain and `www` belong to the marketing site and resolve to no tenant.

/// Header used to forward the resolved subdomain to handlers and backends.
pub const TENANT_HEADER: &str = "x-tenant-subdomain";

/// Maximum length of a single DNS label.
const MAX_LABEL_LENGTH: usize = 63;

/// Subdomains that never name a tenant.
const RESERVED_SUBDOMAINS: &[&str] = &["www", "admin", "api"];

/// Derive the tenant subdomain from a `Host` header value.
///
/// Returns `None` for the apex domain, reserved subdomains, hosts outside
/// `root_domain`, and nested subdomains (`a.b.example.com`).
pub fn resolve_subdomain(host: &str, root_domain: &str) -> Option<String> {
    let host = strip_port(host.trim()).trim_end_matches('.').to_ascii_lowercase();
    let root = root_domain.trim().trim_end_matches('.').to_ascii_lowercase();

    let label = host.strip_suffix(&root)?.strip_suffix('.')?;

    if !is_valid_label(label) || RESERVED_SUBDOMAINS.contains(&label) {
        return None;
    }
    Some(label.to_string())
}

/// Returns `true` if `label` is a single well-formed DNS label.
pub fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LENGTH
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}
