use std::net::IpAddr;

/// What the resolver looks up in the tenant directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantHint {
    /// Candidate subdomain (first host label, or the override value)
    pub subdomain: String,
    /// Normalised request host; `None` when the hint came from an override
    pub host: Option<String>,
}

impl TenantHint {
    pub fn from_override(value: &str) -> Option<Self> {
        let subdomain = value.trim().to_ascii_lowercase();
        if subdomain.is_empty() {
            return None;
        }
        Some(Self { subdomain, host: None })
    }

    pub fn from_host(raw: &str, ignored_subdomains: &[String]) -> Option<Self> {
        let host = normalize_host(raw)?;
        let subdomain = subdomain_of(&host, ignored_subdomains)?;
        Some(Self {
            subdomain: subdomain.to_string(),
            host: Some(host),
        })
    }
}

/// Lowercase, drop the port and any trailing dot. IP literals carry no tenant.
pub fn normalize_host(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('[') {
        return None;
    }
    let without_port = match raw.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => raw,
    };
    let host = without_port.trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() || host.parse::<IpAddr>().is_ok() {
        return None;
    }
    Some(host)
}

/// First label of a host with at least two labels, unless it is ignored
pub fn subdomain_of<'a>(host: &'a str, ignored_subdomains: &[String]) -> Option<&'a str> {
    let mut labels = host.split('.');
    let first = labels.next().filter(|l| !l.is_empty())?;
    labels.next()?;
    if ignored_subdomains.iter().any(|i| i.eq_ignore_ascii_case(first)) {
        return None;
    }
    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn www() -> Vec<String> {
        vec!["www".to_string()]
    }

    #[test]
    fn takes_first_label_of_multi_label_host() {
        let hint = TenantHint::from_host("paris.example.com", &www()).unwrap();
        assert_eq!(hint.subdomain, "paris");
        assert_eq!(hint.host.as_deref(), Some("paris.example.com"));
    }

    #[test]
    fn two_labels_are_enough() {
        let hint = TenantHint::from_host("paris.localhost", &www()).unwrap();
        assert_eq!(hint.subdomain, "paris");
    }

    #[test]
    fn www_is_no_tenant() {
        assert_eq!(TenantHint::from_host("www.example.com", &www()), None);
        assert_eq!(TenantHint::from_host("WWW.Example.com", &www()), None);
    }

    #[test]
    fn single_label_is_no_tenant() {
        assert_eq!(TenantHint::from_host("localhost", &www()), None);
        assert_eq!(TenantHint::from_host("localhost:8000", &www()), None);
        assert_eq!(TenantHint::from_host("", &www()), None);
    }

    #[test]
    fn strips_port_and_case() {
        let hint = TenantHint::from_host("Demo.PayMyDine.test:3000", &www()).unwrap();
        assert_eq!(hint.subdomain, "demo");
        assert_eq!(hint.host.as_deref(), Some("demo.paymydine.test"));
    }

    #[test]
    fn ip_literals_are_no_tenant() {
        assert_eq!(TenantHint::from_host("127.0.0.1:8001", &www()), None);
        assert_eq!(TenantHint::from_host("[::1]:8001", &www()), None);
    }

    #[test]
    fn empty_leading_label_is_no_tenant() {
        assert_eq!(TenantHint::from_host(".example.com", &www()), None);
    }

    #[test]
    fn override_is_used_verbatim_lowercased() {
        let hint = TenantHint::from_override(" Paris ").unwrap();
        assert_eq!(hint.subdomain, "paris");
        assert_eq!(hint.host, None);
        assert_eq!(TenantHint::from_override("  "), None);
    }
}
