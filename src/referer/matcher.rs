use url::Url;
use wildmatch::WildMatchPattern;

use crate::config::RefererCookieConfig;

/// Host glob: `*` matches any run of characters (dots included), `?` exactly one.
/// Matching is case-sensitive.
pub type DomainPattern = WildMatchPattern<'*', '?'>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Internal,
    External,
    /// Neither list matched and the external list is non-empty.
    Untracked,
}

/// Ordered internal/external host patterns.
///
/// Classification works as follows:
/// 1. Internal patterns are tried in order; the first match makes the host internal.
/// 2. If none match and there are no external patterns, the host is external.
/// 3. Otherwise external patterns are tried in order; the first match makes the host
///    external, and a host nothing matches is untracked.
#[derive(Debug, Clone, Default)]
pub struct DomainMatcher {
    internal: Vec<DomainPattern>,
    external: Vec<DomainPattern>,
}

impl DomainMatcher {
    pub fn new<I, E, S, T>(internal: I, external: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            internal: internal.into_iter().map(|p| DomainPattern::new(p.as_ref())).collect(),
            external: external.into_iter().map(|p| DomainPattern::new(p.as_ref())).collect(),
        }
    }

    pub fn from_config(cfg: &RefererCookieConfig) -> Self {
        Self::new(&cfg.internal_domains, &cfg.external_domains)
    }

    pub fn is_internal(&self, host: &str) -> bool {
        self.internal.iter().any(|p| p.matches(host))
    }

    pub fn classify(&self, host: &str) -> Classification {
        if self.is_internal(host) {
            return Classification::Internal;
        }
        if self.external.is_empty() || self.external.iter().any(|p| p.matches(host)) {
            return Classification::External;
        }
        Classification::Untracked
    }
}

/// Extracts the host of a referrer URL. Relative or host-less URLs yield `None`.
///
/// `url` only validates the referrer. The host is sliced from the raw text so that
/// patterns see it as the client sent it: case and IDN labels are kept, not
/// lowercased or punycoded.
pub fn referer_host(referer: &str) -> Option<String> {
    let referer = referer.trim_matches(|c: char| c <= ' ');
    let url = Url::parse(referer).ok()?;
    let parsed = url.host_str()?;

    let raw = referer
        .get(url.scheme().len() + 1..)
        .map(|rest| rest.trim_start_matches(['/', '\\']))
        .and_then(|rest| rest.split(['/', '\\', '?', '#']).next())
        .and_then(|authority| authority.rsplit('@').next())
        .map(|host| match host.strip_prefix('[') {
            Some(v6) => v6.split(']').next().map_or(host, |inner| &host[..inner.len() + 2]),
            None => host.split(':').next().unwrap_or(host),
        })
        .filter(|host| !host.is_empty());

    Some(raw.unwrap_or(parsed).to_string())
}
