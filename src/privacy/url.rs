//! Cross-domain linking.
//!
//! Outbound links to configured hosts carry a `_sp` query parameter with the
//! visitor's domain user id. When a visitor lands through such a link the
//! parameter is stripped from the address bar after the page view, so it is
//! not shared when the URL is copied.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::TrackerConfig;

pub const CROSS_DOMAIN_PARAM: &str = "_sp";

lazy_static! {
    static ref SP_PARAM: Regex = Regex::new(r"[?&]_sp=").unwrap();

    static ref URL_HOST: Regex = Regex::new(
        r"^[a-zA-Z][a-zA-Z0-9+.-]*://(?:[^@/?#]*@)?([^/:?#]+)"
    ).unwrap();
}

/// Hostname of an absolute URL.
pub fn link_hostname(href: &str) -> Option<&str> {
    URL_HOST
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Whether an outbound link gets the cross-domain parameter.
pub fn should_decorate_link(config: &TrackerConfig, href: &str) -> bool {
    link_hostname(href)
        .map(|host| config.decorates_link(host))
        .unwrap_or(false)
}

/// `href` without its `_sp` parameter, or `None` when there is nothing to strip.
///
/// Other parameters and the fragment are kept; an emptied query drops its `?`.
pub fn strip_cross_domain_param(href: &str) -> Option<String> {
    if !SP_PARAM.is_match(href) {
        return None;
    }

    let (before_fragment, fragment) = match href.find('#') {
        Some(i) => href.split_at(i),
        None => (href, ""),
    };
    let (base, query) = before_fragment.split_once('?')?;

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(CROSS_DOMAIN_PARAM))
        .collect();

    let mut cleaned = base.to_string();
    if !kept.is_empty() {
        cleaned.push('?');
        cleaned.push_str(&kept.join("&"));
    }
    cleaned.push_str(fragment);

    (cleaned != href).then_some(cleaned)
}
