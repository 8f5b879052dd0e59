use std::net::Ipv4Addr;

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Removes every whitespace run, e.g. `"Avaya" + "IP Phone"` -> `AvayaIPPhone`.
pub(crate) fn squash(value: &str) -> String {
    WHITESPACE.replace_all(value, "").into_owned()
}

/// First capture group of the first match, trimmed and non-empty.
pub(crate) fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// First capture that parses as an IPv4 address.
pub(crate) fn capture_ipv4(re: &Regex, text: &str) -> Option<Ipv4Addr> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| m.as_str().parse().ok())
}
