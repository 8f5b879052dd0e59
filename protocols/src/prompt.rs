/// Hostname shown in a CLI prompt: `access-sw-01#` -> `access-sw-01`.
pub fn hostname(prompt: &str) -> Option<String> {
    let name = prompt.trim_end_matches('#').trim_end_matches('>').trim();
    (!name.is_empty()).then(|| name.to_string())
}
