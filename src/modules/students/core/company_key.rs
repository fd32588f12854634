/// Maps a human-entered company name to the key of its CompanyRecord.
///
/// Trims, drops everything that is not a letter, digit, underscore or
/// whitespace, collapses whitespace runs into one `_` and lowercases. The
/// result is stable under repeated application. Returns `None` when no letter
/// or digit survives.
pub fn normalize_company_key(name: &str) -> Option<String> {
    let lowered = name.trim().to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let mut key = String::with_capacity(kept.len());
    let mut in_whitespace = false;
    for c in kept.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                key.push('_');
            }
            in_whitespace = true;
        } else {
            key.push(c);
            in_whitespace = false;
        }
    }

    if key.chars().any(char::is_alphanumeric) {
        Some(key)
    } else {
        None
    }
}
