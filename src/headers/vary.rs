//! `Vary` header merging.

/// Merge comma-separated fields into an existing `Vary` value.
///
/// Fields already present (case-insensitive) are skipped; a `*` on either
/// side collapses the result to `*`. Returns `None` when the header should
/// be left untouched, including the explicit no-op of an empty field list.
pub fn merge_vary(existing: Option<&str>, fields: &str) -> Option<String> {
    let additions: Vec<&str> = fields
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();
    if additions.is_empty() {
        return None;
    }

    let current: Vec<String> = existing
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if current.iter().any(|f| f == "*") {
        return None;
    }
    if additions.iter().any(|f| *f == "*") {
        return Some("*".to_string());
    }

    let mut merged = current;
    let before = merged.len();
    for addition in additions {
        if !merged.iter().any(|f| f.eq_ignore_ascii_case(addition)) {
            merged.push(addition.to_string());
        }
    }
    if merged.len() == before && before > 0 {
        return None;
    }
    Some(merged.join(", "))
}
