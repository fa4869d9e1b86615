//! Splitting migration scripts into executable statements

/// Split a migration script into the statements to execute, in order.
///
/// With `multi_statement`, the script is split on every `;`; fragments are
/// trimmed, empty ones dropped, and each survivor gets its `;` back. The scan
/// is naive: a `;` inside a string literal or comment also splits, which is
/// why scripts can opt out and run as one opaque statement.
pub fn script_to_statements(script: &str, multi_statement: bool) -> Vec<String> {
    if !multi_statement {
        return vec![script.to_string()];
    }

    script
        .split(';')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| format!("{fragment};"))
        .collect()
}

#[cfg(test)]
#[path = "statements_test.rs"]
mod tests;
