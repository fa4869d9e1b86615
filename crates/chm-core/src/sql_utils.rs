//! SQL quoting utilities for ClickHouse
//!
//! Used when database and cluster names are spliced into DDL.

/// Quote a SQL identifier with double quotes.
///
/// Embedded double quotes and backslashes are backslash-escaped, which is the
/// escaping ClickHouse applies inside quoted identifiers.
///
/// # Examples
/// ```
/// use chm_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("analytics"), r#""analytics""#);
/// assert_eq!(quote_ident(r#"my"db"#), r#""my\"db""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", escape(ident, '"'))
}

/// Quote a string literal with single quotes.
///
/// # Examples
/// ```
/// use chm_core::sql_utils::quote_string;
/// assert_eq!(quote_string("abc"), "'abc'");
/// assert_eq!(quote_string("it's"), r"'it\'s'");
/// ```
pub fn quote_string(value: &str) -> String {
    format!("'{}'", escape(value, '\''))
}

fn escape(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == quote {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
