//! Static page shell placed around every rendered fragment.

/// Document head with the highlighting stylesheet, up to and including `<body>`.
pub const PREAMBLE: &str = include_str!("../../templates/preamble.html");

/// Closes the tags opened by [`PREAMBLE`].
pub const CLOSING: &str = "\n</body>\n</html>\n";

/// Concatenate `PREAMBLE + fragment + CLOSING`.
pub fn wrap(fragment: &str) -> String {
    let mut page = String::with_capacity(PREAMBLE.len() + fragment.len() + CLOSING.len());
    page.push_str(PREAMBLE);
    page.push_str(fragment);
    page.push_str(CLOSING);
    page
}
