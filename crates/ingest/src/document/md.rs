use super::chunker::parse_header;

/// Decode markdown bytes and collect the titles of the header lines the
/// chunker will split on.
pub(super) fn extract_md(bytes: &[u8]) -> (String, Vec<String>) {
    let text = String::from_utf8(bytes.to_vec())
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned());

    let headings: Vec<String> = text
        .lines()
        .filter_map(parse_header)
        .map(|(_, title)| title.to_string())
        .collect();

    (text.trim().to_string(), headings)
}
