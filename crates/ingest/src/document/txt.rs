pub(super) fn extract_txt(bytes: &[u8]) -> String {
    // Try UTF-8 first, fall back to lossy conversion
    let text = String::from_utf8(bytes.to_vec())
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned());

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_simple_text() {
        let text = extract_txt(b"Hello, world!\nThis is a test file.");
        assert!(text.contains("Hello, world!"));
    }

    #[test]
    fn invalid_utf8_is_lossy() {
        let text = extract_txt(&[b'o', b'k', 0xff, b'!']);
        assert!(text.starts_with("ok"));
        assert!(text.ends_with('!'));
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(extract_txt(b"  \n  Hello  \n  "), "Hello");
    }
}
