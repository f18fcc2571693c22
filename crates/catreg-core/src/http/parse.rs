//! Parse raw response header lines collected by the transport.

/// Status line and headers of the final response in a header block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ParsedHead {
    pub status: Option<u16>,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
}

/// Parse collected header lines. Each `HTTP/` status line starts a new block,
/// so interim responses (e.g. `100 Continue`) are discarded.
pub(crate) fn parse_head(lines: &[String]) -> ParsedHead {
    let mut head = ParsedHead::default();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            head = ParsedHead::default();
            if let Some((code, text)) = parse_status_line(line) {
                head.status = Some(code);
                head.status_text = text;
            }
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            head.headers
                .push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    head
}

/// `HTTP/1.1 201 Created` -> (201, "Created").
pub(crate) fn parse_status_line(line: &str) -> Option<(u16, String)> {
    let mut parts = line.splitn(3, ' ');
    let _version = parts.next()?;
    let code = parts.next()?.trim().parse::<u16>().ok()?;
    let text = parts.next().unwrap_or("").trim().to_string();
    Some((code, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_status_and_location() {
        let head = parse_head(&lines(&[
            "HTTP/1.1 302 Found",
            "Location: https://host/b",
            "Content-Length: 0",
            "",
        ]));
        assert_eq!(head.status, Some(302));
        assert_eq!(head.status_text, "Found");
        assert_eq!(
            head.headers[0],
            ("Location".to_string(), "https://host/b".to_string())
        );
    }

    #[test]
    fn interim_response_is_discarded() {
        let head = parse_head(&lines(&[
            "HTTP/1.1 100 Continue",
            "",
            "HTTP/1.1 201 Created",
            "Location: tables/x",
        ]));
        assert_eq!(head.status, Some(201));
        assert_eq!(head.headers.len(), 1);
    }

    #[test]
    fn http2_status_line_without_text() {
        assert_eq!(parse_status_line("HTTP/2 201"), Some((201, String::new())));
        assert_eq!(parse_status_line("garbage"), None);
    }
}
