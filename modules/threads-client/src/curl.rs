//! Parses a request copied from the browser's network inspector
//! ("Copy as cURL") into a replayable [`RequestDescriptor`].

use std::sync::LazyLock;

use regex::Regex;

static RE_CONTINUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\s*\n\s*").expect("valid regex"));
static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"curl\s+'([^']+)'").expect("valid regex"));
static RE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:-H|--header)\s+'([^']+?):\s*([^']+?)'").expect("valid regex")
});
static RE_COOKIE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:-b|--cookie)\s+'([^']+)'").expect("valid regex")
});
static RE_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:--data-raw|--data-binary|--data)\s+'([^']+)'").expect("valid regex")
});

/// Target URL, headers and raw form body extracted from a curl transcript.
///
/// Header names compare case-insensitively. Repeated headers are kept as
/// separate entries in the order they appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDescriptor {
    url: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl RequestDescriptor {
    /// Parse a curl invocation. Never fails: anything missing comes back empty
    /// and only shows up once the request is actually sent.
    pub fn parse(transcript: &str) -> Self {
        let cleaned = RE_CONTINUATION.replace_all(transcript, " ");

        let url = RE_URL
            .captures(&cleaned)
            .map(|c| c[1].to_string())
            .unwrap_or_default();

        let mut descriptor = Self {
            url,
            headers: Vec::new(),
            body: String::new(),
        };

        for caps in RE_HEADER.captures_iter(&cleaned) {
            descriptor.append_header(&caps[1], &caps[2]);
        }

        if let Some(caps) = RE_COOKIE.captures(&cleaned) {
            descriptor.set_header("cookie", &caps[1]);
        }

        if let Some(caps) = RE_BODY.captures(&cleaned) {
            descriptor.body = caps[1].to_string();
        }

        descriptor
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// All headers in transcript order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value for `name`, if any.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_empty() && self.headers.is_empty() && self.body.is_empty()
    }

    fn append_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_TRANSCRIPT: &str = "curl 'https://www.threads.com/graphql/query' \\\n  -H 'accept: */*' \\\n  -H 'content-type: application/x-www-form-urlencoded' \\\n  -H 'x-fb-friendly-name: SearchResultsQuery' \\\n  -b 'csrftoken=abc; sessionid=xyz' \\\n  --data-raw 'av=1&variables=%7B%22query%22%3A%22old%22%7D&doc_id=42'";

    #[test]
    fn parses_multiline_chrome_transcript() {
        let d = RequestDescriptor::parse(CHROME_TRANSCRIPT);
        assert_eq!(d.url(), "https://www.threads.com/graphql/query");
        assert_eq!(d.header("accept"), Some("*/*"));
        assert_eq!(d.header("Content-Type"), Some("application/x-www-form-urlencoded"));
        assert_eq!(d.header("cookie"), Some("csrftoken=abc; sessionid=xyz"));
        assert_eq!(
            d.body(),
            "av=1&variables=%7B%22query%22%3A%22old%22%7D&doc_id=42"
        );
    }

    #[test]
    fn cookie_flag_overrides_cookie_header() {
        let d = RequestDescriptor::parse("curl 'https://x.test' -H 'Cookie: a=1' -b 'b=2'");
        let cookies: Vec<&str> = d.header_values("cookie").collect();
        assert_eq!(cookies, vec!["b=2"]);
    }

    #[test]
    fn repeated_headers_are_appended() {
        let d = RequestDescriptor::parse(
            "curl 'https://x.test' -H 'accept-language: en' -H 'Accept-Language: fr'",
        );
        let values: Vec<&str> = d.header_values("accept-language").collect();
        assert_eq!(values, vec!["en", "fr"]);
        assert_eq!(d.headers().len(), 2);
    }

    #[test]
    fn header_value_may_contain_colons() {
        let d = RequestDescriptor::parse("curl 'https://x.test' -H 'referer: https://www.threads.com/search'");
        assert_eq!(d.header("referer"), Some("https://www.threads.com/search"));
    }

    #[test]
    fn missing_parts_default_to_empty() {
        let d = RequestDescriptor::parse("curl 'https://x.test' -H 'accept: */*'");
        assert_eq!(d.body(), "");
        assert_eq!(d.header("cookie"), None);

        let empty = RequestDescriptor::parse("not a curl command");
        assert!(empty.is_empty());
    }

    #[test]
    fn long_flag_spellings_are_recognised() {
        let d = RequestDescriptor::parse(
            "curl 'https://x.test' --header 'x-ig-app-id: 238260118697367' --cookie 'c=3' --data-binary 'a=1'",
        );
        assert_eq!(d.header("x-ig-app-id"), Some("238260118697367"));
        assert_eq!(d.header("cookie"), Some("c=3"));
        assert_eq!(d.body(), "a=1");
    }

    #[test]
    fn windows_line_endings_are_joined() {
        let d = RequestDescriptor::parse("curl 'https://x.test' \\\r\n  --data-raw 'q=1'");
        assert_eq!(d.body(), "q=1");
    }
}
