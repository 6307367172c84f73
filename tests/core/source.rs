use actix_web_secure_headers::core::source::{
    encode_report_uri, parse_hash_source, parse_media_types, parse_source_list, parse_uri_source,
    split_space_separated, validate_report_uri, Source,
};
use actix_web_secure_headers::security::HashAlgorithm;
use actix_web_secure_headers::SecurityHeadersError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use proptest::prelude::*;
use test_case::test_case;

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("*", "*" ; "bare wildcard")]
    #[test_case("HTTPS:", "https:" ; "scheme is lower cased")]
    #[test_case("data:", "data:" ; "data scheme")]
    #[test_case("Example.COM", "example.com" ; "host is lower cased")]
    #[test_case("*.example.com", "*.example.com" ; "wildcard subdomain")]
    #[test_case("HTTPS://*.Example.com:443/Path", "https://*.example.com:443/Path" ; "path case kept")]
    #[test_case("example.com:*", "example.com:*" ; "wildcard port")]
    #[test_case("example.com:0080", "example.com:80" ; "leading zeros dropped")]
    #[test_case("https://bücher.example", "https://xn--bcher-kva.example" ; "punycode host")]
    #[test_case("example.com/a;b,c", "example.com/a%3Bb%2Cc" ; "reserved path characters")]
    #[test_case("example.com/Ä/", "example.com/%C3%84/" ; "non ascii path")]
    #[test_case("localhost:8080", "localhost:8080" ; "host with port")]
    fn test_parse_uri_source_canonical(token: &str, expected: &str) {
        assert_eq!(parse_uri_source(token).unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("example.com:1:2" ; "double port")]
    #[test_case("example.com:-1" ; "negative port")]
    #[test_case("example.com:0" ; "port zero")]
    #[test_case("example.com:70000" ; "port too large")]
    #[test_case("foo.*.example.com" ; "inner wildcard")]
    #[test_case("*.*.example.com" ; "double wildcard")]
    #[test_case("example*.com" ; "wildcard inside label")]
    #[test_case("https://" ; "missing host")]
    #[test_case("exa mple.com" ; "whitespace")]
    #[test_case("1http://example.com" ; "bad scheme")]
    #[test_case("evil.com;script-src" ; "semicolon in host")]
    #[test_case("evil.com,script-src" ; "comma in host")]
    #[test_case("a'b.com" ; "single quote in host")]
    #[test_case("a\"b.com" ; "double quote in host")]
    #[test_case("'unsafe-hashes'" ; "quoted keyword")]
    #[test_case("https://evil.com;script-src:443" ; "semicolon before port")]
    #[test_case("*.evil=com" ; "equals in wildcard host")]
    fn test_parse_uri_source_rejects(token: &str) {
        let err = parse_uri_source(token).unwrap_err();
        assert_eq!(err.token, token);
    }

    #[test]
    fn test_parse_hash_source_quotes_valid_tokens() {
        let token = "sha256-qznLcsROx4GACP2dm0UCKCzCG+HiZ1guq6ZZDob/Tng=";
        assert_eq!(parse_hash_source(token), Some(format!("'{}'", token)));
    }

    #[test_case("SHA256-qznLcsROx4GACP2dm0UCKCzCG+HiZ1guq6ZZDob/Tng=" ; "upper case prefix")]
    #[test_case("sha1-qznLcsROx4GACP2dm0UCKCzCG+HiZ1guq6ZZDob/Tng=" ; "unknown algorithm")]
    #[test_case("sha384-qznLcsROx4GACP2dm0UCKCzCG+HiZ1guq6ZZDob/Tng=" ; "wrong digest size")]
    #[test_case("sha256-not*base64" ; "malformed payload")]
    #[test_case("example.com" ; "not a hash")]
    fn test_parse_hash_source_rejects(token: &str) {
        assert_eq!(parse_hash_source(token), None);
    }

    #[test]
    fn test_source_parse_variants() {
        assert_eq!(Source::parse("'self'").unwrap(), Source::Self_);
        assert_eq!(Source::parse("'strict-dynamic'").unwrap(), Source::StrictDynamic);
        assert_eq!(
            Source::parse("HTTPS://CDN.example.com").unwrap(),
            Source::Custom("https://cdn.example.com".to_owned())
        );

        let hash = Source::parse("'sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU='").unwrap();
        assert_eq!(
            hash.to_string(),
            "'sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU='"
        );
        assert!(matches!(hash, Source::Hash { algorithm: HashAlgorithm::Sha256, .. }));
    }

    #[test]
    fn test_source_parse_rejects_unknown_keyword() {
        assert!(matches!(
            Source::parse("'unsafe-hashes'"),
            Err(SecurityHeadersError::InvalidSource(_))
        ));
    }

    #[test_case(" 'self'", "leading whitespace")]
    #[test_case("'self' ", "trailing whitespace")]
    #[test_case("'self'  https:", "repeated whitespace")]
    #[test_case("'self'\thttps:", "whitespace other than a single space")]
    fn test_split_space_separated_rejects(list: &str, expected: &str) {
        match split_space_separated(list) {
            Err(SecurityHeadersError::InvalidSourceList { reason, .. }) => {
                assert_eq!(reason, expected)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_source_list() {
        let sources = parse_source_list("'self' https: CDN.example.com").unwrap();
        assert_eq!(
            sources,
            vec![
                Source::Self_,
                Source::Custom("https:".to_owned()),
                Source::Custom("cdn.example.com".to_owned()),
            ]
        );
        assert!(parse_source_list("").unwrap().is_empty());
    }

    #[test_case("'none' 'self'" ; "none with keyword")]
    #[test_case("'none' https:" ; "none with scheme")]
    #[test_case("example.com EXAMPLE.com" ; "duplicate after canonicalization")]
    fn test_parse_source_list_rejects(list: &str) {
        assert!(matches!(
            parse_source_list(list),
            Err(SecurityHeadersError::InvalidSourceList { .. })
        ));
    }

    #[test]
    fn test_parse_media_types() {
        assert_eq!(
            parse_media_types("application/pdf image/svg+xml").unwrap(),
            vec!["application/pdf", "image/svg+xml"]
        );
        assert!(matches!(
            parse_media_types("application"),
            Err(SecurityHeadersError::InvalidMediaType(_))
        ));
        assert!(parse_media_types("text/ html").is_err());
    }

    #[test_case("/csp report?a=b c", "/csp%20report?a=b%20c" ; "relative")]
    #[test_case("https://Report.example/a;b?x=[1]", "https://Report.example/a%3Bb?x=[1]" ; "absolute keeps authority")]
    fn test_encode_report_uri(uri: &str, expected: &str) {
        assert_eq!(encode_report_uri(uri), expected);
    }

    #[test]
    fn test_validate_report_uri() {
        assert_eq!(validate_report_uri("/report").unwrap(), "/report");
        assert_eq!(
            validate_report_uri("https://report.example/csp").unwrap(),
            "https://report.example/csp"
        );
        for invalid in ["report", "//report.example", "ftp://report.example/", ""] {
            assert!(
                matches!(
                    validate_report_uri(invalid),
                    Err(SecurityHeadersError::InvalidReportUri(_))
                ),
                "{} should be rejected",
                invalid
            );
        }
    }
}

fn host_source() -> impl Strategy<Value = String> {
    (
        proptest::option::of(prop::sample::select(vec!["http", "HTTPS", "wss"])),
        any::<bool>(),
        prop::collection::vec("[a-zA-Z][a-zA-Z0-9]{0,8}", 1..4),
        proptest::option::of(1u16..=65535),
        prop::collection::vec("[a-zA-Z0-9;,é._~-]{0,6}", 0..3),
    )
        .prop_map(|(scheme, wildcard, labels, port, segments)| {
            let mut token = String::new();
            if let Some(scheme) = scheme {
                token.push_str(scheme);
                token.push_str("://");
            }
            if wildcard {
                token.push_str("*.");
            }
            token.push_str(&labels.join("."));
            if let Some(port) = port {
                token.push_str(&format!(":{}", port));
            }
            for segment in segments {
                token.push('/');
                token.push_str(&segment);
            }
            token
        })
}

fn mixed_host_source() -> impl Strategy<Value = (String, bool)> {
    (
        proptest::option::of(prop::sample::select(vec!["http", "https"])),
        prop::collection::vec("[a-zA-Z0-9;,'\"=()_-]{1,6}", 1..4),
    )
        .prop_map(|(scheme, labels)| {
            let unsafe_host = labels
                .iter()
                .any(|label| label.contains(|c: char| ";,'\"=()_".contains(c)));
            let mut token = String::new();
            if let Some(scheme) = scheme {
                token.push_str(scheme);
                token.push_str("://");
            }
            token.push_str(&labels.join("."));
            (token, unsafe_host)
        })
}

proptest! {
    #[test]
    fn prop_parse_uri_source_is_idempotent(token in host_source()) {
        let canonical = parse_uri_source(&token).unwrap();
        prop_assert_eq!(parse_uri_source(&canonical).unwrap(), canonical);
    }

    #[test]
    fn prop_parse_uri_source_keeps_host_delimiters_out((token, unsafe_host) in mixed_host_source()) {
        match parse_uri_source(&token) {
            Ok(canonical) => {
                prop_assert!(!unsafe_host, "accepted {:?} as {:?}", token, canonical);
                prop_assert!(!canonical.contains(|c: char| ";,'\"=()".contains(c)));
            }
            Err(err) => prop_assert_eq!(err.token, token),
        }
    }

    #[test]
    fn prop_parse_hash_source_checks_digest_size(
        algorithm in prop::sample::select(HashAlgorithm::ALL.to_vec()),
        bytes in prop::collection::vec(any::<u8>(), 0..80),
    ) {
        let token = format!("{}{}", algorithm.prefix(), BASE64.encode(&bytes));
        prop_assert_eq!(
            parse_hash_source(&token).is_some(),
            bytes.len() == algorithm.digest_len()
        );
    }
}
