//! Parsing and canonicalization of CSP source expressions, hash sources,
//! media types and report URIs.

use crate::constants::{
    NONE_SOURCE, SELF_SOURCE, STRICT_DYNAMIC_SOURCE, SUFFIX_QUOTE, UNSAFE_EVAL_SOURCE,
    UNSAFE_INLINE_SOURCE,
};
use crate::error::{InvalidSourceError, SecurityHeadersError};
use crate::security::hash::HashAlgorithm;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use rustc_hash::FxHashSet;
use std::fmt;
use url::{Host, Url};

/// Characters escaped inside one path segment of a host source. `%` is left
/// alone so already-encoded input stays stable.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'\'')
    .add(b',')
    .add(b';')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

const REPORT_PATH: &AsciiSet = &PATH_SEGMENT.remove(b'?').remove(b'\'');
const REPORT_QUERY: &AsciiSet = &REPORT_PATH.remove(b'[').remove(b']');

/// One token of a directive's source list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    None,
    Self_,
    UnsafeInline,
    UnsafeEval,
    StrictDynamic,
    Hash {
        algorithm: HashAlgorithm,
        value: String,
    },
    /// Canonical scheme, host or wildcard source.
    Custom(String),
}

impl Source {
    /// Parses one configuration token. Keywords must be quoted; hash sources
    /// may be written with or without quotes (`sha256-…`). Anything else,
    /// including a hash-like token with a bad digest, goes through
    /// [`parse_uri_source`].
    pub fn parse(token: &str) -> Result<Self, SecurityHeadersError> {
        match token {
            NONE_SOURCE => return Ok(Source::None),
            SELF_SOURCE => return Ok(Source::Self_),
            UNSAFE_INLINE_SOURCE => return Ok(Source::UnsafeInline),
            UNSAFE_EVAL_SOURCE => return Ok(Source::UnsafeEval),
            STRICT_DYNAMIC_SOURCE => return Ok(Source::StrictDynamic),
            _ => {}
        }

        let unquoted = token
            .strip_prefix('\'')
            .and_then(|inner| inner.strip_suffix('\''))
            .unwrap_or(token);
        if let Some((algorithm, payload)) = HashAlgorithm::split_token(unquoted) {
            if decode_hash_payload(algorithm, payload) {
                return Ok(Source::Hash {
                    algorithm,
                    value: payload.to_owned(),
                });
            }
        }

        if token.starts_with('\'') {
            return Err(InvalidSourceError::new(token, "unsupported quoted keyword").into());
        }

        Ok(Source::Custom(parse_uri_source(token)?))
    }

    #[inline]
    pub const fn is_keyword(&self) -> bool {
        !matches!(self, Source::Hash { .. } | Source::Custom(_))
    }

    #[inline]
    pub const fn is_none(&self) -> bool {
        matches!(self, Source::None)
    }

    #[inline]
    pub const fn as_static_str(&self) -> Option<&'static str> {
        match self {
            Source::None => Some(NONE_SOURCE),
            Source::Self_ => Some(SELF_SOURCE),
            Source::UnsafeInline => Some(UNSAFE_INLINE_SOURCE),
            Source::UnsafeEval => Some(UNSAFE_EVAL_SOURCE),
            Source::StrictDynamic => Some(STRICT_DYNAMIC_SOURCE),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Hash { algorithm, value } => {
                write!(f, "'{}{}{}", algorithm.prefix(), value, SUFFIX_QUOTE)
            }
            Source::Custom(source) => f.write_str(source),
            keyword => f.write_str(keyword.as_static_str().unwrap_or_default()),
        }
    }
}

/// Canonicalizes a scheme, host or wildcard source expression.
///
/// Scheme and host are lower-cased, international hosts are converted to
/// their Punycode form and each path segment is percent-encoded. Parsing the
/// returned value again yields the same value.
pub fn parse_uri_source(token: &str) -> Result<String, InvalidSourceError> {
    if token == "*" {
        return Ok(token.to_owned());
    }
    if token.is_empty() {
        return Err(InvalidSourceError::new(token, "empty source"));
    }
    if token.chars().any(char::is_whitespace) {
        return Err(InvalidSourceError::new(token, "source contains whitespace"));
    }

    if let Some(scheme) = token.strip_suffix(':') {
        if is_valid_scheme(scheme) {
            return Ok(format!("{}:", scheme.to_ascii_lowercase()));
        }
    }

    let (scheme, rest) = match token.find("://") {
        Some(idx) => {
            let scheme = &token[..idx];
            if !is_valid_scheme(scheme) {
                return Err(InvalidSourceError::new(token, "invalid scheme"));
            }
            (Some(scheme.to_ascii_lowercase()), &token[idx + 3..])
        }
        None => (None, token),
    };

    let (authority, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], Some(&rest[idx..])),
        None => (rest, None),
    };

    let mut parts = authority.split(':');
    let host = parts.next().unwrap_or_default();
    let port = parts.next();
    if parts.next().is_some() {
        return Err(InvalidSourceError::new(token, "more than one port"));
    }

    let host = canonical_host(token, host)?;
    let port = port.map(|port| canonical_port(token, port)).transpose()?;

    let mut canonical = String::with_capacity(token.len() + 8);
    if let Some(scheme) = scheme {
        canonical.push_str(&scheme);
        canonical.push_str("://");
    }
    canonical.push_str(&host);
    if let Some(port) = port {
        canonical.push(':');
        canonical.push_str(&port);
    }
    if let Some(path) = path {
        let mut first = true;
        for segment in path.split('/') {
            if !first {
                canonical.push('/');
            }
            canonical.extend(utf8_percent_encode(segment, PATH_SEGMENT));
            first = false;
        }
    }

    Ok(canonical)
}

/// Recognizes `sha256-`, `sha384-` and `sha512-` tokens whose base64 payload
/// decodes to exactly the digest size, returning the quoted source.
/// Anything else is `None`; callers fall back to [`parse_uri_source`].
pub fn parse_hash_source(token: &str) -> Option<String> {
    let (algorithm, payload) = HashAlgorithm::split_token(token)?;
    decode_hash_payload(algorithm, payload).then(|| format!("'{}'", token))
}

#[inline]
fn decode_hash_payload(algorithm: HashAlgorithm, payload: &str) -> bool {
    BASE64
        .decode(payload)
        .map(|bytes| bytes.len() == algorithm.digest_len())
        .unwrap_or(false)
}

/// Percent-encodes the path and query of a report URI, leaving scheme and
/// authority untouched. Relative and absolute URIs are handled alike.
pub fn encode_report_uri(uri: &str) -> String {
    let origin_len = uri
        .find("://")
        .filter(|idx| is_valid_scheme(&uri[..*idx]))
        .map(|idx| {
            let authority_start = idx + 3;
            uri[authority_start..]
                .find(['/', '?', '#'])
                .map_or(uri.len(), |end| authority_start + end)
        })
        .unwrap_or(0);

    let (origin, rest) = uri.split_at(origin_len);
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };

    let mut encoded = String::with_capacity(uri.len() + 8);
    encoded.push_str(origin);
    encoded.extend(utf8_percent_encode(path, REPORT_PATH));
    if let Some(query) = query {
        encoded.push('?');
        encoded.extend(utf8_percent_encode(query, REPORT_QUERY));
    }
    encoded
}

/// Validates a configured report URI and returns its encoded form.
///
/// Absolute URIs must be `http` or `https` with a host; relative URIs must
/// be absolute paths.
pub fn validate_report_uri(uri: &str) -> Result<String, SecurityHeadersError> {
    let invalid = || SecurityHeadersError::InvalidReportUri(uri.to_owned());

    if uri.is_empty() || uri.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    if uri.contains("://") {
        let parsed = Url::parse(uri).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(invalid());
        }
    } else if !uri.starts_with('/') || uri.starts_with("//") {
        return Err(invalid());
    }

    Ok(encode_report_uri(uri))
}

/// Validates a `type/subtype` MIME type as used by `plugin-types`.
pub fn validate_media_type(media_type: &str) -> Result<(), SecurityHeadersError> {
    let valid = media_type
        .split_once('/')
        .map(|(kind, subtype)| is_token(kind) && is_token(subtype))
        .unwrap_or(false);

    if valid {
        Ok(())
    } else {
        Err(SecurityHeadersError::InvalidMediaType(media_type.to_owned()))
    }
}

/// Splits a single-space separated list, rejecting leading, trailing or
/// repeated whitespace.
pub fn split_space_separated(list: &str) -> Result<Vec<&str>, SecurityHeadersError> {
    if list.is_empty() {
        return Ok(Vec::new());
    }

    let reason = if list.starts_with(char::is_whitespace) {
        Some("leading whitespace")
    } else if list.ends_with(char::is_whitespace) {
        Some("trailing whitespace")
    } else if list.contains("  ") {
        Some("repeated whitespace")
    } else if list.chars().any(|c| c.is_whitespace() && c != ' ') {
        Some("whitespace other than a single space")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(SecurityHeadersError::InvalidSourceList {
            list: list.to_owned(),
            reason,
        }),
        None => Ok(list.split(' ').collect()),
    }
}

/// Parses a space separated source list such as `'self' https: cdn.example.com`.
pub fn parse_source_list(list: &str) -> Result<Vec<Source>, SecurityHeadersError> {
    let tokens = split_space_separated(list)?;
    let mut seen = FxHashSet::with_capacity_and_hasher(tokens.len(), Default::default());
    let mut sources = Vec::with_capacity(tokens.len());

    for token in tokens {
        let source = Source::parse(token)?;
        if !seen.insert(source.to_string()) {
            return Err(SecurityHeadersError::InvalidSourceList {
                list: list.to_owned(),
                reason: "duplicate source",
            });
        }
        sources.push(source);
    }

    if sources.len() > 1 && sources.iter().any(Source::is_none) {
        return Err(SecurityHeadersError::InvalidSourceList {
            list: list.to_owned(),
            reason: "'none' combined with other sources",
        });
    }

    Ok(sources)
}

/// Parses a space separated list of media types.
pub fn parse_media_types(list: &str) -> Result<Vec<String>, SecurityHeadersError> {
    split_space_separated(list)?
        .into_iter()
        .map(|media_type| validate_media_type(media_type).map(|_| media_type.to_owned()))
        .collect()
}

fn canonical_host(token: &str, host: &str) -> Result<String, InvalidSourceError> {
    if host.is_empty() {
        return Err(InvalidSourceError::new(token, "missing host"));
    }
    if host == "*" {
        return Ok(host.to_owned());
    }

    let (wildcard, bare) = match host.strip_prefix("*.") {
        Some(bare) => (true, bare),
        None => (false, host),
    };
    if bare.contains('*') {
        return Err(InvalidSourceError::new(
            token,
            "wildcard is only allowed as the leading subdomain label",
        ));
    }
    if bare.contains('%') {
        return Err(InvalidSourceError::new(token, "percent-encoded host"));
    }

    let ascii = match Host::parse(bare) {
        Ok(Host::Domain(domain)) => domain,
        Ok(Host::Ipv4(address)) if !wildcard => address.to_string(),
        Ok(_) => return Err(InvalidSourceError::new(token, "unsupported host")),
        Err(_) => return Err(InvalidSourceError::new(token, "invalid host")),
    };
    if ascii.split('.').any(str::is_empty) {
        return Err(InvalidSourceError::new(token, "empty host label"));
    }
    if !ascii.split('.').all(is_host_label) {
        return Err(InvalidSourceError::new(token, "invalid character in host"));
    }

    Ok(if wildcard {
        format!("*.{}", ascii)
    } else {
        ascii
    })
}

fn canonical_port(token: &str, port: &str) -> Result<String, InvalidSourceError> {
    if port == "*" {
        return Ok(port.to_owned());
    }
    if port.is_empty() || port.len() > 5 || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidSourceError::new(token, "invalid port"));
    }

    match port.parse::<u32>() {
        Ok(value @ 1..=65535) => Ok(value.to_string()),
        _ => Err(InvalidSourceError::new(token, "port out of range")),
    }
}

// `Host::parse` lets through characters like `;` and `,` that would end a
// directive or a policy, so labels are held to the LDH set.
fn is_host_label(label: &str) -> bool {
    label
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn is_token(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#'
                        | b'$'
                        | b'%'
                        | b'&'
                        | b'\''
                        | b'*'
                        | b'+'
                        | b'-'
                        | b'.'
                        | b'^'
                        | b'_'
                        | b'`'
                        | b'|'
                        | b'~'
                )
        })
}
