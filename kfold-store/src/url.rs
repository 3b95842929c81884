//! Object URL parsing
//!
//! Locations are either `scheme://bucket/key` object URLs or plain
//! slash-separated paths.

use std::fmt;

use crate::error::{Error, Result};

/// A parsed `scheme://bucket/key` location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUrl {
    scheme: String,
    bucket: String,
    key: String,
}

impl ObjectUrl {
    /// Parse an object URL. Returns `Ok(None)` for plain paths.
    pub fn parse(location: &str) -> Result<Option<Self>> {
        let Some((scheme, rest)) = location.split_once("://") else {
            return Ok(None);
        };
        let valid_scheme = !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !valid_scheme {
            return Err(Error::InvalidLocation(location.to_owned()));
        }
        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(Error::InvalidLocation(location.to_owned()));
        }
        Ok(Some(Self {
            scheme: scheme.to_owned(),
            bucket: bucket.to_owned(),
            key: key.trim_start_matches('/').to_owned(),
        }))
    }

    /// URL scheme, such as `s3`
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Bucket (URL host)
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object key, without a leading slash
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.bucket, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("s3://bucket/a/b.jsonl", "s3", "bucket", "a/b.jsonl" ; "nested key")]
    #[test_case("s3://bucket", "s3", "bucket", "" ; "bucket only")]
    #[test_case("gs://b//lead", "gs", "b", "lead" ; "leading slash stripped")]
    fn test_parse(location: &str, scheme: &str, bucket: &str, key: &str) {
        let url = ObjectUrl::parse(location).unwrap().unwrap();
        assert_eq!(url.scheme(), scheme);
        assert_eq!(url.bucket(), bucket);
        assert_eq!(url.key(), key);
    }

    #[test]
    fn test_plain_path_is_not_url() {
        assert_eq!(ObjectUrl::parse("data/train.jsonl").unwrap(), None);
    }

    #[test_case("s3:///key" ; "empty bucket")]
    #[test_case("://bucket/key" ; "empty scheme")]
    #[test_case("s 3://bucket/key" ; "bad scheme")]
    fn test_invalid(location: &str) {
        assert!(matches!(ObjectUrl::parse(location), Err(Error::InvalidLocation(_))));
    }

    #[test]
    fn test_display() {
        let url = ObjectUrl::parse("s3://b/k/x").unwrap().unwrap();
        assert_eq!(url.to_string(), "s3://b/k/x");
    }
}
