//! The argument collection a request is validated against.

use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// A single request parameter as it was appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    /// Parameter name, case-sensitive.
    pub key: String,
    /// Parameter value.
    pub value: String,
}

/// Immutable set of request parameters.
///
/// Lookups and canonicalization go through a key-to-value mapping where the
/// last value seen for a key wins. The append-ordered list of every pair is
/// kept alongside for diagnostics; it never influences the signature.
///
/// # Example
///
/// ```rust
/// use api_accessor::Args;
///
/// let args = Args::from_pairs([("b", "2"), ("a", "1"), ("b", "3")]);
///
/// assert_eq!(args.get("b"), Some("3"));
/// assert_eq!(args.len(), 2);
/// assert_eq!(args.iter().count(), 3);
/// assert_eq!(args.excluding(&["b"]), vec![("a", "1")]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Args {
    kv: HashMap<String, String>,
    list: Vec<Arg>,
}

impl Args {
    /// Builds a collection from name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut args = Self::default();
        for (key, value) in pairs {
            args.append(key.into(), value.into());
        }
        args
    }

    /// Parses an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored, `+` decodes to a space, and empty segments
    /// are skipped. A segment without `=` is a key with an empty value.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);

        let pairs = query
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
                (decode_component(key), decode_component(value))
            });

        Self::from_pairs(pairs)
    }

    fn append(&mut self, key: String, value: String) {
        self.kv.insert(key.clone(), value.clone());
        self.list.push(Arg { key, value });
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.kv.get(key).map(String::as_str)
    }

    /// Returns `true` if `key` was supplied.
    pub fn contains(&self, key: &str) -> bool {
        self.kv.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.kv.len()
    }

    /// Returns `true` if no parameter was supplied.
    pub fn is_empty(&self) -> bool {
        self.kv.is_empty()
    }

    /// Iterates every appended pair in arrival order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.list.iter()
    }

    /// Returns the distinct pairs whose key is not in `reserved`, sorted by
    /// key in byte order.
    pub fn excluding(&self, reserved: &[&str]) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .kv
            .iter()
            .filter(|(key, _)| !reserved.contains(&key.as_str()))
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        pairs.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
        pairs
    }
}

impl<K, V> FromIterator<(K, V)> for Args
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_value_wins() {
        let args = Args::from_pairs([("k", "first"), ("other", "x"), ("k", "second")]);

        assert_eq!(args.get("k"), Some("second"));
        assert_eq!(args.len(), 2);

        let appended: Vec<_> = args.iter().map(|a| a.value.as_str()).collect();
        assert_eq!(appended, vec!["first", "x", "second"]);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let args = Args::from_pairs([("Key", "upper"), ("key", "lower")]);

        assert_eq!(args.get("Key"), Some("upper"));
        assert_eq!(args.get("key"), Some("lower"));
        assert!(!args.contains("KEY"));
    }

    #[test]
    fn test_excluding_sorts_by_bytes() {
        let args: Args = [("b", "2"), ("B", "upper"), ("a", "1"), ("signature", "s")]
            .into_iter()
            .collect();

        assert_eq!(
            args.excluding(&["signature"]),
            vec![("B", "upper"), ("a", "1"), ("b", "2")]
        );
    }

    #[test]
    fn test_empty_collection() {
        let args = Args::default();

        assert!(args.is_empty());
        assert_eq!(args.get("anything"), None);
        assert!(args.excluding(&[]).is_empty());
    }

    #[test]
    fn test_from_query_decodes_components() {
        let args = Args::from_query("?name=alice+smith&path=%2Fa%26b&flag&&empty=");

        assert_eq!(args.get("name"), Some("alice smith"));
        assert_eq!(args.get("path"), Some("/a&b"));
        assert_eq!(args.get("flag"), Some(""));
        assert_eq!(args.get("empty"), Some(""));
        assert_eq!(args.len(), 4);
    }

    #[test]
    fn test_from_query_percent_escapes() {
        let args = Args::from_query("token=abc%3Adef&x=%zz");

        assert_eq!(args.get("token"), Some("abc:def"));
        // Malformed escapes pass through untouched
        assert_eq!(args.get("x"), Some("%zz"));
    }

    #[test]
    fn test_from_query_duplicate_keys() {
        let args = Args::from_query("a=1&a=2");

        assert_eq!(args.get("a"), Some("2"));
        assert_eq!(args.iter().count(), 2);
    }
}
