//! Decoding of raw query-string pairs into a tagged value tree.
//!
//! Bracket notation builds nested maps (`unitPrice[gte]=10` becomes
//! `{ unitPrice: { gte: "10" } }`), repeated keys build lists and a trailing
//! empty bracket (`tags[]=a`) forces a list.

use std::collections::BTreeMap;

use crate::validate::Violation;

/// A single decoded query-string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Text(String),
    List(Vec<String>),
    Nested(BTreeMap<String, QueryValue>),
}

impl QueryValue {
    /// Short name of the variant, used in violation messages.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryValue::Text(_) => "text",
            QueryValue::List(_) => "list",
            QueryValue::Nested(_) => "object",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            QueryValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// The decoded query string of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    entries: BTreeMap<String, QueryValue>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `(key, value)` pairs as produced by a URL query-string parser.
    ///
    /// Fails on unbalanced brackets and on keys used both as a scalar and as
    /// an operator map (`price=1&price[gte]=2`).
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, Violation>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut spec = Self::new();
        for (key, value) in pairs {
            spec.insert(key.as_ref(), value.into())?;
        }
        Ok(spec)
    }

    /// Insert one raw pair, merging it with what is already there.
    pub fn insert(&mut self, raw_key: &str, value: String) -> Result<(), Violation> {
        let (path, append) = parse_key(raw_key)?;
        insert_at(&mut self.entries, &path, value, append, raw_key)
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &QueryValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split `a[b][c]` into `["a", "b", "c"]`. A final `[]` is reported as an
/// append marker rather than a path segment.
fn parse_key(raw: &str) -> Result<(Vec<String>, bool), Violation> {
    let malformed = || Violation::new(raw, "malformed bracket notation in query key");

    let (head, mut rest) = match raw.find('[') {
        Some(idx) => (&raw[..idx], &raw[idx..]),
        None => (raw, ""),
    };
    if head.is_empty() || head.contains(']') {
        return Err(malformed());
    }

    let mut path = vec![head.to_string()];
    let mut append = false;
    while !rest.is_empty() {
        if append || !rest.starts_with('[') {
            return Err(malformed());
        }
        let close = rest.find(']').ok_or_else(malformed)?;
        let segment = &rest[1..close];
        if segment.contains('[') {
            return Err(malformed());
        }
        if segment.is_empty() {
            append = true;
        } else {
            path.push(segment.to_string());
        }
        rest = &rest[close + 1..];
    }

    Ok((path, append))
}

fn insert_at(
    map: &mut BTreeMap<String, QueryValue>,
    path: &[String],
    value: String,
    append: bool,
    raw_key: &str,
) -> Result<(), Violation> {
    let conflict = || {
        Violation::new(
            raw_key,
            "key is used both as a plain value and as an operator map",
        )
    };

    let Some((head, rest)) = path.split_first() else {
        return Err(conflict());
    };

    if !rest.is_empty() {
        let slot = map
            .entry(head.clone())
            .or_insert_with(|| QueryValue::Nested(BTreeMap::new()));
        return match slot {
            QueryValue::Nested(inner) => insert_at(inner, rest, value, append, raw_key),
            _ => Err(conflict()),
        };
    }

    match map.get_mut(head) {
        None if append => {
            map.insert(head.clone(), QueryValue::List(vec![value]));
        }
        None => {
            map.insert(head.clone(), QueryValue::Text(value));
        }
        Some(existing) => match existing {
            QueryValue::List(items) => items.push(value),
            QueryValue::Text(previous) => {
                let previous = std::mem::take(previous);
                *existing = QueryValue::List(vec![previous, value]);
            }
            QueryValue::Nested(_) => return Err(conflict()),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(pairs: &[(&str, QueryValue)]) -> QueryValue {
        QueryValue::Nested(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_plain_pairs_become_text() {
        let spec = QuerySpec::from_pairs([("status", "public"), ("page", "2")]).unwrap();
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.get("status"), Some(&QueryValue::Text("public".into())));
        assert_eq!(spec.get("page").and_then(QueryValue::as_text), Some("2"));
    }

    #[test]
    fn test_bracket_notation_builds_nested_map() {
        let spec =
            QuerySpec::from_pairs([("unitPrice[gte]", "10"), ("unitPrice[lte]", "100")]).unwrap();
        assert_eq!(
            spec.get("unitPrice"),
            Some(&nested(&[
                ("gte", QueryValue::Text("10".into())),
                ("lte", QueryValue::Text("100".into())),
            ]))
        );
    }

    #[test]
    fn test_repeated_keys_become_list() {
        let spec = QuerySpec::from_pairs([
            ("categories", "fruit"),
            ("categories", "tools"),
            ("categories", "waterplant"),
        ])
        .unwrap();
        assert_eq!(
            spec.get("categories"),
            Some(&QueryValue::List(vec![
                "fruit".into(),
                "tools".into(),
                "waterplant".into()
            ]))
        );
    }

    #[test]
    fn test_empty_brackets_force_list() {
        let spec = QuerySpec::from_pairs([("tags[]", "a")]).unwrap();
        assert_eq!(spec.get("tags"), Some(&QueryValue::List(vec!["a".into()])));
    }

    #[test]
    fn test_scalar_and_operator_forms_conflict() {
        let err = QuerySpec::from_pairs([("price", "1"), ("price[gte]", "2")]).unwrap_err();
        assert_eq!(err.path, "price[gte]");

        let err = QuerySpec::from_pairs([("price[gte]", "2"), ("price", "1")]).unwrap_err();
        assert_eq!(err.path, "price");
    }

    #[test]
    fn test_malformed_brackets_are_rejected() {
        for key in ["price[gte", "[gte]", "price]gte", "price[gte]x", "price[[gte]]", "a[]b"] {
            assert!(
                QuerySpec::from_pairs([(key, "1")]).is_err(),
                "expected {key} to be rejected"
            );
        }
    }

    #[test]
    fn test_deep_nesting_is_decoded() {
        let spec = QuerySpec::from_pairs([("dimension[width][gte]", "3")]).unwrap();
        let inner = nested(&[("gte", QueryValue::Text("3".into()))]);
        assert_eq!(spec.get("dimension"), Some(&nested(&[("width", inner)])));
    }
}
