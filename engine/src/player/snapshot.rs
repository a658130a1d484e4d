use serde::ser::{Serialize, Serializer};

use super::format::{Attribute, AttributeRequest, DIVIDER, SENTINEL};

/// Point-in-time answer to a `--nowplaying` query.
///
/// Empty when nothing is playing. Fields keep the order they were requested
/// in, and serialize as a JSON object keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    fields: Vec<(Attribute, String)>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse player stdout for `request`.
    ///
    /// Output without the leading sentinel means no track is loaded. When the
    /// field count is off, short responses are padded with empty strings and
    /// surplus fields (a value that itself contained the divider) are joined
    /// back onto the last attribute, so a successful parse always covers
    /// exactly the requested attributes.
    pub fn parse(request: &AttributeRequest, output: &str) -> Self {
        let attrs = request.attributes();
        if attrs.is_empty() {
            return Self::empty();
        }
        let Some(body) = output.strip_prefix(SENTINEL) else {
            return Self::empty();
        };
        let body = body
            .strip_suffix('\n')
            .map(|b| b.strip_suffix('\r').unwrap_or(b))
            .unwrap_or(body);

        let mut values = body.splitn(attrs.len(), DIVIDER);
        let fields = attrs
            .iter()
            .map(|attr| (*attr, values.next().unwrap_or_default().to_string()))
            .collect();
        Self { fields }
    }

    pub fn get(&self, attr: Attribute) -> Option<&str> {
        self.fields
            .iter()
            .find(|(a, _)| *a == attr)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &str)> {
        self.fields.iter().map(|(a, v)| (*a, v.as_str()))
    }

    /// Values in `request` order, `None` where the snapshot has no entry.
    pub fn values(&self, request: &AttributeRequest) -> Vec<Option<String>> {
        request
            .attributes()
            .iter()
            .map(|a| self.get(*a).map(str::to_string))
            .collect()
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.fields.iter().map(|(a, v)| (a.name(), v)))
    }
}
