//! Request parameters.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Parameters that change on every signed request and so never take part in
/// a cache key.
pub const IGNORED_FIELDS: [&str; 3] = ["oauth_nonce", "oauth_timestamp", "oauth_signature"];

// == Into Param ==
/// Conversion of argument values to the strings Flickr expects.
///
/// Booleans are sent as `1` and `0`.
pub trait IntoParam {
    fn into_param(self) -> String;
}

impl IntoParam for bool {
    fn into_param(self) -> String {
        let value = if self { "1" } else { "0" };
        value.to_string()
    }
}

impl IntoParam for String {
    fn into_param(self) -> String {
        self
    }
}

impl IntoParam for &str {
    fn into_param(self) -> String {
        self.to_string()
    }
}

impl IntoParam for &String {
    fn into_param(self) -> String {
        self.clone()
    }
}

macro_rules! display_param {
    ($($ty:ty),*) => {
        $(impl IntoParam for $ty {
            fn into_param(self) -> String {
                self.to_string()
            }
        })*
    };
}

display_param!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

// == Params ==
/// Name/value pairs sent with a request, kept sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`.
    pub fn with(mut self, name: impl Into<String>, value: impl IntoParam) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets `name`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl IntoParam) {
        self.values.insert(name.into(), value.into_param());
    }

    /// Sets `name` only if it has no value yet.
    pub fn insert_default(&mut self, name: impl Into<String>, value: impl IntoParam) {
        self.values
            .entry(name.into())
            .or_insert_with(|| value.into_param());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Owned pairs, as multipart form fields.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn urlencode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Cache key for a request: the urlencoded parameters without the
    /// per-request OAuth fields.
    pub fn cache_key(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter().filter(|(k, _)| !IGNORED_FIELDS.contains(k)))
            .finish()
    }
}

impl<K: Into<String>, V: IntoParam> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}
