use serde::de::DeserializeOwned;

use crate::{error::ParamsDeserializeError, param::ParamValue};

/// Decoded path parameters of a matched route, in pattern order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathParams(Vec<(String, ParamValue)>);

impl PathParams {
    pub(crate) fn push(&mut self, name: impl Into<String>, value: ParamValue) {
        self.0.push((name.into(), value));
    }

    /// Returns the value of the named parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Returns the named parameter if it was declared as `str`.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    /// Returns the named parameter if it was declared as `int`.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParamValue::as_int)
    }

    /// Returns the named parameter if it was declared as `float`.
    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParamValue::as_float)
    }

    /// Returns the named parameter if it was declared as `bool`.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_bool)
    }

    /// Returns the number of parameters.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the route has no placeholders.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Deserialize the parameters into `T`, matching placeholder names to
    /// field names.
    ///
    /// # Example
    ///
    /// ```
    /// use http::Method;
    /// use pathway::RouteRegistry;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Comment {
    ///     post_id: i64,
    ///     slug: String,
    /// }
    ///
    /// let mut registry = RouteRegistry::new();
    /// registry
    ///     .register(Method::GET, "/posts/{post_id:int}/{slug}", "comment")
    ///     .unwrap();
    ///
    /// let matched = registry.dispatch(&Method::GET, "/posts/7/hello").unwrap();
    /// let comment: Comment = matched.params.deserialize().unwrap();
    /// assert_eq!(comment.post_id, 7);
    /// assert_eq!(comment.slug, "hello");
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ParamsDeserializeError> {
        let map = self
            .0
            .iter()
            .map(|(name, value)| Ok((name.clone(), serde_json::to_value(value)?)))
            .collect::<Result<serde_json::Map<_, _>, serde_json::Error>>()?;
        Ok(serde_json::from_value(serde_json::Value::Object(map))?)
    }
}

impl<'a> IntoIterator for &'a PathParams {
    type Item = &'a (String, ParamValue);
    type IntoIter = std::slice::Iter<'a, (String, ParamValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
