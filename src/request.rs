//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http_body_util::BodyExt;

/// An incoming HTTP request with its body fully buffered.
///
/// Path parameters are filled in by the [`Router`](crate::Router) once a
/// route has matched.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        headers: Vec<(String, String)>,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers,
            body: body.into(),
            params: HashMap::new(),
        }
    }

    /// Buffers a hyper request into a [`Request`].
    ///
    /// Headers whose values are not visible ASCII are dropped; no handler in
    /// this crate reads such headers.
    pub(crate) async fn from_hyper(
        req: hyper::Request<hyper::body::Incoming>,
    ) -> Result<Self, hyper::Error> {
        let (parts, body) = req.into_parts();
        let headers = parts.headers.iter()
            .filter_map(|(k, v)| Some((k.as_str().to_owned(), v.to_str().ok()?.to_owned())))
            .collect();
        let body = body.collect().await?.to_bytes();
        Ok(Self::new(parts.method.as_str(), parts.uri.path(), headers, body))
    }

    pub fn method(&self) -> &str { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The media type of the `content-type` header, lowercased and without
    /// parameters: `Application/JSON; charset=utf-8` gives `application/json`.
    pub fn media_type(&self) -> Option<String> {
        let value = self.header("content-type")?;
        let essence = value.split(';').next().unwrap_or_default().trim();
        Some(essence.to_ascii_lowercase())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/customers/{id}`, `req.param("id")` on `/customers/42`
    /// returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_content_type(value: &str) -> Request {
        Request::new("PUT", "/", vec![("Content-Type".into(), value.into())], Bytes::new())
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = with_content_type("application/json");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn media_type_strips_parameters() {
        let req = with_content_type("Application/JSON; charset=UTF-8");
        assert_eq!(req.media_type().as_deref(), Some("application/json"));
    }

    #[test]
    fn media_type_absent_without_header() {
        let req = Request::new("GET", "/", Vec::new(), Bytes::new());
        assert_eq!(req.media_type(), None);
    }
}
