//! Framework-neutral view of an inbound HTTP request.

use std::collections::HashMap;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE, COOKIE};
use http::{HeaderMap, Method};

/// The request data extractors read from.
///
/// Framework integrations build a `RequestAdapter` from their own request
/// type (an `http::Request<Bytes>` converts directly), register the router's
/// resolved path variables, and hand it to the
/// [`PermissionFilter`](super::PermissionFilter).
///
/// The body is only visible to extractors after the buffering gate has made
/// it re-readable; see [`buffered_body`](Self::buffered_body).
///
/// # Examples
///
/// ```
/// use http::Method;
/// use ownership_guard::web::RequestAdapter;
///
/// let mut request = RequestAdapter::new(Method::GET, "/api/users?id=1&id=2");
/// request.add_path_param("tenant", "acme");
///
/// assert_eq!(request.path(), "/api/users");
/// assert_eq!(request.query_values("id"), vec!["1", "2"]);
/// assert_eq!(request.path_param("tenant"), Some("acme"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestAdapter {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    /// `None` until the router has resolved the path template
    path_params: Option<HashMap<String, String>>,
    body: Bytes,
    body_buffered: bool,
}

impl RequestAdapter {
    /// Creates an adapter from a method and a request target (`path?query`).
    ///
    /// The query string is decoded as `application/x-www-form-urlencoded`.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        Self {
            method,
            path: path.to_string(),
            query: query.map(parse_query).unwrap_or_default(),
            headers: HeaderMap::new(),
            path_params: None,
            body: Bytes::new(),
            body_buffered: false,
        }
    }

    /// Appends a header value, keeping any existing values for the name.
    pub fn add_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.append(name, value);
    }

    /// Sets the raw request body.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// Replaces the router-resolved path variables.
    pub fn set_path_params(&mut self, params: HashMap<String, String>) {
        self.path_params = Some(params);
    }

    /// Adds one router-resolved path variable.
    pub fn add_path_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.path_params
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
    }

    pub(crate) fn buffer_body(&mut self) {
        self.body_buffered = true;
    }

    /// Returns the request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns `true` once the buffering gate has made the body re-readable.
    pub fn body_buffered(&self) -> bool {
        self.body_buffered
    }

    /// Returns the body if it was buffered.
    ///
    /// Unbuffered bodies belong to the handler and are never read here.
    pub fn buffered_body(&self) -> Option<&Bytes> {
        self.body_buffered.then_some(&self.body)
    }

    /// Returns the body as the handler sees it.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns every query value for `name`, in request order.
    pub fn query_values(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Returns the first header value for `name` if it is visible ASCII.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the value of the first cookie named exactly `name`.
    pub fn cookie_value(&self, name: &str) -> Option<&str> {
        self.headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|header| header.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.trim())
    }

    /// Returns the router-resolved variable named `name`.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .as_ref()
            .and_then(|params| params.get(name))
            .map(String::as_str)
    }

    /// Returns the `Content-Type` header, if present and readable.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }
}

impl From<http::Request<Bytes>> for RequestAdapter {
    fn from(request: http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();

        Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(parse_query).unwrap_or_default(),
            headers: parts.headers,
            path_params: None,
            body,
            body_buffered: false,
        }
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}
