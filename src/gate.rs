use http::Method;

use crate::context::RequestContext;
use crate::web::RequestAdapter;

/// The pre-routing gate.
///
/// `BufferingGate` is the only way to open a [`RequestContext`]. It decides
/// whether the request body may be buffered so that body extractors and the
/// handler can both read it.
///
/// Bodies are buffered for `POST`, `PUT`, `PATCH` and `DELETE`, except when
/// the content type is `multipart/*`: uploads are streamed to the handler and
/// never held in memory here.
///
/// # Examples
///
/// ```
/// use http::Method;
/// use ownership_guard::BufferingGate;
/// use ownership_guard::web::RequestAdapter;
///
/// let mut request = RequestAdapter::new(Method::POST, "/api/staffs/1/schedules");
/// request.set_body(r#"{"userId":"1"}"#);
///
/// let ctx = BufferingGate::new().open(&mut request);
/// assert!(ctx.body_buffered());
/// assert!(request.buffered_body().is_some());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferingGate {
    _private: (),
}

impl BufferingGate {
    /// Creates a gate.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Returns `true` if a request with this method and content type should
    /// have its body buffered.
    pub fn should_buffer(method: &Method, content_type: Option<&str>) -> bool {
        has_body_semantics(method) && !content_type.is_some_and(is_multipart)
    }

    /// Opens the request-scoped context, buffering the body when allowed.
    pub fn open(&self, request: &mut RequestAdapter) -> RequestContext {
        let buffered = Self::should_buffer(request.method(), request.content_type());

        if buffered {
            request.buffer_body();
        } else if has_body_semantics(request.method()) {
            tracing::info!(
                uri = %request.path(),
                method = %request.method(),
                "multipart request, body not buffered"
            );
        }

        RequestContext::new(request.path(), buffered)
    }
}

fn has_body_semantics(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

fn is_multipart(content_type: &str) -> bool {
    content_type
        .trim_start()
        .get(..10)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("multipart/"))
}
