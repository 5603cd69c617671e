//! Web framework integration surface.
//!
//! This module is the boundary between an HTTP framework and the engine. It
//! contains no framework-specific code:
//! - [`RequestAdapter`] is the request view extractors read from
//! - [`PermissionFilter`] exposes the pre-routing and post-routing hooks
//! - [`ErrorResponse`] maps permission errors to status codes and JSON bodies
//!
//! # Integration Model
//!
//! Framework-specific middleware should:
//! 1. Build a `RequestAdapter` from the framework request
//! 2. Call `before_routing` before the router runs and keep the returned
//!    context in the request's own scope
//! 3. After routing, register the resolved path variables on the adapter
//! 4. Call `after_routing`; on `Err`, respond with `ErrorResponse::from_error`
//! 5. Drop the context when the response is sent

mod adapter;
mod filter;
mod response;

pub use adapter::RequestAdapter;
pub use filter::PermissionFilter;
pub use response::ErrorResponse;
