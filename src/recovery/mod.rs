use axum::{http::Request, response::Response};

use crate::fault::Fault;

pub mod layer;

pub use layer::{RecoveryLayer, RecoveryMiddleware};

/// Notified when a panic has been recovered, e.g. to record it in another
/// system.
///
/// Observers run in registration order on the task that handled the
/// request. They share one request view: anything an observer inserts into
/// its extensions is visible to later observers and to the [`Responder`].
///
/// A panic raised by an observer is not caught.
pub trait Observer: Send + Sync + 'static {
    fn observe(&self, fault: &Fault, request: &mut Request<()>);
}

/// Produces the client-visible response after a panic has been recovered.
///
/// Exactly one responder is attached to each recovery middleware, and it is
/// called at most once per request, after every [`Observer`]. A panic raised
/// by the responder is not caught.
///
/// # Example
/// ```
/// use salvage::{Fault, Responder};
/// use axum::{http::{Request, StatusCode}, response::{IntoResponse, Response}};
///
/// struct Unavailable;
///
/// impl Responder for Unavailable {
///     fn respond(&self, fault: Fault, _request: Request<()>) -> Response {
///         (StatusCode::SERVICE_UNAVAILABLE, format!("PANICED: {fault}\n")).into_response()
///     }
/// }
/// ```
pub trait Responder: Send + Sync + 'static {
    fn respond(&self, fault: Fault, request: Request<()>) -> Response;
}

/// Adapter for using a closure as an [`Observer`].
pub struct ObserverFn<F> {
    f: F,
}

impl<F> ObserverFn<F>
where
    F: Fn(&Fault, &mut Request<()>) + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Observer for ObserverFn<F>
where
    F: Fn(&Fault, &mut Request<()>) + Send + Sync + 'static,
{
    fn observe(&self, fault: &Fault, request: &mut Request<()>) {
        (self.f)(fault, request)
    }
}

/// Adapter for using a closure as a [`Responder`].
pub struct ResponderFn<F> {
    f: F,
}

impl<F> ResponderFn<F>
where
    F: Fn(Fault, Request<()>) -> Response + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Responder for ResponderFn<F>
where
    F: Fn(Fault, Request<()>) -> Response + Send + Sync + 'static,
{
    fn respond(&self, fault: Fault, request: Request<()>) -> Response {
        (self.f)(fault, request)
    }
}
