use crate::fault::Fault;
use crate::recovery::{Observer, Responder};
use axum::{http::Request, response::Response};
use futures::future::{BoxFuture, FutureExt};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// The collaborators wired into a recovery middleware, shared by all clones.
struct Recovery {
    responder: Arc<dyn Responder>,
    observers: Vec<Arc<dyn Observer>>,
}

impl Recovery {
    fn new(responder: impl Responder, observers: Vec<Box<dyn Observer>>) -> Arc<Self> {
        Arc::new(Self {
            responder: Arc::new(responder),
            observers: observers.into_iter().map(Arc::from).collect(),
        })
    }

    fn handle(&self, fault: Fault, mut request: Request<()>) -> Response {
        tracing::debug!(
            method = %request.method(),
            uri = %request.uri(),
            observers = self.observers.len(),
            "panic intercepted"
        );

        for observer in &self.observers {
            observer.observe(&fault, &mut request);
        }
        self.responder.respond(fault, request)
    }
}

/// Tower Layer that recovers from panics in the wrapped service.
///
/// ```
/// use salvage::{JsonResponder, RecoveryLayer, TracingObserver};
/// use axum::{Router, routing::get};
///
/// let app: Router = Router::new()
///     .route("/", get(|| async { "hello" }))
///     .layer(RecoveryLayer::new(
///         JsonResponder::default(),
///         vec![Box::new(TracingObserver)],
///     ));
/// ```
#[derive(Clone)]
pub struct RecoveryLayer {
    recovery: Arc<Recovery>,
}

impl RecoveryLayer {
    /// One responder is required, along with zero to many observers.
    /// Observers are notified in the order given.
    pub fn new(responder: impl Responder, observers: Vec<Box<dyn Observer>>) -> Self {
        Self {
            recovery: Recovery::new(responder, observers),
        }
    }

    /// Append an observer, notified after the ones already registered.
    ///
    /// Layers cloned earlier keep their own observer list.
    pub fn observer(self, observer: impl Observer) -> Self {
        let mut observers = self.recovery.observers.clone();
        observers.push(Arc::new(observer));
        Self {
            recovery: Arc::new(Recovery {
                responder: self.recovery.responder.clone(),
                observers,
            }),
        }
    }
}

impl<S> Layer<S> for RecoveryLayer {
    type Service = RecoveryMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RecoveryMiddleware {
            inner,
            recovery: self.recovery.clone(),
        }
    }
}

/// Middleware that catches any panic escaping from further down the chain.
///
/// On normal completion the inner service's result is returned untouched,
/// including its errors. On a panic every observer is notified, then the
/// responder produces the response and the panic goes no further.
///
/// Observers and the responder see the request as it was when it entered
/// this middleware: headers or extensions added further down the chain
/// before the panic are not visible to them.
#[derive(Clone)]
pub struct RecoveryMiddleware<S> {
    inner: S,
    recovery: Arc<Recovery>,
}

impl<S> RecoveryMiddleware<S> {
    pub fn new(inner: S, responder: impl Responder, observers: Vec<Box<dyn Observer>>) -> Self {
        Self {
            inner,
            recovery: Recovery::new(responder, observers),
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, B> Service<Request<B>> for RecoveryMiddleware<S>
where
    S: Service<Request<B>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        // The body goes downstream; observers and the responder get the rest.
        let view = request_view(&request);
        let recovery = self.recovery.clone();

        // Call the instance that poll_ready was driven on.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let called = panic::catch_unwind(AssertUnwindSafe(move || inner.call(request)));

        Box::pin(async move {
            let outcome = match called {
                Ok(future) => AssertUnwindSafe(future).catch_unwind().await,
                Err(payload) => Err(payload),
            };

            match outcome {
                Ok(result) => result,
                Err(payload) => Ok(recovery.handle(Fault::new(payload), view)),
            }
        })
    }
}

fn request_view<B>(request: &Request<B>) -> Request<()> {
    let mut view = Request::new(());
    *view.method_mut() = request.method().clone();
    *view.uri_mut() = request.uri().clone();
    *view.version_mut() = request.version();
    *view.headers_mut() = request.headers().clone();
    *view.extensions_mut() = request.extensions().clone();
    view
}
