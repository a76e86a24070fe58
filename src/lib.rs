//! # Salvage
//!
//! Panic recovery middleware for `tower` and `axum` services.
//!
//! A panic anywhere below the [`RecoveryLayer`] is intercepted before it can
//! take down the task serving the connection. The panic is reported to zero
//! or more [`Observer`]s, in the order they were registered, and then exactly
//! one [`Responder`] turns it into the response the client sees.
//!
//! ## Features
//!
//! - **Transparent**: requests that complete normally, including ones that
//!   end in a service error, pass through untouched
//! - **Ordered observers**: metrics, logging, incident tagging, run one after
//!   another on the request's own task
//! - **Single responder**: mandatory at construction, called at most once
//! - **Closure adapters**: [`ObserverFn`] and [`ResponderFn`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use salvage::{IncidentObserver, JsonResponder, RecoveryLayer, TracingObserver};
//! use axum::{Router, routing::get};
//!
//! async fn handler() -> &'static str {
//!     panic!("not today")
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .route("/", get(handler))
//!         .layer(RecoveryLayer::new(
//!             JsonResponder::default(),
//!             vec![Box::new(IncidentObserver), Box::new(TracingObserver)],
//!         ));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```
//!
//! Observers and the responder are trusted: a panic raised by either of them
//! is not caught and continues to unwind past the middleware.

pub mod config;
pub mod error;
pub mod fault;
pub mod observer;
pub mod recovery;
pub mod responder;

pub use config::{ConfigService, RecoveryConfig};
pub use error::{Result, SalvageError};
pub use fault::Fault;
pub use observer::{IncidentId, IncidentObserver, TracingObserver};
pub use recovery::{
    Observer, ObserverFn, RecoveryLayer, RecoveryMiddleware, Responder, ResponderFn,
};
pub use responder::JsonResponder;

/// Prelude module for convenient imports
///
/// ```
/// use salvage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ConfigService, RecoveryConfig};
    pub use crate::error::{Result, SalvageError};
    pub use crate::fault::Fault;
    pub use crate::observer::{IncidentId, IncidentObserver, TracingObserver};
    pub use crate::recovery::{
        Observer, ObserverFn, RecoveryLayer, RecoveryMiddleware, Responder, ResponderFn,
    };
    pub use crate::responder::JsonResponder;
}
