//! Built-in responders.
//!
//! Any closure can also act as a responder through
//! [`ResponderFn`](crate::recovery::ResponderFn).

pub mod json;

pub use json::JsonResponder;
