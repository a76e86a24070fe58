//! Panic payload wrapper.

use std::any::Any;
use std::fmt;

/// An intercepted panic.
///
/// Wraps whatever value the panicking code handed to `panic!` (or
/// `std::panic::panic_any`). The payload is opaque: observers and the
/// responder decide for themselves how to inspect it.
pub struct Fault {
    payload: Box<dyn Any + Send>,
}

impl Fault {
    pub fn new(payload: Box<dyn Any + Send>) -> Self {
        Self { payload }
    }

    /// Borrow the raw payload.
    pub fn payload(&self) -> &(dyn Any + Send) {
        &*self.payload
    }

    /// Attempt to view the payload as a `T`.
    ///
    /// # Example
    /// ```
    /// use salvage::Fault;
    ///
    /// let fault = Fault::new(Box::new(42_i32));
    /// assert_eq!(fault.downcast_ref::<i32>(), Some(&42));
    /// ```
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Text of the panic, if the payload is a `&'static str` or a `String`.
    ///
    /// `panic!("literal")` produces the former, `panic!("{}", x)` the latter.
    pub fn message(&self) -> Option<&str> {
        if let Some(s) = self.payload.downcast_ref::<&'static str>() {
            Some(s)
        } else {
            self.payload.downcast_ref::<String>().map(String::as_str)
        }
    }

    pub fn into_payload(self) -> Box<dyn Any + Send> {
        self.payload
    }

    /// Continue unwinding with the original payload.
    pub fn resume(self) -> ! {
        std::panic::resume_unwind(self.payload)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => f.write_str(message),
            None => f.write_str("Box<dyn Any>"),
        }
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fault")
            .field("message", &self.message())
            .finish_non_exhaustive()
    }
}
