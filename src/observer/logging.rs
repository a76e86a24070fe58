use crate::fault::Fault;
use crate::observer::IncidentId;
use crate::recovery::Observer;
use axum::http::Request;

/// An observer that logs the recovered panic with request details
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn observe(&self, fault: &Fault, request: &mut Request<()>) {
        let method = request.method();
        let uri = request.uri();

        match request.extensions().get::<IncidentId>() {
            Some(incident) => tracing::error!(
                %method,
                %uri,
                %incident,
                panic = %fault,
                "recovered from panic while handling request"
            ),
            None => tracing::error!(
                %method,
                %uri,
                panic = %fault,
                "recovered from panic while handling request"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn observe_captured(request: &mut Request<()>) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingObserver.observe(&Fault::new(Box::new("boom-42")), request);
        });

        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_logs_request_and_incident() {
        let incident = IncidentId::new();
        let mut request = Request::builder()
            .method("POST")
            .uri("/orders")
            .body(())
            .unwrap();
        request.extensions_mut().insert(incident);

        let output = observe_captured(&mut request);

        assert!(output.contains("ERROR"));
        assert!(output.contains("method=POST"));
        assert!(output.contains("uri=/orders"));
        assert!(output.contains(&format!("incident={incident}")));
        assert!(output.contains("panic=boom-42"));
    }

    #[test]
    fn test_logs_without_incident() {
        let mut request = Request::builder().uri("/nada").body(()).unwrap();

        let output = observe_captured(&mut request);

        assert!(output.contains("uri=/nada"));
        assert!(!output.contains("incident="));
    }
}
