use std::sync::Mutex;

use super::*;
use crate::error::ValidationError;
use crate::route::RouteError;

/// Records error codes.
#[derive(Default)]
struct RecordingSink {
    codes: Mutex<Vec<&'static str>>,
}

impl DiagnosticsSink for RecordingSink {
    fn report(&self, error: &TripError) {
        self.codes.lock().unwrap().push(error.error_code());
    }
}

#[test]
fn sinks_are_usable_as_trait_objects() {
    let recording = RecordingSink::default();
    let sinks: [&dyn DiagnosticsSink; 2] = [&TracingSink, &recording];
    let errors = [
        TripError::from(ValidationError::TerminalStop { index: 2 }),
        TripError::StaleResponseDiscarded { seq: 1, latest: 3 },
        TripError::from(RouteError::Status { status: 500, body: "oops".into() }),
    ];
    for sink in sinks {
        for err in &errors {
            sink.report(err);
        }
    }
    assert_eq!(*recording.codes.lock().unwrap(), ["E_VALIDATION", "E_STALE_RESPONSE", "E_ROUTE_STATUS"]);
}
