//! Unpermitted-key actions observed through the public API.

use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};
use strong_params::{FilterSpec, Parameters, ParamsError, PermitConfig, UnpermittedAction};
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl CaptureWriter {
    fn contents(&self) -> String {
        let buf = self.0.lock().expect("capture lock");
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("capture lock").extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn injected_params() -> Parameters {
    Parameters::from_json(json!({"id": "1", "injected": "x"})).expect("valid body")
}

fn id_spec() -> FilterSpec {
    FilterSpec::new().scalar("id")
}

#[test]
fn raise_reports_every_rejected_key() {
    let config = PermitConfig::with_action(UnpermittedAction::Raise);
    let err = injected_params().permit(&id_spec(), &config).unwrap_err();

    assert_eq!(
        err,
        ParamsError::UnpermittedParameters {
            keys: vec!["injected".to_string()]
        }
    );
}

#[test]
fn raise_passes_clean_input() {
    let config = PermitConfig::with_action(UnpermittedAction::Raise);
    let input = Parameters::from_json(json!({"id": "1", "controller": "people", "action": "create"}))
        .expect("valid body");

    let permitted = input.permit(&id_spec(), &config).expect("nothing to report");
    assert_eq!(serde_json::to_value(&permitted).unwrap(), json!({"id": "1"}));
}

#[test]
fn disabled_drops_silently() {
    let config = PermitConfig::with_action(UnpermittedAction::Disabled);
    let permitted = injected_params().permit(&id_spec(), &config).expect("disabled never fails");

    assert_eq!(serde_json::to_value(&permitted).unwrap(), json!({"id": "1"}));
}

#[test]
fn log_emits_event_with_keys() {
    let capture = CaptureWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();

    let config = PermitConfig::with_action(UnpermittedAction::Log);
    let permitted = tracing::subscriber::with_default(subscriber, || {
        injected_params().permit(&id_spec(), &config)
    })
    .expect("log never fails");

    assert_eq!(serde_json::to_value(&permitted).unwrap(), json!({"id": "1"}));
    let output = capture.contents();
    assert!(
        output.contains("Unpermitted parameters: injected"),
        "missing log line in {output:?}"
    );
    assert!(output.contains(strong_params::LOG_TARGET));
}

#[test]
fn log_is_quiet_when_nothing_was_dropped() {
    let capture = CaptureWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();

    let config = PermitConfig::with_action(UnpermittedAction::Log);
    let input = Parameters::from_json(json!({"id": "1"})).expect("valid body");
    tracing::subscriber::with_default(subscriber, || input.permit(&id_spec(), &config))
        .expect("log never fails");

    assert!(!capture.contents().contains("Unpermitted parameters"));
}
