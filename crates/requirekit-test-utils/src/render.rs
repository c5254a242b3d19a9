use parking_lot::Mutex;
use requirekit_core::{RenderError, Renderer};
use serde_json::Value;

/// Renderer that serializes the context and remembers every call.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Mutex<Vec<(String, Value)>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String, RenderError> {
        self.calls
            .lock()
            .push((template.to_string(), context.clone()));
        Ok(format!("{template}:{context}"))
    }
}
