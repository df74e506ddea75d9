//! Response transform chain

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// A single response transform step
pub type ResponseTransform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Ordered chain of response transforms
///
/// The chain always starts with the default transform (parse the body text
/// as JSON, falling back to a JSON string for non-JSON bodies). Appended
/// transforms run after the default, in registration order, exactly once
/// each.
#[derive(Clone, Default)]
pub struct TransformChain {
    transforms: Vec<ResponseTransform>,
}

impl fmt::Debug for TransformChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformChain")
            .field("len", &self.transforms.len())
            .finish()
    }
}

impl TransformChain {
    /// Create an empty chain (default parse only)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform to run after the existing chain
    pub fn push<F>(&mut self, transform: F)
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.transforms.push(Arc::new(transform));
    }

    /// Number of appended transforms (the default parse is not counted)
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether any transforms have been appended
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Run the default parse and then every appended transform, in order
    pub fn apply(&self, body_text: &str) -> Value {
        let mut value = default_parse(body_text);
        for transform in &self.transforms {
            value = transform(value);
        }
        value
    }
}

/// The default transform: parse as JSON, fall back to a plain string
fn default_parse(body_text: &str) -> Value {
    serde_json::from_str(body_text).unwrap_or_else(|_| Value::String(body_text.to_string()))
}
