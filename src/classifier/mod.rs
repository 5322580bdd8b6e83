// Text classification — trait-based abstraction for swappable backends.
//
// The TextClassifier trait defines the interface the moderation service
// depends on. OnnxClassifier implements it with a local ONNX model; tests
// inject stubs. Truncation to the model's input limit happens inside the
// classifier, not in callers.

pub mod download;
pub mod onnx;
pub mod traits;

pub use onnx::OnnxClassifier;
pub use traits::TextClassifier;
