use kornia_image::{Image, allocator::CpuAllocator};

/// A single visual question: the decoded bitmap and the question text.
pub struct VqaRequest {
    pub image: Image<u8, 3, CpuAllocator>,
    pub question: String,
}

/// Decoded output of one generation call.
///
/// Models may produce several candidate sequences; only the first one is
/// returned to clients.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VqaAnswer {
    pub candidates: Vec<String>,
}

impl VqaAnswer {
    pub fn single(answer: impl Into<String>) -> Self {
        Self {
            candidates: vec![answer.into()],
        }
    }

    /// Takes the first decoded candidate, if any was generated.
    pub fn first(self) -> Option<String> {
        self.candidates.into_iter().next()
    }
}

/// Trait for models that can answer a question about an image.
///
/// Implementors own all of their weights and state; the engine guarantees
/// `run` is only ever called from one thread at a time.
pub trait VqaModel {
    /// The error type that can be returned during inference.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs generation for one request. No parameters are updated.
    fn run(&mut self, request: VqaRequest) -> Result<VqaAnswer, Self::Error>;
}
