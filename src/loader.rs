use crate::{
    error::VqaError,
    model::{VqaAnswer, VqaModel, VqaRequest},
};
use kornia_vlm::paligemma::{Paligemma, PaligemmaConfig, PaligemmaError};

/// Hub identifier of the checkpoint pulled by the default PaliGemma config.
pub const MODEL_ID: &str = "google/paligemma-3b-mix-224";

/// Maximum number of tokens generated per answer unless overridden.
pub const DEFAULT_SAMPLE_LEN: usize = 50;

/// PaliGemma wrapped as a [`VqaModel`].
pub struct PaligemmaVqa {
    model: Paligemma,
    sample_len: usize,
}

impl PaligemmaVqa {
    /// Loads the processor and weights for [`MODEL_ID`].
    ///
    /// Weights are fetched from the Hugging Face hub on first use and served
    /// from the local cache afterwards. There are no retries: a failure here
    /// is meant to abort startup.
    pub fn load(sample_len: usize) -> Result<Self, VqaError> {
        log::info!("Loading {MODEL_ID}");

        let model = Paligemma::new(PaligemmaConfig::default())
            .map_err(|e| VqaError::ModelLoad(format!("{MODEL_ID}: {e}")))?;

        log::info!("Model {MODEL_ID} ready");

        Ok(Self { model, sample_len })
    }
}

impl VqaModel for PaligemmaVqa {
    type Error = PaligemmaError;

    fn run(&mut self, request: VqaRequest) -> Result<VqaAnswer, Self::Error> {
        let answer =
            self.model
                .inference(&request.image, &request.question, self.sample_len, false)?;

        Ok(VqaAnswer::single(answer))
    }
}
