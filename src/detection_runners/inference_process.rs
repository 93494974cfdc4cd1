use std::time::Instant;
use crate::data::{ConfigOrt, Xs, Y};
use crate::utils;

pub trait InferenceProcess: Sized {
    type Input;

    /// Creates a new instance of the model with the given options.
    fn new(options: ConfigOrt) -> anyhow::Result<Self>;

    /// Pre-process the input data.
    fn preprocess(&self, xs: &[Self::Input]) -> anyhow::Result<Xs>;

    /// Executes the model on the preprocessed data.
    fn inference(&mut self, xs: Xs) -> anyhow::Result<Xs>;

    /// Post-process the model's output.
    fn postprocess(&self, xs: Xs, xs0: &[Self::Input]) -> anyhow::Result<Vec<Y>>;

    /// Executes the full pipeline.
    fn run(&mut self, xs: &[Self::Input]) -> anyhow::Result<Vec<Y>> {
        let ys = self.preprocess(xs)?;
        let ys = self.inference(ys)?;
        let ys = self.postprocess(ys, xs)?;
        Ok(ys)
    }

    /// Executes the full pipeline, tracing each stage.
    fn forward(&mut self, xs: &[Self::Input], profile: bool) -> anyhow::Result<Vec<Y>> {
        let detect_time = Instant::now();
        let mut detect_elapsed = detect_time.elapsed();

        let ys = self.preprocess(xs)?;
        detect_elapsed = utils::trace("TIME", "Preprocessing input", detect_time, detect_elapsed);

        let ys = self.inference(ys)?;
        detect_elapsed = utils::trace("TIME", "Detection run", detect_time, detect_elapsed);

        let ys = self.postprocess(ys, xs)?;
        utils::trace("TIME", "Postprocessing", detect_time, detect_elapsed);

        if profile {
            log::info!("> Total forward pass: {:?}", detect_time.elapsed());
        }

        Ok(ys)
    }
}
