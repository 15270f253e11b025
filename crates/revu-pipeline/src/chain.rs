//! Ordered composition of stages.

use revu_model::Result;
use tracing::info;

use crate::stage::Stage;
use crate::value::PipelineValue;

/// A flattened, ordered sequence of stages executed front to back.
///
/// Composition never nests: leaf stages are added with [`then`] and
/// [`prepend`], and pipeline-with-pipeline composition goes through
/// [`concat`], which splices the other pipeline's stages in place. The
/// stage count therefore always equals the number of leaf stages, no
/// matter how the pipeline was assembled.
///
/// [`then`]: Pipeline::then
/// [`prepend`]: Pipeline::prepend
/// [`concat`]: Pipeline::concat
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage; it runs after every stage already present.
    #[must_use]
    pub fn then(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Insert a stage at the front; it runs before every stage already present.
    #[must_use]
    pub fn prepend(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.insert(0, Box::new(stage));
        self
    }

    /// Append every stage of `other`, preserving its order.
    #[must_use]
    pub fn concat(mut self, other: Pipeline) -> Self {
        self.stages.extend(other.stages);
        self
    }

    /// Number of leaf stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Render the execution order for diagnostics.
    pub fn sequence(&self) -> String {
        let names: Vec<&str> = self.stages.iter().map(|stage| stage.name()).collect();
        format!("execution order: {}", names.join(" -> "))
    }

    /// Run every stage in order, threading the value through.
    ///
    /// The first failing stage aborts the run; its error is wrapped with
    /// the stage name and the original message is preserved.
    pub fn run(&self, input: PipelineValue) -> Result<PipelineValue> {
        let mut value = input;
        for (index, stage) in self.stages.iter().enumerate() {
            info!(index = index + 1, stage = stage.name(), "running stage");
            value = stage
                .step(value)
                .map_err(|error| error.in_stage(stage.name()))?;
        }
        Ok(value)
    }
}
