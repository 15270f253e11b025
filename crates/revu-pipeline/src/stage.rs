//! The unit of transformation.

use revu_model::Result;

use crate::value::PipelineValue;

/// One named, independently testable transformation step.
///
/// A stage maps the current pipeline value to the next one. The name is
/// fixed at construction and shows up in logs, wrapped errors, and cache
/// artifact paths.
pub trait Stage {
    fn name(&self) -> &str;

    /// Map an input value to an output value.
    fn step(&self, input: PipelineValue) -> Result<PipelineValue>;
}

/// Adapter turning a plain function into a named leaf stage.
///
/// The `Fn` bound makes non-callable arguments a compile error, so there
/// is nothing left to validate at run time.
pub struct FnStage<F> {
    name: String,
    func: F,
}

impl<F> FnStage<F>
where
    F: Fn(PipelineValue) -> Result<PipelineValue>,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Stage for FnStage<F>
where
    F: Fn(PipelineValue) -> Result<PipelineValue>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&self, input: PipelineValue) -> Result<PipelineValue> {
        (self.func)(input)
    }
}
