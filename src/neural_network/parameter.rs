use crate::tensor::Tensor;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PARAM_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque handle identifying one trainable parameter tensor for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(u64);

impl ParamId {
    fn next() -> Self {
        ParamId(NEXT_PARAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A trainable rank-2 tensor together with a stable identity.
///
/// Optimizers that keep per-parameter state key it by [`ParamId`]. The id is assigned when
/// the parameter is created and never reused; cloning a parameter creates a distinct
/// parameter with a fresh id. Swapping the whole value through [`Parameter::replace`] keeps
/// the id but bumps the generation, which tells stateful optimizers that their recorded
/// state belongs to a previous value.
///
/// # Fields
///
/// - `id` - Process-unique identity
/// - `generation` - Incremented on every [`Parameter::replace`]
/// - `value` - The parameter values
#[derive(Debug)]
pub struct Parameter {
    id: ParamId,
    generation: u64,
    value: Tensor<2>,
}

impl Parameter {
    pub fn new(value: Tensor<2>) -> Self {
        Parameter {
            id: ParamId::next(),
            generation: 0,
            value,
        }
    }

    get_field!(id, id, ParamId);
    get_field!(generation, generation, u64);

    pub fn value(&self) -> &Tensor<2> {
        &self.value
    }

    /// Mutable access for in-place updates. Identity and generation are unchanged.
    pub fn value_mut(&mut self) -> &mut Tensor<2> {
        &mut self.value
    }

    pub fn shape(&self) -> &[usize; 2] {
        self.value.shape()
    }

    /// Replaces the value wholesale and returns the previous one.
    pub fn replace(&mut self, value: Tensor<2>) -> Tensor<2> {
        self.generation += 1;
        std::mem::replace(&mut self.value, value)
    }
}

impl Clone for Parameter {
    fn clone(&self) -> Self {
        Parameter::new(self.value.clone())
    }
}
