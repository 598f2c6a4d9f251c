use std::time::Duration;

/// Metrics of one completed training epoch.
///
/// # Fields
///
/// - `epoch` - 1-based index of the epoch
/// - `epochs` - Total number of epochs in the run
/// - `average_loss` - Sum of the batch losses divided by the number of batches
/// - `accuracy` - `correct / samples`, using the row-wise argmax convention
/// - `correct` - Number of rows whose predicted argmax equals the target argmax
/// - `samples` - Number of rows processed in the epoch
/// - `batches` - Number of batches processed in the epoch
/// - `elapsed` - Wall-clock time spent on the epoch
#[derive(Debug, Clone, PartialEq)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub epochs: usize,
    pub average_loss: f32,
    pub accuracy: f32,
    pub correct: usize,
    pub samples: usize,
    pub batches: usize,
    pub elapsed: Duration,
}

/// Per-epoch metrics of a training run, in epoch order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingHistory {
    epochs: Vec<EpochMetrics>,
}

impl TrainingHistory {
    pub fn new() -> Self {
        TrainingHistory { epochs: Vec::new() }
    }

    pub(crate) fn push(&mut self, metrics: EpochMetrics) {
        self.epochs.push(metrics);
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn epochs(&self) -> &[EpochMetrics] {
        &self.epochs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EpochMetrics> {
        self.epochs.iter()
    }

    pub fn first(&self) -> Option<&EpochMetrics> {
        self.epochs.first()
    }

    pub fn last(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }

    /// Average loss of every epoch.
    pub fn losses(&self) -> Vec<f32> {
        self.epochs.iter().map(|m| m.average_loss).collect()
    }

    /// Accuracy of every epoch.
    pub fn accuracies(&self) -> Vec<f32> {
        self.epochs.iter().map(|m| m.accuracy).collect()
    }

    /// Average loss of the last epoch, `None` for a run with zero epochs.
    pub fn final_loss(&self) -> Option<f32> {
        self.last().map(|m| m.average_loss)
    }

    /// Accuracy of the last epoch, `None` for a run with zero epochs.
    pub fn final_accuracy(&self) -> Option<f32> {
        self.last().map(|m| m.accuracy)
    }
}

impl<'a> IntoIterator for &'a TrainingHistory {
    type Item = &'a EpochMetrics;
    type IntoIter = std::slice::Iter<'a, EpochMetrics>;

    fn into_iter(self) -> Self::IntoIter {
        self.epochs.iter()
    }
}
