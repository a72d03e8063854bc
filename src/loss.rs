use ndarray::{Array1, ArrayView1};

/// Trait defining the interface for loss criteria.
///
/// Predictions and targets are parallel columns of per-sample scalars; the
/// gradient is taken with respect to the predictions only.
pub trait Loss: Send + Sync {
    /// Compute the scalar loss for a column of predictions and targets
    fn compute(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> f32;

    /// Compute the gradient of the loss with respect to the predictions
    fn gradient(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Array1<f32>;
}

/// Mean Squared Error loss
pub struct MSE;

impl Loss for MSE {
    fn compute(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> f32 {
        let diff = &predictions - &targets;
        (&diff * &diff).sum() / (2.0 * predictions.len() as f32)
    }

    fn gradient(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Array1<f32> {
        (&predictions - &targets) / predictions.len() as f32
    }
}
