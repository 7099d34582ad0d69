//! The seam between the scorer and whatever runs inference.

use crate::error::Result;
use pipeline::PaddedBatch;

/// A binary sequence classifier over padded token batches.
///
/// ## Design Note
/// - `Send + Sync` so one loaded model can serve concurrent requests
/// - `predict` takes `&self`; implementations must not mutate state
///   between calls, which makes repeated predictions deterministic
pub trait SentimentModel: Send + Sync {
    /// Returns the name of this model (for logging/debugging)
    fn name(&self) -> &str;

    /// Fixed input width the model was trained with
    fn max_len(&self) -> usize;

    /// Run one forward pass over the whole batch.
    ///
    /// # Returns
    /// * `Ok(Vec<f32>)` - One probability in [0, 1] per row, in row order
    /// * `Err` - If inference fails; no partial output is returned
    fn predict(&self, batch: &PaddedBatch) -> Result<Vec<f32>>;
}
