use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Normal;

use crate::error::{QuestError, Result};

/// Weight initialization strategies
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightInit {
    /// He/Kaiming normal initialization (for ReLU), std `sqrt(2 / fan_in)`
    HeNormal,
}

impl WeightInit {
    /// Initialize weights of shape `(fan_in, fan_out)` from `rng`
    pub fn initialize_weights<R: Rng + ?Sized>(
        &self,
        shape: (usize, usize),
        rng: &mut R,
    ) -> Result<Array2<f32>> {
        let (fan_in, _) = shape;

        match self {
            WeightInit::HeNormal => {
                if fan_in == 0 {
                    return Err(QuestError::invalid_parameter("fan_in", "must be positive"));
                }
                let std = (2.0 / fan_in as f32).sqrt();
                let normal = Normal::new(0.0, std)
                    .map_err(|e| QuestError::NumericalError(e.to_string()))?;
                Ok(Array2::random_using(shape, normal, rng))
            }
        }
    }

    /// Initialize biases for a layer
    pub fn initialize_biases(&self, size: usize) -> Array1<f32> {
        Array1::zeros(size)
    }
}
