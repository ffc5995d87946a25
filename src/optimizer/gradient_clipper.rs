use ndarray::Array2;

/// Gradient clipping methods
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GradientClipper {
    /// Rescale each gradient tensor independently so its L2 norm is at most `max_norm`
    ClipByNorm { max_norm: f32 },

    /// No clipping
    None,
}

impl GradientClipper {
    /// Clip weight gradients
    pub fn clip_weights(&self, gradients: &mut Array2<f32>) {
        if let GradientClipper::ClipByNorm { max_norm } = self {
            let norm = l2_norm(gradients.iter());
            if norm > *max_norm {
                let scale = max_norm / norm;
                gradients.mapv_inplace(|g| g * scale);
            }
        }
    }
}

pub fn l2_norm<'a, I: Iterator<Item = &'a f32>>(values: I) -> f32 {
    values.map(|&g| g * g).sum::<f32>().sqrt()
}
