pub mod dense;
pub mod initialization;

pub use dense::{Activation, DenseLayer, LayerGradients};
pub use initialization::WeightInit;
