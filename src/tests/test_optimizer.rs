use ndarray::{array, Array2};

use crate::optimizer::gradient_clipper::l2_norm;
use crate::optimizer::{GradientClipper, Optimizer, Sgd};

#[test]
fn test_sgd_update_weights() {
    let mut sgd = Sgd::new();
    let mut weights = array![[1.0, 1.0], [1.0, 1.0]];
    let gradients = array![[0.5, 0.25], [-0.5, 0.0]];

    sgd.update_weights(&mut weights, &gradients, 0.5);

    assert_eq!(weights, array![[0.75, 0.875], [1.25, 1.0]]);
}

#[test]
fn test_sgd_update_biases() {
    let mut sgd = Sgd::new();
    let mut biases = array![1.0, 1.0];
    let gradients = array![0.5, -1.0];

    sgd.update_biases(&mut biases, &gradients, 0.25);

    assert_eq!(biases, array![0.875, 1.25]);
}

#[test]
fn test_clip_by_norm_rescales_large_gradients() {
    let clipper = GradientClipper::ClipByNorm { max_norm: 10.0 };
    let mut gradients = array![[30.0, 40.0]];
    clipper.clip_weights(&mut gradients);

    assert!((l2_norm(gradients.iter()) - 10.0).abs() < 1e-4);
    // Direction is preserved
    assert!((gradients[[0, 0]] / gradients[[0, 1]] - 0.75).abs() < 1e-6);
}

#[test]
fn test_clip_by_norm_leaves_small_gradients() {
    let clipper = GradientClipper::ClipByNorm { max_norm: 10.0 };
    let mut gradients = array![[3.0, 4.0]];
    clipper.clip_weights(&mut gradients);
    assert_eq!(gradients, array![[3.0, 4.0]]);
}

#[test]
fn test_no_clipping() {
    let mut gradients = Array2::from_elem((3, 3), 100.0_f32);
    GradientClipper::None.clip_weights(&mut gradients);
    assert!(gradients.iter().all(|&g| g == 100.0));
}

#[test]
fn test_l2_norm() {
    let values = [3.0_f32, 4.0];
    assert_eq!(l2_norm(values.iter()), 5.0);
}
