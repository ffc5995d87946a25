use ndarray::{arr1, arr2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

use crate::checkpoint::{Checkpoint, NamedTensor};
use crate::error::QuestError;
use crate::network::ValueNetwork;

fn network(hidden: usize, seed: u64) -> ValueNetwork {
    let mut rng = StdRng::seed_from_u64(seed);
    ValueNetwork::new(5, hidden, 4, &mut rng).unwrap()
}

#[test]
fn test_network_checkpoint_names_and_shapes() {
    let checkpoint = network(8, 0).to_checkpoint();
    let names: Vec<&str> = checkpoint.names().collect();
    assert_eq!(names, vec!["W1", "W2", "W3", "b1", "b2", "b3"]);

    assert!(checkpoint.matrix("W1", (5, 8)).is_ok());
    assert!(checkpoint.matrix("W2", (8, 8)).is_ok());
    assert!(checkpoint.matrix("W3", (8, 4)).is_ok());
    assert!(checkpoint.vector("b3", 4).is_ok());
}

#[test]
fn test_matrix_is_row_major() {
    let mut checkpoint = Checkpoint::new();
    checkpoint.insert_matrix("m", &arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]));
    let tensor = checkpoint.remove("m").unwrap();
    assert_eq!(tensor.shape, vec![2, 3]);
    assert_eq!(tensor.data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert!(checkpoint.is_empty());
}

#[test]
fn test_save_and_load_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.bin");

    let mut checkpoint = Checkpoint::new();
    checkpoint.insert_vector("b1", &arr1(&[0.5, -0.25]));
    checkpoint.save(&path).unwrap();

    let loaded = Checkpoint::load(&path).unwrap();
    assert_eq!(loaded, checkpoint);
    assert_eq!(loaded.vector("b1", 2).unwrap(), arr1(&[0.5, -0.25]));
}

#[test]
fn test_network_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("net.bin");

    let source = network(8, 1);
    source.save(&path).unwrap();
    let mut restored = network(8, 2);
    restored.load(&path).unwrap();

    for (a, b) in source.layers().iter().zip(restored.layers()) {
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.biases, b.biases);
    }
}

#[test]
fn test_missing_tensor() {
    let mut checkpoint = network(8, 3).to_checkpoint();
    checkpoint.remove("b2");

    let mut target = network(8, 4);
    let before = target.layers()[0].weights.clone();
    match target.load_checkpoint(&checkpoint) {
        Err(QuestError::MissingTensor(name)) => assert_eq!(name, "b2"),
        other => panic!("expected MissingTensor, got {:?}", other),
    }
    // Nothing is applied when validation fails
    assert_eq!(target.layers()[0].weights, before);
}

#[test]
fn test_hidden_size_mismatch() {
    let checkpoint = network(16, 5).to_checkpoint();
    let mut target = network(8, 6);
    assert!(matches!(
        target.load_checkpoint(&checkpoint),
        Err(QuestError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_inconsistent_tensor_data() {
    let mut checkpoint = network(8, 7).to_checkpoint();
    checkpoint.insert_raw(
        "b1",
        NamedTensor {
            shape: vec![8],
            data: vec![0.0; 3],
        },
    );
    let mut target = network(8, 8);
    assert!(matches!(
        target.load_checkpoint(&checkpoint),
        Err(QuestError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let result = Checkpoint::load(dir.path().join("absent.bin"));
    assert!(matches!(result, Err(QuestError::IoError(_))));
}

#[test]
fn test_corrupt_file_is_serialization_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corrupt.bin");
    std::fs::write(&path, [0xFF_u8; 3]).unwrap();
    assert!(matches!(
        Checkpoint::load(&path),
        Err(QuestError::SerializationError(_))
    ));
}
