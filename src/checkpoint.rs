//! Named-tensor container used to persist network parameters.
//!
//! A checkpoint maps tensor names (`W1`, `b1`, ...) to a shape and row-major
//! data. Readers validate every tensor they need against the shape they expect,
//! so a missing or mis-shaped entry surfaces as an error instead of silently
//! producing a zero-filled network.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{QuestError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedTensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    tensors: BTreeMap<String, NamedTensor>,
}

impl Checkpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_matrix(&mut self, name: &str, matrix: &Array2<f32>) {
        let (rows, cols) = matrix.dim();
        self.tensors.insert(
            name.to_string(),
            NamedTensor {
                shape: vec![rows, cols],
                data: matrix.iter().copied().collect(),
            },
        );
    }

    pub fn insert_vector(&mut self, name: &str, vector: &Array1<f32>) {
        self.tensors.insert(
            name.to_string(),
            NamedTensor {
                shape: vec![vector.len()],
                data: vector.to_vec(),
            },
        );
    }

    /// Insert a raw tensor without shape checks.
    pub fn insert_raw(&mut self, name: &str, tensor: NamedTensor) {
        self.tensors.insert(name.to_string(), tensor);
    }

    pub fn remove(&mut self, name: &str) -> Option<NamedTensor> {
        self.tensors.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tensors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    fn get(&self, name: &str, expected: &[usize]) -> Result<&NamedTensor> {
        let tensor = self
            .tensors
            .get(name)
            .ok_or_else(|| QuestError::MissingTensor(name.to_string()))?;
        let element_count: usize = tensor.shape.iter().product();
        if tensor.shape != expected || tensor.data.len() != element_count {
            return Err(QuestError::dimension_mismatch(
                format!("{} with shape {:?}", name, expected),
                format!("{} with shape {:?} ({} values)", name, tensor.shape, tensor.data.len()),
            ));
        }
        Ok(tensor)
    }

    /// Read `name` as a matrix of exactly `shape`.
    pub fn matrix(&self, name: &str, shape: (usize, usize)) -> Result<Array2<f32>> {
        let tensor = self.get(name, &[shape.0, shape.1])?;
        Array2::from_shape_vec(shape, tensor.data.clone())
            .map_err(|e| QuestError::dimension_mismatch(format!("{:?}", shape), e.to_string()))
    }

    /// Read `name` as a vector of exactly `len` values.
    pub fn vector(&self, name: &str, len: usize) -> Result<Array1<f32>> {
        let tensor = self.get(name, &[len])?;
        Ok(Array1::from_vec(tensor.data.clone()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = bincode::serialize(self)?;
        fs::write(path, serialized)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Ok(bincode::deserialize(&data)?)
    }
}
