pub mod test_checkpoint;
pub mod test_optimizer;
pub mod test_trainer;
