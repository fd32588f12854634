pub mod evaluations;
pub mod students;
