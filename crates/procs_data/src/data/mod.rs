pub mod genome;
pub mod instruction;
