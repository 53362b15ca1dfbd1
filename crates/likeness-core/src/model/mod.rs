pub mod character;
pub mod match_result;
pub mod matrix;

pub use character::{Catalog, CharacterRecord};
pub use match_result::MatchResult;
pub use matrix::VectorMatrix;
