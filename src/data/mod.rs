mod loader;

pub use loader::{load_quiz_data, validate_quiz_data, LoadError};
