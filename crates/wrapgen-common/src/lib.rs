mod constants;
mod error;

pub use constants::*;
pub use error::{Result, WrapError};
