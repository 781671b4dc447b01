pub mod blocks;
pub mod chain;
pub mod constraints;
pub mod errors;
pub mod resolver;
