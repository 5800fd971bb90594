pub mod mutations;
pub mod source;
