// Utils compartidos

pub mod constants;
pub mod cookies;
pub mod text;

pub use constants::*;
