//! Configuration components
//!
//! Each component covers one concern of the link attribute engine.

pub mod fields;
pub mod panels;
pub mod rules;

pub use fields::*;
pub use panels::*;
pub use rules::*;
