//! Data model for spine-structured musical text
//!
//! Lines own tokens; tokens refer to each other through [`TokenId`] handles.
//! All timing uses exact [`Rational`] values.

pub mod rational;
pub mod params;
pub mod address;
pub mod token;
pub mod line;
pub mod options;

// Re-export commonly used types
pub use rational::Rational;
pub use params::{AttributeStore, ParamKey, ParamValue};
pub use address::Address;
pub use token::{Token, TokenId};
pub use line::Line;
pub use options::ParseOptions;
