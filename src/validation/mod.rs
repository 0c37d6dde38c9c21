//! Consistency checks over computed project models

pub mod rules;
pub mod validator;

pub use validator::Validator;
