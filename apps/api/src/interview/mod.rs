//! The interview dialogue engine: session state, the turn controller, reply
//! parsing and the interviewer prompt.

pub mod controller;
pub mod handlers;
pub mod parse;
pub mod prompts;
pub mod session;
