//! Condition parsing and evaluation module
//!
//! This module handles parsing skip-logic conditions like
//! `q1 == 2 and ! (q2 or q3)` and evaluating them against the responses
//! recorded for earlier prompts.

mod ast;
mod builder;
pub mod cache;
mod evaluator;
pub mod number;
pub mod parser;
pub mod response;
mod terminal;

#[cfg(test)]
mod property_tests;

pub use ast::*;
pub use builder::*;
pub use cache::*;
pub use evaluator::*;
pub use number::*;
pub use parser::*;
pub use response::*;
