//! Maths tutor analysis tools and the scoring model behind them
//!
//! Every tool is a pure function of its arguments; nothing is kept between calls.

pub mod benchmark;
pub mod curriculum;
pub mod evaluation;
pub mod student;
pub mod text;
pub mod tools;
pub mod vocabulary;
