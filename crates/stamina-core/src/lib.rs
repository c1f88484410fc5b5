#![deny(warnings)]
pub mod pool;
pub mod turns;
