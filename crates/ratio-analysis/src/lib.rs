pub mod ratios;

#[cfg(test)]
mod ratios_tests;

pub use ratios::*;
