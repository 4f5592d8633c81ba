mod display;
pub mod value;

pub use value::Value;

pub(crate) use display::escape_string;

#[cfg(test)]
mod value_test;
