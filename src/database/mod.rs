pub mod connection;

pub use connection::*;

#[cfg(test)]
pub mod test_support;
