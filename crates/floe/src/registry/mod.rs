mod local;
mod shared;
#[cfg(test)]
mod tests;

pub use local::*;
pub use shared::*;
