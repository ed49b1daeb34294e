pub mod conflict;
pub mod models;
pub mod time;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
