pub mod fixtures;
pub mod test_logging;

pub use fixtures::{sample_person, scheduled, unscheduled};
pub use test_logging::init_test_logging;
