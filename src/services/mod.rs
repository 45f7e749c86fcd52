pub mod fitness;
pub mod releases;

pub use fitness::{FitnessService, DEFAULT_FITNESS_TABLE};
pub use releases::{DataSource, ReleaseList, ReleaseService, DEFAULT_RELEASES_TABLE};
