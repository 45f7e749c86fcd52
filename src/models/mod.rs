pub mod exercise;
pub mod exercise_record;
pub mod release;
pub mod session;
pub mod table_record;

pub use exercise::{ExerciseDefinition, InputKind, TimeUnit};
pub use exercise_record::ExerciseRecord;
pub use release::Release;
pub use session::Session;
pub use table_record::TableRecord;
