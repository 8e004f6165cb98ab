pub mod answer_set;
pub mod assessment;

pub use answer_set::AnswerSet;
pub use assessment::AssessmentRecord;
