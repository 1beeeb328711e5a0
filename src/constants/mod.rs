pub mod prompts;
pub mod question_bank;
pub mod study_resources;
pub mod syllabus;
