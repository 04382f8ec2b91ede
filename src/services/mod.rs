// src/services/mod.rs

pub mod exams;
pub mod identity;

pub use exams::ExamService;
pub use identity::IdentityService;
