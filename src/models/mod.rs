// src/models/mod.rs

pub mod certification;
pub mod exam_attempt;
pub mod question;
pub mod user;
