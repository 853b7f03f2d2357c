pub mod core;
pub mod courses;
pub mod dataset;
pub mod demo;
pub mod grades;
pub mod random;
pub mod students;
