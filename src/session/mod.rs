pub mod catalog;
pub mod exercise;
pub mod input;
pub mod result;
pub mod typing;
