pub mod announce;
pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod motivation;
pub mod reminder;
pub mod render;
pub mod speech;
pub mod storage;
pub mod task_api;

#[cfg(test)]
mod test_support;
