pub mod build_info;
pub mod calendar;
pub mod commands;
pub mod error;
pub mod model;
pub mod output;
pub mod store;
pub mod task_id;
