pub mod add;
pub mod cal;
pub mod clear;
pub mod delete;
pub mod edit;
pub mod init;
pub mod lifecycle;
pub mod list;
pub mod seed;
pub mod show;
pub mod tui;
