pub mod admin;
pub mod aggregation;
pub mod authoring;
pub mod journal;
pub mod sql_console;
pub mod uploads;
