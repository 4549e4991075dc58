#![forbid(unsafe_code)]

pub mod admin;
pub mod browse;
pub mod catalog;
pub mod cli;
pub mod defaults;
pub mod editor;
pub mod flow;
pub mod gate;
pub mod gist;
pub mod logging;
pub mod model;
pub mod persist;
pub mod store;
pub mod viewer;
