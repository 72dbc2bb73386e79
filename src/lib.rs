//! Terminal front-end for everyday Docker chores: start a "VM" container, write a
//! Dockerfile, build, list, stop, search and pull, all from one screen.

pub mod app;
pub mod cli;
pub mod config;
pub mod docker;
pub mod ops;
pub mod ui;
