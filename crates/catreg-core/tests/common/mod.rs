#![allow(dead_code)]

pub mod catalog_server;
pub mod xlsx;
