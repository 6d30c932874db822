pub mod client;
pub mod config;
pub mod contact;
pub mod controller;
pub mod notification;
pub mod server;
