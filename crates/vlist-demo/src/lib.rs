#![forbid(unsafe_code)]

//! Text-mode demo of the `vlist` engine.

pub mod cli;
pub mod home;
