#![no_std]

mod error;

pub mod config;
pub mod device;
pub mod interface;
pub mod lines;
pub mod noop;
pub mod params;
pub mod registers;

pub use crate::device::{Ldc1000, ProximitySensor};
pub use crate::error::{Error, Result};
