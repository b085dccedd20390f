#![allow(clippy::too_many_arguments, clippy::new_without_default)]

pub mod shared;
pub mod system;
pub mod usecases;
