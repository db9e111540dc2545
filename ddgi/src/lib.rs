//! CPU-side state of DDGI probe volumes: configuration, per-frame
//! orientation and scrolling, probe addressing, GPU records, texture sizes
//! and dispatch scheduling.

mod config;
mod desc;
mod error;
mod formats;
mod orientation;
mod schedule;
mod scrolling;
mod textures;
mod utils;
mod volume;
mod volumes;

pub use ddgi_gpu as gpu;

pub use self::config::*;
pub use self::desc::*;
pub use self::error::*;
pub use self::formats::*;
pub use self::orientation::*;
pub use self::schedule::*;
pub use self::scrolling::*;
pub use self::textures::*;
pub use self::utils::*;
pub use self::volume::*;
pub use self::volumes::*;
