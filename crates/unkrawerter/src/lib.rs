#![doc = include_str!("../README.md")]
pub mod binutil;
pub mod effects;
pub mod error;
pub mod krawall;
pub mod locate;
pub mod rip;
pub mod s3m;
pub mod version;
pub mod wav;
pub mod xm;

pub use binutil::ParseError;
pub use error::RipError;
pub use locate::OffsetSearch;
pub use rip::{ModuleRip, OutputFormat, RipOptions, RipOutcome, rip_rom};
pub use version::{DEFAULT_VERSION, EngineVersion, detect_version};
