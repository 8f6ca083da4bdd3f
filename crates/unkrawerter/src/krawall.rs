//! In-memory representations of the Krawall sound engine's binary records
//! and their readers.
//!
//! Krawall stores four record kinds in cartridge ROM: [`Sample`] (a PCM
//! header followed by its data), [`Instrument`] (a 96-entry note-to-sample
//! map with two envelopes), [`Pattern`] (a packed note stream), and
//! [`Module`] (a song header followed by a pattern pointer table). All
//! readers take the whole ROM image as a byte slice plus a file offset and
//! return owned values; nothing is written back.
//!
//! Pattern decoding is the one place where engine revisions differ, so the
//! pattern and module readers take an [`EngineVersion`](crate::EngineVersion).
pub mod instrument;
pub mod module;
pub mod pattern;
pub mod sample;

pub use instrument::{ENVELOPE_NODES, Envelope, EnvelopeNode, Instrument, read_instrument};
pub use module::{MODULE_HEADER_LEN, Module, read_module};
pub use pattern::{Cell, EffectEvent, NoteEvent, Pattern, read_pattern};
pub use sample::{SAMPLE_HEADER_LEN, Sample, read_sample};
