//! Structure discovery: find Krawall's pointer tables in a ROM image
//! without any symbol information.
//!
//! Discovery runs in two stages. [`scan`] walks the image in 4-byte steps
//! and collects runs of plausible cartridge-ROM pointers; [`classify`]
//! dereferences each run's first entries and structurally validates the
//! pointees, reducing every candidate to at most one of the three table
//! kinds (module pattern table, sample list, instrument list).
pub mod classify;
pub mod scan;

pub use classify::{
    ClassifiedRun, OffsetSearch, TYPE_INSTRUMENT, TYPE_MODULE, TYPE_SAMPLE, classify_run,
    classify_runs, search_offsets, select_offsets, type_name,
};
pub use scan::{DEFAULT_THRESHOLD, PointerRun, accepts_pointer, scan_pointer_runs};
