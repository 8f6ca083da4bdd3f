//! Whole-ROM extraction: tie discovery, version detection and the format
//! writers together.
use crate::binutil::{ParseError, read_u32_le_at, rom_pointer_offset};
use crate::error::RipError;
use crate::locate::{OffsetSearch, search_offsets};
use crate::s3m::{self, S3mOptions};
use crate::version::{DEFAULT_VERSION, EngineVersion, detect_version};
use crate::xm::{self, XmOptions};

/// Literal the engine embeds in every ROM that links it.
pub const KRAWALL_SIGNATURE: &[u8] = b"Krawall";

/// Whether the ROM contains the engine's name anywhere. A missing
/// signature is only grounds for a warning; some ROMs strip their strings.
pub fn has_signature(rom: &[u8]) -> bool {
    rom.windows(KRAWALL_SIGNATURE.len())
        .any(|w| w == KRAWALL_SIGNATURE)
}

/// Read `count` entries of a pointer list at `addr`, decoded to file
/// offsets.
pub fn read_pointer_list(rom: &[u8], addr: u32, count: u32) -> Result<Vec<u32>, ParseError> {
    let mut offsets = Vec::with_capacity(count as usize);
    for i in 0..count as usize {
        let ptr = read_u32_le_at(rom, addr as usize + i * 4)?;
        let off = rom_pointer_offset(ptr, rom.len()).ok_or(ParseError::BadPointer {
            value: ptr,
            context: "pointer list",
        })?;
        offsets.push(off as u32);
    }
    Ok(offsets)
}

/// Target module format for a rip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Xm,
    S3m,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xm => "xm",
            OutputFormat::S3m => "s3m",
        }
    }
}

/// Options for [`rip_rom`].
#[derive(Debug, Clone)]
pub struct RipOptions {
    pub format: OutputFormat,
    /// Minimum pointer-run length the scanner reports.
    pub threshold: u32,
    pub trim_instruments: bool,
    /// Apply the XM playback-compatibility fix-ups.
    pub fix_compatibility: bool,
    /// Engine version override; auto-detected when absent.
    pub version: Option<EngineVersion>,
    /// Module name stamped into the output headers.
    pub name: Option<String>,
}

impl Default for RipOptions {
    fn default() -> Self {
        RipOptions {
            format: OutputFormat::Xm,
            threshold: crate::locate::DEFAULT_THRESHOLD,
            trim_instruments: true,
            fix_compatibility: true,
            version: None,
            name: None,
        }
    }
}

/// One module's conversion outcome. A failed module does not abort the
/// rip; later modules are still attempted.
#[derive(Debug)]
pub struct ModuleRip {
    pub index: usize,
    /// File offset of the module header in the ROM.
    pub offset: u32,
    pub result: Result<Vec<u8>, RipError>,
}

/// Everything a rip produced.
#[derive(Debug)]
pub struct RipOutcome {
    /// Version used for decoding.
    pub version: EngineVersion,
    /// Whether the version came from an ident string in the ROM.
    pub detected: bool,
    pub offsets: OffsetSearch,
    pub sample_offsets: Vec<u32>,
    pub instrument_offsets: Vec<u32>,
    pub modules: Vec<ModuleRip>,
}

/// Discover and convert every module in the ROM.
///
/// Fails with [`RipError::OffsetsNotFound`] when discovery cannot produce
/// a sample list, an instrument list and at least one module; individual
/// module failures are reported per module in the outcome.
pub fn rip_rom(rom: &[u8], opts: &RipOptions) -> Result<RipOutcome, RipError> {
    let (version, detected) = match opts.version {
        Some(v) => (v, false),
        None => match detect_version(rom) {
            Some(v) => (v, true),
            None => (DEFAULT_VERSION, false),
        },
    };

    let offsets = search_offsets(rom, opts.threshold, version);
    if !offsets.complete() {
        return Err(RipError::OffsetsNotFound);
    }
    let sample_offsets = read_pointer_list(rom, offsets.sample_addr, offsets.sample_count)?;
    let instrument_offsets =
        read_pointer_list(rom, offsets.instrument_addr, offsets.instrument_count)?;

    let mut modules = Vec::with_capacity(offsets.modules.len());
    for (index, &offset) in offsets.modules.iter().enumerate() {
        let result = match opts.format {
            OutputFormat::Xm => xm::write_module(
                rom,
                offset,
                &sample_offsets,
                &instrument_offsets,
                version,
                &XmOptions {
                    trim_instruments: opts.trim_instruments,
                    fix_compatibility: opts.fix_compatibility,
                    name: opts.name.clone(),
                },
            ),
            OutputFormat::S3m => s3m::write_module(
                rom,
                offset,
                &sample_offsets,
                version,
                &S3mOptions {
                    trim_instruments: opts.trim_instruments,
                    name: opts.name.clone(),
                },
            ),
        };
        modules.push(ModuleRip {
            index,
            offset,
            result,
        });
    }

    Ok(RipOutcome {
        version,
        detected,
        offsets,
        sample_offsets,
        instrument_offsets,
        modules,
    })
}
