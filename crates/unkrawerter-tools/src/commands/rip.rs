//! The `rip` subcommand: extract every module as XM or S3M.
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use unkrawerter::{EngineVersion, OutputFormat, RipError, RipOptions, rip_rom};

pub struct Args {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub threshold: u32,
    pub trim_instruments: bool,
    pub fix_compatibility: bool,
    pub engine_version: Option<String>,
    pub name: Option<String>,
}

pub fn run(args: Args) -> Result<()> {
    let rom = std::fs::read(&args.file)
        .map_err(RipError::Io)
        .with_context(|| format!("reading {}", args.file.display()))?;

    if !unkrawerter::rip::has_signature(&rom) {
        eprintln!(
            "warning: no Krawall signature found; this ROM may not use the Krawall engine"
        );
    }

    let version = match &args.engine_version {
        Some(text) => match EngineVersion::parse(text) {
            Some(v) => Some(v),
            None => bail!("unrecognized engine version {:?}", text),
        },
        None => None,
    };

    let opts = RipOptions {
        format: args.format,
        threshold: args.threshold,
        trim_instruments: args.trim_instruments,
        fix_compatibility: args.fix_compatibility,
        version,
        name: args.name.clone(),
    };
    let outcome = rip_rom(&rom, &opts)?;
    println!(
        "Engine version {} ({})",
        outcome.version,
        if outcome.detected { "detected" } else { "assumed" }
    );

    let out_dir = args.output.unwrap_or_else(|| PathBuf::from("."));
    let mut written = 0usize;
    let mut first_failure: Option<RipError> = None;
    for module in outcome.modules {
        let path = out_dir.join(format!("Module{}.{}", module.index, opts.format.extension()));
        match module.result {
            Ok(bytes) => {
                std::fs::write(&path, bytes)
                    .map_err(RipError::Io)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Successfully wrote module to {}.", path.display());
                written += 1;
            }
            Err(err) => {
                eprintln!(
                    "error: module {} (offset {:08X}): {}",
                    module.index, module.offset, err
                );
                if first_failure.is_none() {
                    first_failure = Some(err);
                }
            }
        }
    }

    // Keep going past individual failures, but surface one if nothing at
    // all could be written.
    if written == 0
        && let Some(err) = first_failure
    {
        return Err(err.into());
    }
    Ok(())
}
