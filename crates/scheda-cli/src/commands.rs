//! Subcommand entry points: resolve configuration, run the pipeline.

use anyhow::Result;

use scheda_cli::config::RunConfig;
use scheda_cli::pipeline::{BuildOptions, SheetInfo, list_sheets, run_build};
use scheda_cli::types::RunResult;

use crate::cli::{BuildArgs, SheetsArgs};

pub fn build(args: &BuildArgs) -> Result<RunResult> {
    let mut config = RunConfig::load(args.config.as_deref())?;
    if let Some(workbook) = &args.workbook {
        config.workbook_dir = workbook.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(cache) = &args.cache {
        config.cache_path = cache.clone();
    }
    if let Some(assets_root) = &args.assets_root {
        config.assets_root = assets_root.clone();
    }
    run_build(&BuildOptions {
        config,
        dry_run: args.dry_run,
    })
}

pub fn sheets(args: &SheetsArgs) -> Result<Vec<SheetInfo>> {
    let mut config = RunConfig::load(args.config.as_deref())?;
    if let Some(workbook) = &args.workbook {
        config.workbook_dir = workbook.clone();
    }
    list_sheets(&config.workbook_dir, &config)
}
