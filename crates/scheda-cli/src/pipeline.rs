//! Build pipeline with explicit stages.
//!
//! 1. **Ingest**: load every CSV sheet of the workbook
//! 2. **Configure**: seed aliases, substitution rules and the default template
//! 3. **Overlay**: fold each character sheet into a document, stamping versions
//! 4. **Render**: archive documents and the run manifest
//!
//! Sheets are processed strictly sequentially: references and aliases are
//! shared mutable state, and a later sheet may include content registered
//! by an earlier one.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::{info, info_span, warn};

use scheda_ingest::{Workbook, load_workbook};
use scheda_model::{Document, Sheet, SheetKind};
use scheda_overlay::{EngineConfig, OverlayEngine};
use scheda_render::{ManifestEntry, prepare_output_dir, sanitize_file_name, write_document, write_manifest};
use scheda_version::ContentVersioner;

use crate::config::RunConfig;
use crate::types::{RunResult, SheetSummary};

/// Fully resolved inputs for one build run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub config: RunConfig,
    pub dry_run: bool,
}

pub fn run_build(options: &BuildOptions) -> Result<RunResult> {
    let config = &options.config;
    let span = info_span!("build", workbook = %config.workbook_dir.display());
    let _guard = span.enter();

    // Stage 1: ingest
    let workbook = {
        let _stage = info_span!("ingest").entered();
        load_workbook(&config.workbook_dir).context("load workbook")?
    };
    info!(sheets = workbook.sheets.len(), "workbook loaded");

    // Stage 2: configure
    let mut engine = OverlayEngine::new(EngineConfig {
        hidden_prefix: config.hidden_prefix.clone(),
        handout_prefix: config.handout_prefix.clone(),
    });
    engine.ctx.assets_root = config.assets_root.clone();
    let template = {
        let _stage = info_span!("configure").entered();
        configure_engine(&mut engine, &workbook, config)?
    };

    let characters: Vec<&Sheet> = workbook
        .sheets
        .iter()
        .filter(|sheet| engine.sheet_kind(sheet) != SheetKind::Config)
        .collect();
    if characters.is_empty() {
        warn!("workbook holds no character sheets; nothing to generate");
        return Ok(RunResult {
            output_dir: config.output_dir.clone(),
            dry_run: options.dry_run,
            ..RunResult::default()
        });
    }

    // Stage 3 + 4: overlay and render, sheet by sheet
    let mut versioner = ContentVersioner::open(&config.cache_path)
        .context("open version cache")?
        .with_write_through(!options.dry_run);
    if !options.dry_run {
        prepare_output_dir(&config.output_dir)?;
    }

    let mut summaries = Vec::new();
    let mut entries = Vec::new();
    for sheet in characters {
        let _stage = info_span!("overlay", sheet = %sheet.name).entered();
        let built = engine
            .build_document(&template, sheet, &mut versioner)
            .with_context(|| format!("build document for sheet '{}'", sheet.name))?;
        info!(
            sheet = %built.name,
            version = %built.version.version,
            applied = built.rows_applied,
            skipped = built.rows_skipped,
            "document built"
        );
        if !options.dry_run {
            write_document(&config.output_dir, &built.name, &built.document)?;
        }
        entries.push(ManifestEntry {
            title: built.name.clone(),
            version: built.version.version,
            file: format!("{}.json", sanitize_file_name(&built.name)),
        });
        summaries.push(SheetSummary {
            name: built.name.clone(),
            version: built.version.version.to_string(),
            handout: engine.sheet_kind(sheet) == SheetKind::Handout,
            rows_applied: built.rows_applied,
            rows_skipped: built.rows_skipped,
            notes: built.note_count(),
        });
    }

    let manifest = if options.dry_run {
        None
    } else {
        let _stage = info_span!("render").entered();
        Some(write_manifest(&config.output_dir, &entries)?)
    };

    Ok(RunResult {
        output_dir: config.output_dir.clone(),
        manifest,
        sheets: summaries,
        dry_run: options.dry_run,
    })
}

/// Load the two one-shot configuration sheets and build the default
/// template, all before any character sheet is touched.
fn configure_engine(
    engine: &mut OverlayEngine,
    workbook: &Workbook,
    config: &RunConfig,
) -> Result<Document> {
    match workbook.sheet(&config.aliases_sheet) {
        Some(sheet) => engine.load_aliases(sheet),
        None => warn!(sheet = %config.aliases_sheet, "no reference-alias sheet"),
    }
    match workbook.sheet(&config.rules_sheet) {
        Some(sheet) => engine
            .load_rules(sheet)
            .context("load substitution rules")?,
        None => warn!(sheet = %config.rules_sheet, "no substitution sheet"),
    }
    match workbook.sheet(&config.template_sheet) {
        Some(sheet) => engine
            .build_template(sheet)
            .context("build default template"),
        None => {
            warn!(sheet = %config.template_sheet, "no template sheet, using an empty default");
            Ok(Value::Object(Map::new()))
        }
    }
}

/// Listing used by the `sheets` subcommand.
#[derive(Debug, Clone)]
pub struct SheetInfo {
    pub name: String,
    pub kind: SheetKind,
    pub rows: usize,
}

pub fn list_sheets(workbook_dir: &Path, config: &RunConfig) -> Result<Vec<SheetInfo>> {
    let workbook = load_workbook(workbook_dir).context("load workbook")?;
    Ok(workbook
        .sheets
        .iter()
        .map(|sheet| SheetInfo {
            name: sheet.name.clone(),
            kind: sheet.kind(&config.hidden_prefix, &config.handout_prefix),
            rows: sheet.row_count(),
        })
        .collect())
}
