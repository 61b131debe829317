//! Whole-sheet overlay behavior, end to end against an in-memory versioner.

use serde_json::{Value, json};

use scheda_model::{
    COL_ALIAS_CAMPO, COL_ATTIVO, COL_CSS, COL_CSS_CLASS, COL_EVIDENZIA, COL_FIELD,
    COL_INCLUSIONE_FILE, COL_NOTE_REGIA, COL_PATTERN, COL_RIFERIMENTO, COL_SOSTITUZIONE,
    COL_TESTO, COL_TITOLO, Sheet, VersionRecord,
};
use scheda_overlay::{EngineConfig, OverlayEngine, Result, SheetVersioner};

struct StubVersioner {
    calls: usize,
}

impl StubVersioner {
    fn new() -> Self {
        Self { calls: 0 }
    }
}

impl SheetVersioner for StubVersioner {
    fn next_version(&mut self, _sheet: &Sheet) -> Result<VersionRecord> {
        self.calls += 1;
        Ok(VersionRecord::baseline("c".to_string(), "k".to_string()))
    }
}

fn character_headers() -> Vec<String> {
    [
        COL_FIELD,
        COL_TITOLO,
        COL_TESTO,
        COL_EVIDENZIA,
        COL_NOTE_REGIA,
        COL_CSS,
        COL_CSS_CLASS,
        COL_INCLUSIONE_FILE,
        COL_RIFERIMENTO,
    ]
    .iter()
    .map(|h| (*h).to_string())
    .collect()
}

fn row(cells: [&str; 9]) -> Vec<String> {
    cells.iter().map(|c| (*c).to_string()).collect()
}

fn character_sheet(name: &str, rows: Vec<Vec<String>>) -> Sheet {
    let mut sheet = Sheet::new(name, character_headers());
    sheet.rows = rows;
    sheet
}

#[test]
fn literal_row_overrides_template_default() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let mut versioner = StubVersioner::new();
    let template = json!({"stats": {"hp": 10}});
    let sheet = character_sheet(
        "Alice",
        vec![row(["stats.hp", "", "20", "", "", "", "", "", ""])],
    );
    let built = engine
        .build_document(&template, &sheet, &mut versioner)
        .expect("build document");
    assert_eq!(built.document, json!({"stats": {"hp": "20"}}));
    assert_eq!(built.rows_applied, 1);
    assert_eq!(versioner.calls, 1);
}

#[test]
fn delete_row_clears_an_inherited_default() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let mut versioner = StubVersioner::new();
    let template = json!({"stats": {"hp": 10}});
    let sheet = character_sheet(
        "Alice",
        vec![
            row(["stats.hp", "", "20", "", "", "", "", "", ""]),
            row(["!stats.hp", "", "", "", "", "", "", "", ""]),
        ],
    );
    let built = engine
        .build_document(&template, &sheet, &mut versioner)
        .expect("build document");
    assert_eq!(built.document, json!({"stats": {"hp": {}}}));
}

#[test]
fn unique_reference_registers_and_reincludes_in_the_same_list() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let mut versioner = StubVersioner::new();
    let template = json!({});
    let sheet = character_sheet(
        "Alice",
        vec![
            row(["attributes[]", "", "Strength", "", "", "", "", "", "STR01"]),
            row(["$STR01", "", "", "", "", "", "", "", ""]),
        ],
    );
    let built = engine
        .build_document(&template, &sheet, &mut versioner)
        .expect("build document");
    // First row collapsed to its body and registered STR01 at attributes[1];
    // re-inclusion appends into the same list.
    assert_eq!(built.document["attributes"], json!(["Strength", "Strength"]));
    assert!(engine.ctx.refs.contains("STR01"));
    assert_eq!(engine.ctx.aliases.resolve("STR01"), "attributes[1]");
}

#[test]
fn title_reference_includes_stored_content_verbatim() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let mut versioner = StubVersioner::new();
    let template = json!({});
    let sheet = character_sheet(
        "Alice",
        vec![
            row(["blocco", "Titolo", "Testo", "", "", "", "", "", "B01"]),
            row(["altro.posto", "$B01", "ignorato", "", "", "", "", "", ""]),
        ],
    );
    let built = engine
        .build_document(&template, &sheet, &mut versioner)
        .expect("build document");
    assert_eq!(built.document["blocco"], built.document["altro"]["posto"]);
    assert_eq!(
        built.document["blocco"],
        json!({"titolo": "Titolo", "testo": "Testo"})
    );
}

#[test]
fn unknown_reference_skips_the_row_and_continues() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let mut versioner = StubVersioner::new();
    let template = json!({});
    let sheet = character_sheet(
        "Alice",
        vec![
            row(["$MISSING", "", "", "", "", "", "", "", ""]),
            row(["stats.hp", "", "20", "", "", "", "", "", ""]),
        ],
    );
    let built = engine
        .build_document(&template, &sheet, &mut versioner)
        .expect("sheet survives the bad row");
    assert_eq!(built.rows_skipped, 1);
    assert_eq!(built.rows_applied, 1);
    assert_eq!(built.document["stats"]["hp"], json!("20"));
}

#[test]
fn selector_error_aborts_the_sheet() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let mut versioner = StubVersioner::new();
    let template = json!({"stats": {"hp": 10}});
    let sheet = character_sheet(
        "Alice",
        vec![row(["stats[3]", "", "x", "", "", "", "", "", ""])],
    );
    assert!(
        engine
            .build_document(&template, &sheet, &mut versioner)
            .is_err()
    );
}

#[test]
fn empty_rows_are_not_handled_and_not_counted() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let mut versioner = StubVersioner::new();
    let sheet = character_sheet(
        "Alice",
        vec![
            row(["", "", "testo orfano", "", "", "", "", "", ""]),
            row(["stats.hp", "", "20", "", "", "", "", "", ""]),
        ],
    );
    let built = engine
        .build_document(&json!({}), &sheet, &mut versioner)
        .expect("build document");
    assert_eq!(built.rows_applied, 1);
    assert_eq!(built.rows_skipped, 0);
}

#[test]
fn director_notes_accumulate_on_the_document_root() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let mut versioner = StubVersioner::new();
    let sheet = character_sheet(
        "Alice",
        vec![
            row(["a", "", "uno", "", "nota uno", "", "", "", ""]),
            row(["b", "", "due", "", "nota due", "", "", "", ""]),
        ],
    );
    let built = engine
        .build_document(&json!({}), &sheet, &mut versioner)
        .expect("build document");
    assert_eq!(
        built.document["note_regia"],
        json!(["nota uno", "nota due"])
    );
    assert_eq!(built.note_count(), 2);
}

#[test]
fn handout_sheets_start_from_an_empty_tree() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let mut versioner = StubVersioner::new();
    let template = json!({"stats": {"hp": 10}});
    let sheet = character_sheet(
        "PNG Oste",
        vec![row(["nome", "", "Oste", "", "", "", "", "", ""])],
    );
    let built = engine
        .build_document(&template, &sheet, &mut versioner)
        .expect("build handout");
    assert_eq!(built.document, json!({"nome": "Oste"}));
}

#[test]
fn config_sheets_never_become_documents() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let mut versioner = StubVersioner::new();
    let sheet = character_sheet(".riferimenti", vec![]);
    assert!(
        engine
            .build_document(&json!({}), &sheet, &mut versioner)
            .is_err()
    );
    assert_eq!(versioner.calls, 0);
}

#[test]
fn asset_files_resolve_under_the_assets_root() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let mut versioner = StubVersioner::new();
    let sheet = character_sheet(
        "Alice",
        vec![row(["ritratto", "", "", "", "", "", "", "alice.png", ""])],
    );
    let built = engine
        .build_document(&json!({}), &sheet, &mut versioner)
        .expect("build document");
    // Single non-empty slot: the content collapses to the asset path.
    assert_eq!(
        built.document["ritratto"],
        json!("assets/images/alice.png")
    );
}

#[test]
fn collapsed_empty_content_sets_an_explicit_null() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let mut versioner = StubVersioner::new();
    let template = json!({"campo": "default"});
    let sheet = character_sheet(
        "Alice",
        vec![row(["campo", "", "", "", "", "", "", "", ""])],
    );
    let built = engine
        .build_document(&template, &sheet, &mut versioner)
        .expect("build document");
    assert_eq!(built.document["campo"], Value::Null);
}

#[test]
fn template_builds_through_the_same_row_machinery() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let sheet = character_sheet(
        ".default",
        vec![
            row(["stats.hp", "", "10", "", "", "", "", "", ""]),
            row(["stats.mp", "", "5", "", "", "", "", "", ""]),
        ],
    );
    let template = engine.build_template(&sheet).expect("build template");
    assert_eq!(template, json!({"stats": {"hp": "10", "mp": "5"}}));
}

#[test]
fn alias_sheet_seeds_the_registry() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let headers = vec![COL_RIFERIMENTO.to_string(), COL_ALIAS_CAMPO.to_string()];
    let mut sheet = Sheet::new(".riferimenti", headers);
    sheet.rows = vec![
        vec!["PV".to_string(), "stats.hp".to_string()],
        vec![String::new(), "ignored".to_string()],
    ];
    engine.load_aliases(&sheet);
    assert_eq!(engine.ctx.aliases.resolve("PV"), "stats.hp");
    assert_eq!(engine.ctx.aliases.len(), 1);
}

#[test]
fn rule_sheet_loads_enabled_rules_in_order() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let headers = vec![
        COL_PATTERN.to_string(),
        COL_SOSTITUZIONE.to_string(),
        COL_CSS_CLASS.to_string(),
        COL_ATTIVO.to_string(),
    ];
    let mut sheet = Sheet::new(".sostituzioni", headers);
    sheet.rows = vec![
        vec![
            "FOR".to_string(),
            "Forza".to_string(),
            "stat".to_string(),
            String::new(),
        ],
        vec![
            "DES".to_string(),
            "Destrezza".to_string(),
            String::new(),
            "no".to_string(),
        ],
    ];
    engine.load_rules(&sheet).expect("load rules");
    assert_eq!(engine.ctx.rules.len(), 1);
    assert_eq!(engine.ctx.rules[0].css_class.as_deref(), Some("stat"));

    // The loaded rule now drives literal rows.
    let mut versioner = StubVersioner::new();
    let character = character_sheet(
        "Alice",
        vec![row(["abilita", "", "tira FOR", "", "", "", "", "", ""])],
    );
    let built = engine
        .build_document(&json!({}), &character, &mut versioner)
        .expect("build document");
    assert_eq!(
        built.document["abilita"],
        json!("tira <span class=\"stat\">Forza</span>")
    );
}

#[test]
fn references_carry_across_sheets() {
    let mut engine = OverlayEngine::new(EngineConfig::default());
    let mut versioner = StubVersioner::new();
    let first = character_sheet(
        "Alice",
        vec![row(["blocco", "Titolo", "Testo", "", "", "", "", "", "COMUNE"])],
    );
    let second = character_sheet(
        "Bruno",
        vec![row(["suo.blocco", "$COMUNE", "", "", "", "", "", "", ""])],
    );
    engine
        .build_document(&json!({}), &first, &mut versioner)
        .expect("first sheet");
    let built = engine
        .build_document(&json!({}), &second, &mut versioner)
        .expect("second sheet");
    assert_eq!(
        built.document["suo"]["blocco"],
        json!({"titolo": "Titolo", "testo": "Testo"})
    );
}
