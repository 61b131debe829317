//! Per-row merge rules: delete, include-by-reference, literal content.

use serde_json::Value;

use scheda_model::{CellValue, Document, FieldContent, SheetRow};

use crate::context::RunContext;
use crate::error::Result;
use crate::path::PathSelector;
use crate::text::render_cell;

/// Document key accumulating director notes across a whole sheet.
pub const NOTES_KEY: &str = "note_regia";

/// What a row did to the document, for logging and summary counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Blank field cell; the row drives nothing.
    NotHandled,
    Deleted { canonical: String },
    Applied { canonical: String },
}

/// Resolve a single row against the merge rules, first match wins:
/// empty, delete (`!`), title-is-reference, field-is-reference (`$`),
/// literal content.
pub fn resolve_row(
    document: &mut Document,
    ctx: &mut RunContext,
    row: &SheetRow<'_>,
) -> Result<RowOutcome> {
    let field = row.field().trim();
    if field.is_empty() {
        return Ok(RowOutcome::NotHandled);
    }

    if let Some(target) = field.strip_prefix('!') {
        let applied = PathSelector::new(&ctx.aliases).delete(document, target)?;
        return Ok(RowOutcome::Deleted {
            canonical: applied.canonical,
        });
    }

    // A `$` title means: use the referenced content verbatim for the whole
    // field named by this row.
    if let CellValue::Reference(ref_id) = CellValue::parse(row.titolo()) {
        let value = ctx.refs.get(&ref_id)?.clone();
        let applied = PathSelector::new(&ctx.aliases).set(document, field, value)?;
        return Ok(RowOutcome::Applied {
            canonical: applied.canonical,
        });
    }

    // A `$` field re-includes stored content positioned by the canonical
    // path recorded when the reference was first registered: a recorded
    // list index turns back into an append marker, so repeated inclusion
    // lands in the same repeated list, not a fresh location.
    if let Some(ref_id) = field.strip_prefix('$') {
        let ref_id = ref_id.trim();
        let value = ctx.refs.get(ref_id)?.clone();
        let target = reinclude_selector(ctx.aliases.resolve(ref_id));
        let applied = PathSelector::new(&ctx.aliases).set(document, &target, value)?;
        return Ok(RowOutcome::Applied {
            canonical: applied.canonical,
        });
    }

    let content = build_content(ctx, row);
    if !content.note_regia.is_empty() {
        append_director_note(document, &content.note_regia);
    }
    let value = content.to_value();
    // A content that collapsed to nothing still writes an explicit null,
    // which is not the same as a delete.
    let applied = PathSelector::new(&ctx.aliases).set(document, field, value.clone())?;
    if let Some(ref_id) = &content.riferimento {
        ctx.refs.put(ref_id.clone(), value);
        ctx.aliases.register(ref_id.clone(), applied.canonical.clone());
    }
    Ok(RowOutcome::Applied {
        canonical: applied.canonical,
    })
}

/// Turn a recorded canonical path back into a re-inclusion target: a
/// numeric index on the terminal segment becomes an append marker, plain
/// mapping paths re-set the original slot. Only the single-level-list
/// shape is contractual; deeper nested list re-inclusion keeps whatever
/// the recorded path says.
fn reinclude_selector(recorded: &str) -> String {
    match recorded.rsplit_once('[') {
        Some((head, rest)) if rest.ends_with(']') => format!("{head}[]"),
        _ => recorded.to_string(),
    }
}

fn build_content(ctx: &RunContext, row: &SheetRow<'_>) -> FieldContent {
    let render = |raw: &str| {
        if raw.trim().is_empty() {
            String::new()
        } else {
            render_cell(raw, &ctx.rules)
        }
    };
    let file = row.inclusione_file().trim();
    let ref_id = row.riferimento().trim();
    FieldContent {
        titolo: render(row.titolo()),
        testo: render(row.testo()),
        evidenzia: render(row.evidenzia()),
        note_regia: render(row.note_regia()),
        css: row.css().trim().to_string(),
        css_class: row.css_class().trim().to_string(),
        file: (!file.is_empty())
            .then(|| format!("{}/{}", ctx.assets_root.trim_end_matches('/'), file)),
        campo: row.field().trim().to_string(),
        riferimento: (!ref_id.is_empty()).then(|| ref_id.to_string()),
    }
}

fn append_director_note(document: &mut Document, note: &str) {
    let Value::Object(root) = document else {
        return;
    };
    let slot = root
        .entry(NOTES_KEY.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    if let Value::Array(notes) = slot {
        notes.push(Value::String(note.to_string()));
    }
}
