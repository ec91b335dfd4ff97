//! CLI output formats
//!
//! Every format renders a fully tokenized [Document] through its [ModeController].

use rmode::mode::{
    Document, EditSession, FoldWidget, FoldingRules, ModeController, Position, Token,
};
use rmode_config::RmodeConfig;
use serde::Serialize;

/// All available output formats
pub const AVAILABLE_FORMATS: &[&str] = &[
    "token-json",
    "token-simple",
    "states",
    "chunks",
    "folds",
    "indent",
];

#[derive(Serialize)]
struct LineJson<'a> {
    row: usize,
    language: String,
    state: &'a str,
    tokens: &'a [Token],
}

/// Tokenize `source` and render it in the named format
pub fn render(
    controller: &ModeController,
    source: &str,
    format: &str,
    row: Option<usize>,
    config: &RmodeConfig,
) -> Result<String, String> {
    let mut doc = Document::from_text(source);
    let lines = doc.tokenize_all(controller.tokenizer());

    match format {
        "token-json" => {
            let json: Vec<_> = lines
                .iter()
                .enumerate()
                .map(|(row, line)| LineJson {
                    row,
                    language: controller.language_of_state(&line.state).to_string(),
                    state: &line.state,
                    tokens: &line.tokens,
                })
                .collect();
            serde_json::to_string_pretty(&json)
                .map(|s| s + "\n")
                .map_err(|e| format!("JSON serialization failed: {}", e))
        }
        "token-simple" => Ok(lines
            .iter()
            .map(|line| {
                let tokens: Vec<_> = line
                    .tokens
                    .iter()
                    .map(|t| format!("{}({:?})", t.kind, t.value))
                    .collect();
                format!("{}\n", tokens.join(" "))
            })
            .collect()),
        "states" => Ok((0..doc.line_count())
            .map(|row| {
                let state = doc.state(row).unwrap_or("");
                let language = controller.language_mode(&doc, Position::new(row, 0));
                format!("{} {} {}\n", row, state, language)
            })
            .collect()),
        "chunks" => Ok(render_chunks(controller, &doc, config)),
        "folds" => Ok(render_folds(controller.folding_rules(), &doc)),
        "indent" => render_indent(controller, &doc, row, &config.editor.tab_string()),
        _ => Err(format!(
            "Unknown format '{}'. Available formats: {}",
            format,
            AVAILABLE_FORMATS.join(", ")
        )),
    }
}

fn render_chunks(controller: &ModeController, doc: &Document, config: &RmodeConfig) -> String {
    let highlighter = controller.background_highlighter(config.highlight.mark_delimiters);
    let mut out = String::new();
    for span in highlighter.chunk_spans(doc) {
        let suffix = if span.terminated { "" } else { " (unterminated)" };
        out.push_str(&format!("{}..{}{}\n", span.start_row, span.end_row, suffix));
    }
    if config.highlight.chunk_background {
        let rows: Vec<_> = highlighter
            .highlight(doc)
            .iter()
            .enumerate()
            .filter(|(_, marked)| **marked)
            .map(|(row, _)| row.to_string())
            .collect();
        out.push_str(&format!("highlighted: {}\n", rows.join(" ")));
    }
    out
}

fn render_folds(rules: &dyn FoldingRules, doc: &Document) -> String {
    let mut out = String::new();
    for row in 0..doc.line_count() {
        match rules.fold_widget(doc, row) {
            FoldWidget::None => {}
            FoldWidget::End => out.push_str(&format!("{} end\n", row)),
            FoldWidget::Start => match rules.fold_range(doc, row) {
                Some(range) => out.push_str(&format!(
                    "{} start {}:{}-{}:{}\n",
                    row, range.start.row, range.start.column, range.end.row, range.end.column
                )),
                None => out.push_str(&format!("{} start\n", row)),
            },
        }
    }
    out
}

fn render_indent(
    controller: &ModeController,
    doc: &Document,
    row: Option<usize>,
    tab: &str,
) -> Result<String, String> {
    let indent_for = |row: usize| -> Result<String, String> {
        let line = doc.line(row).ok_or_else(|| {
            format!(
                "Row {} is out of range (document has {} rows)",
                row,
                doc.line_count()
            )
        })?;
        let state = doc.state(row).unwrap_or(controller.tokenizer().initial_state());
        Ok(controller.next_line_indent(state, line, tab, row))
    };

    match row {
        Some(row) => Ok(format!("{:?}\n", indent_for(row)?)),
        None => (0..doc.line_count())
            .map(|row| indent_for(row).map(|indent| format!("{} {:?}\n", row, indent)))
            .collect(),
    }
}
