//! End-to-end behaviour of the bundled modes

use rmode::mode::{
    Document, EditSession, FoldingRules, Language, LineTokens, ModeController, Position,
};
use rmode::modes::ModeKind;

fn tokenized(controller: &ModeController, text: &str) -> Document {
    let mut doc = Document::from_text(text);
    doc.tokenize_all(controller.tokenizer());
    doc
}

fn render_states(controller: &ModeController, doc: &Document) -> String {
    (0..doc.line_count())
        .map(|row| {
            format!(
                "{} {} {}",
                row,
                doc.state(row).unwrap_or("-"),
                controller.language_mode(doc, Position::new(row, 0))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_tokens(line: &LineTokens) -> String {
    line.tokens
        .iter()
        .map(|t| format!("{} {:?}", t.kind, t.value))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn rhtml_chunk_entry_and_exit() {
    let controller = ModeKind::RHtml.build().unwrap();
    let doc = tokenized(
        &controller,
        "<p>Hi</p>\n<!--begin.rcode echo=TRUE-->\nx <- 1\nend.rcode-->",
    );
    insta::assert_snapshot!(render_states(&controller, &doc), @r"
    0 start HTML
    1 r-start R
    2 r-start R
    3 start HTML
    ");
}

#[test]
fn start_line_tokens_come_from_the_embedding_rule() {
    let controller = ModeKind::RHtml.build().unwrap();
    let out = controller.tokenize("<!--begin.rcode echo=TRUE-->", "start");
    assert_eq!(out.state, "r-start");
    assert_eq!(out.tokens.len(), 1);
    assert_eq!(out.tokens[0].kind, "support.function.codebegin");

    let next = controller.tokenize("x <- 1", &out.state);
    insta::assert_snapshot!(render_tokens(&next), @r#"
    identifier "x"
    text " "
    keyword.operator "<-"
    text " "
    constant.numeric "1"
    "#);
}

#[test]
fn end_line_returns_to_host() {
    let controller = ModeKind::RHtml.build().unwrap();
    let out = controller.tokenize("end.rcode-->", "r-start");
    assert_eq!(out.state, "start");
    assert_eq!(out.tokens[0].kind, "support.function.codeend");
    assert_eq!(controller.language_of_state(&out.state), Language::Html);
}

#[test]
fn guest_indent_is_the_code_model_indent() {
    let controller = ModeKind::RHtml.build().unwrap();
    assert_eq!(
        controller.next_line_indent("r-start", "  f <- function(x) {", "\t", 7),
        "  \t"
    );
    assert_eq!(
        controller.next_line_indent("start", "  <div>", "\t", 7),
        "  "
    );
}

#[test]
fn rmarkdown_mixed_document() {
    let controller = ModeKind::RMarkdown.build().unwrap();
    let doc = tokenized(
        &controller,
        "# Setup\n1. load\n```{r}\nlibrary(x)\n```\n\n```{Rcpp}\n/* a\nb */\n```\ndone",
    );
    insta::assert_snapshot!(render_states(&controller, &doc), @r"
    0 start Markdown
    1 listblock Markdown
    2 r-start@listblock R
    3 r-start@listblock R
    4 listblock Markdown
    5 start Markdown
    6 r-cpp-start C_CPP
    7 r-cpp-comment C_CPP
    8 r-cpp-start C_CPP
    9 start Markdown
    10 start Markdown
    ");
}

#[test]
fn language_at_cursor_follows_the_cursor() {
    let controller = ModeKind::RMarkdown.build().unwrap();
    let mut doc = tokenized(&controller, "text\n```{r}\nx\n```");
    doc.set_cursor(Position::new(2, 0));
    assert_eq!(controller.language_at_cursor(&doc), Language::R);
    doc.set_cursor(Position::new(0, 2));
    assert_eq!(controller.language_at_cursor(&doc), Language::Markdown);
}

#[test]
fn editing_a_chunk_header_reclassifies_downstream_rows() {
    let controller = ModeKind::RMarkdown.build().unwrap();
    let mut doc = tokenized(&controller, "intro\n```{r}\nx <- 1\n```\noutro");
    assert_eq!(controller.language_mode(&doc, Position::new(2, 0)), Language::R);

    doc.replace_line(1, "```{Rcpp}");
    let processed = doc.retokenize_from(controller.tokenizer(), 1);
    assert_eq!(processed, 3);
    assert_eq!(controller.language_mode(&doc, Position::new(2, 0)), Language::Cpp);
    assert_eq!(
        controller.language_mode(&doc, Position::new(4, 0)),
        Language::Markdown
    );
}

#[test]
fn folding_crosses_the_language_boundary() {
    let controller = ModeKind::RMarkdown.build().unwrap();
    let doc = tokenized(&controller, "## Part\n```{r}\ng <- function() {\n  2\n}\n```");
    let rules: &dyn FoldingRules = controller.folding_rules();
    let folds: Vec<_> = (0..doc.line_count())
        .filter_map(|row| rules.fold_range(&doc, row))
        .map(|r| (r.start.row, r.end.row))
        .collect();
    assert_eq!(folds, vec![(0, 5), (1, 4), (2, 4)]);
}

#[test]
fn highlighter_matches_tokenizer_chunks() {
    let controller = ModeKind::RMarkdown.build().unwrap();
    let doc = tokenized(&controller, "a\n```{r}\nx\n```\nb");
    let marks = controller.background_highlighter(false).highlight(&doc);
    let guest_rows: Vec<bool> = (0..doc.line_count())
        .map(|row| {
            let entry = doc.entry_state(row, controller.tokenizer());
            let exit = doc.state(row).unwrap_or("start");
            controller.language_of_state(&entry) == Language::R
                && controller.language_of_state(exit) == Language::R
        })
        .collect();
    assert_eq!(marks, guest_rows);
}

#[test]
fn chunk_header_inside_plain_fence_is_fence_text() {
    let controller = ModeKind::RMarkdown.build().unwrap();
    let doc = tokenized(&controller, "```python\n```{r}\nx\n```\n# Header\ntext");
    insta::assert_snapshot!(render_states(&controller, &doc), @r"
    0 codeblock Markdown
    1 codeblock Markdown
    2 codeblock Markdown
    3 start Markdown
    4 start Markdown
    5 start Markdown
    ");
}

#[test]
fn chunk_header_inside_html_comment_is_comment_text() {
    let controller = ModeKind::RHtml.build().unwrap();
    let doc = tokenized(
        &controller,
        "<!-- disabled:\n<!--begin.rcode\nx\nend.rcode-->\n-->",
    );
    insta::assert_snapshot!(render_states(&controller, &doc), @r"
    0 comment HTML
    1 comment HTML
    2 comment HTML
    3 start HTML
    4 start HTML
    ");
}

#[test]
fn removing_a_chunk_header_agrees_with_full_tokenization() {
    let controller = ModeKind::RMarkdown.build().unwrap();
    let mut doc = tokenized(&controller, "intro\n```{r}\nx\n```\noutro");
    assert_eq!(doc.remove_line(1).as_deref(), Some("```{r}"));

    doc.retokenize_from(controller.tokenizer(), 1);
    let fresh = tokenized(&controller, "intro\nx\n```\noutro");
    assert_eq!(doc.states().collect::<Vec<_>>(), fresh.states().collect::<Vec<_>>());
    assert_eq!(
        controller.language_mode(&doc, Position::new(1, 0)),
        Language::Markdown
    );
}

#[test]
fn highlighter_marks_rcpp_chunks() {
    let controller = ModeKind::RMarkdown.build().unwrap();
    let doc = tokenized(&controller, "a\n```{Rcpp}\nint x;\n```\nb");
    assert_eq!(doc.state(2), Some("r-cpp-start"));
    let marks = controller.background_highlighter(false).highlight(&doc);
    assert_eq!(marks, vec![false, false, true, false, false]);
}
