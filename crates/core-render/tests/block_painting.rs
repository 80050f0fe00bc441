use core_render::status::search_status;
use core_render::{Frame, HighlightRule, Highlighter, Painter, Writer};
use pretty_assertions::assert_eq;

fn lines(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn flush(w: Writer) -> String {
    let mut out = Vec::new();
    w.flush(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn prompt(i: usize) -> String {
    format!("{}> ", i + 1)
}

fn sql_highlighter() -> Highlighter {
    let mut h = Highlighter::new();
    h.set_rules(
        vec![
            HighlightRule::new("(?i)select|from", "<K>").unwrap(),
            HighlightRule::new("'[^']*'", "<S>").unwrap(),
        ],
        "<D>",
        "<0>",
    );
    h
}

#[test]
fn highlight_refresh_is_idempotent() {
    let mut h = sql_highlighter();
    let l = lines(&["select 'a", "b' from t"]);
    assert!(h.refresh(&l));
    let first: Vec<_> = (0..2).map(|i| h.view().line(i).to_vec()).collect();
    assert!(!h.refresh(&l));
    let second: Vec<_> = (0..2).map(|i| h.view().line(i).to_vec()).collect();
    assert_eq!(first, second);
    assert_eq!(h.recomputes(), 1);
}

#[test]
fn second_pass_over_unchanged_block_writes_nothing() {
    let mut h = sql_highlighter();
    let l = lines(&["select 1", "from t", "where x"]);
    h.refresh(&l);
    let mut p = Painter::new(40, 8);
    let mut w = Writer::new();
    assert_eq!(p.print_range(&mut w, &Frame::new(&l, &h), &mut prompt, 0, 3), 3);
    let out = flush(w);
    assert!(out.contains("1> <K>select<D> 1<0>"));

    let mut w = Writer::new();
    assert_eq!(p.refresh_stale(&mut w, &Frame::new(&l, &h), &mut prompt, usize::MAX), 0);
    assert!(w.is_empty());
}

#[test]
fn status_row_hides_the_cursor_and_returns() {
    let h = Highlighter::new();
    let l = lines(&["a", "b"]);
    let mut p = Painter::new(40, 8);
    let mut w = Writer::new();
    p.print_range(&mut w, &Frame::new(&l, &h), &mut prompt, 0, 2);
    let status = search_status("a", "abc", p.width());
    let mut w = Writer::new();
    p.paint_status(&mut w, &status, 2, 0);
    let out = flush(w);
    assert!(out.starts_with("\x1B[?25l"));
    assert!(out.contains("(i-search)[a]:abc"));
    assert!(out.ends_with("\x1B[?25h"));
    assert_eq!(p.cursor_row(), 0);
}

#[test]
fn shrinking_block_clears_rows_below() {
    let h = Highlighter::new();
    let mut l = lines(&["a", "b", "c"]);
    let mut p = Painter::new(40, 8);
    let mut w = Writer::new();
    p.print_range(&mut w, &Frame::new(&l, &h), &mut prompt, 0, 3);
    l.truncate(1);
    let mut w = Writer::new();
    p.refresh_stale(&mut w, &Frame::new(&l, &h), &mut prompt, usize::MAX);
    let out = flush(w);
    assert!(out.ends_with("\x1B[J"));
}
