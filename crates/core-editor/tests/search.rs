mod common;

use common::*;
use core_editor::MemoryHistory;
use core_events::{InputEvent, KeyCode};
use pretty_assertions::assert_eq;

fn searchable() -> Editor {
    let mut ed = core_editor::MultiLineEditor::new(Vec::new()).with_view_size(80, ROWS);
    let store: MemoryHistory = ["select 1", "insert into t\nvalues (1)", "SELECT 2"]
        .into_iter()
        .collect();
    ed.set_history(Box::new(store), false);
    ed
}

#[tokio::test]
async fn commit_loads_the_newest_match() {
    let mut ed = searchable();
    let events = seq(vec![vec![ctrl('r')], text("sel"), vec![key(KeyCode::Enter), ctrl('j')]]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["SELECT 2"]));
    assert!(painted(&ed).contains("(i-search)[sel]:SELECT 2"));
}

#[tokio::test]
async fn repeat_walks_to_older_matches() {
    let mut ed = searchable();
    let events = seq(vec![
        vec![ctrl('r')],
        text("sel"),
        vec![ctrl('r'), key(KeyCode::Enter), ctrl('j')],
    ]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["select 1"]));
}

#[tokio::test]
async fn multi_line_match_is_shown_on_one_row() {
    let mut ed = searchable();
    let events = seq(vec![vec![ctrl('r')], text("values"), vec![key(KeyCode::Enter), ctrl('j')]]);
    let got = read(&mut ed, events).await.unwrap();
    assert_eq!(got, lines(&["insert into t", "values (1)"]));
    assert!(painted(&ed).contains("(i-search)[values]:insert into t\u{21B2} values (1)"));
}

#[tokio::test]
async fn abort_keeps_the_buffer() {
    let mut ed = searchable();
    for abort in [ctrl('g'), key(KeyCode::Esc), ctrl('c')] {
        let events = seq(vec![
            text("ab"),
            vec![key(KeyCode::Left), ctrl('r')],
            text("sel"),
            vec![abort],
            text("|"),
            vec![ctrl('j')],
        ]);
        assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["a|b"]));
    }
}

#[tokio::test]
async fn commit_without_a_match_clears_the_block() {
    let mut ed = searchable();
    let events = seq(vec![
        text("draft"),
        vec![ctrl('r')],
        text("zzz"),
        vec![key(KeyCode::Enter), ctrl('j')],
    ]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&[""]));
}

#[tokio::test]
async fn missed_commit_leaves_one_editable_line() {
    let mut ed = searchable();
    let events = seq(vec![
        text("a"),
        vec![key(KeyCode::Enter)],
        text("b"),
        vec![ctrl('r')],
        text("zzz"),
        vec![key(KeyCode::Enter)],
        text("x"),
        vec![ctrl('j')],
    ]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["x"]));
}

#[tokio::test]
async fn backspace_widens_the_query() {
    let mut ed = searchable();
    let events = seq(vec![
        vec![ctrl('r')],
        text("insx"),
        vec![key(KeyCode::Backspace), key(KeyCode::Enter), ctrl('j')],
    ]);
    assert_eq!(
        read(&mut ed, events).await.unwrap(),
        lines(&["insert into t", "values (1)"])
    );
}

#[tokio::test]
async fn pasted_text_extends_the_query() {
    let mut ed = searchable();
    let events = vec![
        ctrl('r'),
        InputEvent::Paste("select 1".into()),
        key(KeyCode::Enter),
        ctrl('j'),
    ];
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["select 1"]));
}

#[tokio::test]
async fn committed_record_can_be_edited() {
    let mut ed = searchable();
    let events = seq(vec![
        vec![ctrl('r')],
        text("1"),
        vec![key(KeyCode::Enter)],
        text("0"),
        vec![ctrl('j')],
    ]);
    // newest record containing "1" is the multi-line insert
    assert_eq!(
        read(&mut ed, events).await.unwrap(),
        lines(&["insert into t", "values (1)0"])
    );
}
