mod common;

use common::*;
use core_editor::{History, MemoryHistory};
use core_events::KeyCode;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn shared(records: &[&str]) -> Rc<RefCell<MemoryHistory>> {
    Rc::new(RefCell::new(records.iter().copied().collect()))
}

fn with_history(records: &[&str], cycling: bool) -> (common::Editor, Rc<RefCell<MemoryHistory>>) {
    let store = shared(records);
    let mut ed = editor();
    ed.set_history(Box::new(Rc::clone(&store)), cycling);
    (ed, store)
}

#[tokio::test]
async fn up_on_the_first_line_recalls_previous_record() {
    let (mut ed, _) = with_history(&["one", "two\nlines"], false);
    let events = vec![key(KeyCode::Up), ctrl('j')];
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["two", "lines"]));
    // the cursor lands on the last line of a record recalled backwards
    assert_eq!(ed.cursor_line(), 1);
}

#[tokio::test]
async fn history_keys_work_from_any_line() {
    let (mut ed, _) = with_history(&["old"], false);
    let events = seq(vec![text("a\nb"), vec![key(KeyCode::Up), alt('p'), ctrl('j')]]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["old"]));
}

#[tokio::test]
async fn previous_at_oldest_is_a_no_op_without_cycling() {
    let (mut ed, _) = with_history(&["one", "two"], false);
    let events = seq(vec![repeat(key(KeyCode::Up), 3), vec![ctrl('j')]]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["one"]));
}

#[tokio::test]
async fn previous_at_oldest_wraps_with_cycling() {
    let (mut ed, _) = with_history(&["one", "two"], true);
    let events = seq(vec![repeat(key(KeyCode::Up), 3), vec![ctrl('j')]]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["two"]));
}

#[tokio::test]
async fn next_from_the_draft_is_a_no_op_without_cycling() {
    let (mut ed, _) = with_history(&["one"], false);
    let events = seq(vec![text("draft"), vec![key(KeyCode::Down), ctrl('j')]]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["draft"]));
}

#[tokio::test]
async fn edits_to_recalled_records_survive_navigation() {
    let (mut ed, store) = with_history(&["alpha", "beta"], false);
    let events = seq(vec![
        vec![key(KeyCode::Up)],
        text("X"),
        vec![key(KeyCode::Up), key(KeyCode::Down), ctrl('j')],
    ]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["betaX"]));
    assert_eq!(store.borrow().entries(), lines(&["alpha", "beta"]).as_slice());

    // edits are forgotten when the next read starts
    let events = vec![key(KeyCode::Up), ctrl('j')];
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["beta"]));
}

#[tokio::test]
async fn the_draft_comes_back_after_browsing() {
    let (mut ed, _) = with_history(&["one", "two"], false);
    let events = seq(vec![
        text("my draft"),
        vec![key(KeyCode::Up), key(KeyCode::Up), key(KeyCode::Down), key(KeyCode::Down)],
        vec![ctrl('j')],
    ]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["my draft"]));
}

#[tokio::test]
async fn records_pushed_between_reads_are_visible() {
    let (mut ed, store) = with_history(&[], false);
    let got = read(&mut ed, seq(vec![text("first"), vec![ctrl('j')]])).await.unwrap();
    store.borrow_mut().push(got.join("\n"));
    assert_eq!(store.len(), 1);

    let got = read(&mut ed, vec![key(KeyCode::Up), ctrl('j')]).await.unwrap();
    assert_eq!(got, lines(&["first"]));
}
