mod common;

use common::*;
use core_editor::ReadError;
use core_events::KeyCode;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn edit_a_line_above_then_submit() {
    let mut ed = editor();
    let events = seq(vec![
        text("SELECT ALL\n  FROM\nDUAL"),
        vec![key(KeyCode::Up), key(KeyCode::Up), ctrl('e')],
        repeat(key(KeyCode::Backspace), 3),
        text("*"),
        vec![ctrl('j')],
    ]);
    let got = read(&mut ed, events).await.unwrap();
    assert_eq!(got, lines(&["SELECT *", "  FROM", "DUAL"]));
    assert_eq!(ed.lines(), got.as_slice());
    assert_eq!(ed.cursor_line(), 0);
}

#[tokio::test]
async fn enter_splits_at_the_cursor() {
    let mut ed = editor();
    let events = seq(vec![
        text("abcd"),
        repeat(key(KeyCode::Left), 2),
        vec![key(KeyCode::Enter)],
        text(">"),
        vec![ctrl('j')],
    ]);
    let got = read(&mut ed, events).await.unwrap();
    assert_eq!(got, lines(&["ab", ">cd"]));
}

#[tokio::test]
async fn left_at_column_zero_goes_to_end_of_previous_line() {
    let mut ed = editor();
    let events = seq(vec![
        text("ab\ncd"),
        repeat(key(KeyCode::Left), 3),
        text("X"),
        vec![ctrl('j')],
    ]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["abX", "cd"]));
}

#[tokio::test]
async fn right_at_end_goes_to_start_of_next_line() {
    let mut ed = editor();
    let events = seq(vec![
        text("ab\ncd"),
        vec![key(KeyCode::Up), key(KeyCode::Right)],
        text("X"),
        vec![ctrl('j')],
    ]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["ab", "Xcd"]));
}

#[tokio::test]
async fn down_lands_on_column_zero() {
    let mut ed = editor();
    let events = seq(vec![
        text("one\ntwo\nthree"),
        vec![key(KeyCode::Up), key(KeyCode::Up), key(KeyCode::Down)],
        text("-"),
        vec![ctrl('j')],
    ]);
    assert_eq!(
        read(&mut ed, events).await.unwrap(),
        lines(&["one", "-two", "three"])
    );
}

#[tokio::test]
async fn backspace_at_column_zero_joins_with_line_above() {
    let mut ed = editor();
    let events = seq(vec![
        text("ab\ncd"),
        vec![key(KeyCode::Home), key(KeyCode::Backspace)],
        text("-"),
        vec![ctrl('j')],
    ]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["ab-cd"]));
}

#[tokio::test]
async fn delete_at_end_of_line_pulls_the_next_line_up() {
    let mut ed = editor();
    let events = seq(vec![
        text("ab\ncd\nef"),
        vec![key(KeyCode::Up), key(KeyCode::Up), key(KeyCode::Delete)],
        text("-"),
        vec![ctrl('j')],
    ]);
    assert_eq!(
        read(&mut ed, events).await.unwrap(),
        lines(&["ab-cd", "ef"])
    );
}

#[tokio::test]
async fn ctrl_d_on_empty_input_is_end_of_input() {
    let mut ed = editor();
    let got = read(&mut ed, vec![ctrl('d')]).await;
    assert!(matches!(got, Err(ReadError::EndOfInput)));

    // deletes first, then reports end of input once nothing is left
    let events = seq(vec![text("a"), vec![key(KeyCode::Home), ctrl('d'), ctrl('d')]]);
    let got = read(&mut ed, events).await;
    assert!(matches!(got, Err(ReadError::EndOfInput)));
}

#[tokio::test]
async fn ctrl_d_on_an_empty_line_of_a_non_empty_block_does_nothing() {
    let mut ed = editor();
    let events = seq(vec![text("ab\n"), vec![ctrl('d'), ctrl('j')]]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["ab", ""]));
}

#[tokio::test]
async fn kill_and_word_rubout_stay_on_the_line() {
    let mut ed = editor();
    let events = seq(vec![
        text("select foo bar"),
        vec![ctrl('w')],
        text("baz"),
        vec![key(KeyCode::Home), ctrl('f'), ctrl('k'), ctrl('j')],
    ]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["s"]));
}

#[tokio::test]
async fn custom_bindings_by_name() {
    let mut ed = editor();
    ed.bind_key_named("C_O", "SUBMIT").unwrap();
    let events = seq(vec![text("x\ny"), vec![ctrl('o')]]);
    assert_eq!(read(&mut ed, events).await.unwrap(), lines(&["x", "y"]));

    assert!(ed.bind_key_named("C_O", "NOPE").is_err());
    assert!(ed.bind_key_named("Q_Q", "SUBMIT").is_err());
}
