//! Incremental history search state.
//!
//! Every change to the query rescans the store from the newest record down and stops at
//! the first case-insensitive substring match. Repeating continues from the last match in
//! either direction with wraparound, and gives up once it is back at that match, so a
//! single match never loops.

use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::{Direction, History};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchKey {
    Insert(char),
    DeleteChar,
    Repeat(Direction),
    Commit,
    Abort,
    Ignore,
}

pub(crate) fn classify(key: &KeyEvent) -> SearchKey {
    let ctrl = key.mods.contains(KeyModifiers::CTRL);
    match key.code {
        KeyCode::Char('r') if ctrl => SearchKey::Repeat(Direction::Previous),
        KeyCode::Char('s') if ctrl => SearchKey::Repeat(Direction::Next),
        KeyCode::Char('h') if ctrl => SearchKey::DeleteChar,
        KeyCode::Char('m' | 'j') if ctrl => SearchKey::Commit,
        KeyCode::Char('g' | 'c') if ctrl => SearchKey::Abort,
        KeyCode::Backspace => SearchKey::DeleteChar,
        KeyCode::Enter => SearchKey::Commit,
        KeyCode::Esc => SearchKey::Abort,
        _ => match key.printable() {
            Some(c) => SearchKey::Insert(c),
            None => SearchKey::Ignore,
        },
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Search {
    query: String,
    hit: Option<(usize, String)>,
    last_pos: usize,
}

impl Search {
    pub(crate) fn new(history: &dyn History) -> Self {
        Self {
            query: String::new(),
            hit: None,
            last_pos: history.len().saturating_sub(1),
        }
    }

    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    /// Index and text of the current match.
    pub(crate) fn hit(&self) -> Option<(usize, &str)> {
        self.hit.as_ref().map(|(i, s)| (*i, s.as_str()))
    }

    pub(crate) fn found_text(&self) -> &str {
        self.hit.as_ref().map(|(_, s)| s.as_str()).unwrap_or("")
    }

    pub(crate) fn push(&mut self, c: char, history: &dyn History) {
        self.query.push(c);
        self.rescan(history);
    }

    pub(crate) fn pop(&mut self, history: &dyn History) {
        self.query.pop();
        self.rescan(history);
    }

    /// Scan from the newest record for the first match.
    fn rescan(&mut self, history: &dyn History) {
        self.hit = None;
        for i in (0..history.len()).rev() {
            if let Some(record) = history.at(i)
                && contains_ci(&record, &self.query)
            {
                self.last_pos = i;
                self.hit = Some((i, record));
                break;
            }
        }
        debug!(target: "editor.isearch", query_len = self.query.len(), hit = ?self.hit.as_ref().map(|(i, _)| *i), "rescan");
    }

    /// Next match older (`Previous`) or newer (`Next`) than the last one, wrapping around.
    pub(crate) fn repeat(&mut self, dir: Direction, history: &dyn History) {
        let len = history.len();
        if len == 0 {
            return;
        }
        if self.hit.is_none() {
            self.rescan(history);
            return;
        }
        let start = self.last_pos.min(len - 1);
        let mut i = start;
        loop {
            i = match dir {
                Direction::Previous => i.checked_sub(1).unwrap_or(len - 1),
                Direction::Next => (i + 1) % len,
            };
            if i == start {
                break;
            }
            if let Some(record) = history.at(i)
                && contains_ci(&record, &self.query)
            {
                self.last_pos = i;
                self.hit = Some((i, record));
                break;
            }
        }
        debug!(target: "editor.isearch", dir = ?dir, pos = self.last_pos, "repeat");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::MemoryHistory;
    use pretty_assertions::assert_eq;

    fn store() -> MemoryHistory {
        ["select 1", "insert into t", "SELECT 2\nfrom dual", "update t"]
            .into_iter()
            .collect()
    }

    fn typed(s: &mut Search, q: &str, h: &dyn History) {
        for c in q.chars() {
            s.push(c, h);
        }
    }

    #[test]
    fn finds_newest_match_case_insensitively() {
        let h = store();
        let mut s = Search::new(&h);
        typed(&mut s, "sel", &h);
        assert_eq!(s.hit(), Some((2, "SELECT 2\nfrom dual")));
    }

    #[test]
    fn repeat_backward_wraps_and_stops_on_single_match() {
        let h = store();
        let mut s = Search::new(&h);
        typed(&mut s, "sel", &h);
        s.repeat(Direction::Previous, &h);
        assert_eq!(s.hit().map(|(i, _)| i), Some(0));
        s.repeat(Direction::Previous, &h);
        assert_eq!(s.hit().map(|(i, _)| i), Some(2));

        let mut only = Search::new(&h);
        typed(&mut only, "upd", &h);
        only.repeat(Direction::Previous, &h);
        assert_eq!(only.hit().map(|(i, _)| i), Some(3));
    }

    #[test]
    fn repeat_forward_wraps() {
        let h = store();
        let mut s = Search::new(&h);
        typed(&mut s, "sel", &h);
        s.repeat(Direction::Next, &h);
        assert_eq!(s.hit().map(|(i, _)| i), Some(0));
    }

    #[test]
    fn backspace_rescans_from_the_top() {
        let h = store();
        let mut s = Search::new(&h);
        typed(&mut s, "ins", &h);
        assert_eq!(s.hit().map(|(i, _)| i), Some(1));
        s.push('x', &h);
        assert_eq!(s.hit(), None);
        assert_eq!(s.found_text(), "");
        s.pop(&h);
        assert_eq!(s.hit().map(|(i, _)| i), Some(1));
    }

    #[test]
    fn key_classification() {
        assert_eq!(classify(&KeyEvent::ctrl('r')), SearchKey::Repeat(Direction::Previous));
        assert_eq!(classify(&KeyEvent::ctrl('s')), SearchKey::Repeat(Direction::Next));
        assert_eq!(classify(&KeyEvent::ctrl('g')), SearchKey::Abort);
        assert_eq!(classify(&KeyEvent::plain(KeyCode::Esc)), SearchKey::Abort);
        assert_eq!(classify(&KeyEvent::plain(KeyCode::Enter)), SearchKey::Commit);
        assert_eq!(classify(&KeyEvent::plain(KeyCode::Char('x'))), SearchKey::Insert('x'));
        assert_eq!(classify(&KeyEvent::plain(KeyCode::Up)), SearchKey::Ignore);
    }
}
