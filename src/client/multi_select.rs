use std::collections::HashSet;

use crate::database::models::Member;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopoverState {
    Closed,
    Open,
}

/// What the widget asks its parent to do with the selected id list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Change(String),
    Remove(String),
}

/// Member multi-select. The selected id list belongs to the parent and is
/// passed into every call; the widget only keeps popover state and the filter text.
#[derive(Debug, Clone)]
pub struct MultiSelect {
    placeholder: String,
    state: PopoverState,
    filter: String,
}

impl MultiSelect {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            state: PopoverState::Closed,
            filter: String::new(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn state(&self) -> PopoverState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == PopoverState::Open
    }

    pub fn focus(&mut self) {
        self.state = PopoverState::Open;
    }

    pub fn blur(&mut self) {
        self.state = PopoverState::Closed;
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
    }

    /// Badges: selected ids resolved against the member list, in selection order.
    /// Ids the list does not know are skipped.
    pub fn selected<'a>(&self, members: &'a [Member], value: &[String]) -> Vec<&'a Member> {
        value
            .iter()
            .filter_map(|id| members.iter().find(|m| &m.id == id))
            .collect()
    }

    /// All members not currently selected, compared by id
    pub fn candidates<'a>(&self, members: &'a [Member], value: &[String]) -> Vec<&'a Member> {
        let selected: HashSet<&str> = value.iter().map(String::as_str).collect();
        members.iter().filter(|m| !selected.contains(m.id.as_str())).collect()
    }

    /// Candidates shown in the open popover, narrowed by the filter text
    pub fn visible_candidates<'a>(&self, members: &'a [Member], value: &[String]) -> Vec<&'a Member> {
        if !self.is_open() {
            return Vec::new();
        }

        let needle = self.filter.trim().to_lowercase();
        self.candidates(members, value)
            .into_iter()
            .filter(|m| needle.is_empty() || m.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Pick a candidate. Returns `None` for unknown or already-selected ids.
    pub fn select(&mut self, members: &[Member], value: &[String], id: &str) -> Option<SelectionEvent> {
        let is_candidate = self.candidates(members, value).iter().any(|m| m.id == id);
        if !is_candidate {
            return None;
        }

        self.filter.clear();
        Some(SelectionEvent::Change(id.to_string()))
    }

    /// Badge close button. Only selected ids produce an event.
    pub fn remove(&self, value: &[String], id: &str) -> Option<SelectionEvent> {
        value
            .iter()
            .any(|v| v == id)
            .then(|| SelectionEvent::Remove(id.to_string()))
    }
}

/// Parent-side handler for widget events. Never duplicates an id.
pub fn apply_event(value: &mut Vec<String>, event: SelectionEvent) {
    match event {
        SelectionEvent::Change(id) => {
            if !value.contains(&id) {
                value.push(id);
            }
        }
        SelectionEvent::Remove(id) => value.retain(|v| *v != id),
    }
}
