//! Dropdown state for picking participants, teams and a single user.
//!
//! Each picker owns its whole state (open flag, search query, selection);
//! callers hold it and pass it where it is needed. Opening or closing a
//! searchable picker clears its query.

use std::collections::HashSet;

use crate::model::{Member, Team};

/// What a click on a dropdown row did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected,
    Removed,
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct MemberPicker {
    all: Vec<Member>,
    selected: Vec<Member>,
    /// Members that cannot be toggled (e.g. the reserver).
    pinned: HashSet<String>,
    open: bool,
    query: String,
}

impl MemberPicker {
    pub fn new(all: Vec<Member>) -> Self {
        Self {
            all,
            ..Self::default()
        }
    }

    /// Select `member_id` and lock it in place.
    pub fn pin(&mut self, member_id: &str) {
        self.pinned.insert(member_id.to_string());
        if !self.is_selected(member_id)
            && let Some(member) = self.all.iter().find(|m| m.id == member_id)
        {
            self.selected.push(member.clone());
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle_open(&mut self) {
        self.open = !self.open;
        self.query.clear();
    }

    /// Click outside the dropdown.
    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn selected(&self) -> &[Member] {
        &self.selected
    }

    pub fn is_selected(&self, member_id: &str) -> bool {
        self.selected.iter().any(|m| m.id == member_id)
    }

    pub fn is_pinned(&self, member_id: &str) -> bool {
        self.pinned.contains(member_id)
    }

    /// Members matching the search query by name or by any team, case-insensitive.
    pub fn visible(&self) -> Vec<&Member> {
        let needle = self.query.to_lowercase();
        self.all
            .iter()
            .filter(|m| {
                m.name.to_lowercase().contains(&needle)
                    || m.teams.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn click(&mut self, member_id: &str) -> ClickOutcome {
        if self.is_pinned(member_id) {
            return ClickOutcome::Ignored;
        }
        if let Some(pos) = self.selected.iter().position(|m| m.id == member_id) {
            self.selected.remove(pos);
            return ClickOutcome::Removed;
        }
        match self.all.iter().find(|m| m.id == member_id) {
            Some(member) => {
                self.selected.push(member.clone());
                ClickOutcome::Selected
            }
            None => ClickOutcome::Ignored,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamPicker {
    all: Vec<Team>,
    selected: Vec<Team>,
    open: bool,
}

impl TeamPicker {
    pub fn new(all: Vec<Team>) -> Self {
        Self {
            all,
            ..Self::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle_open(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn options(&self) -> &[Team] {
        &self.all
    }

    pub fn selected(&self) -> &[Team] {
        &self.selected
    }

    pub fn click(&mut self, team_id: &str) -> ClickOutcome {
        if let Some(pos) = self.selected.iter().position(|t| t.id == team_id) {
            self.selected.remove(pos);
            return ClickOutcome::Removed;
        }
        match self.all.iter().find(|t| t.id == team_id) {
            Some(team) => {
                self.selected.push(team.clone());
                ClickOutcome::Selected
            }
            None => ClickOutcome::Ignored,
        }
    }
}

/// Single-select user dropdown (admin seat assignment): search by name,
/// picking a user replaces the selection and closes the dropdown.
#[derive(Debug, Clone, Default)]
pub struct UserPicker {
    all: Vec<Member>,
    selected: Option<String>,
    open: bool,
    query: String,
}

impl UserPicker {
    pub fn new(all: Vec<Member>) -> Self {
        Self {
            all,
            ..Self::default()
        }
    }

    /// Preselect the seat's current holder. Unknown ids are kept as-is.
    pub fn preset(&mut self, member_id: impl Into<String>) {
        self.selected = Some(member_id.into());
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle_open(&mut self) {
        self.open = !self.open;
        self.query.clear();
    }

    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// `None` when nothing is selected or the selected id is not in the list.
    pub fn selected(&self) -> Option<&Member> {
        let id = self.selected.as_deref()?;
        self.all.iter().find(|m| m.id == id)
    }

    /// Users whose name contains the query, case-insensitive.
    pub fn visible(&self) -> Vec<&Member> {
        let needle = self.query.to_lowercase();
        self.all
            .iter()
            .filter(|m| m.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Clicking the current selection keeps it; there is no deselect.
    pub fn click(&mut self, member_id: &str) -> ClickOutcome {
        if !self.all.iter().any(|m| m.id == member_id) {
            return ClickOutcome::Ignored;
        }
        self.selected = Some(member_id.to_string());
        self.close();
        ClickOutcome::Selected
    }
}
