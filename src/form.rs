//! Edit-form state
//!
//! `FormValues` is the editable copy of an event: one string per declared
//! field, serialized as the JSON body of the update call.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{parse_event_date, Event};

/// Editable event fields, in form order
pub const FIELDS: [&str; 7] = [
    "name",
    "performers",
    "venue",
    "address",
    "date",
    "time",
    "description",
];

pub const EMPTY_FIELDS_MESSAGE: &str = "Wow An Error ! Please Fill all fields";

/// What to do when a submitted form has empty fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyFieldPolicy {
    /// Show the notice and send the update anyway
    #[default]
    Warn,
    /// Show the notice and send nothing
    Block,
}

impl EmptyFieldPolicy {
    /// Parse policy string from config
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "block" => Self::Block,
            _ => Self::Warn,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Block => "block",
        }
    }
}

/// Field name to value, restricted to [`FIELDS`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<&'static str, String>);

impl FormValues {
    pub fn from_event(evt: &Event) -> Self {
        let mut values = BTreeMap::new();
        values.insert("name", evt.name.clone());
        values.insert("performers", evt.performers.clone());
        values.insert("venue", evt.venue.clone());
        values.insert("address", evt.address.clone());
        values.insert("date", evt.date.clone());
        values.insert("time", evt.time.clone());
        values.insert("description", evt.description.clone());
        Self(values)
    }

    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    /// Replace one field's value. Returns false for unknown field names,
    /// which leave the values untouched.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        match FIELDS.iter().find(|f| **f == name) {
            Some(field) => {
                self.0.insert(*field, value.to_string());
                true
            }
            None => false,
        }
    }

    /// Declared fields whose value is the empty string
    pub fn empty_fields(&self) -> Vec<&'static str> {
        FIELDS
            .iter()
            .copied()
            .filter(|f| self.get(f).is_empty())
            .collect()
    }
}

/// Whether an update request is in flight.
///
/// The server only ever renders `Editing`; the page's submit handler
/// switches the button to the `Submitting` label while the browser waits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Editing,
    Submitting,
}

impl SubmitState {
    pub fn label(&self) -> &'static str {
        match self {
            SubmitState::Editing => "Update Event",
            SubmitState::Submitting => "Updating...",
        }
    }
}

/// Result of checking the form before submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    /// Empty fields found; the update still goes out
    Warned(Vec<&'static str>),
    /// Empty fields found; the update is not sent
    Blocked(Vec<&'static str>),
}

impl Validation {
    pub fn allows_submit(&self) -> bool {
        !matches!(self, Validation::Blocked(_))
    }

    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Validation::Valid => None,
            Validation::Warned(_) | Validation::Blocked(_) => Some(EMPTY_FIELDS_MESSAGE),
        }
    }
}

/// The edit page's local state
#[derive(Debug, Clone)]
pub struct EditForm {
    pub event_id: u64,
    pub values: FormValues,
    pub image_preview: Option<String>,
    pub show_modal: bool,
}

impl EditForm {
    pub fn from_event(evt: &Event) -> Self {
        Self {
            event_id: evt.id,
            values: FormValues::from_event(evt),
            image_preview: evt.thumbnail_url().map(String::from),
            show_modal: false,
        }
    }

    pub fn handle_input_change(&mut self, name: &str, value: &str) -> bool {
        self.values.set(name, value)
    }

    /// Apply every posted field, ignoring names the form doesn't declare
    pub fn apply<'a, I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in fields {
            if !self.handle_input_change(name, value) {
                tracing::debug!("Ignoring unknown form field '{}'", name);
            }
        }
    }

    pub fn validate(&self, policy: EmptyFieldPolicy) -> Validation {
        let empty = self.values.empty_fields();
        if empty.is_empty() {
            return Validation::Valid;
        }
        match policy {
            EmptyFieldPolicy::Warn => Validation::Warned(empty),
            EmptyFieldPolicy::Block => Validation::Blocked(empty),
        }
    }

    /// Label of the submit button as rendered
    pub fn submit_label(&self) -> &'static str {
        SubmitState::Editing.label()
    }

    /// Label the button switches to once the form is sent
    pub fn submitting_label(&self) -> &'static str {
        SubmitState::Submitting.label()
    }

    /// Date formatted for `<input type="date">`
    pub fn date_input(&self) -> String {
        let raw = self.values.get("date");
        match parse_event_date(raw) {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => raw.to_string(),
        }
    }
}
