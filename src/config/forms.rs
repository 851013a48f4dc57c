//! Edit form configuration

use serde::Deserialize;

use crate::form::EmptyFieldPolicy;

#[derive(Debug, Clone, Default)]
pub struct FormsConfig {
    /// `warn` sends the update despite empty fields, `block` refuses it
    pub empty_fields: EmptyFieldPolicy,
}

/// Forms settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileForms {
    pub empty_fields: Option<String>,
}

impl FormsConfig {
    pub fn from_file(file: Option<FileForms>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            empty_fields: file
                .empty_fields
                .map(|s| EmptyFieldPolicy::from_str(&s))
                .unwrap_or_default(),
        }
    }
}
