use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    info,
    warn,
};

use super::LocalStore;
use crate::core::LectioError;

pub const USER_KEY: &str = "readingUser";
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub surname: String,
    pub group: String,
    pub login_time: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(name: &str, surname: &str, group: &str) -> Result<Self, LectioError> {
        let name = name.trim();
        let surname = surname.trim();
        let group = group.trim();

        if name.is_empty() {
            return Err(LectioError::ProfileIncomplete("name"));
        }
        if surname.is_empty() {
            return Err(LectioError::ProfileIncomplete("surname"));
        }
        if group.is_empty() {
            return Err(LectioError::ProfileIncomplete("group"));
        }

        Ok(Self {
            name: name.to_string(),
            surname: surname.to_string(),
            group: group.to_string(),
            login_time: Utc::now(),
        })
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    pub fn load(store: &LocalStore) -> Option<Self> {
        let raw = store.get_item(USER_KEY)?;
        match serde_json::from_str::<UserProfile>(raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "stored profile is unreadable, ignoring it");
                None
            }
        }
    }

    pub fn save(&self, store: &mut LocalStore) -> Result<(), LectioError> {
        store.set_item(USER_KEY, serde_json::to_string(self)?)?;
        info!(user = %self.display_name(), group = %self.group, "profile saved");
        Ok(())
    }

    pub fn clear(store: &mut LocalStore) -> Result<(), LectioError> {
        store.remove_item(USER_KEY)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    /// Unknown values fall back to light.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "dark" => ThemePreference::Dark,
            _ => ThemePreference::Light,
        }
    }

    pub fn load(store: &LocalStore) -> Self {
        store.get_item(THEME_KEY).map(Self::parse).unwrap_or_default()
    }

    pub fn save(&self, store: &mut LocalStore) -> Result<(), LectioError> {
        store.set_item(THEME_KEY, self.as_str())
    }
}
