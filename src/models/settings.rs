// src/models/settings.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Interruptores globais geridos pelo super-admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub allow_admin_registration: bool,
    pub allow_admin_login: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self { allow_admin_registration: true, allow_admin_login: true }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub allow_admin_registration: Option<bool>,
    pub allow_admin_login: Option<bool>,
}

impl SystemSettings {
    pub fn apply(self, patch: &SettingsPatch) -> Self {
        Self {
            allow_admin_registration: patch.allow_admin_registration.unwrap_or(self.allow_admin_registration),
            allow_admin_login: patch.allow_admin_login.unwrap_or(self.allow_admin_login),
        }
    }
}
