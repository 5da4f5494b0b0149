use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProjectError;
use crate::store::ProjectStore;

/// 可下載的專案封包。 / Downloadable project artifact.
///
/// Serialised as indented JSON with the keys `projectName`, `files` and
/// `timestamp` (ISO-8601, UTC, millisecond precision).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBundle {
    pub project_name: String,
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    pub timestamp: String,
}

impl ProjectBundle {
    /// 由存放區建立封包。 / Captures the store under `project_name` at `exported_at`.
    pub fn export(
        project_name: impl Into<String>,
        store: &ProjectStore,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            files: store.files().clone(),
            timestamp: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Suggested download name, `<project>-bundle.json`.
    pub fn file_name(&self) -> String {
        format!("{}-bundle.json", self.project_name)
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        serde_json::to_string_pretty(self).map_err(|err| ProjectError::Serialize(err.to_string()))
    }

    pub fn from_json(payload: &str) -> Result<Self, ProjectError> {
        serde_json::from_str(payload).map_err(|err| ProjectError::InvalidBundle(err.to_string()))
    }

    /// 還原專案名稱與存放區。 / Inverse of [`ProjectBundle::export`].
    pub fn into_parts(self) -> (String, ProjectStore) {
        (self.project_name, ProjectStore::from_files(self.files))
    }
}
