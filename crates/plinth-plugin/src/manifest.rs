// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifest model and `plugin.json` parsing.
//!
//! A [`Manifest`] is an immutable description of a plugin's identity,
//! capabilities, routes, and declared dependencies. Descriptors hand out
//! shared references only, so a manifest never changes after loading.

use std::collections::HashMap;

use plinth_core::{PluginError, PluginType};
use serde::{Deserialize, Serialize};

/// Include kind for bundled dashboards.
pub const INCLUDE_DASHBOARD: &str = "dashboard";

/// Parsed `plugin.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    // Common settings
    pub id: String,
    #[serde(rename = "type")]
    pub plugin_type: PluginType,
    pub name: String,
    #[serde(default)]
    pub info: Info,
    #[serde(default)]
    pub dependencies: Dependencies,
    #[serde(default)]
    pub includes: Vec<Include>,
    #[serde(default)]
    pub state: ReleaseState,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub hide_from_list: bool,
    #[serde(default)]
    pub preload: bool,
    /// True if the plugin ships a backend process.
    #[serde(default)]
    pub backend: bool,
    #[serde(default)]
    pub routes: Vec<Route>,

    // Access control
    #[serde(default)]
    pub roles: Vec<RoleRegistration>,

    // Panel settings
    #[serde(default)]
    pub skip_data_query: bool,

    // App settings
    #[serde(default)]
    pub auto_enabled: bool,

    // Data source settings
    #[serde(default)]
    pub annotations: bool,
    #[serde(default)]
    pub metrics: bool,
    #[serde(default)]
    pub alerting: bool,
    #[serde(default)]
    pub explore: bool,
    #[serde(default)]
    pub tables: bool,
    #[serde(default)]
    pub logs: bool,
    #[serde(default)]
    pub tracing: bool,
    #[serde(default)]
    pub query_options: HashMap<String, bool>,
    #[serde(default)]
    pub built_in: bool,
    #[serde(default)]
    pub mixed: bool,
    #[serde(default)]
    pub streaming: bool,
    #[serde(default)]
    pub sdk: bool,

    /// Base name of the backend binary (data source and app backends).
    #[serde(default)]
    pub executable: String,
}

impl Manifest {
    /// A manifest with the given identity and every other field defaulted.
    pub fn new(id: impl Into<String>, name: impl Into<String>, plugin_type: PluginType) -> Self {
        Self {
            id: id.into(),
            plugin_type,
            name: name.into(),
            info: Info::default(),
            dependencies: Dependencies::default(),
            includes: Vec::new(),
            state: ReleaseState::default(),
            category: String::new(),
            hide_from_list: false,
            preload: false,
            backend: false,
            routes: Vec::new(),
            roles: Vec::new(),
            skip_data_query: false,
            auto_enabled: false,
            annotations: false,
            metrics: false,
            alerting: false,
            explore: false,
            tables: false,
            logs: false,
            tracing: false,
            query_options: HashMap::new(),
            built_in: false,
            mixed: false,
            streaming: false,
            sdk: false,
            executable: String::new(),
        }
    }

    /// Includes tagged as dashboards, in declaration order.
    pub fn dashboard_includes(&self) -> Vec<&Include> {
        self.includes
            .iter()
            .filter(|include| include.kind == INCLUDE_DASHBOARD)
            .collect()
    }
}

/// Human-facing metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Info {
    pub author: InfoLink,
    pub description: String,
    pub links: Vec<InfoLink>,
    pub logos: Logos,
    pub build: BuildInfo,
    pub screenshots: Vec<Screenshot>,
    pub version: String,
    pub updated: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logos {
    pub small: String,
    pub large: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildInfo {
    pub time: i64,
    pub repo: String,
    pub branch: String,
    pub hash: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Screenshot {
    pub name: String,
    pub path: String,
}

/// Host and plugin dependencies declared by a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dependencies {
    /// Semver range of the host the plugin works with.
    pub host_dependency: String,
    pub host_version: String,
    pub plugins: Vec<PluginDependency>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDependency {
    pub id: String,
    #[serde(rename = "type")]
    pub plugin_type: PluginType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// A resource bundled with the plugin (dashboard, page, nested panel, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Include {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub component: String,
    pub role: Option<OrgRole>,
    pub action: String,
    pub add_to_nav: bool,
    pub default_nav: bool,
    pub slug: String,
    pub icon: String,
    pub uid: String,
    pub id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseState {
    #[default]
    Stable,
    Beta,
    Alpha,
    Deprecated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrgRole {
    Viewer,
    Editor,
    Admin,
}

/// Role the plugin registers with the host's access control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleRegistration {
    pub role: Role,
    pub grants: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    pub name: String,
    pub description: String,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permission {
    pub action: String,
    pub scope: String,
}

/// A proxy route declared by the plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Route {
    pub path: String,
    pub method: String,
    pub req_role: Option<OrgRole>,
    pub url: String,
    pub url_params: Vec<UrlParam>,
    /// Headers forwarded with the proxied request.
    pub headers: Vec<Header>,
    pub auth_type: String,
    pub token_auth: Option<TokenAuth>,
    pub jwt_token_auth: Option<TokenAuth>,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlParam {
    pub name: String,
    pub content: String,
}

/// Token auth settings, used for both plain and JWT token auth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenAuth {
    pub url: String,
    pub scopes: Vec<String>,
    pub params: HashMap<String, String>,
}

/// Parse a manifest from `plugin.json` content.
///
/// The `type` field is checked before full deserialization so an unknown
/// type surfaces as [`PluginError::InvalidType`] rather than a generic
/// parse failure. The id and name must be non-empty.
pub fn parse_manifest(json: &str) -> Result<Manifest, PluginError> {
    let raw: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| PluginError::Manifest(format!("invalid JSON: {e}")))?;

    match raw.get("type").and_then(serde_json::Value::as_str) {
        Some(ty) => {
            PluginType::parse(ty)?;
        }
        None => return Err(PluginError::Manifest("type must be a string".to_string())),
    }

    let manifest: Manifest =
        serde_json::from_value(raw).map_err(|e| PluginError::Manifest(e.to_string()))?;

    if manifest.id.trim().is_empty() {
        return Err(PluginError::Manifest("id must not be empty".to_string()));
    }
    if manifest.id.contains(['/', '\\']) || manifest.id.contains(char::is_whitespace) {
        return Err(PluginError::Manifest(format!(
            "id '{}' must not contain whitespace or path separators",
            manifest.id
        )));
    }
    if manifest.name.trim().is_empty() {
        return Err(PluginError::Manifest("name must not be empty".to_string()));
    }

    Ok(manifest)
}
