// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by descriptors, views, and backend clients.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::PluginError;

/// Capability kind declared by a plugin manifest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PluginType {
    DataSource,
    Panel,
    App,
    Renderer,
    SecretsManager,
}

impl PluginType {
    /// Every supported plugin type.
    pub const ALL: [PluginType; 5] = [
        PluginType::DataSource,
        PluginType::Panel,
        PluginType::App,
        PluginType::Renderer,
        PluginType::SecretsManager,
    ];

    /// Parse a raw manifest type string, rejecting anything outside [`PluginType::ALL`].
    pub fn parse(raw: &str) -> Result<Self, PluginError> {
        raw.parse()
            .map_err(|_| PluginError::InvalidType(raw.to_string()))
    }
}

/// Returns true if `raw` names one of the supported plugin types.
///
/// Loaders call this before building a descriptor so malformed manifests
/// never reach the runtime.
pub fn is_valid_type(raw: &str) -> bool {
    PluginType::parse(raw).is_ok()
}

/// Trust/origin classification of a plugin, orthogonal to [`PluginType`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Class {
    /// Shipped inside the host binary.
    Core,
    /// Shipped alongside the host.
    Bundled,
    /// Installed independently.
    External,
}

/// Where a plugin's backend executes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// The manifest declares no backend.
    None,
    /// A backend is declared but no client is attached yet.
    Unknown,
    /// Backend runs inside the host process.
    InMemory,
    /// Backend runs as a separate local process.
    Local,
    /// Backend runs on another host.
    Remote,
}

/// Outcome of plugin signature verification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SignatureStatus {
    /// Core plugin, trusted without a signature.
    Internal,
    Valid,
    Invalid,
    /// Files changed after signing.
    Modified,
    Unsigned,
}

impl SignatureStatus {
    /// Returns true for statuses that denote a verification failure.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            SignatureStatus::Invalid | SignatureStatus::Modified | SignatureStatus::Unsigned
        )
    }
}

/// The subset of [`SignatureStatus`] that can carry a [`SignatureError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FailureStatus {
    Invalid,
    Modified,
    Unsigned,
}

impl From<FailureStatus> for SignatureStatus {
    fn from(status: FailureStatus) -> Self {
        match status {
            FailureStatus::Invalid => SignatureStatus::Invalid,
            FailureStatus::Modified => SignatureStatus::Modified,
            FailureStatus::Unsigned => SignatureStatus::Unsigned,
        }
    }
}

/// Kind of key that signed the plugin.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SignatureType {
    Grafana,
    Commercial,
    Community,
    Private,
    PrivateGlob,
}

/// Structured signature verification failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureError {
    pub plugin_id: String,
    pub status: FailureStatus,
}

impl std::fmt::Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            FailureStatus::Invalid => write!(f, "plugin '{}' has an invalid signature", self.plugin_id),
            FailureStatus::Modified => write!(f, "plugin '{}' has a modified signature", self.plugin_id),
            FailureStatus::Unsigned => write!(f, "plugin '{}' has no signature", self.plugin_id),
        }
    }
}

/// Signature metadata attached to a descriptor.
///
/// An error can only be attached through [`Signature::failed`], so a
/// non-failure status never carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    status: SignatureStatus,
    kind: Option<SignatureType>,
    org: String,
    error: Option<SignatureError>,
}

impl Signature {
    /// Signature metadata without a verification error.
    pub fn new(status: SignatureStatus, kind: Option<SignatureType>, org: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            org: org.into(),
            error: None,
        }
    }

    /// Metadata for a core plugin.
    pub fn internal() -> Self {
        Self::new(SignatureStatus::Internal, None, "")
    }

    /// Metadata for a failed verification; the status is taken from the error.
    pub fn failed(error: SignatureError) -> Self {
        Self {
            status: error.status.into(),
            kind: None,
            org: String::new(),
            error: Some(error),
        }
    }

    pub fn status(&self) -> SignatureStatus {
        self.status
    }

    pub fn kind(&self) -> Option<SignatureType> {
        self.kind
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn error(&self) -> Option<&SignatureError> {
        self.error.as_ref()
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::new(SignatureStatus::Unsigned, None, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_type_round_trips_through_manifest_strings() {
        for ty in PluginType::ALL {
            let s = ty.to_string();
            assert_eq!(PluginType::parse(&s).unwrap(), ty);
        }
        assert_eq!(PluginType::DataSource.to_string(), "datasource");
        assert_eq!(PluginType::SecretsManager.to_string(), "secretsmanager");
    }

    #[test]
    fn unknown_type_is_invalid() {
        assert!(!is_valid_type("widget"));
        assert!(!is_valid_type(""));
        assert!(is_valid_type("renderer"));
        let err = PluginType::parse("widget").unwrap_err();
        assert!(matches!(err, PluginError::InvalidType(ref t) if t == "widget"));
    }

    #[test]
    fn plugin_type_serde_uses_lowercase() {
        let json = serde_json::to_string(&PluginType::DataSource).unwrap();
        assert_eq!(json, "\"datasource\"");
        assert!(serde_json::from_str::<PluginType>("\"widget\"").is_err());
    }

    #[test]
    fn target_strings() {
        assert_eq!(Target::None.to_string(), "none");
        assert_eq!(Target::InMemory.to_string(), "in_memory");
    }

    #[test]
    fn failed_signature_takes_status_from_error() {
        let sig = Signature::failed(SignatureError {
            plugin_id: "acme-panel".into(),
            status: FailureStatus::Modified,
        });
        assert_eq!(sig.status(), SignatureStatus::Modified);
        assert!(sig.status().is_failure());
        assert!(sig.error().is_some());
        assert!(sig.error().unwrap().to_string().contains("modified"));
    }

    #[test]
    fn valid_signature_has_no_error() {
        let sig = Signature::new(SignatureStatus::Valid, Some(SignatureType::Community), "Acme");
        assert!(!sig.status().is_failure());
        assert!(sig.error().is_none());
        assert_eq!(sig.org(), "Acme");
        assert_eq!(sig.kind(), Some(SignatureType::Community));
    }
}
