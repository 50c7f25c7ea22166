// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry owning every loaded descriptor.
//!
//! The `PluginRegistry` stores `Arc<Plugin>` keyed by plugin id. Parent and
//! child links on descriptors are plain ids, resolved here; registration
//! rejects links that would form a cycle.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use plinth_core::{CallContext, PluginError, PluginType};
use tracing::{info, warn};

use crate::dto::PluginDto;
use crate::plugin::Plugin;

/// Registry of loaded plugin descriptors.
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<Plugin>>,
}

impl PluginRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    /// Register a descriptor and return the shared handle to it.
    ///
    /// Fails if the id is already registered or the plugin's parent/child
    /// links would close a cycle through already registered plugins.
    pub fn register(&mut self, plugin: Plugin) -> Result<Arc<Plugin>, PluginError> {
        let id = plugin.id().to_string();
        if self.plugins.contains_key(&id) {
            return Err(PluginError::Manifest(format!(
                "plugin '{id}' is already registered"
            )));
        }
        self.check_links(&plugin)?;

        let plugin = Arc::new(plugin);
        self.plugins.insert(id.clone(), Arc::clone(&plugin));
        info!(plugin_id = %id, plugin_type = %plugin.plugin_type(), class = %plugin.class(), "plugin registered");
        Ok(plugin)
    }

    fn check_links(&self, plugin: &Plugin) -> Result<(), PluginError> {
        let id = plugin.id();
        if plugin.parent() == Some(id) || plugin.children().iter().any(|c| c == id) {
            return Err(PluginError::Hierarchy(format!(
                "plugin '{id}' cannot be its own parent or child"
            )));
        }

        // Parent pointers and child lists both count as edges. If `id` can
        // reach itself once the new links are added, they close a loop.
        let mut seen = HashSet::new();
        let mut stack = self.downlinks(id, plugin);
        while let Some(current) = stack.pop() {
            if current == id {
                return Err(PluginError::Hierarchy(format!(
                    "linking '{id}' would create a cycle"
                )));
            }
            if seen.insert(current.clone()) {
                stack.extend(self.downlinks(&current, plugin));
            }
        }

        // Both ends of a registered link must agree.
        for child in plugin.children() {
            if let Some(existing) = self.plugins.get(child)
                && existing.parent() != Some(id)
            {
                return Err(PluginError::Hierarchy(format!(
                    "plugin '{child}' does not name '{id}' as its parent"
                )));
            }
        }
        if let Some(claimant) = self
            .plugins
            .values()
            .find(|p| p.children().iter().any(|c| c == id))
            && plugin.parent() != Some(claimant.id())
        {
            return Err(PluginError::Hierarchy(format!(
                "plugin '{}' lists '{id}' as a child but '{id}' does not name it as parent",
                claimant.id()
            )));
        }
        Ok(())
    }

    // Ids directly below `node`, with `pending` treated as registered.
    fn downlinks(&self, node: &str, pending: &Plugin) -> Vec<String> {
        let mut out: Vec<String> = if node == pending.id() {
            pending.children().to_vec()
        } else {
            self.plugins
                .get(node)
                .map(|p| p.children().to_vec())
                .unwrap_or_default()
        };
        out.extend(
            self.plugins
                .values()
                .filter(|p| p.parent() == Some(node))
                .map(|p| p.id().to_string()),
        );
        if pending.parent() == Some(node) {
            out.push(pending.id().to_string());
        }
        out
    }

    /// Look up a plugin by id.
    pub fn get(&self, id: &str) -> Option<Arc<Plugin>> {
        self.plugins.get(id).cloned()
    }

    /// Remove a plugin, e.g. when it is disabled or uninstalled.
    pub fn remove(&mut self, id: &str) -> Option<Arc<Plugin>> {
        let removed = self.plugins.remove(id);
        if removed.is_some() {
            info!(plugin_id = %id, "plugin removed");
        }
        removed
    }

    /// All plugins, sorted by id.
    pub fn list(&self) -> Vec<Arc<Plugin>> {
        let mut plugins: Vec<Arc<Plugin>> = self.plugins.values().cloned().collect();
        plugins.sort_by(|a, b| a.id().cmp(b.id()));
        plugins
    }

    /// All plugins of the given type, sorted by id.
    pub fn find_by_type(&self, ty: PluginType) -> Vec<Arc<Plugin>> {
        self.list()
            .into_iter()
            .filter(|p| p.plugin_type() == ty)
            .collect()
    }

    /// Registered parent of `id`, if any.
    pub fn parent(&self, id: &str) -> Option<Arc<Plugin>> {
        let parent_id = self.plugins.get(id)?.parent()?;
        self.get(parent_id)
    }

    /// Registered children of `id`, in the order the parent declares them.
    pub fn children(&self, id: &str) -> Vec<Arc<Plugin>> {
        self.plugins
            .get(id)
            .map(|p| {
                p.children()
                    .iter()
                    .filter_map(|child| self.get(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Registered ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: &str) -> Vec<Arc<Plugin>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = self.parent(id);
        while let Some(parent) = cursor {
            if !seen.insert(parent.id().to_string()) {
                break;
            }
            cursor = self.parent(parent.id());
            out.push(parent);
        }
        out
    }

    /// Read-only views of every plugin, sorted by id.
    pub fn dtos(&self) -> Vec<PluginDto> {
        self.list().iter().map(|p| p.to_dto()).collect()
    }

    /// Stop every plugin, collecting failures instead of stopping early.
    pub async fn stop_all(&self, ctx: &CallContext) -> Vec<(String, PluginError)> {
        let mut failures = Vec::new();
        for plugin in self.list() {
            if let Err(e) = plugin.stop(ctx).await {
                warn!(plugin_id = %plugin.id(), error = %e, "failed to stop plugin");
                failures.push((plugin.id().to_string(), e));
            }
        }
        failures
    }

    /// Returns the number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;
    use plinth_core::Class;
    use plinth_test_utils::MockBackendClient;

    fn plugin(id: &str, ty: PluginType) -> Plugin {
        Plugin::new(Manifest::new(id, id, ty), None, Class::External)
    }

    fn child_of(id: &str, ty: PluginType, parent: &str) -> Plugin {
        let mut p = plugin(id, ty);
        p.set_parent(Some(parent.to_string()));
        p
    }

    #[test]
    fn register_and_get_roundtrip() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("acme-panel", PluginType::Panel)).unwrap();
        assert_eq!(registry.get("acme-panel").unwrap().id(), "acme-panel");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("acme-panel", PluginType::Panel)).unwrap();
        let err = registry
            .register(plugin("acme-panel", PluginType::Panel))
            .unwrap_err();
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn list_is_sorted_and_filters_by_type() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("zebra", PluginType::Panel)).unwrap();
        registry.register(plugin("alpha", PluginType::DataSource)).unwrap();
        registry.register(plugin("middle", PluginType::Panel)).unwrap();

        let ids: Vec<String> = registry.list().iter().map(|p| p.id().to_string()).collect();
        assert_eq!(ids, vec!["alpha", "middle", "zebra"]);

        let panels = registry.find_by_type(PluginType::Panel);
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].id(), "middle");
    }

    #[test]
    fn hierarchy_resolves_through_ids() {
        let mut registry = PluginRegistry::new();
        let mut app = plugin("acme-app", PluginType::App);
        app.add_child("acme-panel");
        app.add_child("acme-renderer");
        registry.register(app).unwrap();
        registry
            .register(child_of("acme-panel", PluginType::Panel, "acme-app"))
            .unwrap();
        registry
            .register(child_of("acme-renderer", PluginType::Renderer, "acme-app"))
            .unwrap();

        let children: Vec<String> = registry
            .children("acme-app")
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        assert_eq!(children, vec!["acme-panel", "acme-renderer"]);
        assert_eq!(registry.parent("acme-panel").unwrap().id(), "acme-app");
        assert!(registry.parent("acme-app").is_none());
        assert_eq!(registry.ancestors("acme-renderer").len(), 1);
    }

    #[test]
    fn self_parent_rejected() {
        let mut registry = PluginRegistry::new();
        let err = registry
            .register(child_of("loop", PluginType::App, "loop"))
            .unwrap_err();
        assert!(matches!(err, PluginError::Hierarchy(_)));
    }

    #[test]
    fn parent_cycle_rejected() {
        let mut registry = PluginRegistry::new();
        registry
            .register(child_of("a", PluginType::App, "b"))
            .unwrap();
        registry
            .register(child_of("b", PluginType::App, "c"))
            .unwrap();
        let err = registry
            .register(child_of("c", PluginType::App, "a"))
            .unwrap_err();
        assert!(matches!(err, PluginError::Hierarchy(ref m) if m.contains("cycle")));
        assert!(registry.get("c").is_none());
    }

    #[test]
    fn child_that_is_an_ancestor_rejected() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("root", PluginType::App)).unwrap();
        let mut mid = child_of("mid", PluginType::App, "root");
        mid.add_child("root");
        let err = registry.register(mid).unwrap_err();
        assert!(matches!(err, PluginError::Hierarchy(_)));
    }

    #[test]
    fn child_list_cycle_rejected() {
        let mut registry = PluginRegistry::new();
        let mut a = plugin("a", PluginType::App);
        a.add_child("b");
        registry.register(a).unwrap();

        let mut b = plugin("b", PluginType::App);
        b.add_child("a");
        let err = registry.register(b).unwrap_err();
        assert!(matches!(err, PluginError::Hierarchy(ref m) if m.contains("cycle")));
        assert!(registry.get("b").is_none());
        assert!(registry.children("a").is_empty());
    }

    #[test]
    fn claimed_child_must_name_its_parent() {
        let mut registry = PluginRegistry::new();
        let mut app = plugin("acme-app", PluginType::App);
        app.add_child("acme-panel");
        registry.register(app).unwrap();

        let err = registry
            .register(plugin("acme-panel", PluginType::Panel))
            .unwrap_err();
        assert!(matches!(err, PluginError::Hierarchy(_)));

        let mut orphan_claim = plugin("other-app", PluginType::App);
        orphan_claim.add_child("acme-app");
        let err = registry.register(orphan_claim).unwrap_err();
        assert!(matches!(err, PluginError::Hierarchy(_)));
    }

    #[test]
    fn remove_drops_plugin() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("acme-panel", PluginType::Panel)).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.remove("acme-panel").is_some());
        assert!(registry.remove("acme-panel").is_none());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn stop_all_stops_attached_backends() {
        let mut registry = PluginRegistry::new();
        let with_backend = registry
            .register(plugin("acme-datasource", PluginType::DataSource))
            .unwrap();
        registry.register(plugin("acme-panel", PluginType::Panel)).unwrap();

        let client = Arc::new(MockBackendClient::new());
        with_backend.register_client(client.clone());
        with_backend.start(&CallContext::background()).await.unwrap();
        assert!(client.is_running());

        let failures = registry.stop_all(&CallContext::background()).await;
        assert!(failures.is_empty());
        assert!(!client.is_running());
        assert!(with_backend.exited());
    }

    #[test]
    fn dtos_are_sorted_snapshots() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("b", PluginType::Panel)).unwrap();
        registry.register(plugin("a", PluginType::App)).unwrap();
        let dtos = registry.dtos();
        assert_eq!(dtos[0].id(), "a");
        assert!(dtos[0].is_app());
        assert_eq!(dtos[1].id(), "b");
    }
}
