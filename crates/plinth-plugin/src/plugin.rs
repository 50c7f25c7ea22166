// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The runtime plugin descriptor.
//!
//! A [`Plugin`] combines a manifest, an optional filesystem handle, a class,
//! signature metadata, and hierarchy links with an optional backend client.
//! The client slot starts empty and is filled by the process supervisor via
//! [`Plugin::register_client`]. Capability calls delegate to the attached
//! client, or fail with [`PluginError::Unavailable`] when there is none.
//! Renderer and secrets-manager plugins additionally carry a typed handle for
//! their capability, held in slots of their own.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use plinth_core::protocol::{
    CallResourceRequest, CheckHealthRequest, CheckHealthResult, CollectMetricsRequest,
    CollectMetricsResult, PublishStreamRequest, PublishStreamResponse, QueryDataRequest,
    QueryDataResponse, ResourceResponseSender, RunStreamRequest, StreamSender,
    SubscribeStreamRequest, SubscribeStreamResponse,
};
use plinth_core::{
    BackendClient, CallContext, Class, PathSanitizer, PluginError, PluginFile, PluginFs,
    PluginType, RendererClient, SecretsManagerClient, Signature, Target,
};
use tracing::{debug, info, info_span, warn, Instrument, Span};

use crate::classifier;
use crate::dto::PluginDto;
use crate::executable::{resolve_executable, Platform};
use crate::manifest::Manifest;
use crate::sanitize::CleanPathSanitizer;

/// App-related fields of a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppFields {
    /// Id of the app plugin this plugin ships inside, if any.
    pub included_in_app_id: Option<String>,
    /// Navigation target for an app, derived from its default include.
    pub default_nav_url: String,
    /// Whether the app is pinned to the navigation menu.
    pub pinned: bool,
}

/// Frontend module location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleFields {
    /// Module specifier the frontend loads (`core:plugin/<id>` for core plugins).
    pub module: String,
    /// URL prefix the plugin's frontend assets are served under.
    pub base_url: String,
}

/// Route for serving a plugin's static assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRoute {
    /// Directory the assets are served from.
    pub directory: PathBuf,
    /// Plugin the route belongs to.
    pub plugin_id: String,
}

// arc-swap needs a sized pointee.
struct Attached(Arc<dyn BackendClient>);
struct AttachedRenderer(Arc<dyn RendererClient>);
struct AttachedSecretsManager(Arc<dyn SecretsManagerClient>);

/// Runtime descriptor for a loaded plugin.
pub struct Plugin {
    manifest: Manifest,
    fs: Option<Arc<dyn PluginFs>>,
    class: Class,
    app: AppFields,
    signature: Signature,
    module: ModuleFields,
    parent: Option<String>,
    children: Vec<String>,
    sanitizer: Arc<dyn PathSanitizer>,
    platform: Platform,
    client: ArcSwapOption<Attached>,
    renderer: ArcSwapOption<AttachedRenderer>,
    secrets_manager: ArcSwapOption<AttachedSecretsManager>,
    span: Span,
}

impl Plugin {
    /// Build a descriptor with no backend client attached.
    pub fn new(manifest: Manifest, fs: Option<Arc<dyn PluginFs>>, class: Class) -> Self {
        let span = info_span!("plugin", plugin_id = %manifest.id);
        Self {
            manifest,
            fs,
            class,
            app: AppFields::default(),
            signature: Signature::default(),
            module: ModuleFields::default(),
            parent: None,
            children: Vec::new(),
            sanitizer: Arc::new(CleanPathSanitizer),
            platform: Platform::host(),
            client: ArcSwapOption::empty(),
            renderer: ArcSwapOption::empty(),
            secrets_manager: ArcSwapOption::empty(),
            span,
        }
    }

    /// Set the signature verification result.
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    /// Set the app-related fields.
    pub fn with_app_fields(mut self, app: AppFields) -> Self {
        self.app = app;
        self
    }

    /// Set the frontend module location.
    pub fn with_module(mut self, module: ModuleFields) -> Self {
        self.module = module;
        self
    }

    /// Replace the path sanitizer used by [`Plugin::file`].
    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn PathSanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Override the platform used by [`Plugin::executable_path`].
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Replace the span that delegated calls are recorded under.
    pub fn set_span(&mut self, span: Span) {
        self.span = span;
    }

    /// Span that delegated calls are recorded under.
    pub fn span(&self) -> &Span {
        &self.span
    }

    // --- Hierarchy ---

    /// Set or clear the parent plugin id.
    pub fn set_parent(&mut self, parent_id: Option<String>) {
        self.parent = parent_id;
    }

    /// Append a child plugin id. Duplicates are ignored.
    pub fn add_child(&mut self, child_id: impl Into<String>) {
        let child_id = child_id.into();
        if !self.children.contains(&child_id) {
            self.children.push(child_id);
        }
    }

    /// Id of the parent plugin, resolved through the registry.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Ids of child plugins, in the order they were attached.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    // --- Descriptive accessors ---

    /// Unique plugin id from the manifest.
    pub fn id(&self) -> &str {
        &self.manifest.id
    }

    /// Alias of [`Plugin::id`] for call sites that take a plugin context.
    pub fn plugin_id(&self) -> &str {
        self.id()
    }

    /// The parsed manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Declared plugin type.
    pub fn plugin_type(&self) -> PluginType {
        self.manifest.plugin_type
    }

    /// Where the plugin was installed from.
    pub fn class(&self) -> Class {
        self.class
    }

    /// Signature verification result.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// App-related fields.
    pub fn app(&self) -> &AppFields {
        &self.app
    }

    /// Frontend module location.
    pub fn module(&self) -> &ModuleFields {
        &self.module
    }

    /// Filesystem rooted at the plugin directory, if any.
    pub fn fs(&self) -> Option<&Arc<dyn PluginFs>> {
        self.fs.as_ref()
    }

    /// Platform used for executable resolution.
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    // --- Classification ---

    /// True for `app` plugins.
    pub fn is_app(&self) -> bool {
        classifier::is_app(self.plugin_type())
    }

    /// True for `renderer` plugins.
    pub fn is_renderer(&self) -> bool {
        classifier::is_renderer(self.plugin_type())
    }

    /// True for `secretsmanager` plugins.
    pub fn is_secrets_manager(&self) -> bool {
        classifier::is_secrets_manager(self.plugin_type())
    }

    /// True when shipped with the runtime itself.
    pub fn is_core_plugin(&self) -> bool {
        classifier::is_core_plugin(self.class)
    }

    /// True when bundled alongside the runtime.
    pub fn is_bundled_plugin(&self) -> bool {
        classifier::is_bundled_plugin(self.class)
    }

    /// True when installed separately.
    pub fn is_external_plugin(&self) -> bool {
        classifier::is_external_plugin(self.class)
    }

    // --- Backend client slot ---

    /// Attach the backend client. A later call replaces the earlier client.
    pub fn register_client(&self, client: Arc<dyn BackendClient>) {
        let previous = self.client.swap(Some(Arc::new(Attached(client))));
        if previous.is_some() {
            debug!(plugin_id = %self.id(), "replaced backend client");
        } else {
            debug!(plugin_id = %self.id(), "registered backend client");
        }
    }

    /// The attached backend client, if any.
    pub fn client(&self) -> Option<Arc<dyn BackendClient>> {
        self.client
            .load()
            .as_ref()
            .map(|attached| Arc::clone(&attached.0))
    }

    /// Attach the rendering handle of a renderer plugin.
    pub fn register_renderer(&self, renderer: Arc<dyn RendererClient>) {
        if !self.is_renderer() {
            warn!(plugin_id = %self.id(), plugin_type = %self.plugin_type(), "renderer attached to non-renderer plugin");
        }
        self.renderer.store(Some(Arc::new(AttachedRenderer(renderer))));
        debug!(plugin_id = %self.id(), "registered renderer");
    }

    /// The attached rendering handle, if any.
    pub fn renderer(&self) -> Option<Arc<dyn RendererClient>> {
        self.renderer
            .load()
            .as_ref()
            .map(|attached| Arc::clone(&attached.0))
    }

    /// Attach the secret storage handle of a secrets-manager plugin.
    pub fn register_secrets_manager(&self, manager: Arc<dyn SecretsManagerClient>) {
        if !self.is_secrets_manager() {
            warn!(plugin_id = %self.id(), plugin_type = %self.plugin_type(), "secrets manager attached to non-secretsmanager plugin");
        }
        self.secrets_manager
            .store(Some(Arc::new(AttachedSecretsManager(manager))));
        debug!(plugin_id = %self.id(), "registered secrets manager");
    }

    /// The attached secret storage handle, if any.
    pub fn secrets_manager(&self) -> Option<Arc<dyn SecretsManagerClient>> {
        self.secrets_manager
            .load()
            .as_ref()
            .map(|attached| Arc::clone(&attached.0))
    }

    fn require_client(&self) -> Result<Arc<dyn BackendClient>, PluginError> {
        self.client().ok_or_else(|| {
            debug!(plugin_id = %self.id(), "no backend client attached");
            PluginError::Unavailable {
                plugin_id: self.id().to_string(),
            }
        })
    }

    // --- Lifecycle ---

    /// Start the backend. Fails with [`PluginError::Unavailable`] when no
    /// client is attached.
    pub async fn start(&self, ctx: &CallContext) -> Result<(), PluginError> {
        let client = self.require_client()?;
        client.start(ctx).instrument(self.span.clone()).await?;
        info!(plugin_id = %self.id(), "plugin backend started");
        Ok(())
    }

    /// Stop the backend. Succeeds without doing anything when no client is
    /// attached.
    pub async fn stop(&self, ctx: &CallContext) -> Result<(), PluginError> {
        let Some(client) = self.client() else {
            return Ok(());
        };
        match client.stop(ctx).instrument(self.span.clone()).await {
            Ok(()) => {
                info!(plugin_id = %self.id(), "plugin backend stopped");
                Ok(())
            }
            Err(e) => {
                warn!(plugin_id = %self.id(), error = %e, "plugin backend failed to stop");
                Err(e)
            }
        }
    }

    /// Whether the supervisor restarts the backend on exit; false without a client.
    pub fn is_managed(&self) -> bool {
        self.client().is_some_and(|c| c.is_managed())
    }

    /// Whether the backend process has exited; false without a client.
    pub fn exited(&self) -> bool {
        self.client().is_some_and(|c| c.exited())
    }

    /// Whether the backend was retired; false without a client.
    pub fn is_decommissioned(&self) -> bool {
        self.client().is_some_and(|c| c.is_decommissioned())
    }

    /// Retire the backend. A no-op without a client.
    pub fn decommission(&self) -> Result<(), PluginError> {
        match self.client() {
            Some(client) => client.decommission(),
            None => Ok(()),
        }
    }

    /// Where the backend executes.
    pub fn target(&self) -> Target {
        if !self.manifest.backend {
            return Target::None;
        }
        match self.client() {
            Some(client) => client.target(),
            None => Target::Unknown,
        }
    }

    // --- Capability calls ---

    /// Run data queries on the backend.
    pub async fn query_data(
        &self,
        ctx: &CallContext,
        req: QueryDataRequest,
    ) -> Result<QueryDataResponse, PluginError> {
        let client = self.require_client()?;
        client.query_data(ctx, req).instrument(self.span.clone()).await
    }

    /// Forward a resource call; responses are pushed into `sender`.
    pub async fn call_resource(
        &self,
        ctx: &CallContext,
        req: CallResourceRequest,
        sender: ResourceResponseSender,
    ) -> Result<(), PluginError> {
        let client = self.require_client()?;
        client
            .call_resource(ctx, req, sender)
            .instrument(self.span.clone())
            .await
    }

    /// Ask the backend for its health.
    pub async fn check_health(
        &self,
        ctx: &CallContext,
        req: CheckHealthRequest,
    ) -> Result<CheckHealthResult, PluginError> {
        let client = self.require_client()?;
        client.check_health(ctx, req).instrument(self.span.clone()).await
    }

    /// Collect backend metrics in Prometheus text format.
    pub async fn collect_metrics(
        &self,
        ctx: &CallContext,
        req: CollectMetricsRequest,
    ) -> Result<CollectMetricsResult, PluginError> {
        let client = self.require_client()?;
        client
            .collect_metrics(ctx, req)
            .instrument(self.span.clone())
            .await
    }

    /// Ask the backend whether a stream subscription is allowed.
    pub async fn subscribe_stream(
        &self,
        ctx: &CallContext,
        req: SubscribeStreamRequest,
    ) -> Result<SubscribeStreamResponse, PluginError> {
        let client = self.require_client()?;
        client
            .subscribe_stream(ctx, req)
            .instrument(self.span.clone())
            .await
    }

    /// Ask the backend whether publishing to a stream is allowed.
    pub async fn publish_stream(
        &self,
        ctx: &CallContext,
        req: PublishStreamRequest,
    ) -> Result<PublishStreamResponse, PluginError> {
        let client = self.require_client()?;
        client
            .publish_stream(ctx, req)
            .instrument(self.span.clone())
            .await
    }

    /// Run a stream; packets are pushed into `sender` until it ends.
    pub async fn run_stream(
        &self,
        ctx: &CallContext,
        req: RunStreamRequest,
        sender: StreamSender,
    ) -> Result<(), PluginError> {
        let client = self.require_client()?;
        client
            .run_stream(ctx, req, sender)
            .instrument(self.span.clone())
            .await
    }

    // --- Files and routes ---

    /// Open `name` relative to the plugin root.
    ///
    /// The path is sanitized before any filesystem access, so traversal
    /// attempts fail with [`PluginError::PathEscape`] even when no
    /// filesystem is configured.
    pub fn file(&self, name: &str) -> Result<PluginFile, PluginError> {
        let clean = self.sanitizer.clean(name)?;
        let Some(fs) = self.fs.as_ref() else {
            return Err(PluginError::NotExist { path: clean });
        };
        fs.open(&clean)
    }

    /// Absolute plugin root, if a filesystem is configured.
    pub fn base(&self) -> Option<&Path> {
        self.fs.as_ref().map(|fs| fs.base())
    }

    /// Path of the backend binary for the configured platform.
    ///
    /// `None` when the plugin has no filesystem to hold a binary.
    pub fn executable_path(&self) -> Option<PathBuf> {
        self.executable_path_for(&self.platform)
    }

    /// Path of the backend binary for an explicit platform.
    pub fn executable_path_for(&self, platform: &Platform) -> Option<PathBuf> {
        let base = self.base()?;
        Some(resolve_executable(
            self.plugin_type(),
            &self.manifest.executable,
            base,
            platform,
        ))
    }

    /// Static asset route; `None` for core plugins and plugins without a
    /// filesystem.
    pub fn static_route(&self) -> Option<StaticRoute> {
        if self.is_core_plugin() {
            return None;
        }
        let base = self.base()?;
        Some(StaticRoute {
            directory: base.to_path_buf(),
            plugin_id: self.id().to_string(),
        })
    }

    // --- Views ---

    /// Snapshot this descriptor into a read-only view.
    pub fn to_dto(&self) -> PluginDto {
        let supports_streaming = self.client().is_some_and(|c| c.supports_streaming());
        PluginDto::from_parts(
            self.manifest.clone(),
            self.class,
            self.app.clone(),
            self.signature.clone(),
            self.module.clone(),
            self.fs.clone(),
            supports_streaming,
        )
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("id", &self.manifest.id)
            .field("type", &self.manifest.plugin_type)
            .field("class", &self.class)
            .field("base", &self.base())
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("client", &self.client.load().is_some())
            .field("renderer", &self.renderer.load().is_some())
            .field("secrets_manager", &self.secrets_manager.load().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plinth_core::protocol::{RenderRequest, RenderResponse, SecretKey};
    use plinth_test_utils::{MemoryFs, MockBackendClient};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    fn datasource(backend: bool) -> Manifest {
        let mut manifest = Manifest::new("acme-gpx-datasource", "GPX", PluginType::DataSource);
        manifest.backend = backend;
        manifest.executable = "gpx_foo".to_string();
        manifest
    }

    fn with_fs(manifest: Manifest, class: Class, base: &str) -> Plugin {
        Plugin::new(manifest, Some(Arc::new(MemoryFs::new(base))), class)
    }

    #[test]
    fn target_reflects_backend_flag_and_client() {
        let plugin = Plugin::new(datasource(false), None, Class::External);
        assert_eq!(plugin.target(), Target::None);
        plugin.register_client(Arc::new(MockBackendClient::new()));
        assert_eq!(plugin.target(), Target::None);

        let plugin = Plugin::new(datasource(true), None, Class::External);
        assert_eq!(plugin.target(), Target::Unknown);
        plugin.register_client(Arc::new(MockBackendClient::new().with_target(Target::Remote)));
        assert_eq!(plugin.target(), Target::Remote);
    }

    #[test]
    fn status_queries_default_without_client() {
        let plugin = Plugin::new(datasource(true), None, Class::External);
        assert!(!plugin.is_managed());
        assert!(!plugin.exited());
        assert!(!plugin.is_decommissioned());
        assert!(plugin.decommission().is_ok());
        assert!(plugin.client().is_none());
    }

    #[test]
    fn status_queries_proxy_to_client() {
        let plugin = Plugin::new(datasource(true), None, Class::External);
        plugin.register_client(Arc::new(MockBackendClient::new().with_managed(false)));
        assert!(!plugin.is_managed());
        plugin.decommission().unwrap();
        assert!(plugin.is_decommissioned());
    }

    #[test]
    fn register_client_overwrites() {
        let plugin = Plugin::new(datasource(true), None, Class::External);
        plugin.register_client(Arc::new(MockBackendClient::new().with_target(Target::Local)));
        plugin.register_client(Arc::new(MockBackendClient::new().with_target(Target::InMemory)));
        assert_eq!(plugin.target(), Target::InMemory);
    }

    #[tokio::test]
    async fn start_without_client_is_unavailable() {
        let plugin = Plugin::new(datasource(true), None, Class::External);
        let err = plugin.start(&CallContext::background()).await.unwrap_err();
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("acme-gpx-datasource"));
    }

    #[tokio::test]
    async fn stop_without_client_succeeds() {
        let plugin = Plugin::new(datasource(true), None, Class::External);
        plugin.stop(&CallContext::background()).await.unwrap();
        plugin.stop(&CallContext::background()).await.unwrap();
    }

    #[tokio::test]
    #[traced_test]
    async fn start_and_stop_are_logged() {
        let plugin = Plugin::new(datasource(true), None, Class::External);
        plugin.register_client(Arc::new(MockBackendClient::new()));
        let ctx = CallContext::background();
        plugin.start(&ctx).await.unwrap();
        plugin.stop(&ctx).await.unwrap();
        assert!(logs_contain("plugin backend started"));
        assert!(logs_contain("plugin backend stopped"));
    }

    #[test]
    fn executable_path_uses_injected_platform() {
        let mut manifest = Manifest::new("acme-renderer", "Renderer", PluginType::Renderer);
        manifest.executable = "ignored".to_string();
        let plugin = with_fs(manifest, Class::External, "/plugins/r")
            .with_platform(Platform::new("windows", "amd64"));
        assert_eq!(
            plugin.executable_path().unwrap(),
            PathBuf::from("/plugins/r/plugin_start_windows_amd64.exe")
        );
        assert_eq!(
            plugin
                .executable_path_for(&Platform::new("linux", "amd64"))
                .unwrap(),
            PathBuf::from("/plugins/r/plugin_start_linux_amd64")
        );
    }

    #[test]
    fn executable_path_needs_filesystem() {
        let plugin = Plugin::new(datasource(true), None, Class::External);
        assert!(plugin.executable_path().is_none());
    }

    #[test]
    fn static_route_rules() {
        let core = with_fs(datasource(false), Class::Core, "/usr/share/plinth/plugins/gpx");
        assert!(core.static_route().is_none());

        let no_fs = Plugin::new(datasource(false), None, Class::External);
        assert!(no_fs.static_route().is_none());

        let external = with_fs(datasource(false), Class::External, "/var/lib/plinth/plugins/gpx");
        assert_eq!(
            external.static_route(),
            Some(StaticRoute {
                directory: PathBuf::from("/var/lib/plinth/plugins/gpx"),
                plugin_id: "acme-gpx-datasource".to_string(),
            })
        );

        let bundled = with_fs(datasource(false), Class::Bundled, "/opt/plinth/gpx");
        assert!(bundled.static_route().is_some());
    }

    #[test]
    fn file_without_fs_is_not_exist() {
        let plugin = Plugin::new(datasource(false), None, Class::External);
        let err = plugin.file("img/logo.svg").err().unwrap();
        assert!(matches!(err, PluginError::NotExist { ref path } if path == Path::new("img/logo.svg")));
    }

    #[test]
    fn hierarchy_links_are_ids() {
        let mut app = Plugin::new(
            Manifest::new("acme-app", "Acme", PluginType::App),
            None,
            Class::External,
        );
        app.add_child("acme-panel");
        app.add_child("acme-panel");
        app.add_child("acme-datasource");
        assert_eq!(app.children(), ["acme-panel", "acme-datasource"]);
        assert!(app.parent().is_none());

        let mut panel = Plugin::new(
            Manifest::new("acme-panel", "Panel", PluginType::Panel),
            None,
            Class::External,
        );
        panel.set_parent(Some("acme-app".to_string()));
        assert_eq!(panel.parent(), Some("acme-app"));
    }

    struct FileRenderer;

    #[async_trait::async_trait]
    impl RendererClient for FileRenderer {
        async fn render(
            &self,
            _ctx: &CallContext,
            req: RenderRequest,
        ) -> Result<RenderResponse, PluginError> {
            Ok(RenderResponse {
                error: req.url.is_empty().then(|| "missing url".to_string()),
            })
        }
    }

    #[derive(Default)]
    struct MapSecrets {
        secrets: Mutex<HashMap<SecretKey, String>>,
    }

    #[async_trait::async_trait]
    impl SecretsManagerClient for MapSecrets {
        async fn get_secret(
            &self,
            _ctx: &CallContext,
            key: &SecretKey,
        ) -> Result<Option<String>, PluginError> {
            Ok(self.secrets.lock().unwrap().get(key).cloned())
        }

        async fn set_secret(
            &self,
            _ctx: &CallContext,
            key: SecretKey,
            value: String,
        ) -> Result<(), PluginError> {
            self.secrets.lock().unwrap().insert(key, value);
            Ok(())
        }

        async fn delete_secret(
            &self,
            _ctx: &CallContext,
            key: &SecretKey,
        ) -> Result<(), PluginError> {
            self.secrets.lock().unwrap().remove(key);
            Ok(())
        }

        async fn list_secrets(
            &self,
            _ctx: &CallContext,
            org_id: i64,
        ) -> Result<Vec<SecretKey>, PluginError> {
            Ok(self
                .secrets
                .lock()
                .unwrap()
                .keys()
                .filter(|k| k.org_id == org_id)
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn renderer_slot_is_separate_from_client() {
        let plugin = Plugin::new(
            Manifest::new("acme-renderer", "Renderer", PluginType::Renderer),
            None,
            Class::External,
        );
        assert!(plugin.renderer().is_none());

        plugin.register_renderer(Arc::new(FileRenderer));
        assert!(plugin.client().is_none());
        let renderer = plugin.renderer().unwrap();
        let resp = renderer
            .render(
                &CallContext::background(),
                RenderRequest {
                    url: "http://localhost:3000/d/abc".to_string(),
                    width: 1000,
                    height: 500,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(resp.error.is_none());
        assert!(plugin.secrets_manager().is_none());
    }

    #[tokio::test]
    async fn secrets_manager_slot_round_trips_secrets() {
        let plugin = Plugin::new(
            Manifest::new("acme-vault", "Vault", PluginType::SecretsManager),
            None,
            Class::External,
        );
        plugin.register_secrets_manager(Arc::new(MapSecrets::default()));
        let manager = plugin.secrets_manager().unwrap();
        let ctx = CallContext::background();
        let key = SecretKey {
            org_id: 1,
            namespace: "prometheus".to_string(),
            kind: "datasource".to_string(),
        };

        manager
            .set_secret(&ctx, key.clone(), "hunter2".to_string())
            .await
            .unwrap();
        assert_eq!(
            manager.get_secret(&ctx, &key).await.unwrap().as_deref(),
            Some("hunter2")
        );
        assert_eq!(manager.list_secrets(&ctx, 1).await.unwrap(), vec![key.clone()]);
        manager.delete_secret(&ctx, &key).await.unwrap();
        assert!(manager.get_secret(&ctx, &key).await.unwrap().is_none());
        assert!(plugin.renderer().is_none());
    }

    #[test]
    #[traced_test]
    fn mismatched_capability_is_logged() {
        let plugin = Plugin::new(datasource(true), None, Class::External);
        plugin.register_renderer(Arc::new(FileRenderer));
        assert!(plugin.renderer().is_some());
        assert!(logs_contain("renderer attached to non-renderer plugin"));
    }

    #[test]
    fn debug_shows_client_presence() {
        let plugin = Plugin::new(datasource(true), None, Class::External);
        assert!(format!("{plugin:?}").contains("client: false"));
        plugin.register_client(Arc::new(MockBackendClient::new()));
        assert!(format!("{plugin:?}").contains("client: true"));
    }
}
