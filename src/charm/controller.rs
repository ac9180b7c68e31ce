// ABOUTME: Lifecycle controller: runs one hook event through the guarded handlers.
// ABOUTME: Collaborators and options are injected; state is loaded from and flushed to the UnitStore.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::assets;
use crate::config::{CharmConfig, ConfigKey, ConfigView};
use crate::diagnostics::{Diagnostics, Warning};
use crate::fetch::ContentFetcher;
use crate::host::{UnitHost, WorkloadStatus};
use crate::runtime::{FullRuntime, RunSpec};
use crate::store::UnitStore;
use crate::types::{ContainerName, ImageRef};

use super::error::CharmError;
use super::event::HookEvent;
use super::handlers::Handler;
use super::state::{CONFIG_KEY, CONTENT_KEY, ContentRecord, STATE_KEY, UnitState};

/// Drives the nginx container for one hook invocation.
///
/// Handlers are public so they can be exercised one at a time; each checks
/// its own guard and returns `Ok(false)` without side effects when the guard
/// does not hold. [`Controller::dispatch`] is the normal entry point.
pub struct Controller<'a, R, H, F> {
    runtime: &'a R,
    previous_runtime: Option<&'a R>,
    host: &'a H,
    fetcher: &'a F,
    config: ConfigView,
    store: UnitStore,
    state: UnitState,
    container: ContainerName,
    image: ImageRef,
    runtime_available: Option<bool>,
    diagnostics: Diagnostics,
}

impl<'a, R, H, F> Controller<'a, R, H, F>
where
    R: FullRuntime,
    H: UnitHost,
    F: ContentFetcher,
{
    /// Build a controller from the current options and the durable store.
    /// The previous options and the unit state are read from the store.
    pub fn new(
        runtime: &'a R,
        host: &'a H,
        fetcher: &'a F,
        config: CharmConfig,
        store: UnitStore,
    ) -> Result<Self, CharmError> {
        let previous = store.get::<CharmConfig>(CONFIG_KEY)?;
        let state = store.get::<UnitState>(STATE_KEY)?.unwrap_or_default();

        Ok(Self {
            runtime,
            previous_runtime: None,
            host,
            fetcher,
            config: ConfigView::new(config, previous),
            store,
            state,
            container: ContainerName::default(),
            image: ImageRef::default(),
            runtime_available: None,
            diagnostics: Diagnostics::default(),
        })
    }

    /// Runtime selected by the previous options, used to stop the container
    /// when the `runtime` option changes.
    pub fn with_previous_runtime(mut self, runtime: &'a R) -> Self {
        self.previous_runtime = Some(runtime);
        self
    }

    pub fn state(&self) -> &UnitState {
        &self.state
    }

    pub fn config(&self) -> &ConfigView {
        &self.config
    }

    pub fn store(&self) -> &UnitStore {
        &self.store
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Handle one hook event, settle the remaining handlers and persist the
    /// result. Nothing is written to the store when an error is returned.
    pub async fn dispatch(&mut self, event: &HookEvent) -> Result<(), CharmError> {
        tracing::info!("Handling {} (container {})", event, self.state.lifecycle);

        match event {
            HookEvent::ConfigChanged => self.config_changed().await?,
            HookEvent::RelationJoined { relation_id } => {
                self.state.relations.insert(relation_id.clone());
            }
            HookEvent::RelationDeparted { relation_id } => {
                self.state.relations.remove(relation_id);
            }
            HookEvent::Stop => {
                self.state.request_stop();
                self.stop_container().await?;
            }
            HookEvent::Other(name) => tracing::debug!("No specific handling for {}", name),
            HookEvent::Install
            | HookEvent::Start
            | HookEvent::UpgradeCharm
            | HookEvent::UpdateStatus => {}
        }

        // A unit being torn down must not come back up
        if *event != HookEvent::Stop {
            self.settle().await?;
        }

        if !self.runtime_available().await {
            self.host
                .set_status(WorkloadStatus::Waiting, "Waiting for container runtime")
                .await?;
        }

        self.persist()
    }

    /// Fire every handler whose guard holds, in [`Handler::ORDER`], until
    /// none is left. Each handler fires at most once.
    pub async fn settle(&mut self) -> Result<(), CharmError> {
        let mut fired = HashSet::new();

        while let Some(handler) = self.next_handler(&fired).await {
            fired.insert(handler);
            tracing::debug!("Firing {}", handler);

            match handler {
                Handler::StopContainer => self.stop_container().await?,
                Handler::ProvisionImage => self.provision_image().await?,
                Handler::StartContainer => self.start_container(None).await?,
                Handler::ConfigureWebsite => self.configure_website().await?,
            };
        }

        Ok(())
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    /// React to changed options: a new port or webroot forces a synchronous
    /// stop, then content is (re)cloned according to its cache policy.
    pub async fn config_changed(&mut self) -> Result<(), CharmError> {
        let changed = self.config.changed_keys();
        tracing::debug!("Changed options: {:?}", changed);

        if changed.contains(&ConfigKey::Runtime) {
            self.switch_runtime().await?;
        }

        if changed.contains(&ConfigKey::Webroot) && self.state.lifecycle.image_pulled() {
            self.prepare_webroot()?;
        }

        if changed.contains(&ConfigKey::Port) || changed.contains(&ConfigKey::Webroot) {
            tracing::info!("Port or webroot changed, stopping {}", self.container);
            if self.state.request_stop() {
                self.stop_container().await?;
            }
        }

        self.clone_content().await?;
        Ok(())
    }

    /// Prepare the webroot and pull the image. Fires once per unit.
    pub async fn provision_image(&mut self) -> Result<bool, CharmError> {
        if !self.guard(Handler::ProvisionImage).await {
            return Ok(false);
        }

        self.host
            .set_status(WorkloadStatus::Maintenance, "Copying charm assets in place")
            .await?;
        self.prepare_webroot()?;

        self.host
            .set_status(WorkloadStatus::Maintenance, "Pulling Nginx image")
            .await?;
        tracing::info!("Pulling {}", self.image);
        self.runtime.pull_image(&self.image).await?;

        self.state.record_image_pulled()?;
        Ok(true)
    }

    /// Run the container serving `content`, or the current content directory
    /// when none is given.
    pub async fn start_container(&mut self, content: Option<&Path>) -> Result<bool, CharmError> {
        if !self.guard(Handler::StartContainer).await {
            return Ok(false);
        }

        let port = self.config.current().port;
        let content = match content {
            Some(dir) => dir.to_path_buf(),
            None => self.content_dir()?,
        };

        self.host
            .set_status(WorkloadStatus::Maintenance, "Starting Nginx container")
            .await?;

        let spec = RunSpec::nginx(self.container.clone(), self.image.clone(), content, port);
        tracing::info!("Starting {} on port {}", self.container, port);
        self.runtime
            .run_container(&spec)
            .await
            .map_err(|e| CharmError::ContainerStartFailed(e.to_string()))?;

        self.host.open_port(port).await?;
        self.state.record_started(port)?;
        self.host
            .set_status(WorkloadStatus::Active, "Nginx container started")
            .await?;
        Ok(true)
    }

    /// Kill and remove the container. Both steps are best-effort: the
    /// container may not exist, and the unit still ends up stopped.
    pub async fn stop_container(&mut self) -> Result<bool, CharmError> {
        if !self.guard(Handler::StopContainer).await {
            return Ok(false);
        }

        self.stop_on(self.runtime).await
    }

    /// Kill and remove the container through `runtime`, then record the stop.
    async fn stop_on(&mut self, runtime: &'a R) -> Result<bool, CharmError> {
        self.host
            .set_status(WorkloadStatus::Maintenance, "Stopping Nginx container")
            .await?;

        if let Err(e) = runtime.kill_container(&self.container).await {
            self.diagnostics
                .warn(Warning::kill_failed(format!("kill {}: {}", self.container, e)));
        }
        if let Err(e) = runtime.remove_container(&self.container).await {
            self.diagnostics
                .warn(Warning::remove_failed(format!("rm {}: {}", self.container, e)));
        }

        if let Some(port) = self.state.record_stopped()?
            && let Err(e) = self.host.close_port(port).await
        {
            self.diagnostics
                .warn(Warning::close_port_failed(format!("close-port {}: {}", port, e)));
        }

        self.host
            .set_status(WorkloadStatus::Waiting, "Nginx container stopped")
            .await?;
        Ok(true)
    }

    /// Publish the served port on every joined `website` relation.
    pub async fn configure_website(&mut self) -> Result<bool, CharmError> {
        if !self.guard(Handler::ConfigureWebsite).await {
            return Ok(false);
        }

        let port = self.config.current().port;
        for relation_id in &self.state.relations {
            tracing::info!("Publishing port {} on {}", port, relation_id);
            self.host
                .relation_set(relation_id, &[("port", port.to_string())])
                .await?;
        }

        self.host.set_status(WorkloadStatus::Active, "").await?;
        Ok(true)
    }

    /// Fetch the configured repository into the webroot and restart on it.
    ///
    /// When repository, branch and webroot are all unchanged and a checkout
    /// of the same repository and branch is recorded, the recorded directory
    /// is reused and nothing is fetched. Returns whether a fetch happened.
    pub async fn clone_content(&mut self) -> Result<bool, CharmError> {
        let config = self.config.current().clone();

        let Some(repository) = config.repository.as_deref() else {
            if self.store.unset(CONTENT_KEY) {
                tracing::info!(
                    "Repository option cleared, serving {}",
                    config.webroot.display()
                );
                self.restart(None).await?;
            }
            return Ok(false);
        };

        let unchanged = [ConfigKey::Repository, ConfigKey::Branch, ConfigKey::Webroot]
            .into_iter()
            .all(|key| !self.config.changed(key));

        if unchanged
            && let Some(record) = self.store.get::<ContentRecord>(CONTENT_KEY)?
            && record.matches(repository, &config.branch)
            && record.dir.is_dir()
        {
            tracing::debug!(
                "Content of {} unchanged, reusing {}",
                repository,
                record.dir.display()
            );
            return Ok(false);
        }

        self.host
            .set_status(WorkloadStatus::Maintenance, "Fetching website content")
            .await?;
        let dir = self
            .fetcher
            .fetch(repository, &config.branch, &config.webroot)
            .await?;
        self.store.set(
            CONTENT_KEY,
            &ContentRecord::new(dir.clone(), repository, &config.branch),
        )?;

        self.restart(Some(&dir)).await?;
        Ok(true)
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Tear the container down on the runtime it was started with and start
    /// over from Uninstalled, so the image is pulled on the new runtime.
    async fn switch_runtime(&mut self) -> Result<(), CharmError> {
        let Some(previous) = self.config.previous() else {
            return Ok(());
        };
        if !self.state.lifecycle.image_pulled() {
            return Ok(());
        }

        tracing::info!(
            "Runtime option changed from {:?} to {:?}, stopping {}",
            previous.runtime,
            self.config.current().runtime,
            self.container
        );
        if self.state.request_stop() {
            let runtime = self.previous_runtime.unwrap_or(self.runtime);
            self.stop_on(runtime).await?;
        }
        self.state.record_runtime_changed()?;
        Ok(())
    }

    /// Stop (when a container may exist) and start again on `content`.
    async fn restart(&mut self, content: Option<&Path>) -> Result<(), CharmError> {
        if self.state.request_stop() {
            self.stop_container().await?;
        }
        self.start_container(content).await?;
        Ok(())
    }

    fn prepare_webroot(&self) -> Result<bool, CharmError> {
        let webroot = &self.config.current().webroot;
        assets::ensure_webroot(webroot).map_err(|source| CharmError::WebrootFailed {
            path: webroot.clone(),
            source,
        })
    }

    /// Directory to mount: the recorded checkout when it belongs to the
    /// configured repository and branch, the webroot otherwise.
    fn content_dir(&self) -> Result<PathBuf, CharmError> {
        let config = self.config.current();
        if let Some(repository) = config.repository.as_deref()
            && let Some(record) = self.store.get::<ContentRecord>(CONTENT_KEY)?
            && record.matches(repository, &config.branch)
            && record.dir.is_dir()
        {
            return Ok(record.dir);
        }
        Ok(config.webroot.clone())
    }

    /// Runtime availability, probed once per invocation.
    async fn runtime_available(&mut self) -> bool {
        if let Some(available) = self.runtime_available {
            return available;
        }
        let available = self.runtime.is_available().await;
        if !available {
            tracing::warn!("Container runtime is not available");
        }
        self.runtime_available = Some(available);
        available
    }

    async fn guard(&mut self, handler: Handler) -> bool {
        let available = self.runtime_available().await;
        let enabled = handler.is_enabled(&self.state, available);
        if !enabled {
            tracing::debug!(
                "Skipping {}: guard not met (container {}, stop requested: {})",
                handler,
                self.state.lifecycle,
                self.state.stop_requested
            );
        }
        enabled
    }

    async fn next_handler(&mut self, fired: &HashSet<Handler>) -> Option<Handler> {
        let available = self.runtime_available().await;
        Handler::ORDER
            .into_iter()
            .find(|h| !fired.contains(h) && h.is_enabled(&self.state, available))
    }

    fn persist(&mut self) -> Result<(), CharmError> {
        self.store.set(STATE_KEY, &self.state)?;
        self.store.set(CONFIG_KEY, self.config.current())?;
        self.store.flush()?;
        Ok(())
    }
}
