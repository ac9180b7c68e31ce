// ABOUTME: Test support utilities.
// ABOUTME: In-memory fakes for the runtime, host and fetcher seams plus a per-test unit harness.

// Each test binary only uses some of these helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use docker_nginx::charm::{CONFIG_KEY, CharmError, Controller, HookEvent, STATE_KEY, UnitState};
use docker_nginx::config::CharmConfig;
use docker_nginx::fetch::{ContentFetcher, FetchError, checkout_dir};
use docker_nginx::host::{HostError, UnitHost, WorkloadStatus};
use docker_nginx::runtime::{
    ContainerError, ContainerOps, ImageError, ImageOps, RunSpec, RuntimeProbe,
};
use docker_nginx::store::UnitStore;
use docker_nginx::types::{ContainerName, ImageRef, Port};
use parking_lot::Mutex;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("docker_nginx=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Write an executable shell script `name` into `dir`. Every invocation
/// appends its arguments as one line to `<dir>/<name>.log`, then runs `body`.
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let log = dir.join(format!("{name}.log"));
    let script = format!("#!/bin/sh\necho \"$@\" >> '{}'\n{}\n", log.display(), body);
    fs::write(&path, script).unwrap();

    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Argument lines recorded by a [`fake_tool`], empty when it never ran.
pub fn tool_log(dir: &Path, name: &str) -> Vec<String> {
    fs::read_to_string(dir.join(format!("{name}.log")))
        .map(|log| log.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

// =============================================================================
// Runtime
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    Pull(String),
    Run(Vec<String>),
    Kill(String),
    Remove(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FakeContainer {
    Running,
    Exited,
}

/// Runtime that tracks a single container the way the docker CLI would:
/// `run` refuses a taken name, `kill` needs a running container, `rm`
/// needs an exited one.
#[derive(Default)]
pub struct FakeRuntime {
    calls: Mutex<Vec<RuntimeCall>>,
    container: Mutex<Option<FakeContainer>>,
    pub unavailable: bool,
    pub fail_pull: bool,
    pub fail_run: bool,
}

impl FakeRuntime {
    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn pulls(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, RuntimeCall::Pull(_)))
            .count()
    }

    pub fn runs(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                RuntimeCall::Run(args) => Some(args.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn container_exists(&self) -> bool {
        self.container.lock().is_some()
    }

    fn record(&self, call: RuntimeCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl ImageOps for FakeRuntime {
    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError> {
        self.record(RuntimeCall::Pull(reference.to_string()));
        if self.fail_pull {
            return Err(ImageError::PullFailed {
                image: reference.to_string(),
                message: "registry unreachable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ContainerOps for FakeRuntime {
    async fn run_container(&self, spec: &RunSpec) -> Result<(), ContainerError> {
        self.record(RuntimeCall::Run(spec.to_args()));
        if self.fail_run {
            return Err(ContainerError::Runtime("port is already allocated".to_string()));
        }
        let mut container = self.container.lock();
        if container.is_some() {
            return Err(ContainerError::AlreadyExists(spec.name.to_string()));
        }
        *container = Some(FakeContainer::Running);
        Ok(())
    }

    async fn kill_container(&self, name: &ContainerName) -> Result<(), ContainerError> {
        self.record(RuntimeCall::Kill(name.to_string()));
        let mut container = self.container.lock();
        match *container {
            Some(FakeContainer::Running) => {
                *container = Some(FakeContainer::Exited);
                Ok(())
            }
            Some(FakeContainer::Exited) => Err(ContainerError::CommandFailed {
                operation: "kill",
                name: name.to_string(),
                message: "container is not running".to_string(),
            }),
            None => Err(ContainerError::NotFound(name.to_string())),
        }
    }

    async fn remove_container(&self, name: &ContainerName) -> Result<(), ContainerError> {
        self.record(RuntimeCall::Remove(name.to_string()));
        let mut container = self.container.lock();
        match *container {
            Some(FakeContainer::Exited) => {
                *container = None;
                Ok(())
            }
            Some(FakeContainer::Running) => Err(ContainerError::CommandFailed {
                operation: "rm",
                name: name.to_string(),
                message: "cannot remove a running container".to_string(),
            }),
            None => Err(ContainerError::NotFound(name.to_string())),
        }
    }
}

#[async_trait]
impl RuntimeProbe for FakeRuntime {
    async fn is_available(&self) -> bool {
        !self.unavailable
    }
}

// =============================================================================
// Host
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Status(WorkloadStatus, String),
    OpenPort(u16),
    ClosePort(u16),
    RelationSet(String, Vec<(String, String)>),
}

#[derive(Default)]
pub struct FakeHost {
    calls: Mutex<Vec<HostCall>>,
    pub fail_close_port: bool,
}

impl FakeHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Port operations in order, without status updates.
    pub fn port_calls(&self) -> Vec<HostCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, HostCall::OpenPort(_) | HostCall::ClosePort(_)))
            .cloned()
            .collect()
    }

    pub fn relation_sets(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                HostCall::RelationSet(id, settings) => Some((id.clone(), settings.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn last_status(&self) -> Option<(WorkloadStatus, String)> {
        self.calls.lock().iter().rev().find_map(|c| match c {
            HostCall::Status(status, message) => Some((*status, message.clone())),
            _ => None,
        })
    }
}

#[async_trait]
impl UnitHost for FakeHost {
    async fn set_status(&self, status: WorkloadStatus, message: &str) -> Result<(), HostError> {
        self.calls
            .lock()
            .push(HostCall::Status(status, message.to_string()));
        Ok(())
    }

    async fn open_port(&self, port: Port) -> Result<(), HostError> {
        self.calls.lock().push(HostCall::OpenPort(port.get()));
        Ok(())
    }

    async fn close_port(&self, port: Port) -> Result<(), HostError> {
        self.calls.lock().push(HostCall::ClosePort(port.get()));
        if self.fail_close_port {
            return Err(HostError::Failed {
                tool: "close-port".to_string(),
                exit_code: Some(1),
                stderr: "port not open".to_string(),
            });
        }
        Ok(())
    }

    async fn relation_set(
        &self,
        relation_id: &str,
        settings: &[(&str, String)],
    ) -> Result<(), HostError> {
        let settings = settings
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        self.calls
            .lock()
            .push(HostCall::RelationSet(relation_id.to_string(), settings));
        Ok(())
    }
}

// =============================================================================
// Fetcher
// =============================================================================

/// Fetcher that materializes a checkout directory with one page in it.
#[derive(Default)]
pub struct FakeFetcher {
    fetches: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl FakeFetcher {
    /// (repository, branch) pairs fetched so far.
    pub fn fetches(&self) -> Vec<(String, String)> {
        self.fetches.lock().clone()
    }
}

#[async_trait]
impl ContentFetcher for FakeFetcher {
    async fn fetch(
        &self,
        repository: &str,
        branch: &str,
        webroot: &Path,
    ) -> Result<PathBuf, FetchError> {
        self.fetches
            .lock()
            .push((repository.to_string(), branch.to_string()));
        if self.fail {
            return Err(FetchError::Git {
                command: "clone".to_string(),
                stderr: "repository not found".to_string(),
            });
        }

        let dest = checkout_dir(webroot, repository)?;
        fs::create_dir_all(&dest).map_err(|source| FetchError::Prepare {
            path: dest.clone(),
            source,
        })?;
        fs::write(dest.join("index.html"), format!("{repository}@{branch}")).map_err(
            |source| FetchError::Prepare {
                path: dest.clone(),
                source,
            },
        )?;
        Ok(dest)
    }
}

// =============================================================================
// Unit harness
// =============================================================================

/// One unit: a scratch directory for state and webroot plus fresh fakes.
#[derive(Default)]
pub struct Unit {
    pub runtime: FakeRuntime,
    pub host: FakeHost,
    pub fetcher: FakeFetcher,
    dir: Option<TempDir>,
}

impl Unit {
    pub fn new() -> Self {
        Self {
            dir: Some(TempDir::new().unwrap()),
            ..Self::default()
        }
    }

    fn root(&self) -> &Path {
        self.dir.as_ref().expect("unit created with Unit::new").path()
    }

    pub fn state_path(&self) -> PathBuf {
        self.root().join("unit-state.json")
    }

    pub fn webroot(&self) -> PathBuf {
        self.root().join("srv").join("docker-nginx")
    }

    /// Options with the given port and a webroot inside the scratch directory.
    pub fn config(&self, port: i64) -> CharmConfig {
        CharmConfig {
            port: Port::new(port).unwrap(),
            webroot: self.webroot(),
            ..CharmConfig::default()
        }
    }

    pub fn controller(
        &self,
        config: CharmConfig,
    ) -> Controller<'_, FakeRuntime, FakeHost, FakeFetcher> {
        self.controller_on(&self.runtime, config)
    }

    /// Controller driving another runtime than the unit's own.
    pub fn controller_on<'a>(
        &'a self,
        runtime: &'a FakeRuntime,
        config: CharmConfig,
    ) -> Controller<'a, FakeRuntime, FakeHost, FakeFetcher> {
        let store = UnitStore::open(self.state_path()).unwrap();
        Controller::new(runtime, &self.host, &self.fetcher, config, store).unwrap()
    }

    /// Controller driving `runtime`, with the unit's own runtime as the one
    /// selected by the previous options.
    pub fn controller_switching_to<'a>(
        &'a self,
        runtime: &'a FakeRuntime,
        config: CharmConfig,
    ) -> Controller<'a, FakeRuntime, FakeHost, FakeFetcher> {
        self.controller_on(runtime, config)
            .with_previous_runtime(&self.runtime)
    }

    /// Run one hook the way main does and return the resulting state.
    pub async fn hook(
        &self,
        event: HookEvent,
        config: CharmConfig,
    ) -> Result<UnitState, CharmError> {
        let mut controller = self.controller(config);
        controller.dispatch(&event).await?;
        Ok(controller.state().clone())
    }

    /// State as persisted on disk.
    pub fn stored_state(&self) -> Option<UnitState> {
        UnitStore::open(self.state_path())
            .unwrap()
            .get(STATE_KEY)
            .unwrap()
    }

    /// Seed the durable state, as if earlier hooks had run.
    pub fn seed(&self, state: &UnitState, config: &CharmConfig) {
        let mut store = UnitStore::open(self.state_path()).unwrap();
        store.set(STATE_KEY, state).unwrap();
        store.set(CONFIG_KEY, config).unwrap();
        store.flush().unwrap();
    }
}

pub fn joined(relation_id: &str) -> HookEvent {
    HookEvent::RelationJoined {
        relation_id: relation_id.to_string(),
    }
}
