//! Background service management
//!
//! Installs the notifier as a per-user launchd agent and drives it through
//! `launchctl`. Every command returns a one-line status for the terminal.

mod launchd;

pub use launchd::{plist, Launchctl};

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const SERVICE_NAME: &str = "bittrex_notifier";
pub const SERVICE_DESCRIPTION: &str = "OS X Notification of pump & dumps on Bittrex";

/// Output of one external command
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs the service-control program
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, args: &[&str]) -> Result<CommandOutput>;
}

/// Service state as reported by launchd
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Running { pid: u32 },
    /// Registered with launchd but without a process, e.g. throttled after crashes
    Loaded,
    Stopped,
}

pub struct ServiceManager {
    name: String,
    description: String,
    plist_path: PathBuf,
    executable: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl ServiceManager {
    /// Agent for the current user, pointing at the running executable
    pub fn new(name: &str, description: &str) -> Result<Self> {
        let agents = shellexpand::tilde("~/Library/LaunchAgents").into_owned();
        let plist_path = Path::new(&agents).join(format!("{}.plist", name));
        let executable = std::env::current_exe()?;
        Ok(Self::with_paths(name, description, plist_path, executable, Arc::new(Launchctl)))
    }

    pub fn with_paths(
        name: &str,
        description: &str,
        plist_path: PathBuf,
        executable: PathBuf,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            plist_path,
            executable,
            runner,
        }
    }

    pub fn plist_path(&self) -> &Path {
        &self.plist_path
    }

    pub fn is_installed(&self) -> bool {
        self.plist_path.is_file()
    }

    pub async fn install(&self) -> Result<String> {
        if self.is_installed() {
            return Err(Error::Service("Service has already been installed".into()));
        }
        if let Some(dir) = self.plist_path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let contents = plist(&self.name, &self.executable);
        tokio::fs::write(&self.plist_path, contents).await?;
        debug!("Wrote {}", self.plist_path.display());
        Ok(format!("Install {}:\t[  OK  ]", self.description))
    }

    pub async fn remove(&self) -> Result<String> {
        if !self.is_installed() {
            return Err(Error::Service("Service is not installed".into()));
        }
        if self.state().await? != ServiceState::Stopped {
            self.launchctl(&["unload", &self.plist_arg()]).await?;
        }
        tokio::fs::remove_file(&self.plist_path).await?;
        Ok(format!("Removing {}:\t[  OK  ]", self.description))
    }

    pub async fn start(&self) -> Result<String> {
        if !self.is_installed() {
            return Err(Error::Service("Service is not installed".into()));
        }
        match self.state().await? {
            ServiceState::Running { .. } => {
                return Err(Error::Service("Service is already running".into()));
            }
            ServiceState::Loaded => self.launchctl(&["unload", &self.plist_arg()]).await?,
            ServiceState::Stopped => {}
        }
        self.launchctl(&["load", &self.plist_arg()]).await?;
        Ok(format!("Starting {}:\t[  OK  ]", self.description))
    }

    pub async fn stop(&self) -> Result<String> {
        if !self.is_installed() {
            return Err(Error::Service("Service is not installed".into()));
        }
        if self.state().await? == ServiceState::Stopped {
            return Err(Error::Service("Service has already been stopped".into()));
        }
        self.launchctl(&["unload", &self.plist_arg()]).await?;
        Ok(format!("Stopping {}:\t[  OK  ]", self.description))
    }

    pub async fn status(&self) -> Result<String> {
        if !self.is_installed() {
            return Err(Error::Service("Service is not installed".into()));
        }
        Ok(match self.state().await? {
            ServiceState::Running { pid } => format!("Service (pid  {}) is running...", pid),
            ServiceState::Loaded => "Service is loaded but not running".to_string(),
            ServiceState::Stopped => "Service is stopped".to_string(),
        })
    }

    pub async fn state(&self) -> Result<ServiceState> {
        let output = self.runner.run(&["list", &self.name]).await?;
        if !output.success {
            return Ok(ServiceState::Stopped);
        }
        Ok(parse_pid(&output.stdout)
            .map(|pid| ServiceState::Running { pid })
            .unwrap_or(ServiceState::Loaded))
    }

    fn plist_arg(&self) -> String {
        self.plist_path.to_string_lossy().into_owned()
    }

    async fn launchctl(&self, args: &[&str]) -> Result<()> {
        let output = self.runner.run(args).await?;
        if !output.success {
            return Err(Error::Service(format!(
                "launchctl {} failed: {}",
                args.join(" "),
                output.stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Pull the pid out of `launchctl list <label>` output (`"PID" = 123;`)
pub fn parse_pid(output: &str) -> Option<u32> {
    output.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        if key.trim().trim_matches('"') != "PID" {
            return None;
        }
        value.trim().trim_end_matches(';').trim().parse().ok()
    })
}
