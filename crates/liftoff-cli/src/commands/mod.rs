mod deploy;
mod destroy;
mod doctor;
mod logs;

use std::path::PathBuf;

use liftoff_core::{DeploymentConfig, LiftoffConfig, RunToken, Topology};

pub use deploy::deploy;
pub use destroy::destroy;
pub use doctor::doctor;
pub use logs::logs;

/// Project directory plus the config file location chosen on the command line.
pub struct Project {
    pub dir: PathBuf,
    config_path: Option<PathBuf>,
}

impl Project {
    pub fn new(dir: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self { dir, config_path }
    }

    pub fn load_config(&self) -> liftoff_core::Result<LiftoffConfig> {
        match &self.config_path {
            Some(path) => LiftoffConfig::load_file(path),
            None => LiftoffConfig::load(&self.dir),
        }
    }
}

/// Command-line values that win over liftoff.toml.
#[derive(Default)]
pub struct Overrides {
    pub topology: Option<Topology>,
    pub secrets_file: Option<PathBuf>,
    pub run_token: Option<RunToken>,
}

impl Overrides {
    /// Apply the overrides and resolve names for this run.
    pub fn resolve(self, mut config: LiftoffConfig, project: &Project) -> DeploymentConfig {
        if let Some(topology) = self.topology {
            config.project.topology = topology;
        }
        if let Some(file) = self.secrets_file {
            config.secrets.file = file;
        }
        let token = match self.run_token {
            Some(token) => token,
            None => RunToken::now(),
        };
        DeploymentConfig::compute(&config, token, &project.dir)
    }
}
