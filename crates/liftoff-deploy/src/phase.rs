use std::fmt;

/// One step of a deployment run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Validate,
    LoadSecrets,
    Authenticate,
    ProvisionGroup,
    ProvisionComputeResource,
    PublishArtifact,
    ConfigureRuntime,
    Deploy,
    ResolveEndpoint,
    Report,
}

impl Phase {
    pub const ALL: [Phase; 10] = [
        Phase::Validate,
        Phase::LoadSecrets,
        Phase::Authenticate,
        Phase::ProvisionGroup,
        Phase::ProvisionComputeResource,
        Phase::PublishArtifact,
        Phase::ConfigureRuntime,
        Phase::Deploy,
        Phase::ResolveEndpoint,
        Phase::Report,
    ];

    /// Progress line shown when the phase starts.
    pub fn title(self) -> &'static str {
        match self {
            Self::Validate => "Checking local tooling",
            Self::LoadSecrets => "Loading secrets",
            Self::Authenticate => "Checking Azure session",
            Self::ProvisionGroup => "Provisioning resource group",
            Self::ProvisionComputeResource => "Provisioning compute resources",
            Self::PublishArtifact => "Publishing container image",
            Self::ConfigureRuntime => "Configuring runtime",
            Self::Deploy => "Deploying",
            Self::ResolveEndpoint => "Resolving endpoint",
            Self::Report => "Summary",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validate => "Validate",
            Self::LoadSecrets => "LoadSecrets",
            Self::Authenticate => "Authenticate",
            Self::ProvisionGroup => "ProvisionGroup",
            Self::ProvisionComputeResource => "ProvisionComputeResource",
            Self::PublishArtifact => "PublishArtifact",
            Self::ConfigureRuntime => "ConfigureRuntime",
            Self::Deploy => "Deploy",
            Self::ResolveEndpoint => "ResolveEndpoint",
            Self::Report => "Report",
        };
        f.write_str(name)
    }
}
