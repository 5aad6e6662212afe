//! Scheduler configuration.

/// What the kernel reports when a caller misuses the protocol, e.g. yields
/// without having registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MisusePolicy {
    /// Log the misuse and report success to the caller.
    #[default]
    Silent,
    /// Propagate the protocol error to the caller.
    Report,
}

/// Limits and policies for a container scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerConfig {
    max_groups: Option<usize>,
    max_members_per_group: Option<usize>,
    misuse: MisusePolicy,
}

impl ContainerConfig {
    /// Unlimited containers and members, silent misuse.
    pub const fn new() -> Self {
        Self {
            max_groups: None,
            max_members_per_group: None,
            misuse: MisusePolicy::Silent,
        }
    }

    /// Cap the number of live containers.
    pub const fn max_groups(mut self, limit: usize) -> Self {
        self.max_groups = Some(limit);
        self
    }

    /// Cap the number of members a single container may hold.
    pub const fn max_members_per_group(mut self, limit: usize) -> Self {
        self.max_members_per_group = Some(limit);
        self
    }

    pub const fn misuse(mut self, policy: MisusePolicy) -> Self {
        self.misuse = policy;
        self
    }

    pub const fn group_limit(&self) -> Option<usize> {
        self.max_groups
    }

    pub const fn member_limit(&self) -> Option<usize> {
        self.max_members_per_group
    }

    pub const fn misuse_policy(&self) -> MisusePolicy {
        self.misuse
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self::new()
    }
}
