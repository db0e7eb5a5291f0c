//! Privilege checks gating every lifecycle operation.

/// Reports whether the caller may mutate system service state.
pub trait PrivilegeChecker {
    fn has_privileges(&self) -> bool;
}

/// Requires an effective uid of 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct RootPrivileges;

#[cfg(unix)]
impl PrivilegeChecker for RootPrivileges {
    fn has_privileges(&self) -> bool {
        nix::unistd::geteuid().is_root()
    }
}

#[cfg(not(unix))]
impl PrivilegeChecker for RootPrivileges {
    fn has_privileges(&self) -> bool {
        false
    }
}

/// Fixed answer, for embedding callers that do their own gating.
#[derive(Debug, Clone, Copy)]
pub struct StaticPrivileges(pub bool);

impl PrivilegeChecker for StaticPrivileges {
    fn has_privileges(&self) -> bool {
        self.0
    }
}
