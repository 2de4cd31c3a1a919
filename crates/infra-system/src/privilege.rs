// Effective privilege of the triage process

use nix::unistd::Uid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    Root,
    Unprivileged { uid: u32 },
}

/// Many probes read root-only state; unprivileged runs record denials instead
pub fn effective_privilege() -> Privilege {
    let uid = Uid::effective();
    if uid.is_root() {
        Privilege::Root
    } else {
        Privilege::Unprivileged { uid: uid.as_raw() }
    }
}
