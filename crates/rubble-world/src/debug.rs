use serde::{Deserialize, Serialize};

/// Periodic console report of world state, emitted through `tracing`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    /// Report every N ticks; 0 disables.
    pub print_every: u32,
    pub show_energy: bool,
    pub show_bodies: bool,
    pub show_contacts: bool,
    pub max_lines: usize,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self { print_every: 0, show_energy: true, show_bodies: false, show_contacts: false, max_lines: 16 }
    }
}
