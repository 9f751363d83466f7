use rubble_controllers::DriverInput;
use serde::{Deserialize, Serialize};

/// Input sampled once per frame. `driver` and `impulse` are held signals;
/// `toggle_anti_sway` is an edge and should be true for one frame only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameInput {
    #[serde(flatten)]
    pub driver: DriverInput,
    pub impulse: bool,
    pub toggle_anti_sway: bool,
}
