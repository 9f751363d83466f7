/// Per-tick counters reported by `World::collide` and `World::quick_step`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    pub pairs_tested: u32,
    pub contacts: u32,
    pub joint_rows: u32,
    pub awake: u32,
    pub fell_asleep: u32,
}
