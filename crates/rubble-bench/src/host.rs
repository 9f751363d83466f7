use std::time::{Duration, Instant};

use rubble_sim::{FrameInput, Host};
use rubble_viz::{DrawItem, HudLine};
use tracing::{info, warn};

use crate::script::Script;

/// Stands in for a window: fixed or wall-clock frame times, scripted input,
/// HUD lines to the log instead of the screen.
pub struct HeadlessHost {
    frames: u64,
    frame: u64,
    dt: f64,
    realtime: bool,
    last: Instant,
    hud_every: u64,
    script: Script,
    capped: u64,
}

impl HeadlessHost {
    pub fn new(frames: u64, fps: f64, realtime: bool, hud_every: u64, script: Script) -> Self {
        Self { frames, frame: 0, dt: 1.0 / fps, realtime, last: Instant::now(), hud_every, script, capped: 0 }
    }

    /// Frames whose HUD carried the overload warning.
    pub fn capped_frames(&self) -> u64 { self.capped }
}

impl Host for HeadlessHost {
    fn close_requested(&mut self) -> bool { self.frame >= self.frames }

    fn frame_time(&mut self) -> f64 {
        if !self.realtime { return self.dt; }
        let target = Duration::from_secs_f64(self.dt);
        let spent = self.last.elapsed();
        if spent < target { std::thread::sleep(target - spent); }
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f64();
        self.last = now;
        dt
    }

    fn poll_input(&mut self) -> FrameInput { self.script.input_at(self.frame) }

    fn present(&mut self, _draw: &[DrawItem], hud: &[HudLine]) {
        if hud.first().is_some_and(|l| l.warn && l.text.starts_with("WARNING")) {
            self.capped += 1;
        }
        if self.hud_every != 0 && self.frame % self.hud_every == 0 {
            for line in hud {
                if line.warn { warn!("{}", line.text); } else { info!("{}", line.text); }
            }
        }
        self.frame += 1;
    }
}
