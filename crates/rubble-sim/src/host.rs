use rubble_viz::{hud_lines, DrawItem, HudLine};

use crate::input::FrameInput;
use crate::sandbox::Sandbox;

/// Window, clock and input device of a sandbox frontend.
pub trait Host {
    /// Polled once per frame, before anything else.
    fn close_requested(&mut self) -> bool;
    /// Seconds since the previous frame.
    fn frame_time(&mut self) -> f64;
    fn poll_input(&mut self) -> FrameInput;
    fn present(&mut self, draw: &[DrawItem], hud: &[HudLine]);
}

/// Drives frames until the host asks to close. Returns the frame count.
pub fn run<H: Host + ?Sized>(sandbox: &mut Sandbox, host: &mut H) -> u64 {
    let mut frames = 0u64;
    while !host.close_requested() {
        let dt = host.frame_time();
        let input = host.poll_input();
        sandbox.frame(dt, &input);
        host.present(&sandbox.draw_list(), &hud_lines(&sandbox.hud()));
        frames += 1;
    }
    frames
}
