use std::path::Path;

use anyhow::{Context, Result};
use rubble_sim::FrameInput;
use serde::Deserialize;

/// Holds `input` for `len` frames starting at frame `start`. A toggle in
/// `input` fires on the first of those frames only.
#[derive(Clone, Debug, Deserialize)]
pub struct ScriptEntry {
    pub start: u64,
    #[serde(default = "one")]
    pub len: u64,
    #[serde(flatten)]
    pub input: FrameInput,
}

fn one() -> u64 { 1 }

/// Scripted input schedule. Overlapping entries combine.
#[derive(Clone, Debug, Default)]
pub struct Script {
    entries: Vec<ScriptEntry>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing script {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let entries: Vec<ScriptEntry> = serde_json::from_str(text)?;
        Ok(Self { entries })
    }

    pub fn input_at(&self, frame: u64) -> FrameInput {
        let mut out = FrameInput::default();
        for e in &self.entries {
            if frame < e.start || frame - e.start >= e.len { continue; }
            let i = &e.input;
            out.driver.accelerate |= i.driver.accelerate;
            out.driver.brake |= i.driver.brake;
            out.driver.steer_left |= i.driver.steer_left;
            out.driver.steer_right |= i.driver.steer_right;
            out.impulse |= i.impulse;
            out.toggle_anti_sway |= i.toggle_anti_sway && frame == e.start;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_cover_their_window() {
        let s = Script::parse(r#"[
            { "start": 10, "len": 5, "accelerate": true },
            { "start": 12, "steer_left": true, "toggle_anti_sway": true, "len": 3 }
        ]"#).unwrap();
        assert_eq!(s.input_at(9), FrameInput::default());
        assert!(s.input_at(10).driver.accelerate);
        assert!(!s.input_at(15).driver.accelerate);

        let at12 = s.input_at(12);
        assert!(at12.driver.accelerate && at12.driver.steer_left && at12.toggle_anti_sway);
        let at13 = s.input_at(13);
        assert!(at13.driver.steer_left && !at13.toggle_anti_sway);
    }

    #[test]
    fn len_defaults_to_one_frame() {
        let s = Script::parse(r#"[{ "start": 3, "impulse": true }]"#).unwrap();
        assert!(s.input_at(3).impulse);
        assert!(!s.input_at(4).impulse);
    }
}
