/// Everything the HUD shows for one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HudStats {
    pub fps: u32,
    pub accel: f32,
    pub steer: f32,
    pub anti_sway: bool,
    /// Ticks run this frame.
    pub steps: u32,
    /// The step cap was hit this frame.
    pub capped: bool,
    /// Seconds spent stepping this frame.
    pub phys_time: f64,
    /// Seconds of accumulated time not yet simulated.
    pub leftover: f64,
    /// Wall time of the whole frame.
    pub frame_time: f64,
    pub objects: u32,
    pub roll: f32,
    pub mph: f32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudLine {
    pub text: String,
    /// Draw in the warning colour.
    pub warn: bool,
}

impl HudLine {
    fn info(text: String) -> Self { Self { text, warn: false } }
    fn warn(text: &str) -> Self { Self { text: text.to_owned(), warn: true } }
}

/// HUD text, top to bottom.
pub fn hud_lines(s: &HudStats) -> Vec<HudLine> {
    let mut out = Vec::with_capacity(12);
    if s.capped { out.push(HudLine::warn("WARNING CPU overloaded lagging real time")); }
    out.push(HudLine::info(format!("{:2} FPS", s.fps)));
    out.push(HudLine::info(format!("accel {:4.4}", s.accel)));
    out.push(HudLine::info(format!("steer {:4.4}", s.steer)));
    if !s.anti_sway { out.push(HudLine::warn("Anti sway bars OFF")); }
    out.push(HudLine::info(format!("Phys steps per frame {}", s.steps)));
    out.push(HudLine::info(format!("Phys time per frame {:.6}", s.phys_time)));
    out.push(HudLine::info(format!("Leftover time {:.6}", s.leftover)));
    out.push(HudLine::info(format!("total time per frame {:.6}", s.frame_time)));
    out.push(HudLine::info(format!("objects {}", s.objects)));
    out.push(HudLine::info(format!("roll {:.4}", s.roll.abs())));
    out.push(HudLine::info(format!("mph {:.4}", s.mph)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_only_when_needed() {
        let calm = HudStats { anti_sway: true, fps: 60, steps: 4, objects: 305, ..Default::default() };
        let lines = hud_lines(&calm);
        assert!(lines.iter().all(|l| !l.warn));
        assert_eq!(lines[0].text, "60 FPS");
        assert!(lines.iter().any(|l| l.text == "objects 305"));

        let bad = HudStats { capped: true, anti_sway: false, ..calm };
        let lines = hud_lines(&bad);
        assert_eq!(lines.len(), hud_lines(&calm).len() + 2);
        assert!(lines[0].warn && lines[0].text.starts_with("WARNING CPU"));
        assert!(lines.iter().any(|l| l.warn && l.text == "Anti sway bars OFF"));
    }

    #[test]
    fn roll_is_shown_unsigned() {
        let lines = hud_lines(&HudStats { roll: -1.5, mph: 12.0, anti_sway: true, ..Default::default() });
        assert!(lines.iter().any(|l| l.text == "roll 1.5000"));
        assert!(lines.iter().any(|l| l.text == "mph 12.0000"));
    }
}
