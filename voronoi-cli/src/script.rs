//! Interaction scripts: what the user clicks and how the window is resized,
//! frame by frame.
//!
//! ## YAML script file
//!
//! ```yaml
//! width: 800
//! height: 600
//! sites: 30
//! seed: 0
//! frames:
//!   - click: [400, 300]   # screen coordinates
//!   - hold: 10            # idle frames
//!   - resize: [1024, 768]
//! ```
//!
//! ## Inline steps
//!
//! ```text
//! voronoi-view -o out.gif -s click=400,300 -s hold=10 -s resize=1024x768
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use voronoi_core::FrameInput;

/// One scripted user action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Press and release the left button at a screen position
    Click { x: f64, y: f64 },
    /// Resize the window
    Resize { width: u32, height: u32 },
    /// Idle frames
    Hold { frames: usize },
}

/// YAML script file format
#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub sites: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub frames: Vec<StepSpec>,
}

/// A step in the YAML script (exactly one key)
#[derive(Debug, Deserialize)]
pub struct StepSpec {
    click: Option<[f64; 2]>,
    resize: Option<[u32; 2]>,
    hold: Option<usize>,
}

impl StepSpec {
    pub fn to_step(&self) -> anyhow::Result<Step> {
        match (self.click, self.resize, self.hold) {
            (Some([x, y]), None, None) => Ok(Step::Click { x, y }),
            (None, Some([width, height]), None) => {
                if width == 0 || height == 0 {
                    anyhow::bail!("resize to {}x{}: dimensions must be positive", width, height);
                }
                Ok(Step::Resize { width, height })
            }
            (None, None, Some(frames)) => Ok(Step::Hold { frames }),
            _ => anyhow::bail!(
                "invalid step: provide exactly one of click, resize or hold. Got: {:?}",
                self
            ),
        }
    }
}

impl Script {
    pub fn steps(&self) -> anyhow::Result<Vec<Step>> {
        self.frames.iter().map(StepSpec::to_step).collect()
    }
}

pub fn load_script(path: &Path) -> anyhow::Result<Script> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script file: {:?}", path))?;
    parse_script(&contents).with_context(|| format!("failed to parse script file: {:?}", path))
}

pub fn parse_script(contents: &str) -> anyhow::Result<Script> {
    Ok(serde_yaml::from_str(contents)?)
}

/// Parse an inline step like "click=400,300", "resize=1024x768" or "hold=10"
pub fn parse_step(spec: &str) -> anyhow::Result<Step> {
    let spec = spec.trim();
    if let Some(val) = spec.strip_prefix("click=") {
        let (x, y) = val
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("click expects x,y, got '{}'", val))?;
        Ok(Step::Click {
            x: x.trim().parse().context("invalid click x")?,
            y: y.trim().parse().context("invalid click y")?,
        })
    } else if let Some(val) = spec.strip_prefix("resize=") {
        let (w, h) = val
            .split_once('x')
            .ok_or_else(|| anyhow::anyhow!("resize expects WxH, got '{}'", val))?;
        let width: u32 = w.trim().parse().context("invalid resize width")?;
        let height: u32 = h.trim().parse().context("invalid resize height")?;
        if width == 0 || height == 0 {
            anyhow::bail!("resize to {}x{}: dimensions must be positive", width, height);
        }
        Ok(Step::Resize { width, height })
    } else if let Some(val) = spec.strip_prefix("hold=") {
        Ok(Step::Hold { frames: val.trim().parse().context("invalid hold")? })
    } else {
        anyhow::bail!("unknown step '{}' (expected click=, resize= or hold=)", spec)
    }
}

/// Expand steps into per-frame input, starting from an idle frame at `size`.
///
/// A click takes two frames (press, release) so back-to-back clicks are
/// separate presses.
pub fn frames(size: (u32, u32), steps: &[Step]) -> Vec<FrameInput> {
    let mut current = FrameInput { size, cursor: (0.0, 0.0), left_down: false };
    let mut out = vec![current];

    for step in steps {
        match *step {
            Step::Click { x, y } => {
                current.cursor = (x, y);
                current.left_down = true;
                out.push(current);
                current.left_down = false;
                out.push(current);
            }
            Step::Resize { width, height } => {
                current.size = (width, height);
                out.push(current);
            }
            Step::Hold { frames } => {
                out.extend(std::iter::repeat(current).take(frames));
            }
        }
    }
    out
}
