use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    Normal,
    Degraded,
}

/// Per-frame fidelity choice. Holds nothing across frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LodDecision {
    pub mode: RenderMode,
    pub stride: usize,
    pub antialias: bool,
    pub highlight_active: bool,
}

impl LodDecision {
    /// Every `stride`-th item, order preserved.
    pub fn thin<'a, T>(&self, items: &'a [T]) -> impl Iterator<Item = &'a T> + 'a {
        items.iter().step_by(self.stride.max(1))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LodPolicy {
    /// Degrade when the visible count is strictly above this.
    pub degrade_above: usize,
    /// Stride is `visible / thin_divisor`, at least 1.
    pub thin_divisor: usize,
    /// Sounding-note highlight only below this count.
    pub highlight_below: usize,
}

impl Default for LodPolicy {
    fn default() -> Self {
        Self {
            degrade_above: 2000,
            thin_divisor: 3000,
            highlight_below: 1000,
        }
    }
}

impl LodPolicy {
    pub fn decide(&self, visible: usize) -> LodDecision {
        if visible > self.degrade_above {
            LodDecision {
                mode: RenderMode::Degraded,
                stride: (visible / self.thin_divisor.max(1)).max(1),
                antialias: false,
                highlight_active: false,
            }
        } else {
            LodDecision {
                mode: RenderMode::Normal,
                stride: 1,
                antialias: true,
                highlight_active: visible < self.highlight_below,
            }
        }
    }
}
