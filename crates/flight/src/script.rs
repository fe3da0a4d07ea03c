//! Scripted key holds for the headless runner.

use engine_core::ConfigError;
use input::{Control, KeyState};

use crate::config::ScriptSegment;

#[derive(Debug, Clone)]
struct Step {
    /// First tick after this step ends.
    until: u64,
    hold: Vec<Control>,
}

/// A parsed flight script: consecutive segments of held controls.
#[derive(Debug, Clone, Default)]
pub struct FlightScript {
    steps: Vec<Step>,
}

impl FlightScript {
    pub fn from_segments(segments: &[ScriptSegment]) -> Result<Self, ConfigError> {
        let mut steps = Vec::with_capacity(segments.len());
        let mut until = 0u64;
        for segment in segments {
            let hold = segment
                .hold
                .iter()
                .map(|name| {
                    Control::from_name(name).ok_or_else(|| ConfigError::UnknownName {
                        field: "session.script.hold",
                        value: name.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            until += u64::from(segment.ticks);
            steps.push(Step { until, hold });
        }
        Ok(Self { steps })
    }

    /// Total scripted ticks.
    pub fn len(&self) -> u64 {
        self.steps.last().map_or(0, |s| s.until)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Controls held at `tick`. Empty once the script has run out.
    pub fn held_at(&self, tick: u64) -> &[Control] {
        self.steps
            .iter()
            .find(|s| tick < s.until)
            .map_or(&[][..], |s| s.hold.as_slice())
    }

    /// Set every control's held state for `tick`.
    pub fn apply(&self, tick: u64, keys: &mut KeyState) {
        let held = self.held_at(tick);
        for control in Control::ALL {
            keys.set_held(control, held.contains(&control));
        }
    }
}
