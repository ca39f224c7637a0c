//! Guided breathing exercises.
//!
//! Each pattern is a fixed sequence of timed phases; [`BreathingExercise`]
//! walks the sequence one second per tick and counts completed cycles.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
    Rest,
}

#[derive(Debug, Clone, Copy)]
pub struct BreathStep {
    pub phase: BreathPhase,
    pub secs: u32,
    pub instruction: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct BreathingPattern {
    pub id: &'static str,
    pub name: &'static str,
    pub steps: &'static [BreathStep],
}

impl BreathingPattern {
    pub fn by_id(id: &str) -> Option<&'static BreathingPattern> {
        PATTERNS.iter().find(|p| p.id == id)
    }

    pub fn cycle_secs(&self) -> u32 {
        self.steps.iter().map(|s| s.secs).sum()
    }
}

pub const PATTERNS: &[BreathingPattern] = &[
    BreathingPattern {
        id: "box",
        name: "Box Breathing",
        steps: &[
            BreathStep {
                phase: BreathPhase::Inhale,
                secs: 4,
                instruction: "Breathe in slowly through your nose",
            },
            BreathStep {
                phase: BreathPhase::Hold,
                secs: 4,
                instruction: "Hold your breath",
            },
            BreathStep {
                phase: BreathPhase::Exhale,
                secs: 4,
                instruction: "Breathe out slowly through your mouth",
            },
            BreathStep {
                phase: BreathPhase::Rest,
                secs: 4,
                instruction: "Rest before the next breath",
            },
        ],
    },
    BreathingPattern {
        id: "relaxing",
        name: "4-7-8 Relaxing Breath",
        steps: &[
            BreathStep {
                phase: BreathPhase::Inhale,
                secs: 4,
                instruction: "Breathe in slowly through your nose",
            },
            BreathStep {
                phase: BreathPhase::Hold,
                secs: 7,
                instruction: "Hold your breath",
            },
            BreathStep {
                phase: BreathPhase::Exhale,
                secs: 8,
                instruction: "Breathe out slowly through your mouth",
            },
            BreathStep {
                phase: BreathPhase::Rest,
                secs: 2,
                instruction: "Rest before the next breath",
            },
        ],
    },
    BreathingPattern {
        id: "simple",
        name: "Simple Breathing",
        steps: &[
            BreathStep {
                phase: BreathPhase::Inhale,
                secs: 4,
                instruction: "Breathe in",
            },
            BreathStep {
                phase: BreathPhase::Hold,
                secs: 4,
                instruction: "Hold",
            },
            BreathStep {
                phase: BreathPhase::Exhale,
                secs: 4,
                instruction: "Breathe out",
            },
        ],
    },
];

/// A running exercise over one pattern.
#[derive(Debug, Clone)]
pub struct BreathingExercise {
    pattern: &'static BreathingPattern,
    step: usize,
    elapsed_in_step: u32,
    cycles_done: u32,
}

impl BreathingExercise {
    pub fn new(pattern: &'static BreathingPattern) -> Self {
        Self {
            pattern,
            step: 0,
            elapsed_in_step: 0,
            cycles_done: 0,
        }
    }

    pub fn pattern(&self) -> &'static BreathingPattern {
        self.pattern
    }

    pub fn current_step(&self) -> &'static BreathStep {
        &self.pattern.steps[self.step]
    }

    /// Seconds left in the current phase.
    pub fn remaining_in_step(&self) -> u32 {
        self.current_step().secs - self.elapsed_in_step
    }

    pub fn cycles_done(&self) -> u32 {
        self.cycles_done
    }

    /// Advance one second. Returns `true` when a full cycle just finished.
    pub fn tick(&mut self) -> bool {
        self.elapsed_in_step += 1;
        if self.elapsed_in_step < self.current_step().secs {
            return false;
        }
        self.elapsed_in_step = 0;
        self.step += 1;
        if self.step >= self.pattern.steps.len() {
            self.step = 0;
            self.cycles_done += 1;
            return true;
        }
        false
    }
}
