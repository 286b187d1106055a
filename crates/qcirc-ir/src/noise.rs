//! Noise channel annotations.
//!
//! Noise nodes are metadata: they occupy a step on one qubit, travel through
//! the textual codec as comment pragmas and are skipped by the simulator.
//! Channel names outside the known set are preserved verbatim in
//! [`NoiseChannel::Other`] so that annotations written by newer tools survive
//! a round trip.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The physical process a noise annotation describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoiseChannel {
    /// Depolarizing channel.
    Depolarizing,
    /// Amplitude damping (T1 decay).
    AmplitudeDamping,
    /// Phase damping (dephasing).
    PhaseDamping,
    /// Bit-flip channel.
    BitFlip,
    /// Phase-flip channel.
    PhaseFlip,
    /// Readout error.
    ReadoutError,
    /// Any other channel, by name.
    Other(String),
}

impl NoiseChannel {
    /// Probability used when an annotation carries none.
    pub const DEFAULT_PROBABILITY: f64 = 0.01;

    /// Parse a channel name. Unknown names become [`NoiseChannel::Other`].
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "depolarizing" => NoiseChannel::Depolarizing,
            "amplitude_damping" => NoiseChannel::AmplitudeDamping,
            "phase_damping" => NoiseChannel::PhaseDamping,
            "bit_flip" => NoiseChannel::BitFlip,
            "phase_flip" => NoiseChannel::PhaseFlip,
            "readout_error" => NoiseChannel::ReadoutError,
            _ => NoiseChannel::Other(name.to_string()),
        }
    }

    /// Textual name of the channel.
    pub fn name(&self) -> &str {
        match self {
            NoiseChannel::Depolarizing => "depolarizing",
            NoiseChannel::AmplitudeDamping => "amplitude_damping",
            NoiseChannel::PhaseDamping => "phase_damping",
            NoiseChannel::BitFlip => "bit_flip",
            NoiseChannel::PhaseFlip => "phase_flip",
            NoiseChannel::ReadoutError => "readout_error",
            NoiseChannel::Other(name) => name,
        }
    }
}

impl fmt::Display for NoiseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
