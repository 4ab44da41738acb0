//! Funnel stages and their fixed default ordering.

use super::{Record, fields};

/// One of the ordered milestones a prospective user passes through.
///
/// The derived `Ord` follows declaration order, which is the default
/// ordering used when no explicit sort key is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FunnelStage {
    ClickedLink,
    DemoStarted,
    DemoEnded,
    RegistrationComplete,
    Unknown,
}

impl FunnelStage {
    pub const ALL: [FunnelStage; 5] = [
        FunnelStage::ClickedLink,
        FunnelStage::DemoStarted,
        FunnelStage::DemoEnded,
        FunnelStage::RegistrationComplete,
        FunnelStage::Unknown,
    ];

    /// Rank in the default ordering, 1-based.
    pub fn rank(self) -> u8 {
        match self {
            FunnelStage::ClickedLink => 1,
            FunnelStage::DemoStarted => 2,
            FunnelStage::DemoEnded => 3,
            FunnelStage::RegistrationComplete => 4,
            FunnelStage::Unknown => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FunnelStage::ClickedLink => "Clicked Link",
            FunnelStage::DemoStarted => "Demo Started",
            FunnelStage::DemoEnded => "Demo Ended",
            FunnelStage::RegistrationComplete => "Registration Complete",
            FunnelStage::Unknown => "Unknown",
        }
    }

    /// Parse a stage label. Anything unrecognized is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Clicked Link" => FunnelStage::ClickedLink,
            "Demo Started" => FunnelStage::DemoStarted,
            "Demo Ended" => FunnelStage::DemoEnded,
            "Registration Complete" => FunnelStage::RegistrationComplete,
            _ => FunnelStage::Unknown,
        }
    }

    /// Derive the stage from the most advanced timestamp field present.
    pub fn from_timestamps(record: &Record) -> Self {
        let reached = [
            FunnelStage::ClickedLink,
            FunnelStage::DemoStarted,
            FunnelStage::DemoEnded,
            FunnelStage::RegistrationComplete,
        ];

        fields::TIMESTAMPS
            .iter()
            .zip(reached)
            .rev()
            .find(|(field, _)| record.text(field).is_some_and(|v| !v.trim().is_empty()))
            .map(|(_, stage)| stage)
            .unwrap_or(FunnelStage::Unknown)
    }
}

impl std::fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
