//! Pad regions and bitmask region sets.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A single addressable actuator pad on the suit.
///
/// The discriminant is the bit index of the pad inside a [`RegionSet`]:
/// left-side pads use bits 0..8, right-side pads bits 16..24.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum Region {
    ForearmLeft = 0,
    UpperArmLeft = 1,
    ShoulderLeft = 2,
    BackLeft = 3,
    ChestLeft = 4,
    UpperAbLeft = 5,
    MidAbLeft = 6,
    LowerAbLeft = 7,

    ForearmRight = 16,
    UpperArmRight = 17,
    ShoulderRight = 18,
    BackRight = 19,
    ChestRight = 20,
    UpperAbRight = 21,
    MidAbRight = 22,
    LowerAbRight = 23,
}

impl Region {
    /// Every pad, left side first.
    pub const ALL: [Region; 16] = [
        Region::ForearmLeft,
        Region::UpperArmLeft,
        Region::ShoulderLeft,
        Region::BackLeft,
        Region::ChestLeft,
        Region::UpperAbLeft,
        Region::MidAbLeft,
        Region::LowerAbLeft,
        Region::ForearmRight,
        Region::UpperArmRight,
        Region::ShoulderRight,
        Region::BackRight,
        Region::ChestRight,
        Region::UpperAbRight,
        Region::MidAbRight,
        Region::LowerAbRight,
    ];

    /// The mask bit for this pad.
    pub const fn bit(self) -> u32 {
        1 << (self as u32)
    }

    pub const fn as_set(self) -> RegionSet {
        RegionSet(self.bit())
    }

    /// Stable snake_case identifier, matching the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ForearmLeft => "forearm_left",
            Self::UpperArmLeft => "upper_arm_left",
            Self::ShoulderLeft => "shoulder_left",
            Self::BackLeft => "back_left",
            Self::ChestLeft => "chest_left",
            Self::UpperAbLeft => "upper_ab_left",
            Self::MidAbLeft => "mid_ab_left",
            Self::LowerAbLeft => "lower_ab_left",
            Self::ForearmRight => "forearm_right",
            Self::UpperArmRight => "upper_arm_right",
            Self::ShoulderRight => "shoulder_right",
            Self::BackRight => "back_right",
            Self::ChestRight => "chest_right",
            Self::UpperAbRight => "upper_ab_right",
            Self::MidAbRight => "mid_ab_right",
            Self::LowerAbRight => "lower_ab_right",
        }
    }

    /// The pad whose mask bit is exactly `bit`.
    pub fn from_bit(bit: u32) -> Option<Region> {
        Self::ALL.iter().copied().find(|r| r.bit() == bit)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidArgument {
                name: "region",
                message: format!("unknown region name '{s}'"),
            })
    }
}

// ============================================================================
// RegionSet
// ============================================================================

/// A union of zero or more pads, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionSet(pub u32);

impl RegionSet {
    pub const NONE: RegionSet = RegionSet(0);
    pub const LEFT_ALL: RegionSet = RegionSet(0x0000_00FF);
    pub const RIGHT_ALL: RegionSet = RegionSet(0x00FF_0000);
    pub const ALL: RegionSet = RegionSet(0x00FF_00FF);
    pub const BACK_BOTH: RegionSet =
        RegionSet(Region::BackLeft.bit() | Region::BackRight.bit());
    pub const CHEST_BOTH: RegionSet =
        RegionSet(Region::ChestLeft.bit() | Region::ChestRight.bit());
    pub const ARMS_BOTH: RegionSet = RegionSet(
        Region::ForearmLeft.bit()
            | Region::UpperArmLeft.bit()
            | Region::ForearmRight.bit()
            | Region::UpperArmRight.bit(),
    );
    pub const ABS_ALL: RegionSet = RegionSet(
        Region::UpperAbLeft.bit()
            | Region::MidAbLeft.bit()
            | Region::LowerAbLeft.bit()
            | Region::UpperAbRight.bit()
            | Region::MidAbRight.bit()
            | Region::LowerAbRight.bit(),
    );

    pub const fn empty() -> Self {
        Self::NONE
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of set bits.
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Exactly one bit set.
    pub const fn is_single(self) -> bool {
        self.0.is_power_of_two()
    }

    /// The lone pad in this set, if the set names exactly one known pad.
    pub fn single(self) -> Option<Region> {
        if self.is_single() { Region::from_bit(self.0) } else { None }
    }

    pub const fn contains(self, region: Region) -> bool {
        self.0 & region.bit() != 0
    }

    pub const fn union(self, other: RegionSet) -> RegionSet {
        RegionSet(self.0 | other.0)
    }

    pub const fn intersection(self, other: RegionSet) -> RegionSet {
        RegionSet(self.0 & other.0)
    }

    /// Set difference: `self` without any pad in `other`.
    pub const fn remove(self, other: RegionSet) -> RegionSet {
        RegionSet(self.0 & !other.0)
    }

    /// Member pads in [`Region::ALL`] order. Bits that name no pad are skipped.
    pub fn iter(self) -> impl Iterator<Item = Region> {
        Region::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl From<Region> for RegionSet {
    fn from(region: Region) -> Self {
        region.as_set()
    }
}

impl FromIterator<Region> for RegionSet {
    fn from_iter<I: IntoIterator<Item = Region>>(iter: I) -> Self {
        iter.into_iter().fold(RegionSet::NONE, |acc, r| acc | r)
    }
}

impl BitOr for RegionSet {
    type Output = RegionSet;
    fn bitor(self, rhs: RegionSet) -> RegionSet {
        self.union(rhs)
    }
}

impl BitOr<Region> for RegionSet {
    type Output = RegionSet;
    fn bitor(self, rhs: Region) -> RegionSet {
        self.union(rhs.as_set())
    }
}

impl BitOr for Region {
    type Output = RegionSet;
    fn bitor(self, rhs: Region) -> RegionSet {
        self.as_set().union(rhs.as_set())
    }
}

impl BitOrAssign for RegionSet {
    fn bitor_assign(&mut self, rhs: RegionSet) {
        self.0 |= rhs.0;
    }
}

impl BitOrAssign<Region> for RegionSet {
    fn bitor_assign(&mut self, rhs: Region) {
        self.0 |= rhs.bit();
    }
}

impl BitAnd for RegionSet {
    type Output = RegionSet;
    fn bitand(self, rhs: RegionSet) -> RegionSet {
        self.intersection(rhs)
    }
}

impl fmt::Display for RegionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for region in self.iter() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(region.as_str())?;
            first = false;
        }
        Ok(())
    }
}
