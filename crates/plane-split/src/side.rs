//! Point/plane side classification as a closed set of bit flags.

use std::ops::{BitOr, BitOrAssign};

/// Where a point, an edge or a whole polygon lies relative to a plane.
///
/// The three primitive sides are single bits; every OR-combination of them
/// has its own named variant so combining sides never produces an unnamed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum PlaneSide {
    /// Not classified yet.
    #[default]
    Nowhere = 0x00,
    /// Strictly on the positive side of the normal.
    Above = 0x01,
    /// Within the plane's tolerance.
    On = 0x02,
    /// `On | Above`
    OnAbove = 0x03,
    /// Strictly on the negative side of the normal.
    Below = 0x04,
    /// `Above | Below`
    AboveBelow = 0x05,
    /// `On | Below`
    OnBelow = 0x06,
    /// `Above | On | Below`
    Cross = 0x07,
}

impl PlaneSide {
    /// Returns the raw flag bits.
    #[inline]
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Builds a side from flag bits; bits above `0x07` are ignored.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0x01 => PlaneSide::Above,
            0x02 => PlaneSide::On,
            0x03 => PlaneSide::OnAbove,
            0x04 => PlaneSide::Below,
            0x05 => PlaneSide::AboveBelow,
            0x06 => PlaneSide::OnBelow,
            0x07 => PlaneSide::Cross,
            _ => PlaneSide::Nowhere,
        }
    }

    /// Returns true if every flag of `other` is also set in `self`.
    #[inline]
    pub fn contains(self, other: PlaneSide) -> bool {
        self.bits() & other.bits() == other.bits()
    }

    /// True for an edge or polygon with points strictly on both sides.
    #[inline]
    pub fn straddles(self) -> bool {
        self.contains(PlaneSide::AboveBelow)
    }
}

impl BitOr for PlaneSide {
    type Output = PlaneSide;

    #[inline]
    fn bitor(self, rhs: PlaneSide) -> PlaneSide {
        PlaneSide::from_bits(self.bits() | rhs.bits())
    }
}

impl BitOrAssign for PlaneSide {
    #[inline]
    fn bitor_assign(&mut self, rhs: PlaneSide) {
        *self = *self | rhs;
    }
}
