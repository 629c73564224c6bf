//! Bit position masks.

use crate::layout::BITS_PER_BYTE;

/// Table mapping bit position `i` (0 = least significant) to `1 << i`.
///
/// Built once per engine and shared by every byte render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitMaskTable([u8; BITS_PER_BYTE as usize]);

impl BitMaskTable {
    pub fn new() -> Self {
        Self(std::array::from_fn(|position| {
            u32::try_from(position)
                .ok()
                .and_then(|shift| 1u8.checked_shl(shift))
                .unwrap_or(0)
        }))
    }

    /// Mask isolating bit `position`, or `None` past bit 7.
    pub fn mask(&self, position: usize) -> Option<u8> {
        self.0.get(position).copied()
    }

    /// Whether bit `position` of `byte` is set. Positions past 7 read as unset.
    pub fn is_set(&self, byte: u8, position: usize) -> bool {
        self.mask(position).is_some_and(|mask| byte & mask != 0)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Default for BitMaskTable {
    fn default() -> Self {
        Self::new()
    }
}
