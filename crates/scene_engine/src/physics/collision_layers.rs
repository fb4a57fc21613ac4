//! Collision layer system for filtering collision detection
//!
//! Every body carries a small set of channels. Two bodies are only tested
//! geometrically when their channel sets share at least one member, which
//! makes the layer check a cheap pre-filter for the pairwise pass.

use super::PhysicsError;
use bitflags::bitflags;

bitflags! {
    /// Bit representation of the five collision channels
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LayerMask: u8 {
        /// Channel 1 (enabled by default)
        const CHANNEL_1 = 1 << 0;
        /// Channel 2
        const CHANNEL_2 = 1 << 1;
        /// Channel 3
        const CHANNEL_3 = 1 << 2;
        /// Channel 4
        const CHANNEL_4 = 1 << 3;
        /// Channel 5
        const CHANNEL_5 = 1 << 4;
    }
}

/// Set of active collision channels
///
/// Channels are numbered `1..=5`. A fresh set has only channel 1 enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionLayers {
    mask: LayerMask,
}

impl CollisionLayers {
    /// Lowest valid channel id
    pub const MIN_CHANNEL: u8 = 1;

    /// Highest valid channel id
    pub const MAX_CHANNEL: u8 = 5;

    /// Create the default layer set (channel 1 only)
    pub fn new() -> Self {
        Self { mask: LayerMask::CHANNEL_1 }
    }

    /// Create a layer set with exactly the given channels enabled
    pub fn with_layers(channels: &[u8]) -> Result<Self, PhysicsError> {
        let mut layers = Self { mask: LayerMask::empty() };
        for &channel in channels {
            layers.set_layer(channel, true)?;
        }
        Ok(layers)
    }

    fn channel_bit(channel: u8) -> Result<LayerMask, PhysicsError> {
        if !(Self::MIN_CHANNEL..=Self::MAX_CHANNEL).contains(&channel) {
            return Err(PhysicsError::LayerOutOfRange(channel));
        }
        Ok(LayerMask::from_bits_truncate(1 << (channel - 1)))
    }

    /// Enable or disable a channel
    ///
    /// Fails when `channel` is outside `1..=5`. Setting a channel to its
    /// current state is a no-op.
    pub fn set_layer(&mut self, channel: u8, enabled: bool) -> Result<(), PhysicsError> {
        let bit = Self::channel_bit(channel)?;
        self.mask.set(bit, enabled);
        Ok(())
    }

    /// Check whether a single channel is enabled
    pub fn is_enabled(&self, channel: u8) -> Result<bool, PhysicsError> {
        Ok(self.mask.contains(Self::channel_bit(channel)?))
    }

    /// Active channels in ascending order
    pub fn active_layers(&self) -> Vec<u8> {
        (Self::MIN_CHANNEL..=Self::MAX_CHANNEL)
            .filter(|&channel| self.mask.bits() & (1 << (channel - 1)) != 0)
            .collect()
    }

    /// Raw channel mask
    pub fn mask(&self) -> LayerMask {
        self.mask
    }

    /// True when both sets share at least one active channel
    pub fn overlaps(&self, other: &CollisionLayers) -> bool {
        self.mask.intersects(other.mask)
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::new()
    }
}
