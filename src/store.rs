//! Channel store: the last live and overridden value of every channel.
//!
//! ```text
//!   Sampler ──write_live──▶ ┌────────────────────────────┐
//!                           │  [Mutex<ChannelCell>; 6]   │ ──snapshot──▶ Sampler
//!   Gateway ──override_*──▶ │  (live, active, override)  │ ──read──────▶ Control plane
//!                           └────────────────────────────┘
//! ```
//!
//! Each channel's triple sits behind its own lock, held only for the copy
//! in or out of the cell. Channels never lock each other, so the sampler
//! and a control-plane write contend only when they touch the same channel.
//!
//! Field ownership is split: only the sampler writes `live_value`, only
//! the override gateway writes `override_active` / `override_value`.

use std::sync::{Mutex, PoisonError};

use crate::sensors::{Channel, ReadingSnapshot};

/// The three fields of one channel, always read and written as a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelCell {
    /// Last value written by the sampler.
    pub live_value: f32,
    /// Selects `override_value` over `live_value` when set.
    pub override_active: bool,
    /// Caller-supplied value; retained while inactive.
    pub override_value: f32,
}

impl ChannelCell {
    fn new(channel: Channel) -> Self {
        let v = channel.default_value();
        Self {
            live_value: v,
            override_active: false,
            override_value: v,
        }
    }

    /// The authoritative value of this cell.
    pub fn resolve(&self) -> f32 {
        if self.override_active {
            self.override_value
        } else {
            self.live_value
        }
    }
}

/// Per-channel locked store. Lives for the whole process inside the
/// monitor context.
pub struct ChannelStore {
    cells: [Mutex<ChannelCell>; Channel::COUNT],
}

impl Default for ChannelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelStore {
    pub fn new() -> Self {
        Self {
            cells: Channel::ALL.map(|ch| Mutex::new(ChannelCell::new(ch))),
        }
    }

    /// Copy of the full triple for `channel`.
    pub fn cell(&self, channel: Channel) -> ChannelCell {
        // A poisoned guard still holds a whole `Copy` value: a panic cannot
        // interrupt a plain field assignment halfway.
        *self.cells[channel.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// The authoritative value of `channel`.
    pub fn read(&self, channel: Channel) -> f32 {
        self.cell(channel).resolve()
    }

    /// Sampler only. Leaves the override fields untouched.
    pub fn write_live(&self, channel: Channel, value: f32) {
        self.update(channel, |c| c.live_value = value);
    }

    /// Set `override_value := value` and `override_active := true` together.
    pub fn apply_override(&self, channel: Channel, value: f32) {
        self.update(channel, |c| {
            c.override_value = value;
            c.override_active = true;
        });
    }

    /// Back to live mode; the override value stays stored but inert.
    pub fn clear_override(&self, channel: Channel) {
        self.update(channel, |c| c.override_active = false);
    }

    pub fn reset_all_overrides(&self) {
        for ch in Channel::ALL {
            self.clear_override(ch);
        }
    }

    /// Whether any channel is currently overridden.
    pub fn any_override_active(&self) -> bool {
        Channel::ALL
            .into_iter()
            .any(|ch| self.cell(ch).override_active)
    }

    /// Resolve every channel into an immutable snapshot.
    ///
    /// Each channel is resolved from one consistent triple. Channels are
    /// resolved one after another, so a write landing mid-snapshot shows
    /// up either entirely or not at all for the channel it touches.
    pub fn snapshot(&self) -> ReadingSnapshot {
        ReadingSnapshot::from_channels(Channel::ALL.map(|ch| self.read(ch)))
    }

    /// The atomic-update primitive: run `f` on the cell under its lock.
    fn update(&self, channel: Channel, f: impl FnOnce(&mut ChannelCell)) {
        let mut guard = self.cells[channel.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard);
    }
}
