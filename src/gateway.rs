//! Override gateway: the only writer of override state.
//!
//! Turns one [`OverrideCommand`] for a sensor group into per-channel
//! store updates, then reads back what the group now holds.
//!
//! For each channel of the group:
//!
//! | Command                | Effect on the channel                         |
//! |------------------------|-----------------------------------------------|
//! | `disable`              | `clear_override` (stored value kept)          |
//! | value supplied         | `apply_override(value)`                       |
//! | value absent           | untouched                                     |
//!
//! `disable` wins over any values sent alongside it. Every channel update
//! is atomic on its own; a group update is not atomic as a whole.

use log::info;

use crate::error::ControlError;
use crate::sensors::{Channel, SensorGroup};
use crate::store::ChannelStore;

/// At most three channels per group (mpu6050).
pub const MAX_GROUP_CHANNELS: usize = 3;

pub type ChannelValues = heapless::Vec<(Channel, f32), MAX_GROUP_CHANNELS>;

/// A validated override request for one sensor group.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideCommand {
    group: SensorGroup,
    fields: ChannelValues,
    disable: bool,
}

impl OverrideCommand {
    /// A command for `group` with no values yet; applying it alone changes nothing.
    pub fn new(group: SensorGroup) -> Self {
        Self {
            group,
            fields: ChannelValues::new(),
            disable: false,
        }
    }

    /// Clear `group`'s override.
    pub fn disable(group: SensorGroup) -> Self {
        Self {
            disable: true,
            ..Self::new(group)
        }
    }

    /// Add a value for one channel. Rejects channels outside the group
    /// and non-finite values; a repeated channel replaces the earlier value.
    pub fn with(mut self, channel: Channel, value: f32) -> Result<Self, ControlError> {
        if channel.group() != self.group || !value.is_finite() {
            return Err(ControlError::MalformedBody);
        }
        if let Some(slot) = self.fields.iter_mut().find(|(ch, _)| *ch == channel) {
            slot.1 = value;
            return Ok(self);
        }
        // Group membership bounds the count by MAX_GROUP_CHANNELS.
        self.fields
            .push((channel, value))
            .map_err(|_| ControlError::MalformedBody)?;
        Ok(self)
    }

    /// Like [`with`](Self::with), skipping `None`.
    pub fn with_opt(self, channel: Channel, value: Option<f32>) -> Result<Self, ControlError> {
        match value {
            Some(v) => self.with(channel, v),
            None => Ok(self),
        }
    }

    pub fn group(&self) -> SensorGroup {
        self.group
    }

    pub fn is_disable(&self) -> bool {
        self.disable
    }
}

/// What a group holds after an override command.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupOverride {
    pub group: SensorGroup,
    /// Stored override value per channel, in group order.
    pub values: ChannelValues,
    /// Whether any channel of the group is overridden.
    pub active: bool,
}

impl GroupOverride {
    /// Read a group's override state back from the store.
    pub fn read(store: &ChannelStore, group: SensorGroup) -> Self {
        let mut values = ChannelValues::new();
        let mut active = false;
        for &ch in group.channels() {
            let cell = store.cell(ch);
            active |= cell.override_active;
            // Group sizes never exceed MAX_GROUP_CHANNELS.
            let _ = values.push((ch, cell.override_value));
        }
        Self {
            group,
            values,
            active,
        }
    }

    pub fn value(&self, channel: Channel) -> Option<f32> {
        self.values
            .iter()
            .find(|(ch, _)| *ch == channel)
            .map(|&(_, v)| v)
    }
}

/// Apply `cmd` to `store` and report the group's resulting override state.
pub fn apply(store: &ChannelStore, cmd: &OverrideCommand) -> GroupOverride {
    let group = cmd.group();
    if cmd.is_disable() {
        for &ch in group.channels() {
            store.clear_override(ch);
        }
        info!("Override: {} cleared", group.name());
    } else {
        for &(ch, v) in &cmd.fields {
            store.apply_override(ch, v);
        }
        info!("Override: {} applied ({} new value(s))", group.name(), cmd.fields.len());
    }
    GroupOverride::read(store, group)
}

/// Every channel back to live mode.
pub fn reset_all(store: &ChannelStore) {
    store.reset_all_overrides();
    info!("Override: all channels reset to live");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_update_keeps_other_channel_value() {
        let store = ChannelStore::new();
        let cmd = OverrideCommand::new(SensorGroup::Dht22)
            .with(Channel::Temperature, 50.0)
            .and_then(|c| c.with(Channel::Humidity, 70.0))
            .unwrap();
        apply(&store, &cmd);

        let cmd = OverrideCommand::new(SensorGroup::Dht22)
            .with(Channel::Temperature, 30.0)
            .unwrap();
        let out = apply(&store, &cmd);
        assert_eq!(out.value(Channel::Temperature), Some(30.0));
        assert_eq!(out.value(Channel::Humidity), Some(70.0));
        assert!(out.active);
        assert_eq!(store.read(Channel::Humidity), 70.0);
    }

    #[test]
    fn absent_field_leaves_channel_live() {
        let store = ChannelStore::new();
        store.write_live(Channel::Humidity, 85.0);
        let cmd = OverrideCommand::new(SensorGroup::Dht22)
            .with(Channel::Temperature, 40.0)
            .unwrap();
        let out = apply(&store, &cmd);
        assert!(out.active);
        assert!(!store.cell(Channel::Humidity).override_active);
        assert_eq!(store.read(Channel::Humidity), 85.0);
    }

    #[test]
    fn empty_command_changes_nothing() {
        let store = ChannelStore::new();
        let out = apply(&store, &OverrideCommand::new(SensorGroup::Mpu6050));
        assert!(!out.active);
        assert!(!store.any_override_active());
    }

    #[test]
    fn disable_keeps_values_and_ignores_new_ones() {
        let store = ChannelStore::new();
        let set = OverrideCommand::new(SensorGroup::Ldr)
            .with(Channel::LightRaw, 4000.0)
            .unwrap();
        apply(&store, &set);

        let mut off = OverrideCommand::disable(SensorGroup::Ldr);
        off = off.with(Channel::LightRaw, 10.0).unwrap();
        let out = apply(&store, &off);
        assert!(!out.active);
        assert_eq!(out.value(Channel::LightRaw), Some(4000.0));
        assert!(!store.cell(Channel::LightRaw).override_active);
    }

    #[test]
    fn foreign_channel_rejected() {
        let err = OverrideCommand::new(SensorGroup::Ldr).with(Channel::AccelX, 1.0);
        assert_eq!(err, Err(ControlError::MalformedBody));
    }

    #[test]
    fn non_finite_value_rejected() {
        let err = OverrideCommand::new(SensorGroup::Mpu6050).with(Channel::AccelX, f32::NAN);
        assert_eq!(err, Err(ControlError::MalformedBody));
    }

    #[test]
    fn repeated_channel_replaces() {
        let cmd = OverrideCommand::new(SensorGroup::Mpu6050)
            .with(Channel::AccelX, 1.0)
            .and_then(|c| c.with(Channel::AccelX, 2.0))
            .unwrap();
        assert_eq!(cmd.fields.as_slice(), &[(Channel::AccelX, 2.0)]);

        let store = ChannelStore::new();
        let out = apply(&store, &cmd);
        assert_eq!(out.value(Channel::AccelX), Some(2.0));
        assert!(!store.cell(Channel::AccelY).override_active);
    }

    #[test]
    fn other_groups_untouched() {
        let store = ChannelStore::new();
        let cmd = OverrideCommand::new(SensorGroup::Mpu6050)
            .with(Channel::AccelZ, 2.0)
            .unwrap();
        apply(&store, &cmd);
        assert!(!GroupOverride::read(&store, SensorGroup::Dht22).active);
        assert!(!GroupOverride::read(&store, SensorGroup::Ldr).active);
    }

    #[test]
    fn reset_all_clears_groups() {
        let store = ChannelStore::new();
        for g in SensorGroup::ALL {
            let ch = g.channels()[0];
            apply(&store, &OverrideCommand::new(g).with(ch, 1.0).unwrap());
        }
        assert!(store.any_override_active());
        reset_all(&store);
        assert!(!store.any_override_active());
    }
}
