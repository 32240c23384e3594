//! Control plane: the operations an external caller may run against a
//! live monitor.
//!
//! Every operation is a plain function over the shared
//! [`MonitorContext`]; none of them waits for, or blocks, the sampler
//! beyond the per-channel lock of the cell it touches. The HTTP router is
//! one front end for these operations; tests call them directly.

use std::sync::Arc;

use serde::Serialize;

use crate::alert::AlertLevel;
use crate::context::MonitorContext;
use crate::error::ControlError;
use crate::gateway::{self, GroupOverride, OverrideCommand};
use crate::scenario::ScenarioName;
use crate::sensors::SensorGroup;

/// Per-group override flags as reported by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverrideFlags {
    pub dht22: bool,
    pub ldr: bool,
    pub mpu6050: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub status: &'static str,
    pub scenario: ScenarioName,
    pub step: u32,
    pub alert_level: AlertLevel,
    pub uptime_seconds: u64,
    pub overrides: OverrideFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetReport {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub success: bool,
    pub scenario: ScenarioName,
    pub step: u32,
}

#[derive(Clone)]
pub struct ControlPlane {
    ctx: Arc<MonitorContext>,
}

impl ControlPlane {
    pub fn new(ctx: Arc<MonitorContext>) -> Self {
        Self { ctx }
    }

    /// Read-only summary of the monitor.
    pub fn get_status(&self) -> StatusReport {
        let scenario = self.ctx.scenario_status();
        let store = self.ctx.store();
        let active = |g| GroupOverride::read(store, g).active;
        StatusReport {
            status: "running",
            scenario: scenario.name,
            step: scenario.step,
            alert_level: self.ctx.alert_level(),
            uptime_seconds: self.ctx.now().as_secs(),
            overrides: OverrideFlags {
                dht22: active(SensorGroup::Dht22),
                ldr: active(SensorGroup::Ldr),
                mpu6050: active(SensorGroup::Mpu6050),
            },
        }
    }

    pub fn set_channel_override(&self, cmd: &OverrideCommand) -> GroupOverride {
        gateway::apply(self.ctx.store(), cmd)
    }

    pub fn reset_overrides(&self) -> ResetReport {
        gateway::reset_all(self.ctx.store());
        ResetReport {
            success: true,
            message: "All sensor overrides reset",
        }
    }

    pub fn change_scenario(&self, name: &str) -> Result<ScenarioReport, ControlError> {
        let status = self.ctx.change_scenario(name)?;
        Ok(ScenarioReport {
            success: true,
            scenario: status.name,
            step: status.step,
        })
    }

    pub fn context(&self) -> &Arc<MonitorContext> {
        &self.ctx
    }
}
