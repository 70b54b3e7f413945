//! Task queue configuration
//!
//! The host application runs report generation and log pruning on a worker
//! pool fed by a Redis broker. The broker and result-backend URLs derive
//! from [`super::RedisConfig`]; this section carries the worker knobs and
//! the beat-schedule table.

use std::str::FromStr;

use cron::Schedule;
use serde::{Deserialize, Serialize};

use super::ConfigValidation;
use crate::error::{ConfigError, Result};

/// Task broker and beat-schedule settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskQueueConfig {
    /// Tasks prefetched per worker; 1 keeps long report runs fair
    pub worker_prefetch_multiplier: u32,

    /// Acknowledge tasks after completion instead of on delivery
    pub task_acks_late: bool,

    /// Scheduled-task table
    pub beat_schedule: Vec<ScheduleEntry>,
}

/// One scheduled task in the beat table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Schedule entry name
    pub name: String,

    /// Task to invoke
    pub task: String,

    /// Cron expression with a leading seconds column
    pub schedule: String,
}

impl Default for TaskQueueConfig {
    fn default() -> Self {
        Self {
            worker_prefetch_multiplier: 1,
            task_acks_late: false,
            beat_schedule: vec![
                ScheduleEntry {
                    name: "reports.scheduler".to_string(),
                    task: "reports.scheduler".to_string(),
                    // every minute
                    schedule: "0 * * * * *".to_string(),
                },
                ScheduleEntry {
                    name: "reports.prune_log".to_string(),
                    task: "reports.prune_log".to_string(),
                    // daily at 00:10
                    schedule: "0 10 0 * * *".to_string(),
                },
            ],
        }
    }
}

impl ConfigValidation for TaskQueueConfig {
    fn validate(&self) -> Result<()> {
        for entry in &self.beat_schedule {
            Schedule::from_str(&entry.schedule).map_err(|e| ConfigError::InvalidValue {
                key: format!("beat_schedule.{}", entry.name),
                value: entry.schedule.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}
