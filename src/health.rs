use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use sysinfo::System;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    /// Seconds since the server started.
    pub uptime: f64,
    pub timestamp: String,
    pub memory_usage: MemoryUsage,
}

/// Memory of this process, in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub rss: u64,
    #[serde(rename = "virtual")]
    pub virtual_memory: u64,
}

impl MemoryUsage {
    /// Zeroes when the platform cannot report on the current process.
    pub fn current() -> Self {
        let Ok(pid) = sysinfo::get_current_pid() else {
            return Self::default();
        };

        let mut system = System::new();
        system.refresh_process(pid);
        system
            .process(pid)
            .map(|process| MemoryUsage {
                rss: process.memory(),
                virtual_memory: process.virtual_memory(),
            })
            .unwrap_or_default()
    }
}

impl HealthReport {
    pub fn collect(started_at: Instant) -> Self {
        Self {
            status: "operational".to_string(),
            uptime: started_at.elapsed().as_secs_f64(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            memory_usage: MemoryUsage::current(),
        }
    }
}
