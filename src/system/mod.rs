//! Host information for `/system/info`.

use serde::Serialize;
use sysinfo::System;

#[derive(Debug, Clone, Serialize)]
pub struct MemoryInfo {
    /// Bytes
    pub total: u64,
    /// Bytes
    pub free: u64,
    /// e.g. `"42.5%"`
    pub usage: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub platform: &'static str,
    pub arch: &'static str,
    pub os_version: Option<String>,
    /// Seconds since boot
    pub uptime: u64,
    pub memory: MemoryInfo,
    pub version: &'static str,
}

/// Formats the share of used memory with one decimal place.
pub fn memory_usage(total: u64, free: u64) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    let used = 1.0 - free as f64 / total as f64;
    format!("{:.1}%", used * 100.0)
}

/// Collects a snapshot of the host.
pub fn system_info() -> SystemInfo {
    let mut system = System::new();
    system.refresh_memory();
    let total = system.total_memory();
    let free = system.free_memory();

    SystemInfo {
        platform: std::env::consts::OS,
        arch: std::env::consts::ARCH,
        os_version: System::long_os_version(),
        uptime: System::uptime(),
        memory: MemoryInfo {
            total,
            free,
            usage: memory_usage(total, free),
        },
        version: env!("CARGO_PKG_VERSION"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_usage_format() {
        assert_eq!(memory_usage(1000, 250), "75.0%");
        assert_eq!(memory_usage(3, 1), "66.7%");
        assert_eq!(memory_usage(0, 0), "0.0%");
    }

    #[test]
    fn test_system_info_snapshot() {
        let info = system_info();
        assert_eq!(info.platform, std::env::consts::OS);
        assert!(info.memory.usage.ends_with('%'));
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }
}
