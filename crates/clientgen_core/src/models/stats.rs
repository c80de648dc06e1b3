//! Engine counters as returned by `GET /api/stats`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Snapshot of named engine counters. Missing counters read as zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsSnapshot(BTreeMap<String, u64>);

impl StatsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a counter by wire name, 0 when absent.
    pub fn get(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    /// Value of one of the displayed counters.
    pub fn counter(&self, counter: Counter) -> u64 {
        self.get(counter.key())
    }

    pub fn set(&mut self, key: impl Into<String>, value: u64) {
        self.0.insert(key.into(), value);
    }

    /// Add to a counter, creating it at zero first.
    pub fn bump(&mut self, key: &str, by: u64) {
        let entry = self.0.entry(key.to_string()).or_insert(0);
        *entry = entry.saturating_add(by);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for StatsSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Counters that have a display slot on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Counter {
    TotalClients,
    PacketsSent,
    PacketsReceived,
    SyncReceived,
    AnnounceReceived,
    DelayReqSent,
    CaptureRxPackets,
    CaptureTxPackets,
    CaptureRxDropped,
    HwTimestamps,
}

impl Counter {
    /// All displayed counters in dashboard order.
    pub const ALL: [Counter; 10] = [
        Counter::TotalClients,
        Counter::PacketsSent,
        Counter::PacketsReceived,
        Counter::SyncReceived,
        Counter::AnnounceReceived,
        Counter::DelayReqSent,
        Counter::CaptureRxPackets,
        Counter::CaptureTxPackets,
        Counter::CaptureRxDropped,
        Counter::HwTimestamps,
    ];

    /// Field name in the stats payload.
    pub fn key(&self) -> &'static str {
        match self {
            Counter::TotalClients => "TotalClients",
            Counter::PacketsSent => "TotalPacketsSent",
            Counter::PacketsReceived => "TotalPacketsRcvd",
            Counter::SyncReceived => "TotalSyncRcvd",
            Counter::AnnounceReceived => "TotalAnnounceRcvd",
            Counter::DelayReqSent => "TotalDelayReqSent",
            Counter::CaptureRxPackets => "PFRingRXPackets",
            Counter::CaptureTxPackets => "PFRingTXPackets",
            Counter::CaptureRxDropped => "PFRingRXDropped",
            Counter::HwTimestamps => "PFRingHWTimestamps",
        }
    }

    /// Name of the display slot the counter is rendered into.
    pub fn slot(&self) -> &'static str {
        match self {
            Counter::TotalClients => "total-clients",
            Counter::PacketsSent => "packets-sent",
            Counter::PacketsReceived => "packets-received",
            Counter::SyncReceived => "total-sync",
            Counter::AnnounceReceived => "total-announce",
            Counter::DelayReqSent => "total-delay-req",
            Counter::CaptureRxPackets => "pfring-rx-packets",
            Counter::CaptureTxPackets => "pfring-tx-packets",
            Counter::CaptureRxDropped => "pfring-dropped",
            Counter::HwTimestamps => "hw-timestamps",
        }
    }

    /// Human label.
    pub fn label(&self) -> &'static str {
        match self {
            Counter::TotalClients => "Clients",
            Counter::PacketsSent => "Packets sent",
            Counter::PacketsReceived => "Packets received",
            Counter::SyncReceived => "Sync received",
            Counter::AnnounceReceived => "Announce received",
            Counter::DelayReqSent => "Delay requests sent",
            Counter::CaptureRxPackets => "Capture RX packets",
            Counter::CaptureTxPackets => "Capture TX packets",
            Counter::CaptureRxDropped => "Capture RX dropped",
            Counter::HwTimestamps => "HW timestamps",
        }
    }
}

/// Render a counter as a short magnitude: `950`, `1.5K`, `2.3M`.
pub fn format_count(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}
