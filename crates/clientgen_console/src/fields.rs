//! Engine options shown on the config form.

use clientgen_core::ports::{FieldKind, FormSurface};

const TEXT_FIELDS: [&str; 5] = [
    "Iface",
    "ServerMAC",
    "ServerAddress",
    "ClientIPStart",
    "ClientIPEnd",
];

const NUMBER_FIELDS: [&str; 15] = [
    "ClientIPStep",
    "SoftStartRate",
    "TimeoutSec",
    "DurationSec",
    "TimeAfterDurationBeforeRestartSec",
    "TimeBetweenDelayReqSec",
    "ClientRetranTimeWhenNoResponseSec",
    "NumTXWorkers",
    "NumTXTSWorkerPerTx",
    "NumRXWorkers",
    "NumPacketParsers",
    "NumPacketProcessors",
    "NumClientRetransmitProcs",
    "NumClientRestartProcs",
    "CounterPrintIntervalSecs",
];

const FLAG_FIELDS: [&str; 14] = [
    "RestartClientsAfterDuration",
    "DebugPrint",
    "DebugLogClient",
    "DebugIoWkrRX",
    "DebugIoWkrTX",
    "DebugDetailPerf",
    "DebugRestartProc",
    "DebugRetransProc",
    "DebugProfilers",
    "PrintClientReqData",
    "PrintPerformance",
    "PrintClientData",
    "PrintTxRxCounts",
    "PrintLatencyData",
];

/// Blank form with every engine option declared.
pub fn engine_form() -> FormSurface {
    let mut form = FormSurface::new();
    for name in TEXT_FIELDS {
        form.declare(name, FieldKind::Text);
    }
    for name in NUMBER_FIELDS {
        form.declare(name, FieldKind::Number);
    }
    for name in FLAG_FIELDS {
        form.declare(name, FieldKind::Flag);
    }
    form
}
