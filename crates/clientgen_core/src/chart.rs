//! Rolling packet chart window.
//!
//! The buffer keeps the newest `capacity` points in arrival order and is the
//! only thing that talks to the chart sink. The sink is built lazily on the
//! first push so a front end without a chart never pays for one.

use std::collections::VecDeque;

use crate::models::{Counter, StatsSnapshot};
use crate::ports::{ChartSink, ChartSinkFactory};

/// Default number of points on screen.
pub const CHART_CAPACITY: usize = 20;

/// One poll cycle on the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    /// Wall-clock time of the sample.
    pub label: String,
    /// (packets sent, packets received)
    pub values: (u64, u64),
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, values: (u64, u64)) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    /// Point for `snapshot`, labelled with the current local time.
    pub fn from_snapshot(snapshot: &StatsSnapshot) -> Self {
        Self::new(
            chrono::Local::now().format("%H:%M:%S").to_string(),
            (
                snapshot.counter(Counter::PacketsSent),
                snapshot.counter(Counter::PacketsReceived),
            ),
        )
    }
}

/// Colours and legend text for one line on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub label: &'static str,
    pub stroke: &'static str,
    pub fill: &'static str,
}

/// Visual parameters handed to the sink when it is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub series: [SeriesStyle; 2],
    /// Line smoothing, 0 draws straight segments.
    pub tension: f32,
    pub legend_color: &'static str,
    pub tick_color: &'static str,
    pub grid_color: &'static str,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            series: [
                SeriesStyle {
                    label: "Packets sent",
                    stroke: "#2563eb",
                    fill: "rgba(37, 99, 235, 0.1)",
                },
                SeriesStyle {
                    label: "Packets received",
                    stroke: "#059669",
                    fill: "rgba(5, 150, 105, 0.1)",
                },
            ],
            tension: 0.4,
            legend_color: "#cbd5e1",
            tick_color: "#94a3b8",
            grid_color: "#475569",
        }
    }
}

/// Fixed-capacity FIFO of chart points.
pub struct ChartBuffer {
    points: VecDeque<ChartPoint>,
    capacity: usize,
    style: ChartStyle,
    factory: Box<dyn ChartSinkFactory>,
    sink: Option<Box<dyn ChartSink>>,
}

impl ChartBuffer {
    /// Buffer of [`CHART_CAPACITY`] points. The sink is not built yet.
    pub fn new(factory: Box<dyn ChartSinkFactory>) -> Self {
        Self::with_capacity(factory, CHART_CAPACITY)
    }

    /// A capacity of 0 is treated as 1.
    pub fn with_capacity(factory: Box<dyn ChartSinkFactory>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
            style: ChartStyle::default(),
            factory,
            sink: None,
        }
    }

    /// Replace the style used when the sink is built. No effect once built.
    pub fn set_style(&mut self, style: ChartStyle) {
        self.style = style;
    }

    /// Append a point, evict from the head down to capacity, redraw.
    pub fn push(&mut self, point: ChartPoint) {
        if self.sink.is_none() {
            tracing::debug!(capacity = self.capacity, "building chart sink");
            self.sink = Some(self.factory.create(&self.style));
        }

        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }

        if let Some(sink) = self.sink.as_mut() {
            sink.redraw(self.points.make_contiguous());
        }
    }

    /// Points on screen, oldest first.
    pub fn points(&self) -> impl Iterator<Item = &ChartPoint> {
        self.points.iter()
    }

    /// Number of points held, never more than [`capacity`](Self::capacity).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most points kept before the oldest is evicted.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True once the first point has been pushed.
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        builds: usize,
        frames: Vec<Vec<ChartPoint>>,
    }

    struct RecordingFactory(Arc<Mutex<Recorder>>);
    struct RecordingSink(Arc<Mutex<Recorder>>);

    impl ChartSinkFactory for RecordingFactory {
        fn create(&mut self, _style: &ChartStyle) -> Box<dyn ChartSink> {
            self.0.lock().builds += 1;
            Box::new(RecordingSink(Arc::clone(&self.0)))
        }
    }

    impl ChartSink for RecordingSink {
        fn redraw(&mut self, points: &[ChartPoint]) {
            self.0.lock().frames.push(points.to_vec());
        }
    }

    fn buffer() -> (ChartBuffer, Arc<Mutex<Recorder>>) {
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let buffer = ChartBuffer::new(Box::new(RecordingFactory(Arc::clone(&recorder))));
        (buffer, recorder)
    }

    fn point(i: u64) -> ChartPoint {
        ChartPoint::new(format!("t{i}"), (i, i / 2))
    }

    #[test]
    fn keeps_last_twenty_in_push_order() {
        let (mut buffer, _) = buffer();
        for i in 0..57 {
            buffer.push(point(i));
            assert!(buffer.len() <= CHART_CAPACITY);
        }

        let kept: Vec<_> = buffer.points().cloned().collect();
        let expected: Vec<_> = (37..57).map(point).collect();
        assert_eq!(kept, expected);
    }

    #[test]
    fn short_sequences_are_kept_whole() {
        let (mut buffer, _) = buffer();
        for i in 0..5 {
            buffer.push(point(i));
        }
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.points().next(), Some(&point(0)));
    }

    #[test]
    fn sink_is_built_once_and_redrawn_every_push() {
        let (mut buffer, recorder) = buffer();
        assert!(!buffer.has_sink());

        for i in 0..3 {
            buffer.push(point(i));
        }

        let recorder = recorder.lock();
        assert_eq!(recorder.builds, 1);
        assert_eq!(recorder.frames.len(), 3);
        assert_eq!(recorder.frames[2], vec![point(0), point(1), point(2)]);
    }

    #[test]
    fn point_from_snapshot_takes_packet_counters() {
        let snapshot: StatsSnapshot = [("TotalPacketsSent", 10), ("TotalPacketsRcvd", 7)]
            .into_iter()
            .collect();
        let point = ChartPoint::from_snapshot(&snapshot);
        assert_eq!(point.values, (10, 7));
        assert_eq!(point.label.len(), "12:34:56".len());
    }

    #[test]
    fn default_style_has_distinct_series() {
        let style = ChartStyle::default();
        assert_ne!(style.series[0].stroke, style.series[1].stroke);
    }
}
