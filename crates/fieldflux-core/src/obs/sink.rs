use crate::obs::metrics;

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    FarmerCreated,
    FarmerUpdated,
    FarmerDeleted { fields_removed: u64 },
    FieldCreated,
    FieldUpdated,
    FieldDeleted,
    GeometryRejected,
    OverlapRejected,
    HistoryAppended,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-local sink that writes into global counter state.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| match event {
            MetricsEvent::FarmerCreated => {
                m.farmers_created = m.farmers_created.saturating_add(1);
            }
            MetricsEvent::FarmerUpdated => {
                m.farmers_updated = m.farmers_updated.saturating_add(1);
            }
            MetricsEvent::FarmerDeleted { fields_removed } => {
                m.farmers_deleted = m.farmers_deleted.saturating_add(1);
                m.fields_deleted = m.fields_deleted.saturating_add(fields_removed);
            }
            MetricsEvent::FieldCreated => {
                m.fields_created = m.fields_created.saturating_add(1);
            }
            MetricsEvent::FieldUpdated => {
                m.fields_updated = m.fields_updated.saturating_add(1);
            }
            MetricsEvent::FieldDeleted => {
                m.fields_deleted = m.fields_deleted.saturating_add(1);
            }
            MetricsEvent::GeometryRejected => {
                m.geometry_rejections = m.geometry_rejections.saturating_add(1);
            }
            MetricsEvent::OverlapRejected => {
                m.overlap_rejections = m.overlap_rejections.saturating_add(1);
            }
            MetricsEvent::HistoryAppended => {
                m.history_appends = m.history_appends.saturating_add(1);
            }
        });
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    GLOBAL_METRICS_SINK.record(event);
}

///
/// TESTS
///
