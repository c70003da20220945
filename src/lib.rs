mod calendar_serializer;
mod config;
mod event_mapper;
mod export_context;
mod exporter;
mod har;
mod http_error;
mod observer;
mod periods;
mod ratelimit;
mod requests;
mod schedule_aggregator;
mod text_manipulators;
mod timetable_api;
mod ui;

pub use calendar_serializer::{CALENDAR_MIME, EXPORT_FILE_NAME, generate_ics};
pub use config::{ExportConfig, LoadFromEnv};
pub use event_mapper::{CalendarEvent, CompactTimestamp, EventMapper};
pub use export_context::ExportContext;
pub use exporter::{ExportUi, run_export};
pub use har::HarFile;
pub use http_error::HttpError;
pub use observer::{
    CompletionHandle, Credentials, NetworkTap, Observer, PendingRequest, WeekDescriptor,
};
pub use requests::RequestClient;
pub use schedule_aggregator::{collect_term_records, select_current_term};
pub use timetable_api::{RawScheduleRecord, ScheduleApi, ScheduleResponse, TimetableApi};
pub use ui::{BusyGuard, FileSaver, Notice, Notifier, TriggerControl};
