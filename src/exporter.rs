use log::{error, info};

use crate::{
    calendar_serializer::{CALENDAR_MIME, EXPORT_FILE_NAME, generate_ics},
    event_mapper::EventMapper,
    observer::Observer,
    schedule_aggregator::collect_term_records,
    timetable_api::ScheduleApi,
    ui::{BusyGuard, FileSaver, Notice, Notifier, TriggerControl},
};

/// Page-side collaborators of one export run.
pub struct ExportUi<'a, N: ?Sized, S: ?Sized, C: ?Sized> {
    pub notifier: &'a N,
    pub saver: &'a S,
    pub control: &'a C,
}

/// Runs one export: fetch the term, map it, write the calendar file.
///
/// Every outcome is reported through the notifier; nothing is returned. The
/// control stays busy for the whole run and is released on every path.
pub async fn run_export<A, N, S, C>(observer: &Observer, api: &A, ui: ExportUi<'_, N, S, C>)
where
    A: ScheduleApi,
    N: Notifier + ?Sized,
    S: FileSaver + ?Sized,
    C: TriggerControl + ?Sized,
{
    let _busy = BusyGuard::engage(ui.control);

    match export(observer, api, ui.notifier, ui.saver).await {
        Ok(Some(events)) => {
            info!("Exported {} events to {}", events, EXPORT_FILE_NAME);
            ui.notifier.notify(Notice::Exported { events });
        }
        Ok(None) => ui.notifier.notify(Notice::NothingToExport),
        Err(e) => {
            error!("Export failed: {e:?}");
            ui.notifier.notify(Notice::ExportFailed);
        }
    }
}

// Ok(None) when there was nothing to save.
async fn export<A, N, S>(
    observer: &Observer,
    api: &A,
    notifier: &N,
    saver: &S,
) -> anyhow::Result<Option<usize>>
where
    A: ScheduleApi,
    N: Notifier + ?Sized,
    S: FileSaver + ?Sized,
{
    let records = collect_term_records(observer, api, notifier).await;
    let mapper = EventMapper::new()?;
    let events = mapper.map_records(&records);
    info!("Mapped {} of {} schedule records", events.len(), records.len());
    if events.is_empty() {
        return Ok(None);
    }

    let calendar = generate_ics(&events);
    saver.save(EXPORT_FILE_NAME, CALENDAR_MIME, &calendar)?;
    Ok(Some(events.len()))
}
