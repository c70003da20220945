use log::warn;

use crate::{
    config::ExportConfig,
    exporter::{ExportUi, run_export},
    observer::Observer,
    requests::RequestClient,
    timetable_api::TimetableApi,
    ui::{FileSaver, Notifier, TriggerControl},
};

pub struct ExportContext {
    pub export_config: ExportConfig,
    pub request_client: RequestClient,
}

impl ExportContext {
    pub fn new() -> anyhow::Result<Self> {
        let export_config = ExportConfig::new()?;
        let request_client = RequestClient::new()?;
        Ok(ExportContext {
            export_config,
            request_client,
        })
    }

    /// Runs an export against the live API using what `observer` captured.
    pub async fn export_captured<N, S, C>(&self, observer: &Observer, ui: ExportUi<'_, N, S, C>)
    where
        N: Notifier + ?Sized,
        S: FileSaver + ?Sized,
        C: TriggerControl + ?Sized,
    {
        // The observed base arrives with the week list, so an empty base only
        // happens when there is no week list to fetch for.
        let api_base = self
            .export_config
            .resolve_api_base(observer.api_base())
            .unwrap_or_else(|| {
                warn!("No API base: SCHEDULE_API_BASE is unset and no WeekSchedule request was captured");
                String::new()
            });
        let api = TimetableApi::new(&self.request_client, &api_base, &self.export_config.client_id);
        run_export(observer, &api, ui).await;
    }
}
