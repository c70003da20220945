use futures::future::join_all;
use log::{info, warn};

use crate::{
    observer::{Observer, WeekDescriptor},
    timetable_api::{RawScheduleRecord, ScheduleApi},
    ui::{Notice, Notifier},
};

/// Weeks of the current term: those sharing the first week's term and year,
/// in list order.
pub fn select_current_term(weeks: &[WeekDescriptor]) -> Vec<WeekDescriptor> {
    let Some(first) = weeks.first() else {
        return vec![];
    };
    weeks
        .iter()
        .filter(|week| week.term() == first.term())
        .copied()
        .collect()
}

/// Fetches every week of the current term and flattens the records in week
/// order.
///
/// Missing preconditions are reported through `notifier` and yield no
/// records. A week whose fetch fails contributes nothing.
pub async fn collect_term_records<A, N>(
    observer: &Observer,
    api: &A,
    notifier: &N,
) -> Vec<RawScheduleRecord>
where
    A: ScheduleApi,
    N: Notifier + ?Sized,
{
    let weeks = match observer.week_list() {
        Some(weeks) if !weeks.is_empty() => weeks,
        _ => {
            notifier.notify(Notice::WeeksNotLoaded);
            return vec![];
        }
    };
    let Some(credentials) = observer.credentials() else {
        notifier.notify(Notice::CredentialsMissing);
        return vec![];
    };

    let term_weeks = select_current_term(&weeks);
    info!(
        "Fetching {} weeks of term {} ({})",
        term_weeks.len(),
        term_weeks[0].term_id,
        term_weeks[0].year_of_study
    );

    let fetches = term_weeks.iter().map(|week| {
        let credentials = &credentials;
        async move {
            match api.fetch_week(week, credentials).await {
                Ok(response) => response.into_records(),
                Err(e) => {
                    warn!("Skipping week {}: {e:#}", week.week_number);
                    vec![]
                }
            }
        }
    });

    // join_all keeps input order regardless of completion order.
    join_all(fetches).await.into_iter().flatten().collect()
}
