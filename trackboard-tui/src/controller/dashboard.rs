//! Dashboard: KPI tiles, charts, and the recent-projects table.

use super::{Job, Step};
use crate::store::{Resource, Store};
use trackboard_core::TrackerApi;

/// KPI snapshot, then the full project list, in that order.
pub fn plan_refresh(store: &mut Store) -> Job {
    let kpis = store.issue(Resource::Kpis);
    Job::new("dashboard refresh")
        .then(Step::FetchKpis(kpis))
        .fetch_projects(store)
}

/// Hand the CSV export URL to the system opener. The browser downloads it.
pub fn export_csv(api: &dyn TrackerApi) -> std::io::Result<String> {
    let url = api.export_csv_url();
    open::that(&url)?;
    tracing::info!(url = %url, "Opened CSV export");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_fetches_kpis_before_projects() {
        let mut store = Store::new();
        let job = plan_refresh(&mut store);
        assert!(matches!(
            job.steps.as_slice(),
            [Step::FetchKpis(_), Step::FetchProjects(_)]
        ));
    }
}
