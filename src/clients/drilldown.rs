use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::drilldown::{DrillAction, ExpansionController, ExpansionKey, JobKey, ServerKey, Ticket};
use crate::models::views::{JobObjectsView, SqlDatabasesView};
use crate::render::consumers::{build_job_objects, build_sql_databases};

use super::AnalyticsClient;

const JOB_OBJECTS_TOP_N: u32 = 10;
const SQL_DATABASES_TOP_N: u32 = 20;

#[derive(Debug, Clone)]
pub enum DetailView {
    Job(JobObjectsView),
    Server(SqlDatabasesView),
}

#[derive(Debug, Clone)]
pub enum ToggleOutcome {
    Collapsed,
    Expanded(DetailView),
    /// The fetch failed; the message is shown inline in place of the detail.
    Failed(String),
    /// The row was collapsed or requested again while this fetch was in flight.
    Stale,
}

impl ToggleOutcome {
    pub fn header_value(&self) -> &'static str {
        match self {
            ToggleOutcome::Collapsed => "collapsed",
            ToggleOutcome::Expanded(_) => "expanded",
            ToggleOutcome::Failed(_) => "failed",
            ToggleOutcome::Stale => "stale",
        }
    }
}

/// Expands consumer rows into job objects and SQL host rows into databases.
pub struct Drilldown {
    client: Arc<AnalyticsClient>,
    controller: Mutex<ExpansionController>,
}

impl Drilldown {
    pub fn new(client: Arc<AnalyticsClient>) -> Self {
        Self {
            client,
            controller: Mutex::new(ExpansionController::new()),
        }
    }

    /// Apply `action` to a consumer row for `viewer`.
    pub async fn drill_job(&self, viewer: &str, job: JobKey, action: DrillAction) -> ToggleOutcome {
        let key = ExpansionKey::Job(job.clone());
        if action == DrillAction::Collapse {
            return self.collapse(viewer, &key);
        }
        let ticket = self.expand(viewer, key);

        let result = self
            .client
            .job_objects(&job.cluster, &job.job_id, JOB_OBJECTS_TOP_N)
            .await;
        match result {
            Ok(list) => self.finish(&ticket, Ok(DetailView::Job(build_job_objects(&job, &list)))),
            Err(e) => {
                warn!(cluster = %job.cluster, job_id = %job.job_id, "job objects unavailable: {}", e);
                self.finish(&ticket, Err(format!("❌ Error loading objects: {}", e)))
            }
        }
    }

    /// Apply `action` to a SQL host row for `viewer`.
    pub async fn drill_server(&self, viewer: &str, key: ServerKey, action: DrillAction) -> ToggleOutcome {
        let expansion = ExpansionKey::Server(key.clone());
        if action == DrillAction::Collapse {
            return self.collapse(viewer, &expansion);
        }
        let ticket = self.expand(viewer, expansion);

        let result = self
            .client
            .sql_databases(
                &key.job.cluster,
                &key.job.job_id,
                &key.server,
                SQL_DATABASES_TOP_N,
            )
            .await;
        match result {
            Ok(list) => self.finish(
                &ticket,
                Ok(DetailView::Server(build_sql_databases(&key.server, &list))),
            ),
            Err(e) => {
                warn!(server = %key.server, job_id = %key.job.job_id, "sql databases unavailable: {}", e);
                self.finish(&ticket, Err(format!("❌ Error loading databases: {}", e)))
            }
        }
    }

    /// Forget every open row of every viewer.
    pub fn clear(&self) {
        self.controller().clear();
    }

    pub fn is_open(&self, viewer: &str, key: &ExpansionKey) -> bool {
        self.controller().is_open(viewer, key)
    }

    fn controller(&self) -> MutexGuard<'_, ExpansionController> {
        match self.controller.lock() {
            Ok(c) => c,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn expand(&self, viewer: &str, key: ExpansionKey) -> Ticket {
        self.controller().expand(viewer, key)
    }

    fn collapse(&self, viewer: &str, key: &ExpansionKey) -> ToggleOutcome {
        if !self.controller().collapse(viewer, key) {
            debug!(?key, "collapse of a row that was not open");
        }
        ToggleOutcome::Collapsed
    }

    fn finish(&self, ticket: &Ticket, result: Result<DetailView, String>) -> ToggleOutcome {
        let applied = self.controller().resolve(ticket, result.is_ok());
        if !applied {
            debug!(generation = ticket.generation, "dropping stale drill-down response");
            return ToggleOutcome::Stale;
        }
        match result {
            Ok(view) => ToggleOutcome::Expanded(view),
            Err(message) => ToggleOutcome::Failed(message),
        }
    }
}
