//! Expansion state for the consumer drill-down rows.
//!
//! A consumer row expands into the objects of its protection job; an object
//! that looks like a SQL host expands one level further into its databases.
//! The page says what it wants for a row (expand or collapse), and state is
//! kept per viewer so one browser's clicks never decide another's. Each
//! expansion moves through `Loading -> Expanded | Failed` until collapsed.
//! Fetch results carry the generation they were issued under, so a response
//! that lands after its row was collapsed or re-requested is dropped.

use std::collections::HashMap;

use reqwest::Url;
use serde::Deserialize;

use crate::models::api::JobObject;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobKey {
    pub cluster: String,
    pub job_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerKey {
    pub job: JobKey,
    pub server: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExpansionKey {
    Job(JobKey),
    Server(ServerKey),
}

impl ExpansionKey {
    fn job(&self) -> &JobKey {
        match self {
            ExpansionKey::Job(job) => job,
            ExpansionKey::Server(server) => &server.job,
        }
    }
}

/// What the page asks for a drill-down row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillAction {
    #[default]
    Expand,
    Collapse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expansion {
    Loading { generation: u64 },
    Expanded { generation: u64 },
    Failed { generation: u64 },
}

/// Proof that an expansion started a fetch; hand it back to [`ExpansionController::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub viewer: String,
    pub key: ExpansionKey,
    pub generation: u64,
}

type Slot = (String, ExpansionKey);

#[derive(Debug, Default)]
pub struct ExpansionController {
    states: HashMap<Slot, Expansion>,
    next_generation: u64,
}

impl ExpansionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `key` for `viewer`. A fetch already in flight for the
    /// same row becomes stale.
    pub fn expand(&mut self, viewer: &str, key: ExpansionKey) -> Ticket {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.states.insert(
            (viewer.to_string(), key.clone()),
            Expansion::Loading { generation },
        );
        Ticket {
            viewer: viewer.to_string(),
            key,
            generation,
        }
    }

    /// Close `key` for `viewer`. Collapsing a job also closes that viewer's
    /// server rows under it. Returns whether the row was open.
    pub fn collapse(&mut self, viewer: &str, key: &ExpansionKey) -> bool {
        let was_open = self
            .states
            .remove(&(viewer.to_string(), key.clone()))
            .is_some();
        if let ExpansionKey::Job(job) = key {
            self.states.retain(|(v, k), _| match k {
                ExpansionKey::Server(s) => v != viewer || s.job != *job,
                ExpansionKey::Job(_) => true,
            });
        }
        was_open
    }

    /// Record the outcome of a fetch. Returns false when the ticket is stale:
    /// the row was collapsed, or requested again, while it was in flight.
    pub fn resolve(&mut self, ticket: &Ticket, success: bool) -> bool {
        let slot = (ticket.viewer.clone(), ticket.key.clone());
        let loading = Expansion::Loading {
            generation: ticket.generation,
        };
        match self.states.get_mut(&slot) {
            Some(state) if *state == loading => {
                *state = if success {
                    Expansion::Expanded {
                        generation: ticket.generation,
                    }
                } else {
                    Expansion::Failed {
                        generation: ticket.generation,
                    }
                };
                true
            }
            _ => false,
        }
    }

    pub fn is_open(&self, viewer: &str, key: &ExpansionKey) -> bool {
        self.states.contains_key(&(viewer.to_string(), key.clone()))
    }

    /// Drop every expansion of every viewer; used when a refresh replaces
    /// the consumer rows.
    pub fn clear(&mut self) {
        self.states.clear();
    }
}

/// An object row may expand into SQL databases when it is a host or physical
/// server, or when its name looks like a host name.
pub fn is_sql_host(obj: &JobObject) -> bool {
    obj.kind == "kHost" || obj.kind == "kPhysical" || obj.name.contains('.')
}

/// Console path for a drill-down toggle, each segment percent-encoded.
pub fn toggle_path(key: &ExpansionKey) -> String {
    let job = key.job();
    let mut segments = vec!["ui", "drilldown", "jobs", job.cluster.as_str(), job.job_id.as_str()];
    if let ExpansionKey::Server(s) = key {
        segments.push("servers");
        segments.push(s.server.as_str());
    }

    let Ok(mut url) = Url::parse("http://console/") else {
        return String::new();
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url.path().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(cluster: &str, id: &str) -> JobKey {
        JobKey {
            cluster: cluster.to_string(),
            job_id: id.to_string(),
        }
    }

    fn server(cluster: &str, id: &str, name: &str) -> ExpansionKey {
        ExpansionKey::Server(ServerKey {
            job: job(cluster, id),
            server: name.to_string(),
        })
    }

    fn state(c: &ExpansionController, viewer: &str, key: &ExpansionKey) -> Option<Expansion> {
        c.states.get(&(viewer.to_string(), key.clone())).copied()
    }

    #[test]
    fn expand_then_collapse() {
        let mut c = ExpansionController::new();
        let key = ExpansionKey::Job(job("c1", "7"));
        let ticket = c.expand("v1", key.clone());
        assert!(c.resolve(&ticket, true));
        assert_eq!(
            state(&c, "v1", &key),
            Some(Expansion::Expanded { generation: ticket.generation })
        );
        assert!(c.collapse("v1", &key));
        assert!(!c.is_open("v1", &key));
        assert!(!c.collapse("v1", &key));
    }

    #[test]
    fn repeated_expand_keeps_the_row_open() {
        let mut c = ExpansionController::new();
        let key = ExpansionKey::Job(job("c1", "7"));
        let first = c.expand("v1", key.clone());
        assert!(c.resolve(&first, true));
        let second = c.expand("v1", key.clone());
        assert!(c.resolve(&second, true));
        assert!(c.is_open("v1", &key));
    }

    #[test]
    fn expand_collapse_expand_leaves_one_expansion() {
        let mut c = ExpansionController::new();
        let key = ExpansionKey::Job(job("c1", "7"));

        let first = c.expand("v1", key.clone());
        c.collapse("v1", &key);
        let second = c.expand("v1", key.clone());
        assert_ne!(first.generation, second.generation);

        // The first response arrives late and must not win.
        assert!(!c.resolve(&first, true));
        assert!(c.resolve(&second, true));
        assert_eq!(c.states.len(), 1);
        assert!(!c.resolve(&second, true));
    }

    #[test]
    fn response_after_collapse_is_stale() {
        let mut c = ExpansionController::new();
        let key = ExpansionKey::Job(job("c1", "7"));
        let ticket = c.expand("v1", key.clone());
        c.collapse("v1", &key);
        assert!(!c.resolve(&ticket, false));
        assert_eq!(state(&c, "v1", &key), None);
    }

    #[test]
    fn failure_is_recorded_until_collapsed() {
        let mut c = ExpansionController::new();
        let key = ExpansionKey::Job(job("c1", "7"));
        let ticket = c.expand("v1", key.clone());
        assert!(c.resolve(&ticket, false));
        assert_eq!(
            state(&c, "v1", &key),
            Some(Expansion::Failed { generation: ticket.generation })
        );
        assert!(c.collapse("v1", &key));
    }

    #[test]
    fn viewers_do_not_share_rows() {
        let mut c = ExpansionController::new();
        let key = ExpansionKey::Job(job("c1", "7"));
        let a = c.expand("v1", key.clone());
        let b = c.expand("v2", key.clone());
        assert!(c.resolve(&a, true));
        assert!(c.resolve(&b, true));

        assert!(c.collapse("v1", &key));
        assert!(!c.is_open("v1", &key));
        assert!(c.is_open("v2", &key));
    }

    #[test]
    fn collapsing_a_job_closes_its_servers_only() {
        let mut c = ExpansionController::new();
        let a = ExpansionKey::Job(job("c1", "7"));
        let b = ExpansionKey::Job(job("c1", "8"));
        let a_sql = server("c1", "7", "sql01.corp.local");
        let b_sql = server("c1", "8", "sql02.corp.local");
        for key in [&a, &b, &a_sql, &b_sql] {
            c.expand("v1", key.clone());
        }
        c.expand("v2", a_sql.clone());

        assert!(c.collapse("v1", &a));
        assert!(!c.is_open("v1", &a_sql));
        assert!(c.is_open("v1", &b));
        assert!(c.is_open("v1", &b_sql));
        assert!(c.is_open("v2", &a_sql));
    }

    #[test]
    fn keys_with_separator_characters_stay_distinct() {
        let mut c = ExpansionController::new();
        c.expand("v1", ExpansionKey::Job(job("a-b", "c")));
        assert!(!c.is_open("v1", &ExpansionKey::Job(job("a", "b-c"))));
    }

    #[test]
    fn actions_parse_from_lowercase() {
        #[derive(Deserialize)]
        struct Params {
            #[serde(default)]
            action: DrillAction,
        }
        let parse = |json: &str| serde_json::from_str::<Params>(json).unwrap().action;
        assert_eq!(parse(r#"{"action":"collapse"}"#), DrillAction::Collapse);
        assert_eq!(parse(r#"{"action":"expand"}"#), DrillAction::Expand);
        assert_eq!(parse("{}"), DrillAction::Expand);
    }

    #[test]
    fn sql_host_heuristic() {
        let obj = |name: &str, kind: &str| JobObject {
            name: name.to_string(),
            kind: kind.to_string(),
            ..Default::default()
        };
        assert!(is_sql_host(&obj("sql01.corp.com", "kSQL")));
        assert!(is_sql_host(&obj("SQLBOX", "kHost")));
        assert!(is_sql_host(&obj("SQLBOX", "kPhysical")));
        assert!(!is_sql_host(&obj("fileshare", "kVMware")));
    }

    #[test]
    fn toggle_paths_are_encoded() {
        assert_eq!(
            toggle_path(&ExpansionKey::Job(job("prod a", "42"))),
            "/ui/drilldown/jobs/prod%20a/42"
        );
        assert_eq!(
            toggle_path(&server("c1", "42", "db/01")),
            "/ui/drilldown/jobs/c1/42/servers/db%2F01"
        );
    }
}
