//! Canned results for demonstration mode.
//!
//! Lets the whole pipeline run on a laptop with no cluster access. Lookups
//! are deterministic: the same identifier always yields the same entry.

use crate::status::Status;

/// A canned `(value, status, message)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoEntry {
    pub value: &'static str,
    pub status: Status,
    pub message: &'static str,
}

const fn ok(value: &'static str, message: &'static str) -> DemoEntry {
    DemoEntry {
        value,
        status: Status::Ok,
        message,
    }
}

/// Returned for identifiers with no canned data.
pub const MISSING: DemoEntry = DemoEntry {
    value: "N/A",
    status: Status::Unknown,
    message: "no demo data",
};

const DEMO_DATA: &[(&str, DemoEntry)] = &[
    // OS
    ("OS-001", ok("45", "within normal range")),
    ("OS-002", ok("62.5", "within normal range")),
    ("OS-003", ok("23", "within normal range")),
    ("OS-004", ok("up 15 days, 4 hours, 32 minutes", "confirmed present")),
    ("OS-005", ok("0", "no zombie processes")),
    ("OS-006", ok("1.25", "within normal range")),
    ("OS-007", ok("12.3", "within normal range")),
    ("OS-008", ok("3456", "within normal range")),
    ("OS-009", ok("128", "within normal range")),
    ("OS-010", ok("5.15.0-91-generic", "confirmed present")),
    // Kubernetes
    (
        "K8S-001",
        ok(
            "master-01:Ready\nworker-01:Ready\nworker-02:Ready\nworker-03:Ready",
            "all nodes healthy (4/4)",
        ),
    ),
    (
        "K8S-002",
        ok(
            "master-01:32%\nworker-01:45%\nworker-02:38%\nworker-03:52%",
            "CPU healthy on all nodes",
        ),
    ),
    (
        "K8S-003",
        ok(
            "master-01:58%\nworker-01:62%\nworker-02:55%\nworker-03:71%",
            "memory healthy on all nodes",
        ),
    ),
    (
        "K8S-004",
        ok(
            "coredns-5d78c9869d-abc12:Running\ncoredns-5d78c9869d-def34:Running\n\
             etcd-master-01:Running\nkube-apiserver-master-01:Running\n\
             kube-controller-manager-master-01:Running\nkube-proxy-xxxxx:Running\n\
             kube-scheduler-master-01:Running",
            "all system pods healthy (7/7)",
        ),
    ),
    (
        "K8S-005",
        ok(
            "pv-data-01:Bound\npv-data-02:Bound\npv-logs-01:Bound",
            "all persistent volumes bound (3/3)",
        ),
    ),
    (
        "K8S-006",
        ok(
            "data-pvc-01:Bound\ndata-pvc-02:Bound\nlogs-pvc-01:Bound",
            "all persistent volume claims bound (3/3)",
        ),
    ),
    ("K8S-007", ok("3", "warning events within normal range")),
    ("K8S-008", ok("0", "no NotReady nodes")),
    ("K8S-009", ok("v1.28.4", "confirmed present")),
    ("K8S-010", ok("8", "8 namespaces")),
    // Services
    (
        "SVC-001",
        ok(
            "nginx-deployment:3/3\napi-server:2/2\nworker-deployment:5/5\nredis:1/1\npostgres:1/1",
            "all deployments healthy (5)",
        ),
    ),
    (
        "SVC-002",
        ok(
            "mysql:1/1\nredis:3/3\nelasticsearch:3/3",
            "all statefulsets healthy (3)",
        ),
    ),
    (
        "SVC-003",
        ok(
            "fluentd:4/4\nnode-exporter:4/4\nkube-proxy:4/4",
            "all daemonsets healthy (3)",
        ),
    ),
    ("SVC-004", ok("0", "no services without endpoints")),
    ("SVC-005", ok("5", "5 ingress resources")),
    ("SVC-006", ok("0", "no pods with excessive restarts")),
    ("SVC-007", ok("0", "no pending pods")),
    ("SVC-008", ok("0", "no failed pods")),
    ("SVC-009", ok("3", "3 cronjobs")),
    ("SVC-010", ok("0", "no failed jobs")),
];

/// Canned entry for `check_id`, or [`MISSING`].
pub fn lookup(check_id: &str) -> DemoEntry {
    DEMO_DATA
        .iter()
        .find(|(id, _)| *id == check_id)
        .map(|(_, entry)| *entry)
        .unwrap_or(MISSING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_id_returns_entry() {
        let entry = lookup("OS-001");
        assert_eq!(entry.value, "45");
        assert_eq!(entry.status, Status::Ok);
    }

    #[test]
    fn unknown_id_degrades_to_unknown() {
        let entry = lookup("OS-999");
        assert_eq!(entry, MISSING);
        assert_eq!(entry.status, Status::Unknown);
        assert_eq!(entry.message, "no demo data");
    }

    #[test]
    fn lookups_are_deterministic() {
        for (id, _) in DEMO_DATA {
            assert_eq!(lookup(id), lookup(id));
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<&str> = DEMO_DATA.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), DEMO_DATA.len());
    }
}
