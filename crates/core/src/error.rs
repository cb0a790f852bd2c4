use crate::catalog::Category;

/// Item-level failures raised while probing or classifying a single check.
///
/// None of these abort a run. The orchestrator turns each one into an
/// `UNKNOWN` result whose message is the `Display` text below.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CheckError {
    #[error("value could not be determined")]
    NoNumericValue,

    #[error("{tool} command unavailable")]
    ToolUnavailable { tool: String },

    #[error("{}", probe_failure_message(.stderr))]
    ProbeExecutionFailed { stderr: String },

    #[error("metrics server not installed")]
    MetricsApiUnavailable,

    #[error("metrics data unavailable (check metrics server)")]
    MetricsDataUnavailable,

    #[error("no targets to check")]
    NoTargets,

    #[error("malformed line: {line}")]
    MalformedLine { line: String },
}

fn probe_failure_message(stderr: &str) -> String {
    if stderr.is_empty() {
        "command produced no output".to_string()
    } else {
        format!("check failed: {stderr}")
    }
}

/// Failures loading the check catalog. These are fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("duplicate check id '{id}' in {category} section")]
    DuplicateId { category: Category, id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_failure_with_stderr() {
        let err = CheckError::ProbeExecutionFailed {
            stderr: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "check failed: connection refused");
    }

    #[test]
    fn probe_failure_without_stderr() {
        let err = CheckError::ProbeExecutionFailed {
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "command produced no output");
    }

    #[test]
    fn tool_unavailable_names_tool() {
        let err = CheckError::ToolUnavailable {
            tool: "kubectl".to_string(),
        };
        assert_eq!(err.to_string(), "kubectl command unavailable");
    }

    #[test]
    fn duplicate_id_names_section() {
        let err = CatalogError::DuplicateId {
            category: Category::Kubernetes,
            id: "K8S-001".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate check id 'K8S-001' in Kubernetes section"
        );
    }
}
