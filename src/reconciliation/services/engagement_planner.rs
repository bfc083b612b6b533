use std::collections::HashSet;

/// EngagementPlanner - works out which engagements are missing
///
/// Compares the project names known to Dependency-Track with the engagement
/// names known to DefectDojo. Matching is exact (case and whitespace sensitive).
pub struct EngagementPlanner;

impl EngagementPlanner {
    /// Names present in `source_names` but absent from `target_names`, sorted
    ///
    /// Sorting only makes the log output stable; creation order carries no meaning.
    pub fn missing_engagements(
        source_names: &HashSet<String>,
        target_names: &HashSet<String>,
    ) -> Vec<String> {
        let mut missing: Vec<String> = source_names.difference(target_names).cloned().collect();
        missing.sort();
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_missing_engagements_difference() {
        let missing = EngagementPlanner::missing_engagements(
            &set(&["web", "api", "mobile"]),
            &set(&["api", "legacy"]),
        );
        assert_eq!(missing, vec!["mobile".to_string(), "web".to_string()]);
    }

    #[test]
    fn test_subset_yields_nothing() {
        let missing =
            EngagementPlanner::missing_engagements(&set(&["web"]), &set(&["web", "api"]));
        assert!(missing.is_empty());
    }

    #[test]
    fn test_empty_source() {
        let missing = EngagementPlanner::missing_engagements(&set(&[]), &set(&["web"]));
        assert!(missing.is_empty());
    }

    #[test]
    fn test_case_sensitive() {
        let missing = EngagementPlanner::missing_engagements(&set(&["Web"]), &set(&["web"]));
        assert_eq!(missing, vec!["Web".to_string()]);
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let source = set(&["web", "api"]);
        let mut target = set(&["api"]);

        let first = EngagementPlanner::missing_engagements(&source, &target);
        assert_eq!(first.len(), 1);
        target.extend(first);

        let second = EngagementPlanner::missing_engagements(&source, &target);
        assert!(second.is_empty());
    }
}
