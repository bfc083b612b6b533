/// Prefix marking a version string built by the release pipeline
const RELEASE_PREFIX: &str = "release/";

/// Build number and tool name encoded in a `release/<number>-<tool>` version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    build_number: String,
    service: String,
}

impl ReleaseTag {
    /// Parses the `release/<number>-<tool>` convention.
    ///
    /// The version must start with `release/`, the number must be ASCII digits and
    /// the tool is everything after the first `-` (it may contain further dashes).
    /// Anything else yields `None`.
    pub fn parse(version: &str) -> Option<Self> {
        let rest = version.strip_prefix(RELEASE_PREFIX)?;
        let (number, tool) = rest.split_once('-')?;

        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if tool.trim().is_empty() {
            return None;
        }

        Some(Self {
            build_number: number.to_string(),
            service: tool.to_string(),
        })
    }

    pub fn build_number(&self) -> &str {
        &self.build_number
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}
