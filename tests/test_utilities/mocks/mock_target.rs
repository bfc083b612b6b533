use async_trait::async_trait;
use dtrack_dojo_sync::prelude::*;
use dtrack_dojo_sync::reconciliation::domain::{EngagementId, TestId};
use dtrack_dojo_sync::shared::error::SyncError;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Write calls recorded by [`MockTarget`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetCall {
    Create { name: String, product_id: u64 },
    Import { engagement_id: EngagementId, test_title: String, scan_date: String },
    Reimport { engagement_id: EngagementId, test_id: TestId, test_title: String },
}

/// Mock TargetDirectory keeping engagements and tests in memory
#[derive(Clone, Default)]
pub struct MockTarget {
    pub engagements: Arc<Mutex<Vec<Engagement>>>,
    pub tests: Arc<Mutex<HashMap<EngagementId, Vec<Test>>>>,
    pub calls: Arc<Mutex<Vec<TargetCall>>>,
    pub failing_creates: HashSet<String>,
    pub failing_imports: HashSet<EngagementId>,
}

impl MockTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engagement(self, id: EngagementId, name: &str) -> Self {
        self.engagements
            .lock()
            .unwrap()
            .push(Engagement::new(id, name));
        self
    }

    pub fn with_test(self, engagement_id: EngagementId, test_id: TestId, title: &str) -> Self {
        self.tests
            .lock()
            .unwrap()
            .entry(engagement_id)
            .or_default()
            .push(Test::new(test_id, title));
        self
    }

    pub fn with_failing_create(mut self, name: &str) -> Self {
        self.failing_creates.insert(name.to_string());
        self
    }

    pub fn with_failing_import(mut self, engagement_id: EngagementId) -> Self {
        self.failing_imports.insert(engagement_id);
        self
    }

    pub fn calls(&self) -> Vec<TargetCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                TargetCall::Create { name, .. } => Some(name),
                _ => None,
            })
            .collect();
        names.sort();
        names
    }

    pub fn engagement_id(&self, name: &str) -> Option<EngagementId> {
        self.engagements
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.id)
    }
}

#[async_trait]
impl TargetDirectory for MockTarget {
    async fn list_engagements(&self) -> Result<Vec<Engagement>> {
        Ok(self.engagements.lock().unwrap().clone())
    }

    async fn create_engagement(&self, engagement: &NewEngagement) -> Result<()> {
        self.calls.lock().unwrap().push(TargetCall::Create {
            name: engagement.name.clone(),
            product_id: engagement.product_id,
        });
        if self.failing_creates.contains(&engagement.name) {
            return Err(SyncError::Create {
                name: engagement.name.clone(),
                status: 400,
                body: r#"{"product":["Invalid pk"]}"#.to_string(),
            }
            .into());
        }
        let mut engagements = self.engagements.lock().unwrap();
        let id = 100 + engagements.len() as u64;
        engagements.push(Engagement::new(id, engagement.name.clone()));
        Ok(())
    }

    async fn list_tests(&self, engagement_id: EngagementId) -> Result<Vec<Test>> {
        Ok(self
            .tests
            .lock()
            .unwrap()
            .get(&engagement_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn import_scan(&self, engagement_id: EngagementId, artifact: &ScanArtifact) -> Result<()> {
        if self.failing_imports.contains(&engagement_id) {
            return Err(SyncError::Upload {
                engagement_id,
                status: 500,
                body: "Server Error".to_string(),
            }
            .into());
        }
        self.calls.lock().unwrap().push(TargetCall::Import {
            engagement_id,
            test_title: artifact.version_label().to_string(),
            scan_date: artifact.scan_date().to_string(),
        });
        Ok(())
    }

    async fn reimport_scan(
        &self,
        engagement_id: EngagementId,
        test_id: TestId,
        artifact: &ScanArtifact,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(TargetCall::Reimport {
            engagement_id,
            test_id,
            test_title: artifact.version_label().to_string(),
        });
        Ok(())
    }
}
