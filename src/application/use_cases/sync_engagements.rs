use crate::application::dto::EngagementSyncSummary;
use crate::ports::outbound::{ProductLookup, ProgressReporter, TargetDirectory};
use crate::reconciliation::domain::EngagementTemplate;
use crate::reconciliation::services::EngagementPlanner;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use tracing::debug;

/// SyncEngagementsUseCase - creates the engagements DefectDojo is missing
///
/// Creation calls for distinct names are independent and run concurrently,
/// bounded by the request's concurrency limit. A failed creation is reported
/// and recorded but never stops the others.
pub struct SyncEngagementsUseCase<'a, T, L, PR> {
    target: &'a T,
    products: &'a L,
    progress_reporter: &'a PR,
    template: &'a EngagementTemplate,
}

impl<'a, T, L, PR> SyncEngagementsUseCase<'a, T, L, PR>
where
    T: TargetDirectory,
    L: ProductLookup,
    PR: ProgressReporter,
{
    pub fn new(
        target: &'a T,
        products: &'a L,
        progress_reporter: &'a PR,
        template: &'a EngagementTemplate,
    ) -> Self {
        Self {
            target,
            products,
            progress_reporter,
            template,
        }
    }

    /// Creates one engagement per name in `source_names - target_names`
    ///
    /// # Returns
    /// The attempted names (every missing name) and the ones that failed.
    /// In a dry run the names are reported and nothing is created.
    pub async fn execute(
        &self,
        source_names: &HashSet<String>,
        target_names: &HashSet<String>,
        concurrency: usize,
        dry_run: bool,
    ) -> EngagementSyncSummary {
        let missing = EngagementPlanner::missing_engagements(source_names, target_names);

        if missing.is_empty() {
            self.progress_reporter
                .report("✅ Every project already has an engagement in DefectDojo");
            return EngagementSyncSummary::default();
        }

        if dry_run {
            for name in &missing {
                self.progress_reporter.report(&format!(
                    "   - Would create engagement '{}' in product {}",
                    name,
                    self.products.product_id_for(name)
                ));
            }
            self.progress_reporter.report_completion(&format!(
                "📝 {} engagement(s) would be added to DefectDojo",
                missing.len()
            ));
            return EngagementSyncSummary {
                attempted: missing,
                failed: Vec::new(),
            };
        }

        self.progress_reporter.report(&format!(
            "🏗️  Creating {} missing engagement(s)...",
            missing.len()
        ));

        let creations: Vec<_> = missing.iter().map(|name| self.create_one(name)).collect();
        let failed: Vec<(String, String)> = stream::iter(creations)
            .buffer_unordered(concurrency.max(1))
            .filter_map(|failure| async move { failure })
            .collect()
            .await;

        self.progress_reporter.report_completion(&format!(
            "✅ Added {} new engagement(s) to DefectDojo",
            missing.len()
        ));

        EngagementSyncSummary {
            attempted: missing,
            failed,
        }
    }

    /// Creates one engagement; returns the name and error message on failure
    async fn create_one(&self, name: &str) -> Option<(String, String)> {
        let product_id = self.products.product_id_for(name);
        let payload = self.template.for_project(name, product_id);
        match self.target.create_engagement(&payload).await {
            Ok(()) => {
                debug!(engagement = %name, product_id, "engagement created");
                None
            }
            Err(e) => {
                let message = format!("{:#}", e);
                self.progress_reporter.report_error(&format!(
                    "⚠️  Failed to create engagement '{}': {}",
                    name, message
                ));
                Some((name.to_string(), message))
            }
        }
    }
}
