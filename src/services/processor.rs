//! Report Processor
//!
//! Coordinates one pipeline execution for a run:
//!
//! 1. convert every tool's reports on the execution node
//! 2. record the canonical reports into the run's aggregate
//! 3. evaluate thresholds against the previous completed run
//! 4. clean up generated reports
//! 5. write the combined verdict back to the run
//!
//! Every execution gets a fresh namespace so repeated or concurrent
//! executions never share an output directory.

use std::sync::Arc;

use uuid::Uuid;

use xunit_core::{CoreError, RunLog, Verdict};
use xunit_gates::ThresholdEvaluator;

use crate::models::run::Run;
use crate::models::settings::PipelineConfig;
use crate::models::tool::ToolConfig;
use crate::services::node::protocol::{ConversionJob, NodeRequest, NodeResponse};
use crate::services::node::{dispatch, ExecutionNode};
use crate::services::stylesheet::StylesheetResolver;
use crate::services::{lifecycle, pattern, recorder};
use crate::utils::error::{AppError, AppResult};

/// What a pipeline execution did to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// No report was processed; the run's verdict was left untouched
    Skipped,
    /// Results were recorded and the verdict written
    Recorded {
        verdict: Verdict,
        passed: usize,
        failed: usize,
        skipped: usize,
    },
}

/// Coordinator of one pipeline execution.
pub struct ReportProcessor {
    namespace: String,
    config: PipelineConfig,
    evaluator: ThresholdEvaluator,
    stylesheets: StylesheetResolver,
    node: Arc<dyn ExecutionNode>,
}

impl ReportProcessor {
    /// Validate the configuration and allocate the namespace.
    pub fn new(config: PipelineConfig, node: Arc<dyn ExecutionNode>) -> AppResult<Self> {
        config.validate().map_err(AppError::config)?;
        let evaluator =
            ThresholdEvaluator::from_thresholds(config.threshold_mode, config.thresholds.clone())?;
        tracing::debug!(
            tools = config.tools.len(),
            thresholds = evaluator.len(),
            mode = ?evaluator.mode(),
            "pipeline configured"
        );
        let stylesheets = StylesheetResolver::new(config.extra.user_stylesheet_dir.clone());
        Ok(Self {
            namespace: Uuid::new_v4().to_string(),
            config,
            evaluator,
            stylesheets,
            node,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline against `run`.
    ///
    /// On error the run keeps whatever verdict it already had.
    pub async fn process(&self, run: &mut Run) -> AppResult<ProcessOutcome> {
        let log = run.context().log().clone();
        log.info("Starting to record.");
        tracing::info!(run_id = run.context().run_id(), namespace = %self.namespace, "pipeline started");

        let processed = self.convert_all(run, &log).await?;
        if processed == 0 {
            log.info("Skipping tests recording.");
            return Ok(ProcessOutcome::Skipped);
        }

        recorder::record(self.node.as_ref(), run, &self.namespace).await?;
        let aggregate = run
            .test_result()
            .ok_or_else(|| CoreError::state("The run has no test result after recording"))?;

        let candidate = if self.evaluator.is_empty() {
            Verdict::Success
        } else {
            self.evaluator
                .evaluate(&log, aggregate, run.previous_aggregate())
        };
        let verdict = Verdict::combine(run.result(), candidate);
        let (passed, failed, skipped) = (
            aggregate.pass_count(),
            aggregate.fail_count(),
            aggregate.skip_count(),
        );

        lifecycle::clean(self.node.as_ref(), &log, &self.namespace, &self.config.tools).await?;

        log.info(format!("Setting the build status to {}", verdict));
        run.set_result(verdict);
        tracing::info!(
            run_id = run.context().run_id(),
            %verdict,
            passed,
            failed,
            skipped,
            "pipeline finished"
        );
        Ok(ProcessOutcome::Recorded {
            verdict,
            passed,
            failed,
            skipped,
        })
    }

    /// Convert every tool in order, returning the total processed count.
    async fn convert_all(&self, run: &Run, log: &RunLog) -> AppResult<usize> {
        let mut total = 0;
        for tool in &self.config.tools {
            let pattern = pattern::resolve_pattern(&tool.pattern, run.context().env())?;
            if pattern.trim().is_empty() {
                log.info(format!(
                    "[{}] - No file pattern configured. The tool has been skipped.",
                    tool.tool_name()
                ));
                continue;
            }

            log.info(format!("Processing {}", tool.tool_name()));
            let stylesheet = self
                .stylesheets
                .for_tool(tool, self.node.as_ref(), run.context())
                .await?;

            match self.convert_tool(tool, pattern, stylesheet, run, log).await {
                Ok(count) => total += count,
                Err(err) if !tool.stop_processing_if_error && is_tool_error(&err) => {
                    log.error(format!(
                        "[{}] - The tool has been skipped: {}",
                        tool.tool_name(),
                        err
                    ));
                }
                Err(err) => {
                    log.error(format!(
                        "[{}] - Stopping the recording: {}",
                        tool.tool_name(),
                        err
                    ));
                    return Err(err.into());
                }
            }
        }
        Ok(total)
    }

    async fn convert_tool(
        &self,
        tool: &ToolConfig,
        pattern: String,
        stylesheet: Option<String>,
        run: &Run,
        log: &RunLog,
    ) -> Result<usize, CoreError> {
        let job = ConversionJob {
            namespace: self.namespace.clone(),
            tool: tool.clone(),
            pattern,
            stylesheet,
            build_time_ms: run.context().started_at_ms(),
            test_time_margin_ms: self.config.extra.test_time_margin_ms,
        };
        match dispatch(self.node.as_ref(), log, NodeRequest::Convert(job)).await? {
            NodeResponse::Converted { processed } => Ok(processed),
            other => Err(CoreError::state(format!(
                "Unexpected reply to a conversion request: {:?}",
                other
            ))),
        }
    }
}

/// Failures confined to one tool. Transport and state failures always abort.
fn is_tool_error(err: &CoreError) -> bool {
    matches!(
        err,
        CoreError::NoTestFound(_)
            | CoreError::OutdatedReports(_)
            | CoreError::Conversion(_)
            | CoreError::Config(_)
            | CoreError::Io(_)
    )
}
