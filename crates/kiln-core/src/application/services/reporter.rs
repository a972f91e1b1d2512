//! Reporting: join results back to their plans and artifacts.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::{ApplyResult, Plan, PlanId, Report};

pub struct Reporter;

impl Reporter {
    /// One report per result, in result order.
    ///
    /// Each report describes the artifact its plan carried when applied.
    /// Plans that never produced a result (the run halted first) get no
    /// report. Results whose plan cannot be found are dropped.
    #[instrument(skip_all, fields(results = results.len()))]
    pub fn report(plans: &[Plan], results: &[ApplyResult]) -> Vec<Report> {
        let plans: HashMap<&PlanId, &Plan> = plans.iter().map(|p| (&p.id, p)).collect();

        results
            .iter()
            .filter_map(|result| {
                let plan = plans.get(&result.plan_id)?;
                Some(Report::project(&plan.artifact, plan, result))
            })
            .inspect(|report| {
                debug!(path = %report.provenance.destination_path.display(), status = %report.status, "Reported")
            })
            .collect()
    }
}
