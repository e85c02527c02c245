//! Read-only entry points over stored plans and runs.

use super::Session;
use crate::{
    display::PlanRecords,
    error::MenderError,
    models::{Outcome, PlanDetails},
    params::Id,
};

impl Session {
    /// Lists the plans stored for this repository, newest first.
    pub async fn list_plans(&self) -> Outcome<PlanRecords> {
        match self.load_plans().await {
            Ok(plans) => Outcome::success(format!("Found {} plan(s)", plans.len()), PlanRecords(plans)),
            Err(e) => Outcome::failed(format!("Failed to list plans: {e}")),
        }
    }

    /// Shows a stored plan with its execution history.
    pub async fn show_plan(&self, params: &Id) -> Outcome<PlanDetails> {
        match self.load_plan_details(params.id).await {
            Ok(details) => Outcome::success(
                format!(
                    "Plan {} with {} run(s)",
                    details.record.id,
                    details.runs.len()
                ),
                details,
            ),
            Err(e @ MenderError::PlanNotFound { .. }) => Outcome::failed(e.to_string()),
            Err(e) => Outcome::failed(format!("Failed to show plan: {e}")),
        }
    }
}
