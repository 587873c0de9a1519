use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::core::Result;
use crate::config::PenaltyConfig;
use crate::modules::payments::repositories::InstallmentStore;

/// Outcome of one penalty pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PenaltyRunReport {
    pub scanned: usize,
    pub penalized: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Background job that marks overdue installments and recomputes their penalty.
///
/// Each pass takes installments due before today that are still pending or
/// overdue, moves pending ones to overdue, and sets
/// `penalty = days_late * daily_penalty`, `total_due = amount_due + penalty`.
/// A failing row is logged and the pass continues.
pub struct PenaltyChecker {
    store: Arc<dyn InstallmentStore>,
    daily_penalty: Decimal,
    period: Duration,
}

impl PenaltyChecker {
    pub fn new(store: Arc<dyn InstallmentStore>, config: &PenaltyConfig) -> Self {
        Self {
            store,
            daily_penalty: config.daily_amount,
            period: Duration::from_secs(config.check_interval_secs),
        }
    }

    /// Runs `run` on every tick; spawn this on the tokio runtime
    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.period.as_secs(),
            daily_penalty = %self.daily_penalty,
            "Starting installment penalty checker"
        );

        let mut ticker = interval(self.period);

        loop {
            ticker.tick().await;
            self.run().await;
        }
    }

    /// One pass at the current time; failures are logged, never returned
    pub async fn run(&self) {
        match self.apply_penalties(Utc::now()).await {
            Ok(report) if report.scanned == 0 => {
                debug!("No overdue installments found");
            }
            Ok(report) => {
                info!(
                    scanned = report.scanned,
                    penalized = report.penalized,
                    skipped = report.skipped,
                    failed = report.failed,
                    "Penalty pass finished"
                );
            }
            Err(e) => {
                error!(error = %e, "Could not fetch overdue installments");
            }
        }
    }

    pub async fn apply_penalties(&self, now: DateTime<Utc>) -> Result<PenaltyRunReport> {
        let today = now.date_naive();
        let installments = self.store.find_penalizable(today).await?;

        let mut report = PenaltyRunReport {
            scanned: installments.len(),
            ..Default::default()
        };

        for mut installment in installments {
            if !installment.is_overdue_on(today) {
                report.skipped += 1;
                continue;
            }

            let days_late = installment.apply_penalty(now, self.daily_penalty);

            match self.store.save_penalty(&installment).await {
                Ok(true) => {
                    report.penalized += 1;
                    debug!(
                        installment_id = installment.id,
                        days_late,
                        penalty_amount = %installment.penalty_amount,
                        total_due = %installment.total_due,
                        "Penalty applied"
                    );
                }
                Ok(false) => {
                    report.skipped += 1;
                    warn!(
                        installment_id = installment.id,
                        "Installment changed status during penalty pass"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    error!(
                        installment_id = installment.id,
                        error = %e,
                        "Failed to update installment penalty"
                    );
                }
            }
        }

        Ok(report)
    }
}
