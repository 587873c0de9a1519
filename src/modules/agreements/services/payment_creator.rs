use async_trait::async_trait;
use sqlx::{MySql, Transaction};

use crate::core::Result;

/// Creates the single settlement payment of a full-payment agreement and
/// returns its id.
///
/// Runs on the caller's transaction so the agreement and its payment commit together.
#[async_trait]
pub trait PaymentCreator: Send + Sync {
    async fn create_full_payment_for_agreement(
        &self,
        tx: &mut Transaction<'_, MySql>,
        agreement_id: i64,
    ) -> Result<i64>;
}
