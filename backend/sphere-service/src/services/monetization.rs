use chrono::{DateTime, Months, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::models::Tier;
use crate::error::{AppError, AppResult};
use crate::repository::{EarningsInputs, MonetizationRepository};
use crate::services::PaymentsClient;

/// Earned per like on the creator's posts
const LIKE_RATE: f64 = 5.0;
/// Earned per comment, pro and enterprise tiers only
const COMMENT_RATE: f64 = 0.75;
/// Smallest balance that can be paid out
const PAYOUT_MINIMUM: f64 = 1000.0;

/// Monetization eligibility thresholds
const ELIGIBLE_FOLLOWERS: i64 = 100;
const ELIGIBLE_VIEWS: i64 = 5000;
const ELIGIBLE_LIKES: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

/// A purchasable subscription plan. Amounts are major currency units.
#[derive(Debug, Clone, Copy)]
pub struct Plan {
    pub id: &'static str,
    pub tier: Tier,
    pub cycle: BillingCycle,
    pub amount: i64,
}

/// The fixed plan catalog
pub const PLANS: &[Plan] = &[
    Plan { id: "creator_monthly", tier: Tier::Creator, cycle: BillingCycle::Monthly, amount: 2500 },
    Plan { id: "creator_yearly", tier: Tier::Creator, cycle: BillingCycle::Yearly, amount: 27_000 },
    Plan { id: "pro_monthly", tier: Tier::Pro, cycle: BillingCycle::Monthly, amount: 5000 },
    Plan { id: "pro_yearly", tier: Tier::Pro, cycle: BillingCycle::Yearly, amount: 54_000 },
    Plan { id: "enterprise_monthly", tier: Tier::Enterprise, cycle: BillingCycle::Monthly, amount: 7000 },
    Plan { id: "enterprise_yearly", tier: Tier::Enterprise, cycle: BillingCycle::Yearly, amount: 75_600 },
];

pub fn plan(id: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.id == id)
}

/// Calendar-based expiry: one month or one year from `now`. Saturates to
/// the last day of the target month when the source day does not exist.
pub fn expiry_from(now: DateTime<Utc>, cycle: BillingCycle) -> DateTime<Utc> {
    let months = match cycle {
        BillingCycle::Monthly => Months::new(1),
        BillingCycle::Yearly => Months::new(12),
    };
    now.checked_add_months(months).unwrap_or(now)
}

/// Read-time earnings projection from counter aggregates. Nothing is
/// stored; the projection is recomputed on every dashboard read.
pub fn project_earnings(tier: Option<Tier>, total_likes: i64, total_comments: i64) -> Earnings {
    let likes = total_likes as f64 * LIKE_RATE;
    let comments = match tier {
        Some(t) if t.earns_from_comments() => total_comments as f64 * COMMENT_RATE,
        _ => 0.0,
    };
    Earnings {
        from_likes: likes,
        from_comments: comments,
        total: likes + comments,
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Earnings {
    pub from_likes: f64,
    pub from_comments: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Eligibility {
    pub followers_met: bool,
    pub views_met: bool,
    pub likes_met: bool,
    pub eligible: bool,
}

impl Eligibility {
    pub fn from_inputs(inputs: &EarningsInputs) -> Self {
        let followers_met = inputs.follower_count >= ELIGIBLE_FOLLOWERS;
        let views_met = inputs.total_views >= ELIGIBLE_VIEWS;
        let likes_met = inputs.total_likes >= ELIGIBLE_LIKES;
        Self {
            followers_met,
            views_met,
            likes_met,
            eligible: followers_met && views_met && likes_met,
        }
    }
}

/// Everything the monetization dashboard shows in one payload
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub tier: Option<Tier>,
    pub total_posts: i64,
    pub total_likes: i64,
    pub total_comments: i64,
    pub total_views: i64,
    pub follower_count: i64,
    pub earnings: Earnings,
    pub paid: f64,
    pub pending: f64,
    pub payout_eligible: bool,
    pub eligibility: Eligibility,
}

/// Current subscription state as returned to the caller
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionStatus {
    pub tier: Option<Tier>,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_reference: Option<String>,
}

/// Subscription lifecycle plus the earnings projection
#[derive(Clone)]
pub struct MonetizationService {
    repo: MonetizationRepository,
    payments: PaymentsClient,
}

impl MonetizationService {
    pub fn new(repo: MonetizationRepository, payments: PaymentsClient) -> Self {
        Self { repo, payments }
    }

    /// Activate a plan after verifying the gateway reference. The charge
    /// itself happened on the gateway; this only confirms it and writes
    /// the tier with its calendar expiry.
    pub async fn subscribe(
        &self,
        user_id: Uuid,
        plan_id: &str,
        reference: &str,
    ) -> AppResult<SubscriptionStatus> {
        let plan = plan(plan_id)
            .ok_or_else(|| AppError::BadRequest(format!("unknown plan: {plan_id}")))?;

        self.payments.verify(reference, plan.amount).await?;

        let expires_at = expiry_from(Utc::now(), plan.cycle);
        if !self
            .repo
            .activate(user_id, plan.tier.as_str(), expires_at, reference)
            .await?
        {
            return Err(AppError::NotFound("user"));
        }

        tracing::info!(%user_id, plan = plan.id, %expires_at, "subscription activated");
        Ok(SubscriptionStatus {
            tier: Some(plan.tier),
            active: true,
            expires_at: Some(expires_at),
            last_reference: Some(reference.to_string()),
        })
    }

    /// Verify an arbitrary gateway reference against an expected amount,
    /// without touching subscription state.
    pub async fn verify_payment(
        &self,
        reference: &str,
        expected_amount: i64,
    ) -> AppResult<crate::services::payments::GatewayTransaction> {
        self.payments.verify(reference, expected_amount).await
    }

    /// Deactivate immediately; no proration, the remainder of the period
    /// is forfeited.
    pub async fn unsubscribe(&self, user_id: Uuid) -> AppResult<()> {
        if !self.repo.deactivate(user_id).await? {
            return Err(AppError::NotFound("user"));
        }
        tracing::info!(%user_id, "subscription deactivated");
        Ok(())
    }

    /// Current subscription state. An active row whose expiry has passed
    /// is corrected to inactive on this read (lazy expiry).
    pub async fn status(&self, user_id: Uuid) -> AppResult<SubscriptionStatus> {
        let state = self
            .repo
            .state(user_id)
            .await?
            .ok_or(AppError::NotFound("user"))?;

        if state.monetization_active {
            if let Some(expires_at) = state.monetization_expires_at {
                if expires_at < Utc::now() {
                    self.repo.deactivate(user_id).await?;
                    tracing::info!(%user_id, "expired subscription deactivated on read");
                    return Ok(SubscriptionStatus {
                        tier: None,
                        active: false,
                        expires_at: Some(expires_at),
                        last_reference: state.monetization_last_reference,
                    });
                }
            }
        }

        let tier = if state.monetization_active {
            state.monetization_tier.as_deref().and_then(Tier::parse)
        } else {
            None
        };
        Ok(SubscriptionStatus {
            tier,
            active: state.monetization_active,
            expires_at: state.monetization_expires_at,
            last_reference: state.monetization_last_reference,
        })
    }

    /// The dashboard payload: counter aggregates, projected earnings and
    /// eligibility flags.
    pub async fn dashboard(&self, user_id: Uuid) -> AppResult<DashboardReport> {
        let status = self.status(user_id).await?;
        let inputs = self.repo.earnings_inputs(user_id).await?;
        let paid = self.repo.earnings_paid(user_id).await?;

        let earnings = project_earnings(status.tier, inputs.total_likes, inputs.total_comments);
        let pending = (earnings.total - paid).max(0.0);

        Ok(DashboardReport {
            tier: status.tier,
            total_posts: inputs.total_posts,
            total_likes: inputs.total_likes,
            total_comments: inputs.total_comments,
            total_views: inputs.total_views,
            follower_count: inputs.follower_count,
            earnings,
            paid,
            pending,
            payout_eligible: pending >= PAYOUT_MINIMUM,
            eligibility: Eligibility::from_inputs(&inputs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn plan_catalog_lookup() {
        let p = plan("pro_yearly").expect("plan exists");
        assert_eq!(p.tier, Tier::Pro);
        assert_eq!(p.amount, 54_000);
        assert!(plan("gold_weekly").is_none());
    }

    #[test]
    fn expiry_is_calendar_based() {
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(
            expiry_from(start, BillingCycle::Monthly),
            Utc.with_ymd_and_hms(2025, 2, 15, 12, 0, 0).unwrap()
        );
        assert_eq!(
            expiry_from(start, BillingCycle::Yearly),
            Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn expiry_saturates_to_shorter_months() {
        let jan_31 = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        assert_eq!(
            expiry_from(jan_31, BillingCycle::Monthly),
            Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn creator_tier_earns_from_likes_only() {
        let e = project_earnings(Some(Tier::Creator), 200, 400);
        assert_eq!(e.from_likes, 1000.0);
        assert_eq!(e.from_comments, 0.0);
        assert_eq!(e.total, 1000.0);
    }

    #[test]
    fn pro_and_enterprise_also_earn_from_comments() {
        for tier in [Tier::Pro, Tier::Enterprise] {
            let e = project_earnings(Some(tier), 200, 400);
            assert_eq!(e.from_likes, 1000.0);
            assert_eq!(e.from_comments, 300.0);
            assert_eq!(e.total, 1300.0);
        }
    }

    #[test]
    fn no_tier_projects_nothing_from_comments() {
        let e = project_earnings(None, 10, 10);
        assert_eq!(e.from_comments, 0.0);
        assert_eq!(e.total, 50.0);
    }

    #[test]
    fn eligibility_requires_all_three_thresholds() {
        let eligible = Eligibility::from_inputs(&EarningsInputs {
            total_posts: 10,
            total_likes: 1000,
            total_comments: 0,
            total_views: 5000,
            follower_count: 100,
        });
        assert!(eligible.eligible);

        let short_on_views = Eligibility::from_inputs(&EarningsInputs {
            total_posts: 10,
            total_likes: 1000,
            total_comments: 0,
            total_views: 4999,
            follower_count: 100,
        });
        assert!(!short_on_views.eligible);
        assert!(short_on_views.likes_met && short_on_views.followers_met);
    }
}
