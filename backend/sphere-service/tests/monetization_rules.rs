use chrono::{TimeZone, Utc};
use sphere_service::domain::models::Tier;
use sphere_service::services::monetization::{
    expiry_from, plan, project_earnings, BillingCycle, PLANS,
};
use sphere_service::services::payments::{evaluate_transaction, GatewayTransaction};

#[test]
fn the_catalog_has_six_plans_with_fixed_prices() {
    assert_eq!(PLANS.len(), 6);

    let expected: &[(&str, Tier, i64)] = &[
        ("creator_monthly", Tier::Creator, 2500),
        ("creator_yearly", Tier::Creator, 27_000),
        ("pro_monthly", Tier::Pro, 5000),
        ("pro_yearly", Tier::Pro, 54_000),
        ("enterprise_monthly", Tier::Enterprise, 7000),
        ("enterprise_yearly", Tier::Enterprise, 75_600),
    ];

    for (id, tier, amount) in expected {
        let p = plan(id).unwrap_or_else(|| panic!("plan {id} missing"));
        assert_eq!(p.tier, *tier);
        assert_eq!(p.amount, *amount);
    }
}

#[test]
fn monthly_and_yearly_expiry_are_calendar_based() {
    let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap();

    assert_eq!(
        expiry_from(start, BillingCycle::Monthly),
        Utc.with_ymd_and_hms(2025, 4, 10, 9, 30, 0).unwrap()
    );
    assert_eq!(
        expiry_from(start, BillingCycle::Yearly),
        Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap()
    );
}

#[test]
fn earnings_projection_by_tier() {
    // 1000 likes, 200 comments
    let creator = project_earnings(Some(Tier::Creator), 1000, 200);
    assert_eq!(creator.total, 5000.0);
    assert_eq!(creator.from_comments, 0.0);

    let pro = project_earnings(Some(Tier::Pro), 1000, 200);
    assert_eq!(pro.from_likes, 5000.0);
    assert_eq!(pro.from_comments, 150.0);
    assert_eq!(pro.total, 5150.0);

    let enterprise = project_earnings(Some(Tier::Enterprise), 1000, 200);
    assert_eq!(enterprise.total, 5150.0);
}

#[test]
fn projection_is_pure_and_repeatable() {
    // Same counters in, same money out; nothing is accumulated anywhere.
    for _ in 0..3 {
        let e = project_earnings(Some(Tier::Pro), 40, 8);
        assert_eq!(e.total, 206.0);
    }
}

fn tx(status: &str, amount: i64, currency: &str) -> GatewayTransaction {
    serde_json::from_value(serde_json::json!({
        "status": status,
        "amount": amount,
        "currency": currency,
        "reference": "ref_abc",
    }))
    .expect("valid transaction json")
}

#[test]
fn gateway_verification_matches_plan_price_in_minor_units() {
    let p = plan("creator_monthly").expect("plan exists");

    assert!(evaluate_transaction(&tx("success", p.amount * 100, "NGN"), p.amount, "NGN").is_ok());
    // off by one kobo
    assert!(
        evaluate_transaction(&tx("success", p.amount * 100 + 1, "NGN"), p.amount, "NGN").is_err()
    );
    // right amount, wrong outcome
    assert!(evaluate_transaction(&tx("abandoned", p.amount * 100, "NGN"), p.amount, "NGN").is_err());
    // right amount, wrong currency
    assert!(evaluate_transaction(&tx("success", p.amount * 100, "GHS"), p.amount, "NGN").is_err());
}
