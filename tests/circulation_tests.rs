//! Checkout/return lifecycle tests against an in-memory store.

mod common;

use chrono::Duration;
use velin_server::error::AppError;

use common::*;

#[tokio::test]
async fn end_to_end_two_units() {
    let (repo, clock) = setup().await;
    let member = seed_member(&repo, "Ada").await;
    let (title, units) = seed_title(&repo, "The Left Hand of Darkness", 2).await;

    // Day 0: checkout for 14 days.
    let borrowing = repo
        .borrowings
        .checkout(member, title, Some(14))
        .await
        .expect("checkout failed");
    assert_eq!(borrowing.due_date, day_zero() + Duration::days(14));
    assert!(borrowing.is_open());

    // The lowest-id unit is picked; one copy remains on the shelf.
    assert_eq!(borrowing.unit_id, units[0]);
    let availability = repo.units.availability(title).await.unwrap();
    assert_eq!(availability.total_units, 2);
    assert_eq!(availability.available_units, 1);
    assert_flag_matches_ledger(&repo, units[0]).await;
    assert_flag_matches_ledger(&repo, units[1]).await;

    // Day 20: six days late.
    clock.advance_days(20);
    let outcome = repo
        .borrowings
        .return_item(borrowing.id, 1)
        .await
        .expect("return failed");
    assert_eq!(outcome.days_overdue, 6);
    assert_eq!(outcome.fine_amount.to_string(), "3.00");

    let availability = repo.units.availability(title).await.unwrap();
    assert_eq!(availability.available_units, 2);
    assert_flag_matches_ledger(&repo, units[0]).await;

    let balance = repo.members.balance(member).await.unwrap();
    assert_eq!(balance, 6 * FINE_RATE_CENTS);

    let closed = repo.borrowings.get_by_id(borrowing.id).await.unwrap();
    assert!(!closed.is_open());
    assert_eq!(closed.fine_cents, Some(300));
}

#[tokio::test]
async fn on_time_return_is_free() {
    let (repo, clock) = setup().await;
    let member = seed_member(&repo, "Ada").await;
    let (title, _) = seed_title(&repo, "Solaris", 1).await;

    let borrowing = repo.borrowings.checkout(member, title, Some(14)).await.unwrap();

    clock.advance_days(14);
    let outcome = repo.borrowings.return_item(borrowing.id, 1).await.unwrap();
    assert_eq!(outcome.days_overdue, 0);
    assert_eq!(outcome.fine_amount.to_string(), "0.00");
    assert_eq!(repo.members.balance(member).await.unwrap(), 0);
}

#[tokio::test]
async fn early_return_is_free() {
    let (repo, clock) = setup().await;
    let member = seed_member(&repo, "Ada").await;
    let (title, _) = seed_title(&repo, "Solaris", 1).await;

    let borrowing = repo.borrowings.checkout(member, title, Some(14)).await.unwrap();

    clock.advance_days(5);
    let outcome = repo.borrowings.return_item(borrowing.id, 1).await.unwrap();
    assert_eq!(outcome.fine_amount.to_string(), "0.00");
}

#[tokio::test]
async fn checkout_uses_default_loan_period() {
    let (repo, _clock) = setup().await;
    let member = seed_member(&repo, "Ada").await;
    let (title, _) = seed_title(&repo, "Solaris", 1).await;

    let borrowing = repo.borrowings.checkout(member, title, None).await.unwrap();
    assert_eq!(borrowing.due_date, day_zero() + Duration::days(21));
}

#[tokio::test]
async fn checkout_fails_when_all_units_out() {
    let (repo, _clock) = setup().await;
    let a = seed_member(&repo, "Ada").await;
    let b = seed_member(&repo, "Basil").await;
    let (title, _) = seed_title(&repo, "Dune", 1).await;

    repo.borrowings.checkout(a, title, Some(14)).await.unwrap();

    let err = repo.borrowings.checkout(b, title, Some(14)).await.unwrap_err();
    assert!(matches!(err, AppError::NoCopiesAvailable(_)), "{:?}", err);
}

#[tokio::test]
async fn checkout_skips_inactive_units() {
    let (repo, _clock) = setup().await;
    let member = seed_member(&repo, "Ada").await;
    let (title, units) = seed_title(&repo, "Dune", 2).await;

    repo.units.deactivate(units[0]).await.unwrap();

    let borrowing = repo.borrowings.checkout(member, title, Some(7)).await.unwrap();
    assert_eq!(borrowing.unit_id, units[1]);
}

#[tokio::test]
async fn checkout_unknown_title_or_member() {
    let (repo, _clock) = setup().await;
    let member = seed_member(&repo, "Ada").await;

    let err = repo.borrowings.checkout(member, 999, Some(7)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{:?}", err);

    let (title, _) = seed_title(&repo, "Dune", 1).await;
    let err = repo.borrowings.checkout(999, title, Some(7)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{:?}", err);
}

#[tokio::test]
async fn double_return_posts_fine_once() {
    let (repo, clock) = setup().await;
    let member = seed_member(&repo, "Ada").await;
    let (title, _) = seed_title(&repo, "Dune", 1).await;

    let borrowing = repo.borrowings.checkout(member, title, Some(7)).await.unwrap();

    clock.advance_days(10);
    repo.borrowings.return_item(borrowing.id, 1).await.unwrap();

    let err = repo.borrowings.return_item(borrowing.id, 1).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyReturned(_)), "{:?}", err);

    // Three days late at 50/day, posted exactly once.
    assert_eq!(repo.members.balance(member).await.unwrap(), 150);
}

#[tokio::test]
async fn return_unknown_borrowing() {
    let (repo, _clock) = setup().await;
    let err = repo.borrowings.return_item(4242, 1).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{:?}", err);
}

#[tokio::test]
async fn display_fine_does_not_mutate() {
    let (repo, clock) = setup().await;
    let member = seed_member(&repo, "Ada").await;
    let (title, _) = seed_title(&repo, "Dune", 1).await;

    let borrowing = repo.borrowings.checkout(member, title, Some(7)).await.unwrap();

    clock.advance_days(10);
    let fine = repo.borrowings.accrued_fine(borrowing.id).await.unwrap();
    assert!(!fine.settled);
    assert_eq!(fine.days_overdue, 3);
    assert_eq!(fine.fine_amount.to_string(), "1.50");

    // Still open, nothing posted.
    assert!(repo.borrowings.get_by_id(borrowing.id).await.unwrap().is_open());
    assert_eq!(repo.members.balance(member).await.unwrap(), 0);

    // After settlement the stored amount is reported.
    repo.borrowings.return_item(borrowing.id, 1).await.unwrap();
    clock.advance_days(5);
    let fine = repo.borrowings.accrued_fine(borrowing.id).await.unwrap();
    assert!(fine.settled);
    assert_eq!(fine.fine_amount.to_string(), "1.50");
}

#[tokio::test]
async fn projections_split_by_due_date() {
    let (repo, clock) = setup().await;
    let member = seed_member(&repo, "Ada").await;
    let (title_a, _) = seed_title(&repo, "Dune", 1).await;
    let (title_b, _) = seed_title(&repo, "Solaris", 1).await;
    let (title_c, _) = seed_title(&repo, "Ubik", 1).await;

    let short = repo.borrowings.checkout(member, title_a, Some(3)).await.unwrap();
    let mid = repo.borrowings.checkout(member, title_b, Some(10)).await.unwrap();
    let long = repo.borrowings.checkout(member, title_c, Some(25)).await.unwrap();

    clock.advance_days(5);

    let active = repo.borrowings.list_active(member).await.unwrap();
    assert_eq!(active.len(), 3);

    let overdue = repo.borrowings.list_overdue().await.unwrap();
    assert_eq!(overdue.iter().map(|b| b.id).collect::<Vec<_>>(), vec![short.id]);
    assert!(overdue[0].is_overdue);

    let due_soon = repo.borrowings.list_due_within(7).await.unwrap();
    assert_eq!(due_soon.iter().map(|b| b.id).collect::<Vec<_>>(), vec![mid.id]);

    assert_eq!(repo.borrowings.count_active().await.unwrap(), 3);
    assert_eq!(repo.borrowings.count_overdue().await.unwrap(), 1);

    // Returned rows drop out of every projection.
    repo.borrowings.return_item(short.id, 1).await.unwrap();
    repo.borrowings.return_item(long.id, 1).await.unwrap();
    assert_eq!(repo.borrowings.list_active(member).await.unwrap().len(), 1);
    assert!(repo.borrowings.list_overdue().await.unwrap().is_empty());
}

#[tokio::test]
async fn unit_flag_flips_are_idempotent() {
    let (repo, _clock) = setup().await;
    let (_, units) = seed_title(&repo, "Dune", 1).await;

    repo.units.mark_on_loan(units[0]).await.unwrap();
    repo.units.mark_on_loan(units[0]).await.unwrap();
    assert!(repo.units.get_by_id(units[0]).await.unwrap().on_loan);

    repo.units.mark_available(units[0]).await.unwrap();
    repo.units.mark_available(units[0]).await.unwrap();
    assert!(repo.units.get_by_id(units[0]).await.unwrap().is_available());

    let err = repo.units.mark_on_loan(999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{:?}", err);
}

#[tokio::test]
async fn deactivate_refuses_loaned_unit() {
    let (repo, _clock) = setup().await;
    let member = seed_member(&repo, "Ada").await;
    let (title, units) = seed_title(&repo, "Dune", 1).await;

    repo.borrowings.checkout(member, title, Some(7)).await.unwrap();

    let err = repo.units.deactivate(units[0]).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "{:?}", err);
}

#[tokio::test]
async fn member_fine_ledger_rejects_negative_postings() {
    let (repo, _clock) = setup().await;
    let member = seed_member(&repo, "Ada").await;

    repo.members.post_fine(member, 250).await.unwrap();
    repo.members.post_fine(member, 0).await.unwrap();
    assert_eq!(repo.members.balance(member).await.unwrap(), 250);

    let err = repo.members.post_fine(member, -1).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "{:?}", err);

    let err = repo.members.post_fine(999, 10).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{:?}", err);
}
