//! Concurrency properties: racing operations must serialize as whole
//! operations, never as interleaved statements.

mod common;

use futures::future::join_all;
use velin_server::error::AppError;

use common::*;

#[tokio::test]
async fn concurrent_checkouts_get_exactly_one_unit() {
    let (repo, _clock) = setup().await;
    let (title, units) = seed_title(&repo, "Dune", 1).await;

    let mut members = Vec::new();
    for n in 0..8 {
        members.push(seed_member(&repo, &format!("member-{}", n)).await);
    }

    let tasks = members.into_iter().map(|member| {
        let repo = repo.clone();
        tokio::spawn(async move { repo.borrowings.checkout(member, title, Some(14)).await })
    });

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let refusals = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::NoCopiesAvailable(_))))
        .count();

    assert_eq!(successes, 1, "exactly one checkout must win");
    assert_eq!(refusals, 7, "all others must be told to try later");

    assert_flag_matches_ledger(&repo, units[0]).await;
}

#[tokio::test]
async fn concurrent_checkouts_drain_inventory_exactly() {
    let (repo, _clock) = setup().await;
    let (title, units) = seed_title(&repo, "Solaris", 3).await;

    let mut members = Vec::new();
    for n in 0..10 {
        members.push(seed_member(&repo, &format!("member-{}", n)).await);
    }

    let tasks = members.into_iter().map(|member| {
        let repo = repo.clone();
        tokio::spawn(async move { repo.borrowings.checkout(member, title, Some(14)).await })
    });

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 3);

    // Three distinct units, each with exactly one open borrowing.
    let mut taken: Vec<i64> = winners.iter().map(|b| b.unit_id).collect();
    taken.sort_unstable();
    taken.dedup();
    assert_eq!(taken.len(), 3);

    for unit in units {
        assert_flag_matches_ledger(&repo, unit).await;
    }

    let availability = repo.units.availability(title).await.unwrap();
    assert_eq!(availability.available_units, 0);
}

#[tokio::test]
async fn concurrent_returns_settle_once() {
    let (repo, clock) = setup().await;
    let member = seed_member(&repo, "Ada").await;
    let (title, units) = seed_title(&repo, "Ubik", 1).await;

    let borrowing = repo.borrowings.checkout(member, title, Some(7)).await.unwrap();
    clock.advance_days(10);

    let tasks = (0..4).map(|operator| {
        let repo = repo.clone();
        let id = borrowing.id;
        tokio::spawn(async move { repo.borrowings.return_item(id, operator).await })
    });

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let already = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::AlreadyReturned(_))))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(already, 3);

    // Fine for three late days posted exactly once.
    assert_eq!(repo.members.balance(member).await.unwrap(), 3 * FINE_RATE_CENTS);
    assert_flag_matches_ledger(&repo, units[0]).await;
}

#[tokio::test]
async fn concurrent_renewal_requests_leave_one_pending() {
    let (repo, _clock) = setup().await;
    let member = seed_member(&repo, "Ada").await;
    let (title, _) = seed_title(&repo, "Dune", 1).await;

    let borrowing = repo.borrowings.checkout(member, title, Some(14)).await.unwrap();

    let tasks = (0..4).map(|_| {
        let repo = repo.clone();
        let id = borrowing.id;
        tokio::spawn(async move { repo.renewals.request(id, member, 7).await })
    });

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let already = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::AlreadyPending(_))))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(already, 3);
    assert_eq!(repo.renewals.list_pending().await.unwrap().len(), 1);
}

#[tokio::test]
async fn checkout_return_churn_keeps_invariants() {
    let (repo, _clock) = setup().await;
    let (title, units) = seed_title(&repo, "Neuromancer", 2).await;

    let mut members = Vec::new();
    for n in 0..6 {
        members.push(seed_member(&repo, &format!("member-{}", n)).await);
    }

    // Each task borrows and immediately returns, all against two units.
    let tasks = members.into_iter().map(|member| {
        let repo = repo.clone();
        tokio::spawn(async move {
            for _ in 0..3 {
                match repo.borrowings.checkout(member, title, Some(7)).await {
                    Ok(borrowing) => {
                        repo.borrowings
                            .return_item(borrowing.id, member)
                            .await
                            .expect("return of a fresh checkout failed");
                    }
                    Err(AppError::NoCopiesAvailable(_)) => {}
                    Err(other) => panic!("unexpected checkout error: {:?}", other),
                }
            }
        })
    });

    for joined in join_all(tasks).await {
        joined.expect("task panicked");
    }

    for unit in units {
        assert_flag_matches_ledger(&repo, unit).await;
    }
    assert_eq!(repo.borrowings.count_active().await.unwrap(), 0);

    let availability = repo.units.availability(title).await.unwrap();
    assert_eq!(availability.available_units, 2);
}
