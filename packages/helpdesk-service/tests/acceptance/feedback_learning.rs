use std::sync::Arc;

use helpdesk_service::FeedbackRequest;

use super::{context, seed};

fn feedback(solution_id: uuid::Uuid, was_helpful: bool, comment: Option<&str>) -> FeedbackRequest {
	FeedbackRequest {
		solution_id,
		ticket_id: "4711".to_string(),
		was_helpful,
		comment: comment.map(str::to_string),
		submitter: Some("user@example.edu".to_string()),
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn success_rate_follows_the_running_mean() {
	let Some(ctx) = context(Some("unused")).await else {
		eprintln!("Skipping success_rate_follows_the_running_mean; set HELPDESK_PG_DSN.");

		return;
	};
	let stored = seed(&ctx.service, "Outlook sync fails", "Rebuild the profile.").await;
	let mut rates = Vec::new();

	for outcome in [true, false, true] {
		let updated = ctx
			.service
			.update_success(stored.solution_id, outcome)
			.await
			.expect("update")
			.expect("solution exists");

		rates.push((updated.success_rate, updated.usage_count));
	}

	assert_eq!(rates[0], (1.0, 1));
	assert_eq!(rates[1], (0.5, 2));
	assert!((rates[2].0 - 2.0 / 3.0).abs() < 1e-9);
	assert_eq!(rates[2].1, 3);
	assert!(
		ctx.service.update_success(uuid::Uuid::new_v4(), true).await.expect("update").is_none()
	);

	ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn feedback_updates_rate_and_stats_together() {
	let Some(ctx) = context(Some("unused")).await else {
		eprintln!("Skipping feedback_updates_rate_and_stats_together; set HELPDESK_PG_DSN.");

		return;
	};
	let stored = seed(&ctx.service, "Monitor flickers", "Replace the cable.").await;
	let outcomes = [
		(true, Some("worked")),
		(false, None),
		(true, Some("  ")),
		(true, Some("again")),
		(false, Some("no luck")),
		(true, Some("fixed it")),
	];

	for (was_helpful, comment) in outcomes {
		ctx.service
			.record_feedback(feedback(stored.solution_id, was_helpful, comment))
			.await
			.expect("feedback")
			.expect("solution exists");
	}

	let stats = ctx
		.service
		.solution_stats(stored.solution_id)
		.await
		.expect("stats")
		.expect("solution exists");

	assert_eq!(stats.total_uses, 6);
	assert_eq!(stats.helpful_count, 4);
	assert!((stats.success_rate - 4.0 / 6.0).abs() < 1e-9);
	assert_eq!(stats.recent_feedback, vec!["again", "no luck", "fixed it"]);

	ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn feedback_for_unknown_solutions_writes_nothing() {
	let Some(ctx) = context(Some("unused")).await else {
		eprintln!("Skipping feedback_for_unknown_solutions_writes_nothing; set HELPDESK_PG_DSN.");

		return;
	};
	let recorded = ctx
		.service
		.record_feedback(feedback(uuid::Uuid::new_v4(), true, Some("ghost")))
		.await
		.expect("feedback");
	let rows: i64 = sqlx::query_scalar("SELECT count(*) FROM solution_feedback")
		.fetch_one(&ctx.service.db.pool)
		.await
		.expect("count");

	assert!(recorded.is_none());
	assert_eq!(rows, 0);
	assert!(ctx.service.solution_stats(uuid::Uuid::new_v4()).await.expect("stats").is_none());

	ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn concurrent_feedback_loses_no_updates() {
	let Some(ctx) = context(Some("unused")).await else {
		eprintln!("Skipping concurrent_feedback_loses_no_updates; set HELPDESK_PG_DSN.");

		return;
	};
	let stored = seed(&ctx.service, "Laptop battery drains", "Update the BIOS.").await;
	let super::Context { service, completion, test_db, _cache_dir } = ctx;
	let service = Arc::new(service);
	let mut handles = Vec::new();

	for i in 0..20 {
		let service = service.clone();
		let solution_id = stored.solution_id;

		handles.push(tokio::spawn(async move {
			service
				.record_feedback(feedback(solution_id, i % 4 != 0, None))
				.await
				.expect("feedback")
				.expect("solution exists");
		}));
	}
	for handle in handles {
		handle.await.expect("feedback task");
	}

	let updated = service
		.get_solution(stored.solution_id)
		.await
		.expect("fetch")
		.expect("solution exists");

	assert_eq!(updated.usage_count, 20);
	assert!((updated.success_rate - 15.0 / 20.0).abs() < 1e-9);

	let Ok(service) = Arc::try_unwrap(service) else { panic!("service still shared") };

	super::Context { service, completion, test_db, _cache_dir }.cleanup().await;
}
