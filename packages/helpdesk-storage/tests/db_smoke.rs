use time::OffsetDateTime;
use uuid::Uuid;

use helpdesk_config::Postgres;
use helpdesk_storage::{
	db::Db,
	models::{Feedback, Solution},
	queries,
};
use helpdesk_testkit::TestDatabase;

fn solution(problem: &str, keywords: &[&str], success_rate: f64) -> Solution {
	let now = OffsetDateTime::now_utc();

	Solution {
		solution_id: Uuid::new_v4(),
		ticket_id: None,
		problem: problem.to_string(),
		solution: format!("Resolution for {problem}"),
		category: "general".to_string(),
		keywords: keywords.iter().map(|k| k.to_string()).collect(),
		success_rate,
		usage_count: 0,
		source: "manual".to_string(),
		created_at: now,
		updated_at: now,
	}
}

async fn bootstrap() -> Option<(TestDatabase, Db)> {
	let base_dsn = helpdesk_testkit::env_dsn()?;
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	Some((test_db, db))
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn schema_bootstrap_is_idempotent() {
	let Some((test_db, db)) = bootstrap().await else {
		eprintln!("Skipping schema_bootstrap_is_idempotent; set HELPDESK_PG_DSN to run this test.");

		return;
	};

	db.ensure_schema().await.expect("Failed to re-run schema.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name IN ('solutions', 'solution_feedback')",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 2);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn search_matches_problem_or_keywords_literally() {
	let Some((test_db, db)) = bootstrap().await else {
		eprintln!("Skipping search_matches_problem_or_keywords_literally; set HELPDESK_PG_DSN.");

		return;
	};
	let jam = solution("Printer jam on floor 3", &["printer", "jam"], 0.4);
	let vpn = solution("VPN drops every hour", &["vpn", "network"], 0.9);
	let percent = solution("Disk 100% full", &["disk"], 0.1);

	for row in [&jam, &vpn, &percent] {
		queries::insert_solution(&db.pool, row).await.expect("Failed to insert solution.");
	}

	let hits = queries::search_solutions(&db.pool, "PRINTER", 10).await.expect("search");

	assert_eq!(hits.iter().map(|s| s.solution_id).collect::<Vec<_>>(), vec![jam.solution_id]);

	let hits = queries::search_solutions(&db.pool, "network", 10).await.expect("search");

	assert_eq!(hits.iter().map(|s| s.solution_id).collect::<Vec<_>>(), vec![vpn.solution_id]);

	let hits = queries::search_solutions(&db.pool, "100%", 10).await.expect("search");

	assert_eq!(hits.len(), 1);

	let hits = queries::search_solutions(&db.pool, "%", 10).await.expect("search");

	assert_eq!(hits.len(), 1);

	let hits = queries::search_solutions(&db.pool, "", 2).await.expect("search");

	assert_eq!(
		hits.iter().map(|s| s.solution_id).collect::<Vec<_>>(),
		vec![vpn.solution_id, jam.solution_id]
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn recent_feedback_is_returned_oldest_first() {
	let Some((test_db, db)) = bootstrap().await else {
		eprintln!("Skipping recent_feedback_is_returned_oldest_first; set HELPDESK_PG_DSN.");

		return;
	};
	let row = solution("Outlook sync fails", &["outlook"], 0.0);

	queries::insert_solution(&db.pool, &row).await.expect("Failed to insert solution.");

	let start = OffsetDateTime::now_utc();

	for i in 0..7_i64 {
		let feedback = Feedback {
			feedback_id: Uuid::new_v4(),
			solution_id: row.solution_id,
			ticket_id: format!("{}", 1000 + i),
			was_helpful: i % 2 == 0,
			comment: Some(format!("note {i}")),
			submitter: None,
			created_at: start + time::Duration::seconds(i),
		};

		queries::insert_feedback(&db.pool, &feedback).await.expect("Failed to insert feedback.");
	}

	let (total, helpful) =
		queries::feedback_counts(&db.pool, row.solution_id).await.expect("counts");

	assert_eq!((total, helpful), (7, 4));

	let recent =
		queries::recent_feedback(&db.pool, row.solution_id, 5).await.expect("recent feedback");
	let comments = recent.iter().filter_map(|f| f.comment.clone()).collect::<Vec<_>>();

	assert_eq!(comments, vec!["note 2", "note 3", "note 4", "note 5", "note 6"]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
