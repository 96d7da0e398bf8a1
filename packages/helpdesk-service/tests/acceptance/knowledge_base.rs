use helpdesk_service::{AddSolutionRequest, ErrorKind};

use super::{context, seed};

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn added_solutions_derive_metadata_and_start_untested() {
	let Some(ctx) = context(Some("unused")).await else {
		eprintln!("Skipping added_solutions_derive_metadata_and_start_untested; set HELPDESK_PG_DSN.");

		return;
	};
	let stored = seed(&ctx.service, "Printer jam on floor 3", "Open tray two.").await;

	assert_eq!(stored.category, "printer");
	assert_eq!(stored.keywords, vec!["printer", "jam", "floor"]);
	assert_eq!((stored.success_rate, stored.usage_count), (0.0, 0));
	assert_eq!(stored.source, "manual");

	let fetched = ctx
		.service
		.get_solution(stored.solution_id)
		.await
		.expect("Failed to fetch solution.")
		.expect("Solution must exist.");

	assert_eq!(fetched.problem, "Printer jam on floor 3");
	assert!(ctx.service.get_solution(uuid::Uuid::new_v4()).await.expect("fetch").is_none());

	ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn blank_solutions_are_rejected() {
	let Some(ctx) = context(Some("unused")).await else {
		eprintln!("Skipping blank_solutions_are_rejected; set HELPDESK_PG_DSN.");

		return;
	};
	let err = ctx
		.service
		.add_solution(AddSolutionRequest {
			problem: "VPN drops".to_string(),
			solution: "  ".to_string(),
			category: None,
			keywords: None,
			source: helpdesk_domain::source::SolutionSource::Manual,
			ticket_id: None,
		})
		.await
		.expect_err("blank solution must be rejected");

	assert_eq!(err.kind(), ErrorKind::InvalidRequest);
	assert_eq!(super::solution_count(&ctx.service).await, 0);

	ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn search_prefers_successful_solutions() {
	let Some(ctx) = context(Some("unused")).await else {
		eprintln!("Skipping search_prefers_successful_solutions; set HELPDESK_PG_DSN.");

		return;
	};
	let weak = seed(&ctx.service, "Printer offline in lab", "Power cycle it.").await;
	let strong = seed(&ctx.service, "Printer shows offline", "Re-add the queue.").await;

	ctx.service.update_success(strong.solution_id, true).await.expect("update");
	ctx.service.update_success(weak.solution_id, false).await.expect("update");

	let hits = ctx.service.search_solutions("printer", 5).await.expect("search");

	assert_eq!(
		hits.iter().map(|s| s.solution_id).collect::<Vec<_>>(),
		vec![strong.solution_id, weak.solution_id]
	);
	assert!(ctx.service.search_solutions("printer", 0).await.expect("search").is_empty());

	ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn similar_solutions_weigh_similarity_by_success() {
	let Some(ctx) = context(Some("unused")).await else {
		eprintln!("Skipping similar_solutions_weigh_similarity_by_success; set HELPDESK_PG_DSN.");

		return;
	};

	assert!(ctx.service.similar_solutions("printer jam", Some(0.1)).await.expect("similar").is_empty());

	let exact = seed(&ctx.service, "printer jam", "Open tray two.").await;
	let broader = seed(&ctx.service, "printer jam issue", "Call facilities.").await;
	let unrelated = seed(&ctx.service, "vpn disconnects hourly", "Reinstall the client.").await;

	// Drive the rates to 0.9 and 0.5.
	for outcome in [true, true, true, true, true, true, true, true, true, false] {
		ctx.service.update_success(exact.solution_id, outcome).await.expect("update");
	}
	for outcome in [true, false] {
		ctx.service.update_success(broader.solution_id, outcome).await.expect("update");
	}

	let similar = ctx.service.similar_solutions("printer jam", Some(0.1)).await.expect("similar");
	let ids = similar.iter().map(|s| s.solution.solution_id).collect::<Vec<_>>();

	assert_eq!(ids, vec![exact.solution_id, broader.solution_id]);
	assert!(!ids.contains(&unrelated.solution_id));
	assert!((similar[0].similarity - 1.0).abs() < 1e-9);
	assert!((similar[0].score - 0.9).abs() < 1e-9);

	ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn analysis_reports_successful_solutions() {
	let Some(ctx) = context(Some("unused")).await else {
		eprintln!("Skipping analysis_reports_successful_solutions; set HELPDESK_PG_DSN.");

		return;
	};
	let good = seed(&ctx.service, "Printer jam", "Remove the jammed sheet from tray two.").await;

	seed(&ctx.service, "VPN drops", "Reinstall the client.").await;
	ctx.service.update_success(good.solution_id, true).await.expect("update");

	let report = ctx.service.analyze_solutions().await.expect("analysis");

	assert_eq!(report.total_solutions, 2);
	assert_eq!(report.successful_solutions, 1);
	assert!((report.avg_success_rate - 0.5).abs() < 1e-9);
	assert_eq!(report.top_categories[0].category, "printer");
	assert!(report.common_terms.iter().any(|term| term.term == "jammed"));

	ctx.cleanup().await;
}
