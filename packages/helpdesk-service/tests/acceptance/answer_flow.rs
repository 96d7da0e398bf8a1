use helpdesk_service::{AnswerRequest, ErrorKind};

use super::{context, seed, solution_count};

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn answers_with_a_ticket_are_stored_as_generated_solutions() {
	let Some(ctx) = context(Some("Open tray two and remove the sheet.")).await else {
		eprintln!("Skipping answers_with_a_ticket_are_stored_as_generated_solutions; set HELPDESK_PG_DSN.");

		return;
	};

	seed(&ctx.service, "printer jam on floor 3", "Call facilities.").await;

	let response = ctx
		.service
		.answer(AnswerRequest {
			query: "printer jam".to_string(),
			ticket_id: Some("31337".to_string()),
		})
		.await;

	assert_eq!(response.text, "Open tray two and remove the sheet.");

	let solution_id = response.solution_id.expect("solution must be stored");
	let stored = ctx
		.service
		.get_solution(solution_id)
		.await
		.expect("fetch")
		.expect("solution exists");

	assert_eq!(stored.source, "generated");
	assert_eq!(stored.ticket_id.as_deref(), Some("31337"));
	assert_eq!(stored.category, "printer");
	assert_eq!(stored.keywords, vec!["printer", "jam"]);
	assert_eq!(ctx.completion.count(), 1);

	ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn answers_without_a_ticket_are_not_stored() {
	let Some(ctx) = context(Some("Reconnect the VPN.")).await else {
		eprintln!("Skipping answers_without_a_ticket_are_not_stored; set HELPDESK_PG_DSN.");

		return;
	};
	let response = ctx
		.service
		.answer(AnswerRequest { query: "vpn drops".to_string(), ticket_id: None })
		.await;

	assert_eq!(response.text, "Reconnect the VPN.");
	assert_eq!(response.solution_id, None);
	assert_eq!(solution_count(&ctx.service).await, 0);

	ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HELPDESK_PG_DSN to run."]
async fn failing_completion_degrades_to_an_apology() {
	let Some(ctx) = context(None).await else {
		eprintln!("Skipping failing_completion_degrades_to_an_apology; set HELPDESK_PG_DSN.");

		return;
	};
	let response = ctx
		.service
		.answer(AnswerRequest { query: "printer jam".to_string(), ticket_id: Some("7".to_string()) })
		.await;

	assert_eq!(response.text, ErrorKind::Provider.user_message());
	assert_eq!(response.solution_id, None);
	assert_eq!(ctx.completion.count(), 1);
	assert_eq!(solution_count(&ctx.service).await, 0);

	ctx.cleanup().await;
}
