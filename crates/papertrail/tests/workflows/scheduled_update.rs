use super::*;

#[traced_test]
#[tokio::test]
async fn test_update_writes_every_output() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_feed(&server).await;
  let dir = tempdir()?;
  let config = test_config(&server, dir.path());

  let summary = Pipeline::new(config.clone())?.run_at(Mode::Update, now()).await?;

  assert_eq!(summary.outcome, RunOutcome::Completed);
  assert_eq!(summary.fetched, 2);
  assert_eq!(summary.failed_queries, 1);
  assert_eq!(summary.retained, 2);
  assert_eq!(summary.written, vec![
    config.output.snapshot_path.clone(),
    config.output.html_path.clone(),
    config.output.markdown_path.clone(),
  ]);

  let snapshot = Snapshot::load(&config.output.snapshot_path)?.ok_or("snapshot not written")?;
  assert_eq!(snapshot.total, 2);
  assert_eq!(snapshot.last_updated, now());
  let ids: Vec<_> = snapshot.papers.iter().map(|p| p.id.as_str()).collect();
  assert_eq!(ids, vec!["2403.00001", "2402.00002"]);

  let html = std::fs::read_to_string(&config.output.html_path)?;
  assert!(html.contains("Fresh title on symplectic capacities"));
  assert!(html.contains("2 papers"));
  assert!(html.contains("<small class=\"comment\">20 pages</small>"));
  let markdown = std::fs::read_to_string(&config.output.markdown_path)?;
  assert!(markdown.contains(r"Lagrangian \| Floer theory"));
  assert!(markdown.contains("Automatically updated on 2024-03-10"));
  assert!(markdown.contains(", 20 pages |"));
  assert!(markdown.contains("\n## symplectic\n"));
  assert!(!markdown.contains("## broken"));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_update_files_papers_under_each_matching_topic() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_feed(&server).await;
  Mock::given(method("GET"))
    .and(path("/api/query"))
    .and(query_param("search_query", "(\"Floer homology\") AND (cat:math.SG)"))
    .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
    .mount(&server)
    .await;
  let dir = tempdir()?;
  let mut config = test_config(&server, dir.path());
  config.query.keywords = vec![Keyword::phrase("symplectic"), Keyword::phrase("Floer homology")];

  let summary = Pipeline::new(config.clone())?.run_at(Mode::Update, now()).await?;

  assert_eq!(summary.failed_queries, 0);
  let snapshot = Snapshot::load(&config.output.snapshot_path)?.ok_or("snapshot not written")?;
  assert!(snapshot.papers.iter().all(|p| p.topics == vec!["Floer homology", "symplectic"]));

  let markdown = std::fs::read_to_string(&config.output.markdown_path)?;
  assert!(markdown.contains("<li><a href=\"#symplectic\">symplectic</a></li>"));
  assert!(markdown.contains("<li><a href=\"#floer-homology\">Floer homology</a></li>"));
  assert!(markdown.contains("\n## symplectic\n"));
  assert!(markdown.contains("\n## Floer homology\n"));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_update_merges_with_snapshot() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_feed(&server).await;
  let dir = tempdir()?;
  let config = test_config(&server, dir.path());
  let stored_at = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
  Snapshot::new(
    vec![
      Paper::new("2403.00001", "Stale title", vec![], now()),
      Paper::new("2312.99999", "Kept from last run", vec![], stored_at),
    ],
    stored_at,
  )
  .save(&config.output.snapshot_path)?;

  let summary = Pipeline::new(config.clone())?.run_at(Mode::Update, now()).await?;

  assert_eq!(summary.retained, 3);
  let snapshot = Snapshot::load(&config.output.snapshot_path)?.ok_or("snapshot not written")?;
  let refreshed = snapshot.papers.iter().find(|p| p.id == "2403.00001").ok_or("missing")?;
  assert_eq!(refreshed.title, "Fresh title on symplectic capacities");
  assert_eq!(snapshot.papers.last().map(|p| p.id.as_str()), Some("2312.99999"));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_update_respects_max_papers() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_feed(&server).await;
  let dir = tempdir()?;
  let mut config = test_config(&server, dir.path());
  config.output.max_papers = 1;

  let summary = Pipeline::new(config.clone())?.run_at(Mode::Update, now()).await?;

  assert_eq!(summary.retained, 1);
  let snapshot = Snapshot::load(&config.output.snapshot_path)?.ok_or("snapshot not written")?;
  assert_eq!(snapshot.papers[0].id, "2403.00001");
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_historical_backfill() -> TestResult<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/query"))
    .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
    .mount(&server)
    .await;
  let dir = tempdir()?;
  let mut config = test_config(&server, dir.path());
  config.query.keywords = vec![Keyword::phrase("symplectic")];

  let summary = Pipeline::new(config.clone())?
    .run_at(Mode::Historical { start_year: 2023, end_year: None }, now())
    .await?;

  // 2023 and 2024 both queried
  assert_eq!(server.received_requests().await.map(|r| r.len()), Some(2));
  assert_eq!(summary.retained, 3);
  assert!(config.output.html_path.exists());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_render_with_no_snapshot_writes_empty_documents() -> TestResult<()> {
  let server = MockServer::start().await;
  let dir = tempdir()?;
  let config = test_config(&server, dir.path());

  let summary = Pipeline::new(config.clone())?.run_at(Mode::Render, now()).await?;

  assert_eq!(summary.retained, 0);
  assert!(!config.output.snapshot_path.exists());
  let markdown = std::fs::read_to_string(&config.output.markdown_path)?;
  assert!(markdown.contains("| Date | Title | Authors | Links |"));
  assert!(markdown.contains("No papers found."));
  assert_eq!(server.received_requests().await.map(|r| r.len()), Some(0));
  Ok(())
}
