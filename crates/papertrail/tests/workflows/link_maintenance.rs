use super::*;

#[traced_test]
#[tokio::test]
async fn test_verify_without_snapshot_skips_early() -> TestResult<()> {
  let server = MockServer::start().await;
  let dir = tempdir()?;
  let config = test_config(&server, dir.path());

  let summary = Pipeline::new(config)?.run_at(Mode::VerifyLinks, now()).await?;

  assert!(summary.is_skipped());
  assert!(summary.verification.is_none());
  assert!(summary.written.is_empty());
  assert_eq!(server.received_requests().await.map(|r| r.len()), Some(0));
  assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_verify_with_empty_snapshot_skips_early() -> TestResult<()> {
  let server = MockServer::start().await;
  let dir = tempdir()?;
  let config = test_config(&server, dir.path());
  Snapshot::new(vec![], now()).save(&config.output.snapshot_path)?;

  let summary = Pipeline::new(config.clone())?.run_at(Mode::VerifyLinks, now()).await?;

  assert!(summary.is_skipped());
  assert!(!config.output.verification_log_path.exists());
  assert!(!config.output.html_path.exists());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_verify_repairs_snapshot_and_writes_log() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_head(&server, "/stale/1234.5678", 404).await;
  mount_head(&server, "/abs/1234.5678", 200).await;
  let dir = tempdir()?;
  let config = test_config(&server, dir.path());
  let stored_at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
  let stale = Paper::new("1234.5678", "Stored", vec![], stored_at)
    .with_url(format!("{}/stale/1234.5678", server.uri()))
    .with_pdf_url(None);
  Snapshot::new(vec![stale], stored_at).save(&config.output.snapshot_path)?;

  let summary = Pipeline::new(config.clone())?.run_at(Mode::VerifyLinks, now()).await?;

  assert_eq!(summary.outcome, RunOutcome::Completed);
  let log = summary.verification.ok_or("no verification log")?;
  assert_eq!((log.accessible, log.broken, log.updated), (1, 0, 1));

  let snapshot = Snapshot::load(&config.output.snapshot_path)?.ok_or("snapshot missing")?;
  assert_eq!(snapshot.papers[0].url, format!("{}/abs/1234.5678", server.uri()));
  assert_eq!(snapshot.papers[0].pdf_url, Some(format!("{}/pdf/1234.5678", server.uri())));

  let written: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(&config.output.verification_log_path)?)?;
  assert_eq!(written["total_checked"], 1);
  assert_eq!(written["updated"], 1);
  assert_eq!(written["details"][0]["status"], "updated");
  assert_eq!(written["details"][0]["original_url"], format!("{}/stale/1234.5678", server.uri()));

  let html = std::fs::read_to_string(&config.output.html_path)?;
  assert!(html.contains(&format!("{}/abs/1234.5678", server.uri())));
  Ok(())
}
