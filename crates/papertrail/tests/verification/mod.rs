use super::*;

fn stored_paper(server: &MockServer, id: &str) -> Paper {
  Paper::new(id, "Stored", vec!["A. Author".into()], now())
    .with_url(format!("{}/stale/{id}", server.uri()))
    .with_pdf_url(Some(format!("{}/stale-pdf/{id}", server.uri())))
}

#[traced_test]
#[tokio::test]
async fn test_broken_link_is_repaired() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_head(&server, "/stale/1234.5678", 404).await;
  mount_head(&server, "/abs/1234.5678", 200).await;
  let dir = tempdir()?;
  let config = test_config(&server, dir.path());
  let verifier = LinkVerifier::new(config.links)?;
  let mut paper = stored_paper(&server, "1234.5678");

  let check = verifier.verify_paper(&mut paper).await;

  assert_eq!(check.status, LinkStatus::Updated);
  assert_eq!(check.original_url, format!("{}/stale/1234.5678", server.uri()));
  assert_eq!(check.replacement_url, Some(format!("{}/abs/1234.5678", server.uri())));
  assert_eq!(check.pdf_accessible, Some(false));
  assert_eq!(paper.url, format!("{}/abs/1234.5678", server.uri()));
  assert_eq!(paper.pdf_url, Some(format!("{}/pdf/1234.5678", server.uri())));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_unrepairable_link_is_left_alone() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_head(&server, "/stale/2401.00003", 404).await;
  mount_head(&server, "/abs/2401.00003", 503).await;
  let dir = tempdir()?;
  let verifier = LinkVerifier::new(test_config(&server, dir.path()).links)?;
  let mut paper = stored_paper(&server, "2401.00003");
  let before = paper.clone();

  let check = verifier.verify_paper(&mut paper).await;

  assert_eq!(check.status, LinkStatus::Broken);
  assert_eq!(check.replacement_url, None);
  assert_eq!(paper, before);
  Ok(())
}

#[tokio::test]
async fn test_redirect_counts_as_reachable() -> TestResult<()> {
  let server = MockServer::start().await;
  Mock::given(method("HEAD"))
    .and(path("/moved"))
    .respond_with(
      ResponseTemplate::new(301).insert_header("Location", format!("{}/landing", server.uri())),
    )
    .mount(&server)
    .await;
  mount_head(&server, "/landing", 200).await;
  let dir = tempdir()?;
  let verifier = LinkVerifier::new(test_config(&server, dir.path()).links)?;

  assert!(verifier.is_reachable(&format!("{}/moved", server.uri())).await);
  assert!(!verifier.is_reachable(&format!("{}/missing", server.uri())).await);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_verify_all_counts() -> TestResult<()> {
  let server = MockServer::start().await;
  // Healthy record
  mount_head(&server, "/ok/2401.00001", 200).await;
  mount_head(&server, "/stale-pdf/2401.00001", 200).await;
  // Repairable record
  mount_head(&server, "/abs/2401.00002", 200).await;
  // 2401.00003 answers 404 everywhere
  let dir = tempdir()?;
  let verifier = LinkVerifier::new(test_config(&server, dir.path()).links)?;
  let mut papers = vec![
    stored_paper(&server, "2401.00001").with_url(format!("{}/ok/2401.00001", server.uri())),
    stored_paper(&server, "2401.00002"),
    stored_paper(&server, "2401.00003").with_pdf_url(None),
  ];

  let log = verifier.verify_all(&mut papers, now()).await;

  assert_eq!(log.total_checked, 3);
  assert_eq!(log.accessible, 2);
  assert_eq!(log.updated, 1);
  assert_eq!(log.broken, 1);
  assert_eq!(log.timestamp, now());
  let statuses: Vec<_> = log.details.iter().map(|check| check.status).collect();
  assert_eq!(statuses, vec![LinkStatus::Accessible, LinkStatus::Updated, LinkStatus::Broken]);
  assert_eq!(log.details[0].pdf_accessible, Some(true));
  assert_eq!(log.details[2].pdf_accessible, None);
  Ok(())
}

#[tokio::test]
async fn test_unreachable_host_is_broken() -> TestResult<()> {
  let server = MockServer::start().await;
  let dir = tempdir()?;
  let verifier = LinkVerifier::new(test_config(&server, dir.path()).links)?;
  // Port 9 (discard) has no listener, so the connection is refused
  let mut paper = Paper::new("2401.00009", "Gone", vec![], now())
    .with_url("http://127.0.0.1:9/abs/2401.00009")
    .with_pdf_url(None);

  let check = verifier.verify_paper(&mut paper).await;

  // The rebuilt link points at the mock server, which answers 404
  assert_eq!(check.status, LinkStatus::Broken);
  Ok(())
}
