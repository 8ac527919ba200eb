use papertrail::retriever::Retriever;

use super::*;

#[traced_test]
#[tokio::test]
async fn test_fetch_recent_skips_failed_keyword() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_feed(&server).await;
  let dir = tempdir()?;
  let config = test_config(&server, dir.path());

  let fetched = Retriever::new(config.query)?.fetch_recent(now()).await;

  assert_eq!(fetched.queries, 2);
  assert_eq!(fetched.failures, 1);
  // The 2023 entry is outside the 30 day window
  assert_eq!(fetched.papers.len(), 2);
  let paper = fetched.papers.get("2403.00001").ok_or("missing 2403.00001")?;
  assert_eq!(paper.title, "Fresh title on symplectic capacities");
  assert_eq!(paper.author_display, "Ada Lovelace, Mary Somerville");
  assert_eq!(paper.topics, vec!["symplectic"]);
  assert!(!fetched.papers.contains("2301.00003"));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_fetch_historical_scopes_each_year() -> TestResult<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/query"))
    .and(query_param(
      "search_query",
      "(symplectic) AND (cat:math.SG) AND submittedDate:[202301010000 TO 202312312359]",
    ))
    .and(query_param("max_results", "500"))
    .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
    .expect(1)
    .mount(&server)
    .await;

  let dir = tempdir()?;
  let mut config = test_config(&server, dir.path());
  config.query.keywords = vec![Keyword::phrase("symplectic")];

  let fetched = Retriever::new(config.query)?.fetch_historical(2022, 2023).await;

  // 2022 answers 404 from the mock server and is skipped
  assert_eq!(fetched.queries, 2);
  assert_eq!(fetched.failures, 1);
  // No recency filter
  assert_eq!(fetched.papers.len(), 3);
  assert!(fetched.papers.contains("2301.00003"));
  Ok(())
}

#[tokio::test]
async fn test_search_reports_status() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_feed(&server).await;
  let dir = tempdir()?;
  let config = test_config(&server, dir.path());

  let result = Retriever::new(config.query)?.search(BROKEN_QUERY, 10).await;

  assert!(matches!(result, Err(PapertrailError::ApiError(_))));
  Ok(())
}

#[tokio::test]
async fn test_search_reports_api_error_entry() -> TestResult<()> {
  let server = MockServer::start().await;
  let error_feed = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/api/errors#max_results_must_be_less_than_30000</id>
    <title>Error</title>
    <summary>max_results must be less than 30000</summary>
  </entry>
</feed>"#;
  Mock::given(method("GET"))
    .and(path("/api/query"))
    .respond_with(ResponseTemplate::new(200).set_body_string(error_feed))
    .mount(&server)
    .await;
  let dir = tempdir()?;
  let config = test_config(&server, dir.path());

  let err = Retriever::new(config.query)?.search(SYMPLECTIC_QUERY, 50_000).await.unwrap_err();

  match err {
    PapertrailError::ApiError(message) => assert_eq!(message, "max_results must be less than 30000"),
    e => panic!("Expected an API error, got {e:?}"),
  }
  Ok(())
}
