// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::time::Duration;

use anyhow::Result;
use bytes::Bytes;
use custody::{ErrorKind, ResilientTransport, RetryPolicy};
use http::{HeaderMap, Method, StatusCode};
use pretty_assertions::assert_eq;
use test_case::test_case;
use tokio::time::Instant;

use crate::mock::{fast_retry, test_context, MockHttpSend, Outcome, BASE_URL};

fn transport(mock: &MockHttpSend, max_attempts: usize) -> ResilientTransport {
    ResilientTransport::new(test_context(mock), BASE_URL, fast_retry(max_attempts))
}

fn failures_then_ok(failures: usize, failure: Outcome) -> Vec<Outcome> {
    let mut script = vec![failure; failures];
    script.push(Outcome::Status(200, r#"{"ok":true}"#));
    script
}

#[test_case(0 ; "no failure")]
#[test_case(1 ; "one failure")]
#[test_case(3 ; "last attempt succeeds")]
#[tokio::test]
async fn test_recovers_from_server_errors(failures: usize) -> Result<()> {
    let mock = MockHttpSend::new(failures_then_ok(failures, Outcome::Status(503, "")));

    let resp = transport(&mock, 4)
        .execute(Method::GET, "/v1/supported_assets", HeaderMap::new(), Bytes::new())
        .await?;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.body().as_ref(), br#"{"ok":true}"#);
    assert_eq!(mock.attempts(), failures + 1);
    Ok(())
}

#[test_case(4 ; "as many failures as attempts")]
#[test_case(6 ; "more failures than attempts")]
#[tokio::test]
async fn test_gives_up_after_max_attempts(failures: usize) -> Result<()> {
    let mock = MockHttpSend::new(failures_then_ok(failures, Outcome::Refused));

    let err = transport(&mock, 4)
        .execute(Method::GET, "/v1/supported_assets", HeaderMap::new(), Bytes::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(mock.attempts(), 4);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_more_attempts_than_default_wait_allows() -> Result<()> {
    let mock = MockHttpSend::new(failures_then_ok(6, Outcome::Refused));
    let policy = RetryPolicy::default()
        .with_jitter(false)
        .with_max_attempts(10);

    let started = Instant::now();
    let resp = ResilientTransport::new(test_context(&mock), BASE_URL, policy)
        .execute(Method::GET, "/v1/supported_assets", HeaderMap::new(), Bytes::new())
        .await?;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(mock.attempts(), 7);
    assert!(started.elapsed() <= policy.max_total_wait);
    Ok(())
}

#[tokio::test]
async fn test_server_error_on_every_attempt() -> Result<()> {
    let mock = MockHttpSend::new([Outcome::Status(500, "internal")]);

    let err = transport(&mock, 3)
        .execute(Method::GET, "/v1/supported_assets", HeaderMap::new(), Bytes::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(err.to_string().contains("giving up after 3 attempts"));
    assert_eq!(mock.attempts(), 3);
    Ok(())
}

#[test_case(404 ; "not found")]
#[test_case(400 ; "bad request")]
#[test_case(401 ; "unauthorized")]
#[tokio::test]
async fn test_client_errors_are_completed_responses(code: u16) -> Result<()> {
    let mock = MockHttpSend::new([Outcome::Status(code, r#"{"message":"nope"}"#)]);

    let resp = transport(&mock, 4)
        .execute(Method::GET, "/v1/vault/accounts/9", HeaderMap::new(), Bytes::new())
        .await?;

    assert_eq!(resp.status().as_u16(), code);
    assert!(!resp.is_success());
    assert_eq!(resp.body().as_ref(), br#"{"message":"nope"}"#);
    assert_eq!(mock.attempts(), 1);
    Ok(())
}

#[tokio::test]
async fn test_post_retried_when_not_sent() -> Result<()> {
    let mock = MockHttpSend::new(failures_then_ok(2, Outcome::Refused));

    let resp = transport(&mock, 4)
        .execute(
            Method::POST,
            "/v1/transactions",
            HeaderMap::new(),
            Bytes::from_static(b"{}"),
        )
        .await?;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(mock.attempts(), 3);
    Ok(())
}

#[tokio::test]
async fn test_post_not_retried_once_sent() -> Result<()> {
    let mock = MockHttpSend::new(failures_then_ok(1, Outcome::Reset));

    let err = transport(&mock, 4)
        .execute(
            Method::POST,
            "/v1/transactions",
            HeaderMap::new(),
            Bytes::from_static(b"{}"),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_request_sent());
    assert_eq!(mock.attempts(), 1);
    Ok(())
}

#[tokio::test]
async fn test_post_server_error_is_returned() -> Result<()> {
    let mock = MockHttpSend::new(failures_then_ok(1, Outcome::Status(500, "oops")));

    let resp = transport(&mock, 4)
        .execute(
            Method::POST,
            "/v1/transactions",
            HeaderMap::new(),
            Bytes::from_static(b"{}"),
        )
        .await?;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body().as_ref(), b"oops");
    assert_eq!(mock.attempts(), 1);
    Ok(())
}

#[test_case(Method::PUT ; "put")]
#[test_case(Method::DELETE ; "delete")]
#[tokio::test]
async fn test_idempotent_retried_after_send(method: Method) -> Result<()> {
    let mock = MockHttpSend::new(failures_then_ok(1, Outcome::Reset));

    let resp = transport(&mock, 4)
        .execute(method, "/v1/vault/accounts/1", HeaderMap::new(), Bytes::new())
        .await?;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(mock.attempts(), 2);
    Ok(())
}

#[tokio::test]
async fn test_fatal_error_not_retried() -> Result<()> {
    let mock = MockHttpSend::new(failures_then_ok(1, Outcome::Fatal));

    let err = transport(&mock, 4)
        .execute(Method::GET, "/v1/supported_assets", HeaderMap::new(), Bytes::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("attempts: 1"));
    assert_eq!(mock.attempts(), 1);
    Ok(())
}

#[tokio::test]
async fn test_every_attempt_carries_same_request() -> Result<()> {
    let mock = MockHttpSend::new(failures_then_ok(2, Outcome::Status(502, "")));

    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", "k".parse()?);
    transport(&mock, 4)
        .execute(
            Method::PUT,
            "/v1/vault/accounts/1",
            headers,
            Bytes::from_static(b"{\"name\":\"x\"}"),
        )
        .await?;

    let requests = mock.requests();
    assert_eq!(requests.len(), 3);
    for req in requests {
        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.uri.to_string(), "https://custody.test/v1/vault/accounts/1");
        assert_eq!(req.headers["x-api-key"], "k");
        assert_eq!(req.body.as_ref(), b"{\"name\":\"x\"}");
    }
    Ok(())
}

#[tokio::test]
async fn test_deadline_exceeded() -> Result<()> {
    let mock = MockHttpSend::new([Outcome::Delay(Duration::from_secs(5))]);

    let err = transport(&mock, 4)
        .execute_with_deadline(
            Method::GET,
            "/v1/supported_assets",
            HeaderMap::new(),
            Bytes::new(),
            Duration::from_millis(50),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("deadline"));
    assert_eq!(mock.attempts(), 1);
    Ok(())
}

#[tokio::test]
async fn test_deadline_not_reached() -> Result<()> {
    let mock = MockHttpSend::new([Outcome::Delay(Duration::from_millis(5))]);

    let resp = transport(&mock, 4)
        .execute_with_deadline(
            Method::GET,
            "/v1/supported_assets",
            HeaderMap::new(),
            Bytes::new(),
            Duration::from_secs(5),
        )
        .await?;

    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[test_case("not a url" ; "spaces")]
#[test_case("" ; "empty")]
#[test_case("custody.test" ; "missing scheme")]
#[tokio::test]
async fn test_invalid_url(base_url: &str) -> Result<()> {
    let mock = MockHttpSend::default();

    let err = ResilientTransport::new(test_context(&mock), base_url, fast_retry(4))
        .execute(Method::GET, "/v1/supported_assets", HeaderMap::new(), Bytes::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(!err.is_request_sent());
    assert_eq!(mock.attempts(), 0);
    Ok(())
}

#[tokio::test]
async fn test_base_url_trailing_slash() -> Result<()> {
    let mock = MockHttpSend::default();

    ResilientTransport::new(test_context(&mock), "https://custody.test/", fast_retry(1))
        .execute(Method::GET, "/v1/supported_assets", HeaderMap::new(), Bytes::new())
        .await?;

    assert_eq!(
        mock.last_request().uri.to_string(),
        "https://custody.test/v1/supported_assets"
    );
    Ok(())
}
