// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pit_adapters::{FakeInference, InferenceError};
use yare::parameterized;

#[tokio::test]
async fn reply_is_used_when_readable() {
    let inference = FakeInference::new();
    inference.reply(r#"{"valid":true,"summary":" Rear brake squeal ","category":"Brakes"}"#);
    let triage = IssueTriage::new(inference.clone());

    let assessment = triage.assess("  the back brake screams when I stop ").await.unwrap();

    assert_eq!(
        assessment,
        IssueAssessment {
            valid: true,
            summary: "Rear brake squeal".to_string(),
            category: Some("brakes".to_string()),
        }
    );
    assert_eq!(
        inference.calls()[0].text.as_deref(),
        Some("the back brake screams when I stop")
    );
}

#[tokio::test]
async fn invalid_complaint_is_flagged() {
    let inference = FakeInference::new();
    inference.reply(r#"{"valid":false,"summary":"Not a motorcycle issue"}"#);
    let triage = IssueTriage::new(inference);

    let assessment = triage.assess("my fridge is broken").await.unwrap();

    assert!(!assessment.valid);
    assert_eq!(assessment.category, None);
}

#[parameterized(
    endpoint_down = { Err(InferenceError::Disabled) },
    garbage = { Ok("sorry, I cannot help") },
    wrong_shape = { Ok(r#"{"verdict":"ok"}"#) },
)]
fn falls_back_to_the_complaint(reply: Result<&str, InferenceError>) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        let inference = FakeInference::new();
        match reply {
            Ok(text) => inference.reply(text),
            Err(e) => inference.fail(e),
        };
        let triage = IssueTriage::new(inference);

        let assessment = triage.assess(" engine won't start ").await.unwrap();

        assert_eq!(assessment, IssueAssessment::fallback("engine won't start"));
    });
}

#[tokio::test]
async fn blank_summary_uses_the_complaint() {
    let inference = FakeInference::new();
    inference.reply(r#"{"valid":true,"summary":"  "}"#);
    let triage = IssueTriage::new(inference);

    let assessment = triage.assess("oil leak").await.unwrap();

    assert_eq!(assessment.summary, "oil leak");
}

#[tokio::test]
async fn empty_complaint_is_rejected_without_a_call() {
    let inference = FakeInference::new();
    let triage = IssueTriage::new(inference.clone());

    let err = triage.assess("   ").await.unwrap_err();

    assert!(matches!(err, EngineError::InvalidInput { field: "complaint", .. }));
    assert!(inference.calls().is_empty());
}
