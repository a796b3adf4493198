// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::inference::ImageData;

#[test]
fn endpoint_joins_model() {
    assert_eq!(
        endpoint("https://llm.example.test/v1beta/", "gemini-2.0-flash"),
        "https://llm.example.test/v1beta/models/gemini-2.0-flash:generateContent"
    );
}

#[test]
fn text_prompt_body() {
    let body = request_body(&InferenceRequest::new("summarise").with_text("rear brake squeals"));
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["text"], "summarise");
    assert_eq!(parts[1]["text"], "rear brake squeals");
    assert!(body.get("generationConfig").is_none());
}

#[test]
fn image_prompt_is_base64_inline() {
    let request = InferenceRequest::new("read invoice")
        .with_image(ImageData::new("image/jpeg", b"abc".to_vec()))
        .json();
    let body = request_body(&request);
    let inline = &body["contents"][0]["parts"][1]["inline_data"];
    assert_eq!(inline["mime_type"], "image/jpeg");
    assert_eq!(inline["data"], "YWJj");
    assert_eq!(
        body["generationConfig"]["responseMimeType"],
        "application/json"
    );
}

#[test]
fn reply_text_joins_parts_of_first_candidate() {
    let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}},
                   {"content":{"parts":[{"text":"ignored"}]}}]}"#;
    assert_eq!(reply_text(body).unwrap(), "{\"a\":1}");
}

#[test]
fn reply_without_candidates_is_empty() {
    assert_eq!(
        reply_text(r#"{"candidates":[]}"#).unwrap_err(),
        InferenceError::EmptyReply
    );
    assert_eq!(
        reply_text(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap_err(),
        InferenceError::EmptyReply
    );
}

#[test]
fn reply_that_is_not_json_is_a_decode_error() {
    assert!(matches!(
        reply_text("<html>").unwrap_err(),
        InferenceError::Decode(_)
    ));
}
