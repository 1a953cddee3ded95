// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::json;
use smol_str::SmolStr;
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::options::builtin_options;

use super::*;

struct Scripted {
    reply: Result<String, &'static str>,
}

#[async_trait]
impl Dispatcher for Scripted {
    async fn refine(&self, _text: &str, _option: &RefineOption) -> Result<String, DispatchError> {
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(DispatchError::Rejected {
                message: (*message).to_owned(),
            }),
        }
    }
}

fn shorten() -> RefineOption {
    builtin_options()
        .into_iter()
        .find(|option| option.id == "shorten")
        .expect("builtin present")
}

#[test]
fn request_wire_shape_is_camel_case() {
    let request = RefineRequest::new("some words", "shorten");
    let wire = serde_json::to_value(&request).expect("serialize");

    assert_eq!(
        wire,
        json!({ "action": "refineText", "text": "some words", "option": "shorten" })
    );
}

#[test]
fn response_wire_shape_omits_absent_side() {
    let ok = serde_json::to_value(RefineResponse::ok("better words")).expect("serialize");
    assert_eq!(ok, json!({ "success": true, "refinedText": "better words" }));

    let failed = serde_json::to_value(RefineResponse::failure("nope")).expect("serialize");
    assert_eq!(failed, json!({ "success": false, "error": "nope" }));
}

#[test]
fn into_result_splits_on_success_flag() {
    assert_eq!(
        RefineResponse::ok("better").into_result().expect("ok"),
        "better"
    );
    let err = RefineResponse::failure("quota exhausted")
        .into_result()
        .expect_err("failure");
    assert!(matches!(err, DispatchError::Rejected { message } if message == "quota exhausted"));
    let err = RefineResponse {
        success: true,
        refined_text: None,
        error: None,
    }
    .into_result()
    .expect_err("missing text");
    assert!(matches!(err, DispatchError::MalformedResponse { .. }));
}

#[tokio::test]
async fn handle_request_resolves_builtin_and_custom_options() {
    let dispatcher = Scripted {
        reply: Ok("better".to_owned()),
    };
    let custom = RefineOption {
        id: SmolStr::new_static("custom-0"),
        icon: SmolStr::new_static("🎯"),
        label: "Pirate voice".to_owned(),
        prompt_template: "Rewrite as a pirate:".to_owned(),
    };

    for option in ["shorten", "custom-0"] {
        let request = RefineRequest::new("words", option);
        let reply = handle_request(&dispatcher, std::slice::from_ref(&custom), &request).await;
        assert_eq!(reply, RefineResponse::ok("better"));
    }
}

#[tokio::test]
async fn handle_request_rejects_unknown_action_and_option() {
    let dispatcher = Scripted {
        reply: Ok("better".to_owned()),
    };

    let mut request = RefineRequest::new("words", "shorten");
    request.action = SmolStr::new_static("somethingElse");
    let reply = handle_request(&dispatcher, &[], &request).await;
    assert!(!reply.success);

    let request = RefineRequest::new("words", "no-such-option");
    let reply = handle_request(&dispatcher, &[], &request).await;
    assert!(!reply.success);
    assert!(reply.error.expect("error message").contains("no-such-option"));
}

#[tokio::test]
async fn handle_request_wraps_dispatch_failures() {
    let dispatcher = Scripted {
        reply: Err("service down"),
    };
    let reply = handle_request(&dispatcher, &[], &RefineRequest::new("words", "shorten")).await;

    assert!(!reply.success);
    assert!(reply.error.expect("error message").contains("service down"));
}

#[test]
fn empty_credential_is_rejected_up_front() {
    let err = OpenAiDispatcher::new("   ").expect_err("blank credential");
    assert!(matches!(err, DispatchError::MissingCredential));
}

#[tokio::test]
async fn openai_dispatch_sends_expected_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("sk-test-123"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 1000,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "  Shorter text.  " } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = OpenAiDispatcher::with_endpoint(
        "sk-test-123",
        format!("{}/v1/chat/completions", server.uri()),
    )
    .expect("build dispatcher");
    let refined = dispatcher
        .refine("A rather long piece of text.", &shorten())
        .await
        .expect("refine");

    // Whitespace around the model reply is stripped.
    assert_eq!(refined, "Shorter text.");
}

#[tokio::test]
async fn openai_system_prompt_carries_template_and_suffix() {
    let server = MockServer::start().await;
    let option = shorten();
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "messages": [
                {
                    "role": "system",
                    "content": format!(
                        "{} Return only the refined text without any additional commentary, \
                         explanations, or formatting.",
                        option.prompt_template
                    ),
                },
                { "role": "user", "content": "some words" },
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "fewer words" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher =
        OpenAiDispatcher::with_endpoint("sk-test-123", server.uri()).expect("build dispatcher");
    let refined = dispatcher.refine("some words", &option).await.expect("refine");
    assert_eq!(refined, "fewer words");
}

#[tokio::test]
async fn openai_error_status_surfaces_api_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided" }
        })))
        .mount(&server)
        .await;

    let dispatcher =
        OpenAiDispatcher::with_endpoint("sk-bad", server.uri()).expect("build dispatcher");
    let err = dispatcher
        .refine("words", &shorten())
        .await
        .expect_err("should fail");

    assert!(
        matches!(err, DispatchError::Api { status: 401, ref message } if message.contains("Incorrect API key"))
    );
}

#[tokio::test]
async fn openai_empty_choices_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let dispatcher =
        OpenAiDispatcher::with_endpoint("sk-test-123", server.uri()).expect("build dispatcher");
    let err = dispatcher
        .refine("words", &shorten())
        .await
        .expect_err("should fail");

    assert!(matches!(err, DispatchError::MalformedResponse { .. }));
}
