//! Verify flattening and response classification against the JSON test
//! vectors stored in `test-vectors/`.
//!
//! Each vector file lists inputs with the exact output expected. Vectors are
//! shared data rather than code so that other client implementations can be
//! checked against the same cases.

use stripe_core::{Credential, HttpResponse, Params, RequestPipeline};

fn pipeline() -> RequestPipeline {
    RequestPipeline::new(Credential::new("sk_test_vectors"), "https://api.stripe.com")
}

// ---------------------------------------------------------------------------
// Flatten
// ---------------------------------------------------------------------------

#[test]
fn flatten_test_vectors() {
    let raw = include_str!("../../test-vectors/flatten.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let params = Params::from(case["input"].clone());

        let expected_pairs: Vec<(String, String)> = case["expected_pairs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| {
                let arr = p.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(params.flatten(), expected_pairs, "{name}: pairs");
        assert_eq!(params.to_form(), case["expected_form"].as_str().unwrap(), "{name}: form");
    }
}

// ---------------------------------------------------------------------------
// Classify
// ---------------------------------------------------------------------------

#[test]
fn classify_test_vectors() {
    let raw = include_str!("../../test-vectors/classify.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let p = pipeline();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: case["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: case["body"].as_str().unwrap().to_string(),
        };
        let result = p.parse_response(&response);

        let Some(expected) = case.get("expected_error") else {
            let value = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));
            assert_eq!(value, case["expected_result"], "{name}: parsed result");
            continue;
        };

        let err = result.expect_err(name);
        assert_eq!(err.kind().to_string(), expected["kind"].as_str().unwrap(), "{name}: kind");
        assert_eq!(
            u64::from(err.status_code()),
            expected["status"].as_u64().unwrap(),
            "{name}: status"
        );
        if let Some(message) = expected.get("message") {
            assert_eq!(err.message(), message.as_str().unwrap(), "{name}: message");
        }
        assert_eq!(err.code(), expected.get("code").and_then(|v| v.as_str()), "{name}: code");
        assert_eq!(err.param(), expected.get("param").and_then(|v| v.as_str()), "{name}: param");
        assert_eq!(
            err.decline_code(),
            expected.get("decline_code").and_then(|v| v.as_str()),
            "{name}: decline_code"
        );
    }
}
