//! Integration tests for the sync wire formats.
//!
//! Handler logic is unit-tested in-crate against mock collaborators;
//! these tests pin the JSON shapes exchanged with the remote API and
//! with the trigger's caller, plus a full plan-and-classify pass over
//! the engine.

use serde_json::json;
use stocksync_engine::{plan_pages, plan_sync, ProductRecord, RemoteItem, SyncOutcome};

/// Test helper to build remote items from JSON literals.
fn items(values: &[serde_json::Value]) -> Vec<RemoteItem> {
    values
        .iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect()
}

#[cfg(test)]
mod wire_tests {
    use super::*;

    #[test]
    fn test_login_request_casing() {
        // The remote API expects PascalCase credential fields.
        #[derive(serde::Serialize)]
        struct Credentials<'a> {
            #[serde(rename = "CompanyDB")]
            company_db: &'a str,
            #[serde(rename = "UserName")]
            user_name: &'a str,
            #[serde(rename = "Password")]
            password: &'a str,
        }

        let json = serde_json::to_string(&Credentials {
            company_db: "PRODDB",
            user_name: "manager",
            password: "secret",
        })
        .unwrap();

        assert_eq!(
            json,
            r#"{"CompanyDB":"PRODDB","UserName":"manager","Password":"secret"}"#
        );
    }

    #[test]
    fn test_items_page_response_parsing() {
        let body = r#"{
            "odata.metadata": "https://example.invalid/$metadata#Items",
            "value": [
                {"ItemCode": "A001", "ItemName": "Product A", "ItemsGroupCode": 100},
                {"ItemCode": "B001", "ItemName": "Product B", "ItemsGroupCode": 101}
            ]
        }"#;

        #[derive(serde::Deserialize)]
        struct ItemsResponse {
            value: Vec<RemoteItem>,
        }

        let parsed: ItemsResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.value.len(), 2);
        assert_eq!(parsed.value[0]["ItemName"], "Product A");
        assert_eq!(parsed.value[1]["ItemsGroupCode"], 101);
    }

    #[test]
    fn test_count_body_parsing() {
        // The $count sub-resource replies with a plain-text integer.
        let body = "  47\n";
        let count: i64 = body.trim().parse().unwrap();
        assert_eq!(count, 47);
    }

    #[test]
    fn test_sync_response_field_casing() {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct SyncResponse {
            message: String,
            total_items: i64,
            items_fetched: usize,
            created: usize,
            updated: usize,
            unchanged: usize,
            errors: Vec<String>,
            elapsed_ms: u128,
        }

        let response = SyncResponse {
            message: "Catalog sync completed".to_string(),
            total_items: 47,
            items_fetched: 47,
            created: 2,
            updated: 1,
            unchanged: 44,
            errors: vec![],
            elapsed_ms: 1200,
        };

        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"totalItems\":47"));
        assert!(json.contains("\"itemsFetched\":47"));
        assert!(json.contains("\"elapsedMs\":1200"));
        assert!(json.contains("\"errors\":[]"));
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = SyncOutcome {
            created: 3,
            updated: 1,
            unchanged: 2,
            errors: vec!["Invalid or missing ItemName in external item".to_string()],
        };

        let json = serde_json::to_string(&outcome).unwrap();
        let parsed: SyncOutcome = serde_json::from_str(&json).unwrap();

        assert_eq!(outcome, parsed);
        assert!(json.contains("\"created\":3"));
    }

    #[test]
    fn test_full_pass_over_engine() {
        // Page plan for a 47-item collection at the default page size.
        let requests = plan_pages(47, 20).unwrap();
        assert_eq!(
            requests.iter().map(|r| r.offset).collect::<Vec<_>>(),
            vec![0, 20, 40]
        );

        // Classification of a fetched batch against existing rows.
        let remote = items(&[
            json!({"ItemCode": "E001", "ItemName": "Existing Product 1"}),
            json!({"ItemCode": "U001", "ItemName": "Product To Update"}),
            json!({"ItemCode": "N001", "ItemName": "Brand New Product A"}),
            json!({"ItemCode": "X001", "ItemName": ""}),
        ]);
        let persisted = vec![
            ProductRecord {
                id: 1,
                title: "Existing Product 1".to_string(),
                handle: "existing-product-1".to_string(),
            },
            ProductRecord {
                id: 2,
                title: "Product To Update".to_string(),
                handle: "old-handle".to_string(),
            },
        ];

        let plan = plan_sync(&remote, &persisted);

        assert_eq!(plan.creates.len(), 1);
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].handle, "product-to-update");
        assert_eq!(plan.unchanged, 1);
        assert_eq!(plan.validation_errors.len(), 1);
    }
}
