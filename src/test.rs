use std::collections::HashMap;

use sqlx::sqlite::SqlitePoolOptions;

use crate::config::Config;
use crate::db::{self, DbPool, OfficerStore, TableStore};
use crate::db::officer_store::hash_password;
use crate::models::table::KnownTable;

// Helper function to set up an in-memory test database.
// One connection keeps every statement on the same memory database.
async fn setup_test_pool() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    db::setup_database(&pool)
        .await
        .expect("Failed to initialize database");

    pool
}

fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn test_config() -> Config {
    Config {
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        charts_dir: "static".to_string(),
    }
}

async fn create_test_officer(pool: &DbPool, batch_number: &str, password: &str) {
    sqlx::query(
        "INSERT INTO inventory_officers (batch_number, name, password_hash) VALUES (?, ?, ?)",
    )
    .bind(batch_number)
    .bind("Test Officer")
    .bind(hash_password(password))
    .execute(pool)
    .await
    .expect("Failed to create officer");
}

async fn row_count(pool: &DbPool, table: KnownTable) -> i64 {
    let store = TableStore::new(pool.clone());
    store
        .fetch_all(table)
        .await
        .expect("Failed to fetch rows")
        .rows
        .len() as i64
}

#[cfg(test)]
mod crud_tests {
    use super::*;
    use crate::error::AppError;
    use serde_json::json;

    #[tokio::test]
    async fn insert_then_list_shows_submitted_values() {
        let pool = setup_test_pool().await;
        let store = TableStore::new(pool.clone());

        store
            .insert(
                KnownTable::Weapons,
                &fields(&[
                    ("weapon_id", "7"),
                    ("name", "Carbine"),
                    ("cost", "125.5"),
                    ("quantity", "4"),
                ]),
            )
            .await
            .expect("Failed to insert");

        let data = store
            .fetch_all(KnownTable::Weapons)
            .await
            .expect("Failed to list");

        assert_eq!(
            data.columns,
            vec!["weapon_id", "name", "category", "cost", "quantity"]
        );
        assert_eq!(data.rows.len(), 1);

        let row = &data.rows[0];
        assert_eq!(row[0], json!(7));
        assert_eq!(row[1], json!("Carbine"));
        // Unsubmitted column takes the engine default
        assert_eq!(row[2], serde_json::Value::Null);
        assert_eq!(row[3], json!(125.5));
        assert_eq!(row[4], json!(4));
    }

    #[tokio::test]
    async fn listing_an_empty_table_reports_registered_columns() {
        let pool = setup_test_pool().await;
        let store = TableStore::new(pool.clone());

        let data = store
            .fetch_all(KnownTable::Items)
            .await
            .expect("Failed to list");

        assert!(data.rows.is_empty());
        assert_eq!(
            data.columns,
            vec!["item_id", "name", "category", "cost", "quantity"]
        );
    }

    #[tokio::test]
    async fn duplicate_insert_reports_existing_record() {
        let pool = setup_test_pool().await;
        let store = TableStore::new(pool.clone());

        let record = fields(&[("name", "Carbine"), ("cost", "100")]);
        store
            .insert(KnownTable::Weapons, &record)
            .await
            .expect("Failed to insert");

        let result = store.insert(KnownTable::Weapons, &record).await;
        assert!(matches!(
            result,
            Err(AppError::RecordExists { table: "weapons" })
        ));

        // The table is unchanged
        assert_eq!(row_count(&pool, KnownTable::Weapons).await, 1);
    }

    #[tokio::test]
    async fn update_changes_only_the_matching_row() {
        let pool = setup_test_pool().await;
        let store = TableStore::new(pool.clone());

        store
            .insert(
                KnownTable::Items,
                &fields(&[("item_id", "1"), ("name", "Rope"), ("quantity", "10")]),
            )
            .await
            .expect("Failed to insert");
        store
            .insert(
                KnownTable::Items,
                &fields(&[("item_id", "2"), ("name", "Tent"), ("quantity", "3")]),
            )
            .await
            .expect("Failed to insert");

        let affected = store
            .update(
                KnownTable::Items,
                &fields(&[("item_id", "2"), ("quantity", "5")]),
            )
            .await
            .expect("Failed to update");
        assert_eq!(affected, 1);

        let data = store
            .fetch_all(KnownTable::Items)
            .await
            .expect("Failed to list");
        let tent = data
            .rows
            .iter()
            .find(|row| row[1] == json!("Tent"))
            .expect("Tent row missing");
        assert_eq!(tent[4], json!(5));

        let rope = data
            .rows
            .iter()
            .find(|row| row[1] == json!("Rope"))
            .expect("Rope row missing");
        assert_eq!(rope[4], json!(10));
    }

    #[tokio::test]
    async fn update_with_unknown_key_affects_no_rows() {
        let pool = setup_test_pool().await;
        let store = TableStore::new(pool.clone());

        store
            .insert(
                KnownTable::Weapons,
                &fields(&[("weapon_id", "1"), ("name", "Carbine")]),
            )
            .await
            .expect("Failed to insert");

        let affected = store
            .update(
                KnownTable::Weapons,
                &fields(&[("weapon_id", "999"), ("name", "Changed")]),
            )
            .await
            .expect("Failed to update");

        assert_eq!(affected, 0);

        // Contents unchanged
        let data = store
            .fetch_all(KnownTable::Weapons)
            .await
            .expect("Failed to list");
        assert_eq!(data.rows[0][1], json!("Carbine"));
    }

    #[tokio::test]
    async fn update_without_primary_key_is_rejected_before_touching_the_db() {
        let pool = setup_test_pool().await;
        let store = TableStore::new(pool.clone());

        let result = store
            .update(KnownTable::Weapons, &fields(&[("name", "Carbine")]))
            .await;

        assert!(matches!(
            result,
            Err(AppError::MissingKey { table: "weapons", key: "weapon_id" })
        ));
    }

    #[tokio::test]
    async fn delete_with_unknown_key_affects_no_rows() {
        let pool = setup_test_pool().await;
        let store = TableStore::new(pool.clone());

        store
            .insert(
                KnownTable::TechnicalItems,
                &fields(&[("tech_item_id", "1"), ("name", "Radio")]),
            )
            .await
            .expect("Failed to insert");

        let affected = store
            .delete(KnownTable::TechnicalItems, "999")
            .await
            .expect("Failed to delete");
        assert_eq!(affected, 0);
        assert_eq!(row_count(&pool, KnownTable::TechnicalItems).await, 1);

        let affected = store
            .delete(KnownTable::TechnicalItems, "1")
            .await
            .expect("Failed to delete");
        assert_eq!(affected, 1);
        assert_eq!(row_count(&pool, KnownTable::TechnicalItems).await, 0);
    }

    #[tokio::test]
    async fn unknown_columns_are_rejected() {
        let pool = setup_test_pool().await;
        let store = TableStore::new(pool.clone());

        let result = store
            .insert(
                KnownTable::Weapons,
                &fields(&[("name", "Carbine"), ("evil; DROP TABLE weapons", "x")]),
            )
            .await;

        assert!(matches!(result, Err(AppError::UnknownColumn { .. })));
        assert_eq!(row_count(&pool, KnownTable::Weapons).await, 0);
    }
}

#[cfg(test)]
mod registry_tests {
    use super::*;

    #[test]
    fn registry_maps_each_table_to_its_primary_key() {
        assert_eq!(KnownTable::from_name("history"), Some(KnownTable::History));
        assert_eq!(KnownTable::History.primary_key(), "serial");
        assert_eq!(KnownTable::Weapons.primary_key(), "weapon_id");
        assert_eq!(KnownTable::Items.primary_key(), "item_id");
        assert_eq!(KnownTable::TechnicalItems.primary_key(), "tech_item_id");
    }

    #[test]
    fn unregistered_tables_are_not_resolvable() {
        assert_eq!(KnownTable::from_name("inventory_officers"), None);
        assert_eq!(KnownTable::from_name("sqlite_master"), None);
        assert_eq!(KnownTable::from_name(""), None);
    }

    #[test]
    fn every_primary_key_is_in_its_own_column_list() {
        for table in KnownTable::ALL {
            assert_eq!(table.column(table.primary_key()), Some(table.primary_key()));
        }
    }
}

#[cfg(test)]
mod auth_tests {
    use super::*;

    #[test]
    fn password_digest_is_deterministic_hex() {
        let digest = hash_password("secret");
        assert_eq!(digest, hash_password("secret"));
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(digest, hash_password("Secret"));
    }

    #[tokio::test]
    async fn authentication_succeeds_only_on_exact_match() {
        let pool = setup_test_pool().await;
        create_test_officer(&pool, "BN-2042", "correct horse").await;

        let store = OfficerStore::new(pool.clone());

        let officer = store
            .authenticate("BN-2042", "correct horse")
            .await
            .expect("Query failed");
        assert_eq!(
            officer.expect("Expected a match").batch_number,
            "BN-2042"
        );

        // Wrong password and unknown batch number fail uniformly
        let wrong_password = store
            .authenticate("BN-2042", "wrong")
            .await
            .expect("Query failed");
        assert!(wrong_password.is_none());

        let unknown_batch = store
            .authenticate("BN-0000", "correct horse")
            .await
            .expect("Query failed");
        assert!(unknown_batch.is_none());
    }
}

#[cfg(test)]
mod session_tests {
    use super::*;
    use crate::handlers::{AppState, CurrentOfficer};
    use crate::services::session_service::{Flash, FlashLevel, SessionStore};
    use axum::extract::FromRequestParts;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn sessions_live_from_create_to_remove() {
        let store = SessionStore::new();

        let token = store.create("BN-2042").await;
        assert_eq!(store.batch_number(&token).await.as_deref(), Some("BN-2042"));

        store.remove(&token).await;
        assert_eq!(store.batch_number(&token).await, None);
    }

    #[tokio::test]
    async fn flashes_are_drained_once() {
        let store = SessionStore::new();
        let token = store.create("BN-2042").await;

        store.push_flash(&token, Flash::success("inserted")).await;
        store.push_flash(&token, Flash::danger("broken")).await;

        let flashes = store.take_flashes(&token).await;
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[0].level, FlashLevel::Success);
        assert_eq!(flashes[1].message, "broken");

        assert!(store.take_flashes(&token).await.is_empty());
    }

    #[tokio::test]
    async fn requests_without_a_session_redirect_to_login() {
        let pool = setup_test_pool().await;
        let state = AppState::new(test_config(), pool);

        let (mut parts, _) = axum::http::Request::builder()
            .uri("/dashboard")
            .body(())
            .expect("Failed to build request")
            .into_parts();

        let rejection = CurrentOfficer::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("Request without a session must be rejected");

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/login");
    }
}

#[cfg(test)]
mod report_tests {
    use super::*;
    use crate::models::report::{SavingsReport, SAVINGS_MODELS};
    use crate::services::report_service::{self, ReportService, CHART_FILES};
    use std::fs;

    #[test]
    fn five_percent_of_six_hundred_is_thirty() {
        let report = SavingsReport::from_total(600.0);

        assert_eq!(report.entries[0].model, "Three-Statement Model (5%)");
        assert!((report.entries[0].amount - 30.0).abs() < 1e-9);
    }

    #[test]
    fn model_sum_equals_total_times_percentage_sum() {
        let report = SavingsReport::from_total(600.0);

        let amount_sum: f64 = report.entries.iter().map(|e| e.amount).sum();
        let percentage_sum: f64 = SAVINGS_MODELS.iter().map(|m| m.percentage).sum();

        assert!((amount_sum - 600.0 * percentage_sum).abs() < 1e-9);
    }

    #[test]
    fn entries_follow_declaration_order() {
        let report = SavingsReport::from_total(100.0);

        let labels: Vec<&str> = report.entries.iter().map(|e| e.model).collect();
        let expected: Vec<&str> = SAVINGS_MODELS.iter().map(|m| m.label).collect();
        assert_eq!(labels, expected);
    }

    #[tokio::test]
    async fn report_totals_current_weapon_costs() {
        let pool = setup_test_pool().await;
        let store = TableStore::new(pool.clone());

        for (id, name, cost) in [(1, "Carbine", "100"), (2, "Rifle", "200"), (3, "Mortar", "300")]
        {
            store
                .insert(
                    KnownTable::Weapons,
                    &fields(&[
                        ("weapon_id", &id.to_string()),
                        ("name", name),
                        ("cost", cost),
                    ]),
                )
                .await
                .expect("Failed to insert");
        }

        let service = ReportService::new(pool);
        let report = service.build_report().await.expect("Failed to build report");

        assert!((report.total_inventory_value - 600.0).abs() < 1e-9);
        assert!((report.entries[0].amount - 30.0).abs() < 1e-9);
    }

    #[test]
    fn charts_are_written_to_the_output_directory() {
        let output_dir =
            std::env::temp_dir().join(format!("inventory_charts_{}", uuid::Uuid::new_v4()));

        let report = SavingsReport::from_total(600.0);
        report_service::render_charts(&report, &output_dir).expect("Failed to render charts");

        for file in CHART_FILES {
            let path = output_dir.join(file);
            let metadata = fs::metadata(&path)
                .unwrap_or_else(|_| panic!("Missing chart file {}", path.display()));
            assert!(metadata.len() > 0);
        }

        fs::remove_dir_all(&output_dir).expect("Failed to remove chart directory");
    }

    #[test]
    fn charts_tolerate_an_empty_inventory() {
        let output_dir =
            std::env::temp_dir().join(format!("inventory_charts_{}", uuid::Uuid::new_v4()));

        let report = SavingsReport::from_total(0.0);
        report_service::render_charts(&report, &output_dir).expect("Failed to render charts");

        for file in CHART_FILES {
            assert!(output_dir.join(file).exists());
        }

        fs::remove_dir_all(&output_dir).expect("Failed to remove chart directory");
    }
}
