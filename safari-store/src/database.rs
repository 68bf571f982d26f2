use rust_decimal::Decimal;
use safari_core::RepositoryError;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use crate::app_config::{BusinessRules, DatabaseConfig};

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations").run(&self.pool).await?;
        info!("Migrations completed successfully.");
        Ok(())
    }

    /// Overlays rows of the `business_rules` table (`{"value": ...}`) on top of
    /// the file/env configuration.
    pub async fn fetch_business_rules(&self, defaults: BusinessRules) -> Result<BusinessRules, sqlx::Error> {
        let rows: Vec<(String, Value)> = sqlx::query_as("SELECT rule_key, rule_value FROM business_rules")
            .fetch_all(&self.pool)
            .await?;

        let mut rules = defaults;
        for (key, value) in rows {
            if let Some(v) = value.get("value") {
                apply_rule(&mut rules, &key, v);
            }
        }
        Ok(rules)
    }
}

fn apply_rule(rules: &mut BusinessRules, key: &str, v: &Value) {
    match key {
        "tax_rate" => {
            let parsed = match v {
                Value::String(s) => Decimal::from_str(s).ok(),
                Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
                _ => None,
            };
            match parsed {
                Some(rate) if rate >= Decimal::ZERO => rules.tax_rate = rate,
                _ => warn!("Ignoring invalid tax_rate override: {}", v),
            }
        }
        "currency" => {
            if let Some(s) = v.as_str() {
                rules.currency = s.to_string();
            }
        }
        "search_result_limit" => {
            if let Some(n) = v.as_u64() {
                rules.search_result_limit = n as usize;
            }
        }
        "max_upload_bytes" => {
            if let Some(n) = v.as_u64() {
                rules.max_upload_bytes = n as usize;
            }
        }
        other => warn!("Unknown business rule: {}", other),
    }
}

/// Maps driver errors onto the repository error type. Unique violations
/// become `Conflict`.
pub(crate) fn db_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return RepositoryError::Conflict(db.message().to_string());
        }
    }
    RepositoryError::Backend(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply_rule_overrides() {
        let mut rules = BusinessRules::default();
        apply_rule(&mut rules, "tax_rate", &json!("0.16"));
        apply_rule(&mut rules, "search_result_limit", &json!(8));
        apply_rule(&mut rules, "currency", &json!("KES"));
        assert_eq!(rules.tax_rate, Decimal::new(16, 2));
        assert_eq!(rules.search_result_limit, 8);
        assert_eq!(rules.currency, "KES");
    }

    #[test]
    fn test_negative_tax_rate_is_ignored() {
        let mut rules = BusinessRules::default();
        apply_rule(&mut rules, "tax_rate", &json!(-1));
        assert_eq!(rules.tax_rate, Decimal::new(1, 1));
    }
}
