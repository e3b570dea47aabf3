//! Shared test helpers for integration tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shiftguard_core::config::DatabaseConfig;
use shiftguard_database::connection::DatabasePool;
use shiftguard_database::migration::run_migrations;
use shiftguard_database::repositories::directory::DirectoryRepository;
use shiftguard_database::repositories::ledger::LedgerRepository;
use shiftguard_database::repositories::period::WorkPeriodRepository;
use shiftguard_database::repositories::regulation::RegulationRepository;

use shiftguard_compliance::enforcement::BreakEnforcementAction;
use shiftguard_compliance::resolver::RegulationResolver;
use shiftguard_compliance::safety_net::SafetyNetProcessor;

use shiftguard_entity::ledger::model::{ClockEventKind, CreateLedgerEntry};
use shiftguard_entity::period::model::{OpenWorkPeriod, WorkPeriod};
use shiftguard_entity::regulation::assignment::ScopeKind;

/// Tests share one database and `TestApp::new` wipes it, so they must not
/// overlap. The guard is held for the life of each `TestApp`.
static DB_GUARD: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

/// Test application context wired over a real database.
pub struct TestApp {
    _guard: tokio::sync::MutexGuard<'static, ()>,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Clock-event ledger repository
    pub ledger: Arc<LedgerRepository>,
    /// Work period repository
    pub periods: Arc<WorkPeriodRepository>,
    /// Break enforcement action
    pub enforcement: Arc<BreakEnforcementAction>,
    /// Safety-net batch processor
    pub safety_net: Arc<SafetyNetProcessor>,
}

impl TestApp {
    /// Create a new test application, or `None` when no test database is
    /// configured. Callers skip the test in that case.
    pub async fn new() -> Option<Self> {
        let Ok(url) = std::env::var("SHIFTGUARD_TEST_DATABASE_URL") else {
            eprintln!("SHIFTGUARD_TEST_DATABASE_URL not set, skipping database test");
            return None;
        };

        let guard = DB_GUARD.lock().await;

        let config = DatabaseConfig {
            url,
            max_connections: 5,
            min_connections: 1,
            connect_timeout_seconds: 5,
            idle_timeout_seconds: 60,
        };

        let db = DatabasePool::connect(&config)
            .await
            .expect("Failed to connect to test database");
        let db_pool = db.pool().clone();

        run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        Self::clean_database(&db_pool).await;

        let ledger = Arc::new(LedgerRepository::new(db_pool.clone()));
        let periods = Arc::new(WorkPeriodRepository::new(db_pool.clone()));
        let regulations = Arc::new(RegulationRepository::new(db_pool.clone()));
        let directory = Arc::new(DirectoryRepository::new(db_pool.clone()));

        let resolver = Arc::new(RegulationResolver::new(
            Arc::clone(&directory),
            Arc::clone(&regulations),
        ));
        let enforcement = Arc::new(BreakEnforcementAction::new(
            db_pool.clone(),
            Arc::clone(&periods),
            Arc::clone(&directory),
            Arc::clone(&resolver),
        ));
        let safety_net = Arc::new(SafetyNetProcessor::new(
            db_pool.clone(),
            Arc::clone(&periods),
            Arc::clone(&enforcement),
            "UTC".to_string(),
        ));

        Some(Self {
            _guard: guard,
            db_pool,
            ledger,
            periods,
            enforcement,
            safety_net,
        })
    }

    /// Clean all test data from the database.
    async fn clean_database(pool: &PgPool) {
        let tables = [
            "compliance_violations",
            "work_periods",
            "time_ledger",
            "regulation_assignments",
            "regulations",
            "employees",
            "teams",
            "organizations",
        ];

        for table in &tables {
            let query = format!("DELETE FROM {}", table);
            let _ = sqlx::query(&query).execute(pool).await;
        }
    }

    /// Create an organization and return its ID.
    pub async fn create_organization(&self, name: &str) -> Uuid {
        sqlx::query_scalar("INSERT INTO organizations (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to create organization")
    }

    /// Create an employee in an organization and return their ID.
    pub async fn create_employee(&self, organization_id: Uuid, timezone: &str) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO employees (organization_id, display_name, timezone) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(organization_id)
        .bind("Test Employee")
        .bind(timezone)
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to create employee")
    }

    /// Create a six-hour regulation (30 min break owed past 6h of work,
    /// uninterrupted work capped at 6h) and assign it organization-wide.
    pub async fn assign_six_hour_regulation(&self, organization_id: Uuid) -> Uuid {
        let break_rules = serde_json::json!([{
            "working_minutes_threshold": 360,
            "required_break_minutes": 30,
            "options": [],
        }]);

        let regulation_id: Uuid = sqlx::query_scalar(
            "INSERT INTO regulations (name, max_uninterrupted_minutes, break_rules) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind("Six Hour Rule")
        .bind(360)
        .bind(&break_rules)
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to create regulation");

        sqlx::query(
            "INSERT INTO regulation_assignments (regulation_id, scope_kind, scope_id) \
             VALUES ($1, $2, $3)",
        )
        .bind(regulation_id)
        .bind(ScopeKind::Organization)
        .bind(organization_id)
        .execute(&self.db_pool)
        .await
        .expect("Failed to assign regulation");

        regulation_id
    }

    /// Record a full clock-in/clock-out session and return the closed period.
    pub async fn closed_period(
        &self,
        employee_id: Uuid,
        organization_id: Uuid,
        start_time: DateTime<Utc>,
        minutes: i64,
    ) -> WorkPeriod {
        let clock_in = self
            .ledger
            .append(&CreateLedgerEntry {
                employee_id,
                kind: ClockEventKind::ClockIn,
                timestamp: start_time,
                created_by: employee_id,
                note: None,
            })
            .await
            .expect("Failed to append clock-in");

        let period = self
            .periods
            .open(&OpenWorkPeriod {
                employee_id,
                organization_id,
                clock_in_entry_id: clock_in.id,
                start_time,
            })
            .await
            .expect("Failed to open work period");

        let end_time = start_time + Duration::minutes(minutes);
        let clock_out = self
            .ledger
            .append(&CreateLedgerEntry {
                employee_id,
                kind: ClockEventKind::ClockOut,
                timestamp: end_time,
                created_by: employee_id,
                note: None,
            })
            .await
            .expect("Failed to append clock-out");

        self.periods
            .close(period.id, clock_out.id, end_time)
            .await
            .expect("Failed to close work period")
    }

    /// Count an employee's work period rows.
    pub async fn period_count(&self, employee_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM work_periods WHERE employee_id = $1")
            .bind(employee_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count work periods")
    }
}
