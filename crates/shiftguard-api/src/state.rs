//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use shiftguard_core::config::AppConfig;
use shiftguard_database::repositories::directory::DirectoryRepository;
use shiftguard_database::repositories::ledger::LedgerRepository;
use shiftguard_database::repositories::period::WorkPeriodRepository;
use shiftguard_database::repositories::regulation::RegulationRepository;
use shiftguard_database::repositories::violation::ViolationRepository;

use shiftguard_compliance::checker::ComplianceChecker;
use shiftguard_compliance::enforcement::BreakEnforcementAction;
use shiftguard_compliance::resolver::RegulationResolver;
use shiftguard_compliance::safety_net::SafetyNetProcessor;
use shiftguard_compliance::timeclock::TimeClockService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Repositories ─────────────────────────────────────────
    /// Clock-event ledger repository
    pub ledger_repo: Arc<LedgerRepository>,
    /// Work period repository
    pub period_repo: Arc<WorkPeriodRepository>,
    /// Violation log repository
    pub violation_repo: Arc<ViolationRepository>,

    // ── Engine services ──────────────────────────────────────
    /// Clock-event capture
    pub timeclock: Arc<TimeClockService>,
    /// Regulation resolution
    pub resolver: Arc<RegulationResolver>,
    /// Session compliance checking
    pub checker: Arc<ComplianceChecker>,
    /// Break enforcement action
    pub enforcement: Arc<BreakEnforcementAction>,
    /// Safety-net batch processor
    pub safety_net: Arc<SafetyNetProcessor>,
}

impl AppState {
    /// Wire all repositories and engine services over one pool.
    pub fn new(config: Arc<AppConfig>, db_pool: PgPool) -> Self {
        let ledger_repo = Arc::new(LedgerRepository::new(db_pool.clone()));
        let period_repo = Arc::new(WorkPeriodRepository::new(db_pool.clone()));
        let regulation_repo = Arc::new(RegulationRepository::new(db_pool.clone()));
        let violation_repo = Arc::new(ViolationRepository::new(db_pool.clone()));
        let directory_repo = Arc::new(DirectoryRepository::new(db_pool.clone()));

        let resolver = Arc::new(RegulationResolver::new(
            Arc::clone(&directory_repo),
            Arc::clone(&regulation_repo),
        ));
        let checker = Arc::new(ComplianceChecker::new(
            Arc::clone(&resolver),
            Arc::clone(&directory_repo),
            Arc::clone(&violation_repo),
        ));
        let enforcement = Arc::new(BreakEnforcementAction::new(
            db_pool.clone(),
            Arc::clone(&period_repo),
            Arc::clone(&directory_repo),
            Arc::clone(&resolver),
        ));
        let safety_net = Arc::new(SafetyNetProcessor::new(
            db_pool.clone(),
            Arc::clone(&period_repo),
            Arc::clone(&enforcement),
            config.enforcement.default_timezone.clone(),
        ));
        let timeclock = Arc::new(TimeClockService::new(
            Arc::clone(&ledger_repo),
            Arc::clone(&period_repo),
            Arc::clone(&directory_repo),
            Arc::clone(&enforcement),
            config.enforcement.enabled,
        ));

        Self {
            config,
            db_pool,
            ledger_repo,
            period_repo,
            violation_repo,
            timeclock,
            resolver,
            checker,
            enforcement,
            safety_net,
        }
    }
}
