//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/hasher traits, but AppState pins them
//! to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use clinitune_core::chat::triage::TriageService;
use clinitune_core::llm::box_provider::BoxLlmProvider;
use clinitune_core::service::appointment::AppointmentService;
use clinitune_core::service::auth::AuthService;
use clinitune_core::service::dashboard::DashboardService;
use clinitune_core::service::notification::NotificationService;
use clinitune_core::service::patient::PatientService;
use clinitune_core::service::task::TaskService;
use clinitune_infra::config::{database_url, gemini_api_key, load_config, resolve_data_dir};
use clinitune_infra::crypto::password::Argon2PasswordHasher;
use clinitune_infra::crypto::token::Sha256TokenHasher;
use clinitune_infra::llm::create_provider;
use clinitune_infra::sqlite::appointment::SqliteAppointmentRepository;
use clinitune_infra::sqlite::auth_session::SqliteAuthSessionRepository;
use clinitune_infra::sqlite::chat::SqliteChatRepository;
use clinitune_infra::sqlite::notification::SqliteNotificationRepository;
use clinitune_infra::sqlite::pool::DatabasePool;
use clinitune_infra::sqlite::task::SqliteTaskRepository;
use clinitune_infra::sqlite::user::SqliteUserRepository;
use clinitune_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAuthService = AuthService<
    SqliteUserRepository,
    SqliteAuthSessionRepository,
    Argon2PasswordHasher,
    Sha256TokenHasher,
>;

pub type ConcreteTriageService = TriageService<SqliteChatRepository, SqliteNotificationRepository>;

pub type ConcreteNotificationService = NotificationService<SqliteNotificationRepository>;

pub type ConcreteAppointmentService = AppointmentService<
    SqliteAppointmentRepository,
    SqliteUserRepository,
    SqliteNotificationRepository,
>;

pub type ConcreteTaskService =
    TaskService<SqliteTaskRepository, SqliteUserRepository, SqliteNotificationRepository>;

pub type ConcretePatientService = PatientService<
    SqliteUserRepository,
    SqliteAppointmentRepository,
    SqliteTaskRepository,
    SqliteChatRepository,
>;

pub type ConcreteDashboardService = DashboardService<
    SqliteUserRepository,
    SqliteAppointmentRepository,
    SqliteTaskRepository,
    SqliteChatRepository,
>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<ConcreteAuthService>,
    pub triage_service: Arc<ConcreteTriageService>,
    pub notification_service: Arc<ConcreteNotificationService>,
    pub appointment_service: Arc<ConcreteAppointmentService>,
    pub task_service: Arc<ConcreteTaskService>,
    pub patient_service: Arc<ConcretePatientService>,
    pub dashboard_service: Arc<ConcreteDashboardService>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let llm = create_provider(&config.llm, gemini_api_key())?;

        Ok(Self::from_pool(db_pool, &config, llm, data_dir))
    }

    /// Wire every service against an already-open pool.
    pub fn from_pool(
        db_pool: DatabasePool,
        config: &AppConfig,
        llm: Option<BoxLlmProvider>,
        data_dir: PathBuf,
    ) -> Self {
        let users = || SqliteUserRepository::new(db_pool.clone());
        let notifications = || SqliteNotificationRepository::new(db_pool.clone());
        let appointments = || SqliteAppointmentRepository::new(db_pool.clone());
        let tasks = || SqliteTaskRepository::new(db_pool.clone());
        let chats = || SqliteChatRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            users(),
            SqliteAuthSessionRepository::new(db_pool.clone()),
            Argon2PasswordHasher::new(),
            Sha256TokenHasher::new(),
            config.auth.session_ttl_hours,
        );

        let triage_service = TriageService::new(
            chats(),
            notifications(),
            llm,
            config.llm.generation_params(),
            config.triage.clone(),
        );

        let notification_service = NotificationService::new(notifications());
        let appointment_service = AppointmentService::new(appointments(), users(), notifications());
        let task_service = TaskService::new(tasks(), users(), notifications());
        let patient_service = PatientService::new(users(), appointments(), tasks(), chats());
        let dashboard_service = DashboardService::new(users(), appointments(), tasks(), chats());

        Self {
            auth_service: Arc::new(auth_service),
            triage_service: Arc::new(triage_service),
            notification_service: Arc::new(notification_service),
            appointment_service: Arc::new(appointment_service),
            task_service: Arc::new(task_service),
            patient_service: Arc::new(patient_service),
            dashboard_service: Arc::new(dashboard_service),
            data_dir,
            db_pool,
        }
    }
}
