//! Shared wiring for every subcommand: one pool, one catalog, one set
//! of repositories constructed from them.

use std::sync::Arc;

use names_config::AppConfig;
use names_core::ports::Catalog;
use names_storage::{
    create_pool, run_migrations, JsonCatalog, PlanRepository, ProgressRepository,
    QuizRepository, ReminderRepository, SettingsRepository, UserRepository,
};
use sqlx::PgPool;

pub struct Context {
    pub pool: PgPool,
    pub catalog: Arc<dyn Catalog>,
    pub user_repo: UserRepository,
    pub settings_repo: SettingsRepository,
    pub progress_repo: ProgressRepository,
    pub plan_repo: PlanRepository,
    pub quiz_repo: QuizRepository,
    pub reminder_repo: ReminderRepository,
}

impl Context {
    pub async fn connect() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let pool = create_pool(&config.database_url, config.max_db_connections).await?;
        run_migrations(&pool).await?;
        let catalog = Arc::new(JsonCatalog::load_from_path(&config.catalog_path).await?);

        Ok(Self {
            user_repo: UserRepository::new(pool.clone()),
            settings_repo: SettingsRepository::new(pool.clone()),
            progress_repo: ProgressRepository::new(pool.clone()),
            plan_repo: PlanRepository::new(pool.clone()),
            quiz_repo: QuizRepository::new(pool.clone()),
            reminder_repo: ReminderRepository::new(pool.clone()),
            pool,
            catalog,
        })
    }
}
