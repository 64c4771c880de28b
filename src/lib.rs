use actix_web::web;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod graceful_shutdown;
pub mod background_task;
pub mod telemetry;

pub use domain::{entities, password, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, cache, db, limiter, storage, utils};

use auth::{jwt::JwtService, notifier::ResetNotifier};
use cache::redis::RedisStore;
use entities::{
    education::Education,
    experience::WorkExperience,
    hobby::Hobby,
    journey::Journey,
    language::Language,
    profile::{PersonalInfo, Profile},
    project::Project,
    schema::OwnedEntity,
    skill::Skill,
};
use limiter::rate_limiter::SlidingWindowLimiter;
use repositories::sqlx_repo::{SqlxContactRepo, SqlxContentRepo, SqlxUserRepo};
use settings::AppConfig;
use storage::local_disk::LocalDiskStorage;
use use_cases::{
    auth::AuthHandler,
    contact::ContactHandler,
    content::{ContentHandler, ContentSettings},
    pages::PagesHandler,
    storage::StorageHandler,
};

pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService, ResetNotifier, Option<RedisStore>>;
pub type AppContactHandler = ContactHandler<SqlxContactRepo>;
pub type AppPagesHandler = PagesHandler<SqlxUserRepo, SqlxContentRepo>;
pub type AppStorageHandler = StorageHandler<LocalDiskStorage>;
pub type AppContentHandler<E> = ContentHandler<E, SqlxContentRepo, LocalDiskStorage>;

/// One dashboard handler per owned entity, shared with the admin routes.
pub struct ContentHandlers {
    pub profile: web::Data<AppContentHandler<Profile>>,
    pub personal_info: web::Data<AppContentHandler<PersonalInfo>>,
    pub journey: web::Data<AppContentHandler<Journey>>,
    pub projects: web::Data<AppContentHandler<Project>>,
    pub skills: web::Data<AppContentHandler<Skill>>,
    pub experience: web::Data<AppContentHandler<WorkExperience>>,
    pub education: web::Data<AppContentHandler<Education>>,
    pub languages: web::Data<AppContentHandler<Language>>,
    pub hobbies: web::Data<AppContentHandler<Hobby>>,
}

fn content_handler<E: OwnedEntity>(
    repo: &SqlxContentRepo,
    storage: &LocalDiskStorage,
    settings: ContentSettings,
) -> web::Data<AppContentHandler<E>> {
    web::Data::new(ContentHandler::new(repo.clone(), storage.clone(), settings))
}

impl ContentHandlers {
    fn new(repo: &SqlxContentRepo, storage: &LocalDiskStorage, settings: ContentSettings) -> Self {
        ContentHandlers {
            profile: content_handler(repo, storage, settings),
            personal_info: content_handler(repo, storage, settings),
            journey: content_handler(repo, storage, settings),
            projects: content_handler(repo, storage, settings),
            skills: content_handler(repo, storage, settings),
            experience: content_handler(repo, storage, settings),
            education: content_handler(repo, storage, settings),
            languages: content_handler(repo, storage, settings),
            hobbies: content_handler(repo, storage, settings),
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub auth_handler: AppAuthHandler,
    pub contact_handler: AppContactHandler,
    pub pages_handler: AppPagesHandler,
    pub storage_handler: AppStorageHandler,
    pub content: ContentHandlers,
    pub storage: LocalDiskStorage,
    pub redis: Option<RedisStore>,
    pub contact_limiter: SlidingWindowLimiter,
}

impl AppState {
    pub fn new(config: &AppConfig, pool: sqlx::PgPool) -> Self {
        let redis = config.redis_url.as_ref().and_then(|url| {
            RedisStore::from_url(url)
                .map_err(|e| tracing::error!("Redis pool creation failed: {}", e))
                .ok()
        });
        if redis.is_none() {
            tracing::warn!("Redis not configured; token revocation and email rate limits are disabled");
        }

        let storage = LocalDiskStorage::new(&config.storage_root, &config.public_base_url);
        let user_repo = SqlxUserRepo::new(pool.clone());
        let content_repo = SqlxContentRepo::new(pool.clone());

        let auth_handler = AuthHandler::new(
            user_repo.clone(),
            JwtService::new(config),
            ResetNotifier::from_config(config),
            redis.clone(),
            config.reset_password_url(),
        );
        let pages_handler = PagesHandler::new(
            user_repo,
            content_repo.clone(),
            config.name.clone(),
            config.placeholder_image_url(),
            config.max_list_rows,
        );

        AppState {
            config: config.clone(),
            auth_handler,
            contact_handler: ContactHandler::new(SqlxContactRepo::new(pool), config.max_list_rows),
            pages_handler,
            storage_handler: StorageHandler::new(storage.clone(), config.max_upload_bytes),
            content: ContentHandlers::new(&content_repo, &storage, ContentSettings::from(config)),
            storage,
            redis,
            contact_limiter: SlidingWindowLimiter::per_hour(config.contact_rate_per_hour),
        }
    }
}
