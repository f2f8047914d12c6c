//! Seeding utility: default locales, login users and synthetic translations.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use domain::models::locale::{default_locale_name, DEFAULT_LOCALE_CODES};
use domain::models::{DeviceType, Locale, TranslationDto};
use domain::services::NullTranslationCache;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use persistence::repositories::{LocaleRepository, PgTranslationRepository, UserRepository};
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::PgPool;
use tracing::info;

use translation_api::{config::Config, middleware::logging::init_logging};

const SEED_GROUPS: [&str; 4] = ["general", "auth", "validation", "messages"];

#[derive(Parser)]
#[command(name = "translation-seed")]
#[command(about = "Populate the translation database", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default locales if they are missing
    Locales,

    /// Create a user that can log in
    User {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long, default_value = "Admin")]
        name: String,
    },

    /// Bulk-insert synthetic translations for load testing
    Generate {
        #[arg(long, default_value_t = 100_000)]
        count: usize,

        #[arg(long, default_value_t = 1_000)]
        chunk_size: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load()?;
    init_logging(&config.logging)?;

    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;
    persistence::db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Locales => {
            let locales = seed_locales(&pool).await?;
            info!(count = locales.len(), "Default locales ready");
        }
        Commands::User {
            email,
            password,
            name,
        } => seed_user(&pool, &name, &email, &password).await?,
        Commands::Generate { count, chunk_size } => {
            generate_translations(&pool, count, chunk_size).await?
        }
    }

    Ok(())
}

async fn seed_locales(pool: &PgPool) -> Result<Vec<Locale>> {
    let repo = LocaleRepository::new(pool.clone());
    let mut locales = Vec::with_capacity(DEFAULT_LOCALE_CODES.len());
    for code in DEFAULT_LOCALE_CODES {
        let locale = repo
            .first_or_create(code, &default_locale_name(code))
            .await
            .with_context(|| format!("failed to create locale '{}'", code))?;
        locales.push(locale.into());
    }
    Ok(locales)
}

async fn seed_user(pool: &PgPool, name: &str, email: &str, password: &str) -> Result<()> {
    if password.is_empty() {
        bail!("password must not be empty");
    }

    let repo = UserRepository::new(pool.clone());
    if repo.find_by_email(email).await?.is_some() {
        info!(email, "User already exists");
        return Ok(());
    }

    let hash = shared::password::hash_password(password)?;
    let user = repo.create(name, email, &hash).await?;
    info!(user_id = user.id, email = %user.email, "User created");
    Ok(())
}

fn random_segment<R: Rng>(rng: &mut R) -> String {
    (0..8).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

/// `<8 alnum>.<8 alnum>`
fn random_key<R: Rng>(rng: &mut R) -> String {
    let prefix = random_segment(rng);
    format!("{}.{}", prefix, random_segment(rng))
}

fn random_translation<R: Rng>(rng: &mut R, locales: &[Locale]) -> Option<TranslationDto> {
    let locale = locales.choose(rng)?;
    let device_type = *DeviceType::ALL.choose(rng)?;
    let group = SEED_GROUPS.choose(rng)?;
    let value: String = Sentence(3..10).fake_with_rng(rng);

    Some(TranslationDto::new(locale.id, random_key(rng), value, device_type).with_group(*group))
}

async fn generate_translations(pool: &PgPool, count: usize, chunk_size: usize) -> Result<()> {
    if chunk_size == 0 {
        bail!("chunk size must be positive");
    }

    let locales = seed_locales(pool).await?;
    // Another process may hold cached reads; seeded rows show up once they expire.
    let repo = PgTranslationRepository::new(
        pool.clone(),
        Arc::new(NullTranslationCache),
        domain::services::LOCALE_CACHE_TTL,
    );

    let mut rng = rand::thread_rng();
    let mut remaining = count;
    let mut inserted = 0u64;

    while remaining > 0 {
        let size = remaining.min(chunk_size);
        let rows: Vec<TranslationDto> = (0..size)
            .filter_map(|_| random_translation(&mut rng, &locales))
            .collect();

        inserted += repo.insert_batch(&rows).await?;
        remaining -= size;
        info!(
            inserted,
            remaining,
            chunk = rows.len(),
            "Inserted translation chunk"
        );
    }

    info!(inserted, requested = count, "Translation generation finished");
    Ok(())
}
