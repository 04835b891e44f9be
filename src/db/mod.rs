use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::property::{PropertyFields, PropertyWithImages};
pub use repositories::user::{InsertUser, NewUser, User};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn property_repo(&self) -> repositories::property::PropertyRepository {
        repositories::property::PropertyRepository::new(self.conn.clone())
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_username_with_digest(
        &self,
        username: &str,
    ) -> Result<Option<(User, Option<String>)>> {
        self.user_repo().get_by_username_with_digest(username).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<InsertUser> {
        self.user_repo().create(new_user).await
    }

    pub async fn upsert_user_by_email(
        &self,
        email: &str,
        name: &str,
        picture: Option<&str>,
    ) -> Result<User> {
        self.user_repo().upsert_by_email(email, name, picture).await
    }

    pub async fn create_property(
        &self,
        owner_id: i32,
        fields: PropertyFields,
        image_urls: &[String],
    ) -> Result<Option<PropertyWithImages>> {
        self.property_repo()
            .create(owner_id, fields, image_urls)
            .await
    }

    pub async fn get_property(&self, id: i32) -> Result<Option<PropertyWithImages>> {
        self.property_repo().get(id).await
    }

    pub async fn list_properties(&self) -> Result<Vec<PropertyWithImages>> {
        self.property_repo().list().await
    }

    pub async fn list_properties_by_owner(&self, owner_id: i32) -> Result<Vec<PropertyWithImages>> {
        self.property_repo().list_by_owner(owner_id).await
    }

    pub async fn update_property(
        &self,
        id: i32,
        fields: PropertyFields,
        image_urls: &[String],
    ) -> Result<Option<PropertyWithImages>> {
        self.property_repo().update(id, fields, image_urls).await
    }

    pub async fn remove_property(&self, id: i32) -> Result<bool> {
        self.property_repo().remove(id).await
    }
}
