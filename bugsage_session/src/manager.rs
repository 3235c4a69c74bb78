use async_trait::async_trait;
use bugsage_core::{Message, Session, SessionStore};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
    Set,
};
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

use crate::entity::sessions;

fn is_table_already_exists_error(err: &DbErr) -> bool {
    err.to_string().contains("table") && err.to_string().contains("already exists")
}

/// SQLite-backed session store.
///
/// Writes are full-row upserts: concurrent saves for the same session
/// id are last-writer-wins, matching the whole-document consistency
/// model the orchestrator is written against.
pub struct SessionManager {
    db: DatabaseConnection,
}

impl SessionManager {
    pub async fn new(db_path: &Path) -> anyhow::Result<Self> {
        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        info!("Connecting to database: {db_url}");
        Self::connect(&db_url).await
    }

    async fn connect(db_url: &str) -> anyhow::Result<Self> {
        let db = Database::connect(db_url).await?;

        let backend = db.get_database_backend();
        let schema = Schema::new(backend);
        let stmt = schema.create_table_from_entity(sessions::Entity);
        match db.execute_unprepared(&backend.build(&stmt).to_string()).await {
            Ok(_) => {}
            Err(e) if is_table_already_exists_error(&e) => {
                debug!("Table already exists, skipping creation");
            }
            Err(e) => return Err(e.into()),
        }

        info!("SessionManager initialized");
        Ok(Self { db })
    }
}

#[async_trait]
impl SessionStore for SessionManager {
    async fn create(&self, id: &Uuid) -> anyhow::Result<()> {
        let now = chrono::Utc::now().naive_utc();

        sessions::ActiveModel {
            id: Set(id.to_string()),
            messages: Set("[]".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        debug!("Created session: {id}");
        Ok(())
    }

    async fn get(&self, id: &Uuid) -> anyhow::Result<Option<Session>> {
        let Some(model) = sessions::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let messages: Vec<Message> = serde_json::from_str(&model.messages)?;

        Ok(Some(Session {
            id: *id,
            messages,
            created_at: model.created_at.and_utc(),
        }))
    }

    async fn save(&self, session: &Session) -> anyhow::Result<()> {
        let messages_json = serde_json::to_string(&session.messages)?;
        let now = chrono::Utc::now().naive_utc();
        let created_at = session.created_at.naive_utc();

        let exists = sessions::Entity::find_by_id(session.id.to_string())
            .one(&self.db)
            .await?
            .is_some();

        if exists {
            sessions::Entity::update(sessions::ActiveModel {
                id: Set(session.id.to_string()),
                messages: Set(messages_json),
                created_at: Set(created_at),
                updated_at: Set(now),
            })
            .exec(&self.db)
            .await?;
        } else {
            sessions::ActiveModel {
                id: Set(session.id.to_string()),
                messages: Set(messages_json),
                created_at: Set(created_at),
                updated_at: Set(now),
            }
            .insert(&self.db)
            .await?;
        }

        debug!("Saved session: {}", session.id);
        Ok(())
    }
}
