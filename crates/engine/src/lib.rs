use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

pub use entries::{BoxType, Entry, EntryDraft};
pub use error::EngineError;

mod entries;
mod error;

type ResultEngine<T> = Result<T, EngineError>;

/// The persistence collaborator: a tabular store of box entries.
///
/// The engine assigns identifiers and creation timestamps; everything else in
/// a row is persisted as submitted.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Returns every stored entry, newest first.
    pub async fn list_entries(&self) -> ResultEngine<Vec<Entry>> {
        let models = entries::Entity::find()
            .order_by_desc(entries::Column::CreatedAt)
            .all(&self.database)
            .await?;

        models.into_iter().map(Entry::try_from).collect()
    }

    /// Inserts one entry, assigning its id and creation timestamp.
    ///
    /// Returns the row as stored, which is what callers cache.
    pub async fn insert_entry(&self, draft: EntryDraft) -> ResultEngine<Entry> {
        draft.validate()?;

        let entry = Entry::from_draft(&draft, Utc::now());
        let model = entries::ActiveModel::from(&entry)
            .insert(&self.database)
            .await?;
        Entry::try_from(model)
    }

    /// Inserts a batch of entries inside a single database transaction.
    ///
    /// Either every draft is stored or none is. The returned entries keep the
    /// order of the submitted drafts.
    pub async fn insert_entries(&self, drafts: Vec<EntryDraft>) -> ResultEngine<Vec<Entry>> {
        for draft in &drafts {
            draft.validate()?;
        }

        let db_tx = self.database.begin().await?;

        let created_at = Utc::now();
        let mut inserted = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            let entry = Entry::from_draft(draft, created_at);
            let model = entries::ActiveModel::from(&entry).insert(&db_tx).await?;
            inserted.push(Entry::try_from(model)?);
        }

        db_tx.commit().await?;
        Ok(inserted)
    }

    /// Replaces the mutable fields of an existing entry.
    ///
    /// The identifier and creation timestamp survive the update.
    pub async fn update_entry(&self, id: Uuid, draft: EntryDraft) -> ResultEngine<Entry> {
        draft.validate()?;

        let model = entries::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("entry not exists".to_string()))?;
        let current = Entry::try_from(model)?;

        let mut entry = Entry::from_draft(&draft, current.created_at);
        entry.id = current.id;
        let model = entries::ActiveModel::from(&entry)
            .update(&self.database)
            .await?;
        Entry::try_from(model)
    }

    /// Deletes an entry by id.
    pub async fn delete_entry(&self, id: Uuid) -> ResultEngine<()> {
        let result = entries::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("entry not exists".to_string()));
        }
        Ok(())
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
