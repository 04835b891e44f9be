use crate::entities::{images, prelude::*, properties};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, LoaderTrait, QueryFilter, Set, SqlErr,
    TransactionTrait,
};
use tracing::info;

/// Scalar listing fields shared by create and update.
#[derive(Debug, Clone)]
pub struct PropertyFields {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// A listing row together with its image rows.
pub type PropertyWithImages = (properties::Model, Vec<images::Model>);

pub struct PropertyRepository {
    conn: DatabaseConnection,
}

impl PropertyRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a listing and its image rows in one transaction.
    /// Returns `None` when the owning user does not exist (the foreign key
    /// is the authoritative check behind the handler's fast-path lookup).
    pub async fn create(
        &self,
        owner_id: i32,
        fields: PropertyFields,
        image_urls: &[String],
    ) -> Result<Option<PropertyWithImages>> {
        let txn = self.conn.begin().await?;
        let now = chrono::Utc::now().to_rfc3339();

        let insert = Properties::insert(properties::ActiveModel {
            title: Set(fields.title),
            description: Set(fields.description),
            price: Set(fields.price),
            latitude: Set(fields.latitude),
            longitude: Set(fields.longitude),
            user_id: Set(owner_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&txn)
        .await;

        let inserted = match insert {
            Ok(res) => res,
            Err(err) => {
                if matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) {
                    return Ok(None);
                }
                return Err(err.into());
            }
        };

        let property_id = inserted.last_insert_id;

        if !image_urls.is_empty() {
            let image_models: Vec<images::ActiveModel> = image_urls
                .iter()
                .map(|url| images::ActiveModel {
                    url: Set(url.clone()),
                    property_id: Set(property_id),
                    ..Default::default()
                })
                .collect();

            Images::insert_many(image_models).exec(&txn).await?;
        }

        let property = Properties::find_by_id(property_id)
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created property"))?;

        let image_rows = Images::find()
            .filter(images::Column::PropertyId.eq(property_id))
            .all(&txn)
            .await?;

        txn.commit().await?;
        Ok(Some((property, image_rows)))
    }

    pub async fn get(&self, id: i32) -> Result<Option<PropertyWithImages>> {
        let Some(property) = Properties::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let image_rows = Images::find()
            .filter(images::Column::PropertyId.eq(id))
            .all(&self.conn)
            .await?;

        Ok(Some((property, image_rows)))
    }

    pub async fn list(&self) -> Result<Vec<PropertyWithImages>> {
        let listings = Properties::find().all(&self.conn).await?;
        let image_rows = listings.load_many(Images, &self.conn).await?;

        Ok(listings.into_iter().zip(image_rows.into_iter()).collect())
    }

    pub async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<PropertyWithImages>> {
        let listings = Properties::find()
            .filter(properties::Column::UserId.eq(owner_id))
            .all(&self.conn)
            .await?;
        let image_rows = listings.load_many(Images, &self.conn).await?;

        Ok(listings.into_iter().zip(image_rows.into_iter()).collect())
    }

    /// Replace scalar fields and the whole image set in one transaction.
    /// Returns `None` when the listing no longer exists; nothing is applied
    /// in that case.
    pub async fn update(
        &self,
        id: i32,
        fields: PropertyFields,
        image_urls: &[String],
    ) -> Result<Option<PropertyWithImages>> {
        let txn = self.conn.begin().await?;
        let now = chrono::Utc::now().to_rfc3339();

        Images::delete_many()
            .filter(images::Column::PropertyId.eq(id))
            .exec(&txn)
            .await?;

        if !image_urls.is_empty() {
            let image_models: Vec<images::ActiveModel> = image_urls
                .iter()
                .map(|url| images::ActiveModel {
                    url: Set(url.clone()),
                    property_id: Set(id),
                    ..Default::default()
                })
                .collect();

            if let Err(err) = Images::insert_many(image_models).exec(&txn).await {
                // The listing is gone; its foreign key rejects new image rows.
                if matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) {
                    return Ok(None);
                }
                return Err(err.into());
            }
        }

        let update = Properties::update(properties::ActiveModel {
            id: Set(id),
            title: Set(fields.title),
            description: Set(fields.description),
            price: Set(fields.price),
            latitude: Set(fields.latitude),
            longitude: Set(fields.longitude),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&txn)
        .await;

        let property = match update {
            Ok(model) => model,
            // Dropping the transaction rolls the image replacement back.
            Err(DbErr::RecordNotUpdated) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let image_rows = Images::find()
            .filter(images::Column::PropertyId.eq(id))
            .all(&txn)
            .await?;

        txn.commit().await?;
        Ok(Some((property, image_rows)))
    }

    /// Delete the image rows and then the listing, as one unit.
    pub async fn remove(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        Images::delete_many()
            .filter(images::Column::PropertyId.eq(id))
            .exec(&txn)
            .await?;

        let result = Properties::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed property with ID: {}", id);
        }
        Ok(removed)
    }
}
