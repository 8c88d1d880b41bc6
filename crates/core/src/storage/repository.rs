//! Portfolio operations over a [`TableStore`].
//!
//! The repository is the only write path to the table; callers never touch
//! items or keys directly. Identity-addressed operations locate their target
//! by querying its partition and matching the id attribute, because sort
//! keys embed a creation date or ordinal the caller does not know. The
//! conditional write underneath remains the backstop against races.
//!
//! Two invariants are maintained here and nowhere else: a project's
//! `imageCount` changes only inside the add/delete transactions that also
//! change its image rows, and reorders and cascading deletes apply in
//! all-or-nothing chunks of at most [`MAX_TRANSACT_OPS`] operations.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::portfolio::{
    compute_analytics, slugify, validate_carousel_update, validate_image_update,
    validate_new_carousel_item, validate_new_image, validate_new_project, validate_project_update,
    validate_reorder_pairs, CarouselAnalytics, CarouselItem, CarouselStatus, CreateCarouselItem,
    CreateImage, CreateProject, Image, Project, PublishStatus, ReorderPair, UpdateCarouselItem,
    UpdateImage, UpdateProject, ValidationError,
};

use super::codec;
use super::error::{Result, StoreError};
use super::item;
use super::keys;
use super::store::{ScanOrder, SecondaryIndex, TableStore, WriteOp, MAX_TRANSACT_OPS};
use super::types::ProjectWithImages;

/// Moved pairs per reorder chunk: each move costs a delete plus a put.
const REORDER_PAIRS_PER_CHUNK: usize = MAX_TRANSACT_OPS / 2;

pub struct PortfolioRepository {
    store: Arc<dyn TableStore>,
}

impl PortfolioRepository {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    // ========================================================================
    // Projects
    // ========================================================================

    /// Published, visible projects, newest first.
    pub async fn list_published_projects(&self) -> Result<Vec<Project>> {
        let items = self
            .store
            .query_index(
                SecondaryIndex::One,
                &keys::project_gsi1_pk(PublishStatus::Published),
                ScanOrder::Descending,
            )
            .await?;
        let mut projects = Vec::with_capacity(items.len());
        for item in &items {
            let project = codec::item_to_project(item)?;
            if project.is_visible {
                projects.push(project);
            }
        }
        Ok(projects)
    }

    /// Every project regardless of status or visibility, newest first.
    pub async fn list_all_projects(&self) -> Result<Vec<Project>> {
        let items = self
            .store
            .query(
                keys::project_pk(),
                keys::project_sk_prefix(),
                ScanOrder::Descending,
            )
            .await?;
        items.iter().map(codec::item_to_project).collect()
    }

    /// One project together with its images, ordered by sort order.
    pub async fn get_project(&self, project_id: &str) -> Result<ProjectWithImages> {
        let project = self.locate_project(project_id).await?;
        let image_items = self
            .store
            .query(
                &keys::image_pk(project_id),
                keys::image_sk_prefix(),
                ScanOrder::Ascending,
            )
            .await?;
        let images = image_items
            .iter()
            .map(codec::item_to_image)
            .collect::<Result<Vec<_>>>()?;
        Ok(ProjectWithImages { project, images })
    }

    /// Published, visible projects in a category, newest first.
    pub async fn list_projects_by_category(&self, category: &str) -> Result<Vec<Project>> {
        let items = self
            .store
            .query_index(
                SecondaryIndex::Two,
                &keys::project_gsi2_pk(category),
                ScanOrder::Descending,
            )
            .await?;
        let mut projects = Vec::with_capacity(items.len());
        for item in &items {
            let project = codec::item_to_project(item)?;
            if project.status == PublishStatus::Published && project.is_visible {
                projects.push(project);
            }
        }
        Ok(projects)
    }

    /// Creates a project. The id comes from the request or is derived from
    /// the title; a taken id fails with `AlreadyExists`.
    pub async fn create_project(&self, request: CreateProject) -> Result<Project> {
        validate_new_project(&request)?;
        let project_id = match &request.project_id {
            Some(id) => id.clone(),
            None => slugify(&request.title),
        };
        if project_id.is_empty() {
            return Err(ValidationError::UnusableSlug.into());
        }
        if self.find_project(&project_id).await?.is_some() {
            return Err(StoreError::AlreadyExists {
                entity_type: "Project",
                id: project_id,
            });
        }

        let project = request.into_project(project_id, Utc::now());
        self.store.put_new(codec::project_to_item(&project)).await?;
        Ok(project)
    }

    /// Applies a partial update to a project. The stored item is re-encoded
    /// in full, so index keys follow any status or category change.
    pub async fn update_project(
        &self,
        project_id: &str,
        request: UpdateProject,
    ) -> Result<Project> {
        validate_project_update(&request)?;
        let mut project = self.locate_project(project_id).await?;
        request.apply_to(&mut project, Utc::now());
        self.store
            .put_existing(codec::project_to_item(&project))
            .await?;
        Ok(project)
    }

    /// Deletes a project and every image under it, in chunked transactions.
    /// The project record rides in the final chunk, so an interrupted
    /// cascade leaves the project findable and the delete retryable.
    pub async fn delete_project(&self, project_id: &str) -> Result<()> {
        let project = self.locate_project(project_id).await?;
        let image_items = self
            .store
            .query(
                &keys::image_pk(project_id),
                keys::image_sk_prefix(),
                ScanOrder::Ascending,
            )
            .await?;

        let mut ops = Vec::with_capacity(image_items.len() + 1);
        for image_item in &image_items {
            ops.push(WriteOp::Delete {
                pk: item::get_string(image_item, keys::ATTR_PK)?,
                sk: item::get_string(image_item, keys::ATTR_SK)?,
            });
        }
        ops.push(WriteOp::DeleteExisting {
            pk: keys::project_pk().to_string(),
            sk: keys::project_sk(project.created_at, &project.project_id),
            entity_type: "Project",
            id: project.project_id.clone(),
        });

        let chunks = ops
            .chunks(MAX_TRANSACT_OPS)
            .map(|chunk| (chunk.to_vec(), chunk.len()))
            .collect();
        self.apply_transact_chunks(chunks).await
    }

    // ========================================================================
    // Images
    // ========================================================================

    /// Visible images of a project, ordered by sort order.
    pub async fn list_images_for_project(&self, project_id: &str) -> Result<Vec<Image>> {
        let items = self
            .store
            .query(
                &keys::image_pk(project_id),
                keys::image_sk_prefix(),
                ScanOrder::Ascending,
            )
            .await?;
        let mut images = Vec::with_capacity(items.len());
        for item in &items {
            let image = codec::item_to_image(item)?;
            if image.is_visible {
                images.push(image);
            }
        }
        Ok(images)
    }

    /// Images in a status, newest first.
    pub async fn list_images_by_status(&self, status: PublishStatus) -> Result<Vec<Image>> {
        let items = self
            .store
            .query_index(
                SecondaryIndex::One,
                &keys::image_gsi1_pk(status),
                ScanOrder::Descending,
            )
            .await?;
        items.iter().map(codec::item_to_image).collect()
    }

    /// Featured images that are published and visible, newest first.
    pub async fn list_featured_images(&self) -> Result<Vec<Image>> {
        let items = self
            .store
            .query_index(
                SecondaryIndex::Two,
                &keys::image_gsi2_pk(true),
                ScanOrder::Descending,
            )
            .await?;
        let mut images = Vec::with_capacity(items.len());
        for item in &items {
            let image = codec::item_to_image(item)?;
            if image.status == PublishStatus::Published && image.is_visible {
                images.push(image);
            }
        }
        Ok(images)
    }

    /// Adds an image to a project, bumping the project's image count in the
    /// same transaction. Without an explicit sort order the image goes after
    /// the current last one; that read-then-write can collide under
    /// concurrent adds, see [`Self::allocate_image_sort_order`].
    pub async fn add_image(&self, project_id: &str, request: CreateImage) -> Result<Image> {
        validate_new_image(&request)?;
        let project = self.locate_project(project_id).await?;

        let image_id = request.image_id.unwrap_or_else(Uuid::new_v4);
        if self.find_image(project_id, image_id).await?.is_some() {
            return Err(StoreError::AlreadyExists {
                entity_type: "Image",
                id: image_id.to_string(),
            });
        }
        let sort_order = match request.sort_order {
            Some(value) => value,
            None => self.next_image_sort_order(project_id).await?,
        };
        check_ordinal(sort_order)?;

        let image = request.into_image(image_id, project_id, sort_order, Utc::now());
        self.store
            .transact(vec![
                WriteOp::PutNew {
                    item: codec::image_to_item(&image),
                },
                WriteOp::Add {
                    pk: keys::project_pk().to_string(),
                    sk: keys::project_sk(project.created_at, &project.project_id),
                    attribute: codec::ATTR_IMAGE_COUNT,
                    delta: 1,
                    entity_type: "Project",
                    id: project.project_id.clone(),
                },
            ])
            .await?;
        Ok(image)
    }

    /// Applies a partial update to an image. Status and featured-flag
    /// changes land in the index keys through the re-encode; moves go
    /// through [`Self::reorder_images`].
    pub async fn update_image(
        &self,
        project_id: &str,
        image_id: Uuid,
        request: UpdateImage,
    ) -> Result<Image> {
        validate_image_update(&request)?;
        let mut image = self.locate_image(project_id, image_id).await?;
        request.apply_to(&mut image, Utc::now());
        self.store
            .put_existing(codec::image_to_item(&image))
            .await?;
        Ok(image)
    }

    /// Deletes an image, decrementing the project's image count in the same
    /// transaction.
    pub async fn delete_image(&self, project_id: &str, image_id: Uuid) -> Result<()> {
        let image = self.locate_image(project_id, image_id).await?;
        let project = self.locate_project(project_id).await?;
        self.store
            .transact(vec![
                WriteOp::DeleteExisting {
                    pk: keys::image_pk(project_id),
                    sk: keys::image_sk(image.sort_order, image.image_id),
                    entity_type: "Image",
                    id: image.image_id.to_string(),
                },
                WriteOp::Add {
                    pk: keys::project_pk().to_string(),
                    sk: keys::project_sk(project.created_at, &project.project_id),
                    attribute: codec::ATTR_IMAGE_COUNT,
                    delta: -1,
                    entity_type: "Project",
                    id: project.project_id.clone(),
                },
            ])
            .await
    }

    /// Moves images to the requested sort orders in chunked all-or-nothing
    /// transactions. Pairs already in place are skipped; a pair naming an
    /// unknown image fails the whole call before anything is written.
    pub async fn reorder_images(&self, project_id: &str, pairs: &[ReorderPair]) -> Result<()> {
        validate_reorder_pairs(pairs)?;
        for pair in pairs {
            check_ordinal(pair.position)?;
        }

        let items = self
            .store
            .query(
                &keys::image_pk(project_id),
                keys::image_sk_prefix(),
                ScanOrder::Ascending,
            )
            .await?;
        let images = items
            .iter()
            .map(codec::item_to_image)
            .collect::<Result<Vec<_>>>()?;

        let now = Utc::now();
        let mut moves = Vec::new();
        for pair in pairs {
            let image = images
                .iter()
                .find(|image| image.image_id == pair.id)
                .ok_or_else(|| StoreError::NotFound {
                    entity_type: "Image",
                    id: pair.id.to_string(),
                })?;
            if image.sort_order == pair.position {
                continue;
            }
            let mut moved = image.clone();
            moved.sort_order = pair.position;
            moved.updated_at = now;
            moves.push((image.sort_order, moved));
        }

        let chunks = moves
            .chunks(REORDER_PAIRS_PER_CHUNK)
            .map(|group| {
                let mut ops = Vec::with_capacity(group.len() * 2);
                for (old_sort_order, moved) in group {
                    ops.push(WriteOp::Delete {
                        pk: keys::image_pk(project_id),
                        sk: keys::image_sk(*old_sort_order, moved.image_id),
                    });
                    ops.push(WriteOp::Put {
                        item: codec::image_to_item(moved),
                    });
                }
                (ops, group.len())
            })
            .collect();
        self.apply_transact_chunks(chunks).await
    }

    // ========================================================================
    // Carousel
    // ========================================================================

    /// Active, visible carousel items. The index sort key is the zero-padded
    /// position, so index order is already position order.
    pub async fn list_active_carousel_items(&self) -> Result<Vec<CarouselItem>> {
        let items = self
            .store
            .query_index(
                SecondaryIndex::One,
                &keys::carousel_gsi1_pk(CarouselStatus::Active),
                ScanOrder::Ascending,
            )
            .await?;
        let mut carousel_items = Vec::with_capacity(items.len());
        for item in &items {
            let carousel_item = codec::item_to_carousel_item(item)?;
            if carousel_item.is_visible {
                carousel_items.push(carousel_item);
            }
        }
        Ok(carousel_items)
    }

    /// Every carousel item regardless of status, in position order.
    pub async fn list_carousel_items(&self) -> Result<Vec<CarouselItem>> {
        let items = self
            .store
            .query(
                keys::carousel_pk(),
                keys::carousel_sk_prefix(),
                ScanOrder::Ascending,
            )
            .await?;
        items.iter().map(codec::item_to_carousel_item).collect()
    }

    /// One carousel item by id.
    pub async fn get_carousel_item(&self, item_id: Uuid) -> Result<CarouselItem> {
        self.locate_carousel_item(item_id).await
    }

    /// Creates a carousel item. Without an explicit position the item goes
    /// after the current last one, with the same caveat as image adds.
    pub async fn create_carousel_item(&self, request: CreateCarouselItem) -> Result<CarouselItem> {
        validate_new_carousel_item(&request)?;

        let item_id = request.item_id.unwrap_or_else(Uuid::new_v4);
        if self.find_carousel_item(item_id).await?.is_some() {
            return Err(StoreError::AlreadyExists {
                entity_type: "CarouselItem",
                id: item_id.to_string(),
            });
        }
        let position = match request.position {
            Some(value) => value,
            None => self.next_carousel_position().await?,
        };
        check_ordinal(position)?;

        let carousel_item = request.into_item(item_id, position, Utc::now());
        self.store
            .put_new(codec::carousel_item_to_item(&carousel_item))
            .await?;
        Ok(carousel_item)
    }

    /// Applies a partial update to a carousel item. A position change moves
    /// the item's sort key, which takes an atomic delete plus put.
    pub async fn update_carousel_item(
        &self,
        item_id: Uuid,
        request: UpdateCarouselItem,
    ) -> Result<CarouselItem> {
        validate_carousel_update(&request)?;
        if let Some(position) = request.position {
            check_ordinal(position)?;
        }

        let mut carousel_item = self.locate_carousel_item(item_id).await?;
        let old_position = carousel_item.position;
        let changes = request.apply_to(&mut carousel_item, Utc::now());
        let encoded = codec::carousel_item_to_item(&carousel_item);

        if changes.position {
            self.store
                .transact(vec![
                    WriteOp::DeleteExisting {
                        pk: keys::carousel_pk().to_string(),
                        sk: keys::carousel_sk(old_position, carousel_item.item_id),
                        entity_type: "CarouselItem",
                        id: carousel_item.item_id.to_string(),
                    },
                    WriteOp::PutNew { item: encoded },
                ])
                .await?;
        } else {
            self.store.put_existing(encoded).await?;
        }
        Ok(carousel_item)
    }

    /// Deletes a carousel item.
    pub async fn delete_carousel_item(&self, item_id: Uuid) -> Result<()> {
        let carousel_item = self.locate_carousel_item(item_id).await?;
        self.store
            .delete_existing(
                keys::carousel_pk(),
                &keys::carousel_sk(carousel_item.position, carousel_item.item_id),
                "CarouselItem",
                &carousel_item.item_id.to_string(),
            )
            .await
    }

    /// Moves carousel items to the requested positions in chunked
    /// all-or-nothing transactions, like [`Self::reorder_images`].
    pub async fn reorder_carousel_items(&self, pairs: &[ReorderPair]) -> Result<()> {
        validate_reorder_pairs(pairs)?;
        for pair in pairs {
            check_ordinal(pair.position)?;
        }

        let carousel_items = self.list_carousel_items().await?;
        let now = Utc::now();
        let mut moves = Vec::new();
        for pair in pairs {
            let carousel_item = carousel_items
                .iter()
                .find(|item| item.item_id == pair.id)
                .ok_or_else(|| StoreError::NotFound {
                    entity_type: "CarouselItem",
                    id: pair.id.to_string(),
                })?;
            if carousel_item.position == pair.position {
                continue;
            }
            let mut moved = carousel_item.clone();
            moved.position = pair.position;
            moved.updated_at = now;
            moves.push((carousel_item.position, moved));
        }

        let chunks = moves
            .chunks(REORDER_PAIRS_PER_CHUNK)
            .map(|group| {
                let mut ops = Vec::with_capacity(group.len() * 2);
                for (old_position, moved) in group {
                    ops.push(WriteOp::Delete {
                        pk: keys::carousel_pk().to_string(),
                        sk: keys::carousel_sk(*old_position, moved.item_id),
                    });
                    ops.push(WriteOp::Put {
                        item: codec::carousel_item_to_item(moved),
                    });
                }
                (ops, group.len())
            })
            .collect();
        self.apply_transact_chunks(chunks).await
    }

    /// Adds one view to an item, with the store's native atomic add.
    pub async fn increment_carousel_view(&self, item_id: Uuid) -> Result<()> {
        self.increment_carousel_counter(item_id, codec::ATTR_VIEW_COUNT)
            .await
    }

    /// Adds one click to an item, with the store's native atomic add.
    pub async fn increment_carousel_click(&self, item_id: Uuid) -> Result<()> {
        self.increment_carousel_counter(item_id, codec::ATTR_CLICK_COUNT)
            .await
    }

    /// View, click, and click-through figures for the whole carousel.
    pub async fn carousel_analytics(&self) -> Result<CarouselAnalytics> {
        let carousel_items = self.list_carousel_items().await?;
        Ok(compute_analytics(&carousel_items))
    }

    // ========================================================================
    // Ordering allocators
    // ========================================================================

    /// Collision-free next sort order for a project's images, from a
    /// dedicated sequence record. Unlike the max-plus-one path inside
    /// [`Self::add_image`], concurrent callers each get a distinct value;
    /// allocate first and pass the value as the explicit sort order.
    pub async fn allocate_image_sort_order(&self, project_id: &str) -> Result<u32> {
        let value = self
            .store
            .next_in_sequence(&keys::image_sequence_name(project_id))
            .await?;
        ordinal_from_sequence(value)
    }

    /// Collision-free next carousel position, from a dedicated sequence
    /// record.
    pub async fn allocate_carousel_position(&self) -> Result<u32> {
        let value = self
            .store
            .next_in_sequence(keys::carousel_sequence_name())
            .await?;
        ordinal_from_sequence(value)
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    async fn find_project(&self, project_id: &str) -> Result<Option<Project>> {
        let items = self
            .store
            .query(
                keys::project_pk(),
                keys::project_sk_prefix(),
                ScanOrder::Ascending,
            )
            .await?;
        for item in &items {
            if item::get_optional_string(item, codec::ATTR_PROJECT_ID).as_deref() == Some(project_id)
            {
                return codec::item_to_project(item).map(Some);
            }
        }
        Ok(None)
    }

    async fn locate_project(&self, project_id: &str) -> Result<Project> {
        self.find_project(project_id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                entity_type: "Project",
                id: project_id.to_string(),
            })
    }

    async fn find_image(&self, project_id: &str, image_id: Uuid) -> Result<Option<Image>> {
        let wanted = image_id.to_string();
        let items = self
            .store
            .query(
                &keys::image_pk(project_id),
                keys::image_sk_prefix(),
                ScanOrder::Ascending,
            )
            .await?;
        for item in &items {
            if item::get_optional_string(item, codec::ATTR_IMAGE_ID).as_deref()
                == Some(wanted.as_str())
            {
                return codec::item_to_image(item).map(Some);
            }
        }
        Ok(None)
    }

    async fn locate_image(&self, project_id: &str, image_id: Uuid) -> Result<Image> {
        self.find_image(project_id, image_id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                entity_type: "Image",
                id: image_id.to_string(),
            })
    }

    async fn find_carousel_item(&self, item_id: Uuid) -> Result<Option<CarouselItem>> {
        let wanted = item_id.to_string();
        let items = self
            .store
            .query(
                keys::carousel_pk(),
                keys::carousel_sk_prefix(),
                ScanOrder::Ascending,
            )
            .await?;
        for item in &items {
            if item::get_optional_string(item, codec::ATTR_ITEM_ID).as_deref()
                == Some(wanted.as_str())
            {
                return codec::item_to_carousel_item(item).map(Some);
            }
        }
        Ok(None)
    }

    async fn locate_carousel_item(&self, item_id: Uuid) -> Result<CarouselItem> {
        self.find_carousel_item(item_id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                entity_type: "CarouselItem",
                id: item_id.to_string(),
            })
    }

    async fn increment_carousel_counter(
        &self,
        item_id: Uuid,
        attribute: &'static str,
    ) -> Result<()> {
        let carousel_item = self.locate_carousel_item(item_id).await?;
        self.store
            .add(
                keys::carousel_pk(),
                &keys::carousel_sk(carousel_item.position, carousel_item.item_id),
                attribute,
                1,
                "CarouselItem",
                &carousel_item.item_id.to_string(),
            )
            .await
    }

    async fn next_image_sort_order(&self, project_id: &str) -> Result<u32> {
        let items = self
            .store
            .query(
                &keys::image_pk(project_id),
                keys::image_sk_prefix(),
                ScanOrder::Ascending,
            )
            .await?;
        let max = items
            .iter()
            .map(|item| item::get_u32_or(item, "sortOrder", 0))
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }

    async fn next_carousel_position(&self) -> Result<u32> {
        let items = self
            .store
            .query(
                keys::carousel_pk(),
                keys::carousel_sk_prefix(),
                ScanOrder::Ascending,
            )
            .await?;
        let max = items
            .iter()
            .map(|item| item::get_u32_or(item, "position", 0))
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }

    /// Applies transactional chunks in order. A failure in the first chunk
    /// propagates unchanged because nothing was written; a failure after
    /// that reports how far the batch got.
    async fn apply_transact_chunks(&self, chunks: Vec<(Vec<WriteOp>, usize)>) -> Result<()> {
        let mut completed = 0usize;
        for (index, (ops, units)) in chunks.into_iter().enumerate() {
            match self.store.transact(ops).await {
                Ok(()) => completed += units,
                Err(error) if index == 0 => return Err(error),
                Err(_) => {
                    return Err(StoreError::PartiallyApplied {
                        completed,
                        failed_chunk: index,
                    })
                }
            }
        }
        Ok(())
    }
}

fn check_ordinal(value: u32) -> Result<()> {
    if value > keys::MAX_ORDINAL {
        return Err(ValidationError::OrdinalOutOfRange {
            value,
            max: keys::MAX_ORDINAL,
        }
        .into());
    }
    Ok(())
}

fn ordinal_from_sequence(value: u64) -> Result<u32> {
    let ordinal = u32::try_from(value).unwrap_or(u32::MAX);
    check_ordinal(ordinal)?;
    Ok(ordinal)
}
