use async_trait::async_trait;
use chrono::Utc;
use safari_core::admin::{
    CampaignDraft, CampaignStatus, Comment, CommentStatus, EmailCampaign, GalleryImage,
    NewGalleryImage, User,
};
use safari_core::repository::{
    BookingRepository, CampaignRepository, CommentRepository, GalleryRepository, TourRepository,
    UserRepository,
};
use safari_core::{
    Booking, BookingStatus, ListQuery, Page, RepositoryError, RepositoryResult, SortOrder, Tour,
};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::booking_repo::stale_status;
use crate::seed;

/// Development/test backend holding every table in process memory.
#[derive(Default)]
pub struct MemoryStore {
    tours: RwLock<Vec<Tour>>,
    bookings: RwLock<Vec<Booking>>,
    comments: RwLock<Vec<Comment>>,
    users: RwLock<Vec<User>>,
    credentials: RwLock<HashMap<Uuid, String>>,
    gallery: RwLock<Vec<GalleryImage>>,
    campaigns: RwLock<Vec<EmailCampaign>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the demo catalogue and a few admin rows.
    pub fn seeded() -> Self {
        Self {
            tours: RwLock::new(seed::tours()),
            comments: RwLock::new(seed::comments()),
            users: RwLock::new(seed::users()),
            campaigns: RwLock::new(seed::campaigns()),
            ..Default::default()
        }
    }

    pub fn with_tours(tours: Vec<Tour>) -> Self {
        Self {
            tours: RwLock::new(tours),
            ..Default::default()
        }
    }

    pub async fn insert_comment(&self, comment: Comment) {
        self.comments.write().await.push(comment);
    }

    pub async fn insert_user(&self, user: User) {
        self.users.write().await.push(user);
    }

    /// Temporary password last issued for a user, if any.
    pub async fn issued_password(&self, id: Uuid) -> Option<String> {
        self.credentials.read().await.get(&id).cloned()
    }
}

// ============================================================================
// Filtering and sorting
// ============================================================================

trait Listable: Clone {
    fn haystack(&self) -> Vec<&str>;

    fn status(&self) -> Option<&str> {
        None
    }

    fn role(&self) -> Option<&str> {
        None
    }

    fn id(&self) -> Uuid;

    /// Orders by `field`; unknown fields fall back to `created_at`.
    fn compare(&self, other: &Self, field: &str) -> Ordering;
}

fn list<T: Listable>(all: &[T], query: &ListQuery, sortable: &[&str]) -> Page<T> {
    let term = query.search_term();
    let status = query.status_filter();
    let role = query.role_filter();

    let mut matching: Vec<T> = all
        .iter()
        .filter(|row| match &term {
            Some(term) => row.haystack().iter().any(|h| h.to_lowercase().contains(term)),
            None => true,
        })
        .filter(|row| match status {
            Some(wanted) => row.status().is_some_and(|s| s.eq_ignore_ascii_case(wanted)),
            None => true,
        })
        .filter(|row| match role {
            Some(wanted) => row.role().is_some_and(|r| r.eq_ignore_ascii_case(wanted)),
            None => true,
        })
        .cloned()
        .collect();

    let field = query.sort_field(sortable, "created_at");
    let order = query.sort_order();
    matching.sort_by(|a, b| {
        let primary = match order {
            SortOrder::Asc => a.compare(b, field),
            SortOrder::Desc => b.compare(a, field),
        };
        primary.then_with(|| a.id().cmp(&b.id()))
    });

    Page::from_sorted(matching, query)
}

impl Listable for Booking {
    fn haystack(&self) -> Vec<&str> {
        vec![
            self.booking_reference.as_str(),
            self.customer_info.name.as_str(),
            self.customer_info.email.as_str(),
        ]
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn compare(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "total" => self.total.cmp(&other.total),
            "booking_reference" => self.booking_reference.cmp(&other.booking_reference),
            "customer_name" => self.customer_info.name.cmp(&other.customer_info.name),
            "status" => self.status.as_str().cmp(other.status.as_str()),
            _ => self.created_at.cmp(&other.created_at),
        }
    }
}

impl Listable for Comment {
    fn haystack(&self) -> Vec<&str> {
        vec![self.author_name.as_str(), self.author_email.as_str(), self.body.as_str()]
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn compare(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "author_name" => self.author_name.cmp(&other.author_name),
            "status" => self.status.as_str().cmp(other.status.as_str()),
            _ => self.created_at.cmp(&other.created_at),
        }
    }
}

impl Listable for User {
    fn haystack(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }

    fn role(&self) -> Option<&str> {
        Some(self.role.as_str())
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn compare(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "name" => self.name.cmp(&other.name),
            "email" => self.email.cmp(&other.email),
            "role" => self.role.as_str().cmp(other.role.as_str()),
            "last_login_at" => self.last_login_at.cmp(&other.last_login_at),
            _ => self.created_at.cmp(&other.created_at),
        }
    }
}

impl Listable for GalleryImage {
    fn haystack(&self) -> Vec<&str> {
        vec![self.title.as_str()]
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn compare(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "title" => self.title.cmp(&other.title),
            _ => self.created_at.cmp(&other.created_at),
        }
    }
}

impl Listable for EmailCampaign {
    fn haystack(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.subject.as_str()]
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn compare(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "updated_at" => self.updated_at.cmp(&other.updated_at),
            "name" => self.name.cmp(&other.name),
            "scheduled_at" => self.scheduled_at.cmp(&other.scheduled_at),
            "status" => self.status.as_str().cmp(other.status.as_str()),
            _ => self.created_at.cmp(&other.created_at),
        }
    }
}

fn remove_by_id<T: Listable>(rows: &mut Vec<T>, id: Uuid, entity: &'static str) -> RepositoryResult<()> {
    let before = rows.len();
    rows.retain(|row| row.id() != id);
    if rows.len() == before {
        return Err(RepositoryError::not_found(entity, id));
    }
    Ok(())
}

// ============================================================================
// Repository impls
// ============================================================================

#[async_trait]
impl TourRepository for MemoryStore {
    async fn list_tours(&self) -> RepositoryResult<Vec<Tour>> {
        Ok(self.tours.read().await.iter().filter(|t| t.is_active).cloned().collect())
    }

    async fn get_tour(&self, slug: &str) -> RepositoryResult<Option<Tour>> {
        Ok(self
            .tours
            .read()
            .await
            .iter()
            .find(|t| t.is_active && t.slug == slug)
            .cloned())
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create_booking(&self, booking: &Booking) -> RepositoryResult<Booking> {
        let mut bookings = self.bookings.write().await;
        if bookings.iter().any(|b| b.booking_reference == booking.booking_reference) {
            return Err(RepositoryError::Conflict(format!(
                "Booking reference {} already exists",
                booking.booking_reference
            )));
        }
        bookings.push(booking.clone());
        Ok(booking.clone())
    }

    async fn get_booking(&self, id: Uuid) -> RepositoryResult<Option<Booking>> {
        Ok(self.bookings.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bookings(&self, query: &ListQuery) -> RepositoryResult<Page<Booking>> {
        Ok(list(
            &self.bookings.read().await,
            query,
            &["created_at", "total", "booking_reference", "customer_name", "status"],
        ))
    }

    async fn update_status(&self, id: Uuid, expected: BookingStatus, next: BookingStatus) -> RepositoryResult<Booking> {
        let mut updated = self.update_statuses(&[(id, expected)], next).await?;
        updated.pop().ok_or_else(|| RepositoryError::not_found("Booking", id))
    }

    async fn update_statuses(
        &self,
        changes: &[(Uuid, BookingStatus)],
        next: BookingStatus,
    ) -> RepositoryResult<Vec<Booking>> {
        let mut bookings = self.bookings.write().await;
        let mut positions = Vec::with_capacity(changes.len());
        for (id, expected) in changes {
            match bookings.iter().position(|b| b.id == *id) {
                Some(index) if bookings[index].status == *expected => positions.push(index),
                _ => return Err(stale_status(*id, *expected)),
            }
        }

        let now = Utc::now();
        Ok(positions
            .into_iter()
            .map(|index| {
                let booking = &mut bookings[index];
                booking.status = next;
                booking.updated_at = now;
                booking.clone()
            })
            .collect())
    }

    async fn delete_booking(&self, id: Uuid) -> RepositoryResult<()> {
        remove_by_id(&mut *self.bookings.write().await, id, "Booking")
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn list_comments(&self, query: &ListQuery) -> RepositoryResult<Page<Comment>> {
        Ok(list(&self.comments.read().await, query, &["created_at", "author_name", "status"]))
    }

    async fn set_comment_status(&self, id: Uuid, status: CommentStatus) -> RepositoryResult<Comment> {
        let mut comments = self.comments.write().await;
        let comment = comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| RepositoryError::not_found("Comment", id))?;
        comment.status = status;
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: Uuid) -> RepositoryResult<()> {
        remove_by_id(&mut *self.comments.write().await, id, "Comment")
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn list_users(&self, query: &ListQuery) -> RepositoryResult<Page<User>> {
        Ok(list(
            &self.users.read().await,
            query,
            &["created_at", "name", "email", "role", "last_login_at"],
        ))
    }

    async fn set_user_locked(&self, id: Uuid, locked: bool) -> RepositoryResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| RepositoryError::not_found("User", id))?;
        user.is_locked = locked;
        Ok(user.clone())
    }

    async fn reset_password(&self, id: Uuid, temporary_password: &str) -> RepositoryResult<User> {
        let user = {
            let mut users = self.users.write().await;
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| RepositoryError::not_found("User", id))?;
            user.password_reset_required = true;
            user.clone()
        };
        self.credentials
            .write()
            .await
            .insert(id, temporary_password.to_string());
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> RepositoryResult<()> {
        remove_by_id(&mut *self.users.write().await, id, "User")?;
        self.credentials.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl GalleryRepository for MemoryStore {
    async fn list_images(&self, query: &ListQuery) -> RepositoryResult<Page<GalleryImage>> {
        Ok(list(&self.gallery.read().await, query, &["created_at", "title"]))
    }

    async fn save_image(&self, image: NewGalleryImage) -> RepositoryResult<GalleryImage> {
        let stored = GalleryImage {
            id: Uuid::new_v4(),
            title: image.title,
            content_type: image.content_type,
            data: image.data,
            created_at: Utc::now(),
        };
        self.gallery.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn delete_image(&self, id: Uuid) -> RepositoryResult<()> {
        remove_by_id(&mut *self.gallery.write().await, id, "Gallery image")
    }
}

#[async_trait]
impl CampaignRepository for MemoryStore {
    async fn list_campaigns(&self, query: &ListQuery) -> RepositoryResult<Page<EmailCampaign>> {
        Ok(list(
            &self.campaigns.read().await,
            query,
            &["created_at", "updated_at", "name", "scheduled_at", "status"],
        ))
    }

    async fn create_campaign(&self, draft: &CampaignDraft) -> RepositoryResult<EmailCampaign> {
        let now = Utc::now();
        let campaign = EmailCampaign {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
            subject: draft.subject.clone(),
            body: draft.body.clone(),
            status: draft.status(),
            scheduled_at: draft.scheduled_at,
            created_at: now,
            updated_at: now,
        };
        self.campaigns.write().await.push(campaign.clone());
        Ok(campaign)
    }

    async fn update_campaign(&self, id: Uuid, draft: &CampaignDraft) -> RepositoryResult<EmailCampaign> {
        let mut campaigns = self.campaigns.write().await;
        let campaign = campaigns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| RepositoryError::not_found("Campaign", id))?;
        if campaign.status == CampaignStatus::Sent {
            return Err(RepositoryError::Conflict("Sent campaigns cannot be edited".to_string()));
        }
        campaign.name = draft.name.clone();
        campaign.subject = draft.subject.clone();
        campaign.body = draft.body.clone();
        campaign.status = draft.status();
        campaign.scheduled_at = draft.scheduled_at;
        campaign.updated_at = Utc::now();
        Ok(campaign.clone())
    }

    async fn delete_campaign(&self, id: Uuid) -> RepositoryResult<()> {
        remove_by_id(&mut *self.campaigns.write().await, id, "Campaign")
    }
}
