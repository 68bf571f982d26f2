use async_trait::async_trait;
use base64::Engine;
use reqwest::Method;
use safari_core::admin::{CampaignDraft, Comment, CommentStatus, EmailCampaign, GalleryImageView, User};
use safari_core::{Booking, BookingStatus, ListQuery, Page, Pagination};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::error;
use url::Url;
use uuid::Uuid;

use crate::gateway::GatewayError;

pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

pub const COMMENTS: &str = "/api/admin/comments";
pub const USERS: &str = "/api/admin/users";
pub const BOOKINGS: &str = "/api/admin/bookings";
pub const GALLERY: &str = "/api/admin/gallery";
pub const CAMPAIGNS: &str = "/api/admin/campaigns";

// ============================================================================
// Transport
// ============================================================================

/// A single HTTP call produced by a row action, bulk action or create form.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ActionRequest {
    fn new(method: Method, path: String, body: Option<Value>) -> Self {
        Self { method, path, body }
    }
}

#[async_trait]
pub trait AdminTransport: Send + Sync {
    async fn fetch_page(&self, path: &str, query: &ListQuery) -> Result<Value, GatewayError>;

    async fn send(&self, request: &ActionRequest) -> Result<Value, GatewayError>;
}

#[derive(Debug, Clone)]
pub struct HttpAdminTransport {
    client: reqwest::Client,
    base: Url,
}

impl HttpAdminTransport {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let base = Url::parse(base_url).map_err(|e| GatewayError::InvalidEndpoint(e.to_string()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    fn url(&self, path: &str) -> Result<Url, GatewayError> {
        self.base
            .join(path)
            .map_err(|e| GatewayError::InvalidEndpoint(e.to_string()))
    }

    async fn read(response: reqwest::Response) -> Result<Value, GatewayError> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };

        if !(200..300).contains(&status) {
            let message = body.get("error").and_then(Value::as_str).map(str::to_string);
            return Err(GatewayError::Rejected { status, message });
        }
        Ok(body)
    }
}

#[async_trait]
impl AdminTransport for HttpAdminTransport {
    async fn fetch_page(&self, path: &str, query: &ListQuery) -> Result<Value, GatewayError> {
        let response = self.client.get(self.url(path)?).query(query).send().await?;
        Self::read(response).await
    }

    async fn send(&self, request: &ActionRequest) -> Result<Value, GatewayError> {
        let mut builder = self.client.request(request.method.clone(), self.url(&request.path)?);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        Self::read(builder.send().await?).await
    }
}

// ============================================================================
// Rows and actions
// ============================================================================

pub trait Row: DeserializeOwned + Send + Sync {
    fn row_id(&self) -> Uuid;
}

impl Row for Comment {
    fn row_id(&self) -> Uuid {
        self.id
    }
}

impl Row for User {
    fn row_id(&self) -> Uuid {
        self.id
    }
}

impl Row for Booking {
    fn row_id(&self) -> Uuid {
        self.id
    }
}

impl Row for GalleryImageView {
    fn row_id(&self) -> Uuid {
        self.id
    }
}

impl Row for EmailCampaign {
    fn row_id(&self) -> Uuid {
        self.id
    }
}

pub trait RowAction: Send + Sync {
    fn request(&self, resource: &str, id: Uuid) -> ActionRequest;

    fn success_message(&self, _response: &Value) -> String;
}

fn row_path(resource: &str, id: Uuid) -> String {
    format!("{}/{}", resource, id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    Approve,
    Reject,
    Delete,
}

impl RowAction for CommentAction {
    fn request(&self, resource: &str, id: Uuid) -> ActionRequest {
        let path = row_path(resource, id);
        match self {
            CommentAction::Approve => {
                ActionRequest::new(Method::PATCH, path, Some(json!({"status": CommentStatus::Approved})))
            }
            CommentAction::Reject => {
                ActionRequest::new(Method::PATCH, path, Some(json!({"status": CommentStatus::Rejected})))
            }
            CommentAction::Delete => ActionRequest::new(Method::DELETE, path, None),
        }
    }

    fn success_message(&self, _response: &Value) -> String {
        match self {
            CommentAction::Approve => "Comment approved",
            CommentAction::Reject => "Comment rejected",
            CommentAction::Delete => "Comment deleted",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Lock,
    Unlock,
    ResetPassword,
    Delete,
}

impl RowAction for UserAction {
    fn request(&self, resource: &str, id: Uuid) -> ActionRequest {
        let path = row_path(resource, id);
        match self {
            UserAction::Lock => ActionRequest::new(Method::PATCH, path, Some(json!({"locked": true}))),
            UserAction::Unlock => ActionRequest::new(Method::PATCH, path, Some(json!({"locked": false}))),
            UserAction::ResetPassword => {
                ActionRequest::new(Method::POST, format!("{}/reset-password", path), None)
            }
            UserAction::Delete => ActionRequest::new(Method::DELETE, path, None),
        }
    }

    fn success_message(&self, response: &Value) -> String {
        match self {
            UserAction::Lock => "User locked".to_string(),
            UserAction::Unlock => "User unlocked".to_string(),
            UserAction::ResetPassword => match response.get("temporaryPassword").and_then(Value::as_str) {
                Some(password) => format!("Password reset. Temporary password: {}", password),
                None => "Password reset".to_string(),
            },
            UserAction::Delete => "User deleted".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    SetStatus(BookingStatus),
    Delete,
}

impl RowAction for BookingAction {
    fn request(&self, resource: &str, id: Uuid) -> ActionRequest {
        let path = row_path(resource, id);
        match self {
            BookingAction::SetStatus(status) => {
                ActionRequest::new(Method::PATCH, path, Some(json!({"status": status})))
            }
            BookingAction::Delete => ActionRequest::new(Method::DELETE, path, None),
        }
    }

    fn success_message(&self, _response: &Value) -> String {
        match self {
            BookingAction::SetStatus(status) => format!("Booking marked {}", status),
            BookingAction::Delete => "Booking deleted".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryAction {
    Delete,
}

impl RowAction for GalleryAction {
    fn request(&self, resource: &str, id: Uuid) -> ActionRequest {
        ActionRequest::new(Method::DELETE, row_path(resource, id), None)
    }

    fn success_message(&self, _response: &Value) -> String {
        "Image deleted".to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CampaignAction {
    Update(CampaignDraft),
    Delete,
}

impl RowAction for CampaignAction {
    fn request(&self, resource: &str, id: Uuid) -> ActionRequest {
        let path = row_path(resource, id);
        match self {
            CampaignAction::Update(draft) => ActionRequest::new(Method::PUT, path, serde_json::to_value(draft).ok()),
            CampaignAction::Delete => ActionRequest::new(Method::DELETE, path, None),
        }
    }

    fn success_message(&self, _response: &Value) -> String {
        match self {
            CampaignAction::Update(_) => "Campaign updated",
            CampaignAction::Delete => "Campaign deleted",
        }
        .to_string()
    }
}

// ============================================================================
// Screen state
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    fn success(message: impl Into<String>) -> Self {
        Self { kind: ToastKind::Success, message: message.into() }
    }

    fn error() -> Self {
        Self { kind: ToastKind::Error, message: GENERIC_ERROR.to_string() }
    }
}

/// List screen over one admin resource.
///
/// Holds the last page exactly as the server returned it, a busy set keyed
/// by row id and the current toast. Every mutation re-fetches the list.
///
/// Actions take `&mut self`, so the busy set only holds ids for the length
/// of a call and reads empty between calls.
pub struct AdminScreen<T: Row, A: RowAction> {
    transport: Arc<dyn AdminTransport>,
    resource: &'static str,
    query: ListQuery,
    page: Option<Page<T>>,
    loading: bool,
    busy_rows: HashSet<Uuid>,
    bulk_busy: bool,
    toast: Option<Toast>,
    _action: PhantomData<fn(A)>,
}

pub type CommentsScreen = AdminScreen<Comment, CommentAction>;
pub type UsersScreen = AdminScreen<User, UserAction>;
pub type BookingsScreen = AdminScreen<Booking, BookingAction>;
pub type GalleryScreen = AdminScreen<GalleryImageView, GalleryAction>;
pub type CampaignsScreen = AdminScreen<EmailCampaign, CampaignAction>;

impl<T: Row, A: RowAction> AdminScreen<T, A> {
    pub fn new(transport: Arc<dyn AdminTransport>, resource: &'static str) -> Self {
        Self {
            transport,
            resource,
            query: ListQuery::default(),
            page: None,
            loading: false,
            busy_rows: HashSet::new(),
            bulk_busy: false,
            toast: None,
            _action: PhantomData,
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn items(&self) -> &[T] {
        self.page.as_ref().map(|p| p.items.as_slice()).unwrap_or_default()
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.page.as_ref().map(|p| p.pagination)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_row_busy(&self, id: Uuid) -> bool {
        self.busy_rows.contains(&id)
    }

    pub fn is_bulk_busy(&self) -> bool {
        self.bulk_busy
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    /// Replaces filters/sort; a change of anything but the page jumps back to page 1.
    pub async fn apply_query(&mut self, mut query: ListQuery) {
        let filters_changed = ListQuery { page: None, ..query.clone() } != ListQuery { page: None, ..self.query.clone() };
        if filters_changed {
            query.page = Some(1);
        }
        self.query = query;
        self.refresh().await;
    }

    pub async fn go_to_page(&mut self, page: u32) {
        self.query.page = Some(page.max(1));
        self.refresh().await;
    }

    pub async fn refresh(&mut self) {
        self.loading = true;
        let result = self.transport.fetch_page(self.resource, &self.query).await;
        self.loading = false;

        match result.and_then(|body| {
            serde_json::from_value::<Page<T>>(body).map_err(|e| GatewayError::Decode(e.to_string()))
        }) {
            Ok(page) => self.page = Some(page),
            Err(e) => {
                error!("Failed to load {}: {}", self.resource, e);
                self.toast = Some(Toast::error());
            }
        }
    }

    /// Runs a row action; the row is marked busy until the response arrives.
    pub async fn perform(&mut self, id: Uuid, action: A) {
        if !self.busy_rows.insert(id) {
            return;
        }
        let request = action.request(self.resource, id);
        let result = self.transport.send(&request).await;
        self.busy_rows.remove(&id);

        self.toast = Some(match result {
            Ok(body) => Toast::success(action.success_message(&body)),
            Err(e) => {
                error!("{} {} failed: {}", request.method, request.path, e);
                Toast::error()
            }
        });
        self.refresh().await;
    }

    async fn perform_bulk(&mut self, request: ActionRequest, success: String) {
        if self.bulk_busy {
            return;
        }
        self.bulk_busy = true;
        let result = self.transport.send(&request).await;
        self.bulk_busy = false;

        self.toast = Some(match result {
            Ok(_) => Toast::success(success),
            Err(e) => {
                error!("{} {} failed: {}", request.method, request.path, e);
                Toast::error()
            }
        });
        self.refresh().await;
    }
}

impl BookingsScreen {
    pub fn bookings(transport: Arc<dyn AdminTransport>) -> Self {
        Self::new(transport, BOOKINGS)
    }

    pub async fn bulk_update(&mut self, ids: Vec<Uuid>, status: BookingStatus) {
        let count = ids.len();
        let request = ActionRequest::new(
            Method::PUT,
            format!("{}/bulk", self.resource),
            Some(json!({"ids": ids, "status": status})),
        );
        self.perform_bulk(request, format!("{} bookings marked {}", count, status)).await;
    }
}

impl CommentsScreen {
    pub fn comments(transport: Arc<dyn AdminTransport>) -> Self {
        Self::new(transport, COMMENTS)
    }
}

impl UsersScreen {
    pub fn users(transport: Arc<dyn AdminTransport>) -> Self {
        Self::new(transport, USERS)
    }
}

impl GalleryScreen {
    pub fn gallery(transport: Arc<dyn AdminTransport>) -> Self {
        Self::new(transport, GALLERY)
    }

    pub async fn upload(&mut self, title: &str, content_type: &str, bytes: &[u8]) {
        let request = ActionRequest::new(
            Method::POST,
            self.resource.to_string(),
            Some(json!({
                "title": title,
                "contentType": content_type,
                "data": base64::engine::general_purpose::STANDARD.encode(bytes),
            })),
        );
        self.perform_bulk(request, "Image uploaded".to_string()).await;
    }
}

impl CampaignsScreen {
    pub fn campaigns(transport: Arc<dyn AdminTransport>) -> Self {
        Self::new(transport, CAMPAIGNS)
    }

    pub async fn create(&mut self, draft: &CampaignDraft) {
        let request = ActionRequest::new(Method::POST, self.resource.to_string(), serde_json::to_value(draft).ok());
        self.perform_bulk(request, "Campaign created".to_string()).await;
    }
}
