//! HTTP handlers connecting Axum routes to application handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::conversation::{
    CreateConversationCommand, CreateConversationError, CreateConversationHandler,
    DeleteConversationCommand, DeleteConversationError, DeleteConversationHandler,
    GetConversationError, GetConversationHandler, GetConversationQuery, ListConversationsError,
    ListConversationsHandler, ListConversationsQuery, SendMessageCommand, SendMessageError,
    SendMessageHandler, DEFAULT_LIMIT,
};
use crate::domain::foundation::{ConversationId, UserId};
use crate::ports::{CompletionService, ConversationStore, RetrievalGateway};

use super::dto::{
    ConversationView, CreateConversationRequest, DeleteResponse, ErrorResponse, MessageView,
    PaginationParams, SendMessageRequest, SummaryView,
};

/// Owner applied when the caller does not identify itself.
const DEFAULT_OWNER: &str = "default_user";

/// Header carrying the caller identity.
const USER_HEADER: &str = "x-user-id";

/// Shared application state for the chat API.
pub struct ChatAppState<S, C, R>
where
    S: ConversationStore,
    C: CompletionService,
    R: RetrievalGateway,
{
    pub create: Arc<CreateConversationHandler<S>>,
    pub get: Arc<GetConversationHandler<S>>,
    pub list: Arc<ListConversationsHandler<S>>,
    pub delete: Arc<DeleteConversationHandler<S>>,
    pub send: Arc<SendMessageHandler<S, C, R>>,
}

impl<S, C, R> Clone for ChatAppState<S, C, R>
where
    S: ConversationStore,
    C: CompletionService,
    R: RetrievalGateway,
{
    fn clone(&self) -> Self {
        Self {
            create: Arc::clone(&self.create),
            get: Arc::clone(&self.get),
            list: Arc::clone(&self.list),
            delete: Arc::clone(&self.delete),
            send: Arc::clone(&self.send),
        }
    }
}

/// API error carrying a status code and a serializable body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, body: ErrorResponse) -> Self {
        Self { status, body }
    }

    /// Status code of this error (for tests).
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<SendMessageError> for ApiError {
    fn from(err: SendMessageError) -> Self {
        match err {
            SendMessageError::NotFound(id) => Self::new(
                StatusCode::NOT_FOUND,
                ErrorResponse::not_found("Conversation", &id.to_string()),
            ),
            SendMessageError::EmptyContent => Self::new(
                StatusCode::BAD_REQUEST,
                ErrorResponse::bad_request(err.to_string()),
            ),
            SendMessageError::Completion(e) => {
                Self::new(StatusCode::BAD_GATEWAY, ErrorResponse::upstream(e.to_string()))
            }
            SendMessageError::Retrieval(e) => {
                Self::new(StatusCode::BAD_GATEWAY, ErrorResponse::upstream(e.to_string()))
            }
            SendMessageError::Store(e) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::internal(e.to_string()),
            ),
        }
    }
}

impl From<CreateConversationError> for ApiError {
    fn from(err: CreateConversationError) -> Self {
        let CreateConversationError::Store(e) = err;
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::internal(e.to_string()),
        )
    }
}

impl From<GetConversationError> for ApiError {
    fn from(err: GetConversationError) -> Self {
        let GetConversationError::Store(e) = err;
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::internal(e.to_string()),
        )
    }
}

impl From<ListConversationsError> for ApiError {
    fn from(err: ListConversationsError) -> Self {
        let ListConversationsError::Store(e) = err;
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::internal(e.to_string()),
        )
    }
}

impl From<DeleteConversationError> for ApiError {
    fn from(err: DeleteConversationError) -> Self {
        let DeleteConversationError::Store(e) = err;
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::internal(e.to_string()),
        )
    }
}

/// Resolves the caller identity from headers, defaulting when absent.
fn owner_from_headers(headers: &HeaderMap) -> Result<UserId, ApiError> {
    let raw = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_OWNER);

    UserId::new(raw).map_err(|e| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            ErrorResponse::bad_request(e.to_string()),
        )
    })
}

/// Parses a conversation id path segment.
fn parse_conversation_id(raw: &str) -> Result<ConversationId, ApiError> {
    raw.parse().map_err(|_| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            ErrorResponse::bad_request(format!("Invalid conversation id: {}", raw)),
        )
    })
}

/// POST /api/conversations - create a conversation.
pub async fn create_conversation<S, C, R>(
    State(state): State<ChatAppState<S, C, R>>,
    headers: HeaderMap,
    Json(body): Json<CreateConversationRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: ConversationStore + 'static,
    C: CompletionService + 'static,
    R: RetrievalGateway + 'static,
{
    let owner = owner_from_headers(&headers)?;
    let conversation = state
        .create
        .handle(CreateConversationCommand::new(owner, body.title))
        .await?;

    Ok((StatusCode::CREATED, Json(ConversationView::from(&conversation))))
}

/// GET /api/conversations - list conversation summaries.
pub async fn list_conversations<S, C, R>(
    State(state): State<ChatAppState<S, C, R>>,
    headers: HeaderMap,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError>
where
    S: ConversationStore + 'static,
    C: CompletionService + 'static,
    R: RetrievalGateway + 'static,
{
    let owner = owner_from_headers(&headers)?;
    let query = ListConversationsQuery::new(
        owner,
        pagination.limit.unwrap_or(DEFAULT_LIMIT),
        pagination.offset.unwrap_or(0),
    );
    let summaries = state.list.handle(query).await?;
    let views: Vec<SummaryView> = summaries.iter().map(SummaryView::from).collect();

    Ok((StatusCode::OK, Json(views)))
}

/// GET /api/conversations/:id - fetch one conversation.
pub async fn get_conversation<S, C, R>(
    State(state): State<ChatAppState<S, C, R>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    S: ConversationStore + 'static,
    C: CompletionService + 'static,
    R: RetrievalGateway + 'static,
{
    let owner = owner_from_headers(&headers)?;
    let conversation_id = parse_conversation_id(&id)?;

    let conversation = state
        .get
        .handle(GetConversationQuery::new(conversation_id, owner))
        .await?
        .ok_or_else(|| {
            ApiError::new(
                StatusCode::NOT_FOUND,
                ErrorResponse::not_found("Conversation", &id),
            )
        })?;

    Ok((StatusCode::OK, Json(ConversationView::from(&conversation))))
}

/// DELETE /api/conversations/:id - delete a conversation.
pub async fn delete_conversation<S, C, R>(
    State(state): State<ChatAppState<S, C, R>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    S: ConversationStore + 'static,
    C: CompletionService + 'static,
    R: RetrievalGateway + 'static,
{
    let owner = owner_from_headers(&headers)?;
    let conversation_id = parse_conversation_id(&id)?;

    let deleted = state
        .delete
        .handle(DeleteConversationCommand::new(conversation_id, owner))
        .await?;

    Ok((StatusCode::OK, Json(DeleteResponse { deleted })))
}

/// POST /api/conversations/:id/messages - send a message, get the assistant reply.
pub async fn send_message<S, C, R>(
    State(state): State<ChatAppState<S, C, R>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: ConversationStore + 'static,
    C: CompletionService + 'static,
    R: RetrievalGateway + 'static,
{
    let owner = owner_from_headers(&headers)?;
    let conversation_id = parse_conversation_id(&id)?;

    let result = state
        .send
        .handle(SendMessageCommand::new(conversation_id, owner, body.content))
        .await?;

    Ok((StatusCode::OK, Json(MessageView::from(&result.message))))
}

/// GET /health - liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
