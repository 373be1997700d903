//! services/api/src/web/mod.rs
//!
//! Axum handlers grouped by resource, plus the master OpenAPI definition.

pub mod auth;
pub mod error;
pub mod media;
pub mod middleware;
pub mod public;
pub mod sections;
pub mod state;
pub mod users;
pub mod welcomebooks;

pub use middleware::require_auth;
pub use state::{AppState, CurrentUser};

use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::change_password_handler,
        users::list_users_handler,
        users::create_user_handler,
        users::update_user_handler,
        users::reset_password_handler,
        users::delete_user_handler,
        welcomebooks::list_welcomebooks_handler,
        welcomebooks::create_welcomebook_handler,
        welcomebooks::get_welcomebook_handler,
        welcomebooks::update_welcomebook_handler,
        welcomebooks::delete_welcomebook_handler,
        welcomebooks::transfer_welcomebook_handler,
        welcomebooks::activate_access_handler,
        welcomebooks::deactivate_access_handler,
        welcomebooks::access_status_handler,
        welcomebooks::visit_count_handler,
        sections::create_section_handler,
        sections::get_section_handler,
        sections::update_section_handler,
        sections::delete_section_handler,
        media::upload_media_handler,
        media::delete_media_handler,
        public::public_guide_handler,
    ),
    components(
        schemas(
            error::ErrorBody,
            error::FieldErrorBody,
            auth::SignupRequest,
            auth::LoginRequest,
            auth::ChangePasswordRequest,
            auth::AuthResponse,
            auth::MessageResponse,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            users::UserResponse,
            users::UserListItem,
            users::ProvisionedUserResponse,
            users::DeletedUserResponse,
            welcomebooks::CreateWelcomebookRequest,
            welcomebooks::UpdateWelcomebookRequest,
            welcomebooks::TransferRequest,
            welcomebooks::ActivateAccessRequest,
            welcomebooks::WelcomebookResponse,
            welcomebooks::WelcomebookOwner,
            welcomebooks::WelcomebookListItem,
            welcomebooks::WelcomebookDetailResponse,
            welcomebooks::AccessStatusResponse,
            welcomebooks::VisitCountResponse,
            sections::CreateSectionRequest,
            sections::UpdateSectionRequest,
            sections::SectionResponse,
            media::MediaResponse,
            public::PublicSectionResponse,
            public::PublicGuideResponse,
        )
    ),
    tags(
        (name = "Welcomebook API", description = "Multi-tenant property guides: hosts author welcomebooks, guests read them at a public address.")
    )
)]
pub struct ApiDoc;
