use crate::services::{ExamService, IdentityService};
use crate::utils::jwt::TokenService;
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub identity: IdentityService,
    pub exams: ExamService,
    pub tokens: TokenService,
}

impl FromRef<AppState> for IdentityService {
    fn from_ref(state: &AppState) -> Self {
        state.identity.clone()
    }
}

impl FromRef<AppState> for ExamService {
    fn from_ref(state: &AppState) -> Self {
        state.exams.clone()
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
