use crate::config::Config;
use crate::supabase::DataAccess;
use axum::extract::FromRef;

/// Read-only state built once at startup and shared by every screen.
#[derive(Clone)]
pub struct AppState {
    pub data: DataAccess,
    pub config: Config,
}

impl FromRef<AppState> for DataAccess {
    fn from_ref(state: &AppState) -> Self {
        state.data.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
