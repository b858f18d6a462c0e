use crate::api;
use crate::api::handlers::auth::AuthConfig;
use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            frontend_url,
        } => {
            let config = AuthConfig::new(frontend_url, globals.session_secret.clone());

            api::new(port, dsn, config).await?;
        }
    }

    Ok(())
}
