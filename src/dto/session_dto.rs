use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::auth::{Role, Session};

// Sesión actual con sus capacidades como `acción:sujeto`
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub user_id: Uuid,
    pub roles: Vec<Role>,
    pub abilities: Vec<String>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            user_id: session.user_id,
            roles: session.roles.clone(),
            abilities: session.abilities().iter().map(ToString::to_string).collect(),
        }
    }
}
