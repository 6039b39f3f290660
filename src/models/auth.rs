//! Modelos de autorización
//!
//! Capacidades unificadas Acción × Sujeto. Este módulo es la única fuente
//! de verdad para los roles y lo que cada uno puede hacer.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

/// Rol del usuario tal como lo entrega el proveedor de identidad
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Subject {
    Requests,
    TaskAssignment,
    MyTasks,
    Vehicles,
    Locations,
    Users,
}

/// Par (acción, sujeto)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Ability(pub Action, pub Subject);

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.0 {
            Action::Read => "read",
            Action::Write => "write",
        };
        let subject = match self.1 {
            Subject::Requests => "requests",
            Subject::TaskAssignment => "task-assignment",
            Subject::MyTasks => "my-tasks",
            Subject::Vehicles => "vehicles",
            Subject::Locations => "locations",
            Subject::Users => "users",
        };
        write!(f, "{}:{}", action, subject)
    }
}

const ADMIN_ABILITIES: &[Ability] = &[
    Ability(Action::Read, Subject::Requests),
    Ability(Action::Write, Subject::Requests),
    Ability(Action::Read, Subject::TaskAssignment),
    Ability(Action::Write, Subject::TaskAssignment),
    Ability(Action::Read, Subject::MyTasks),
    Ability(Action::Read, Subject::Vehicles),
    Ability(Action::Write, Subject::Vehicles),
    Ability(Action::Read, Subject::Locations),
    Ability(Action::Write, Subject::Locations),
    Ability(Action::Read, Subject::Users),
    Ability(Action::Write, Subject::Users),
];

const USER_ABILITIES: &[Ability] = &[
    Ability(Action::Read, Subject::MyTasks),
    Ability(Action::Read, Subject::Vehicles),
    Ability(Action::Read, Subject::Locations),
];

/// Rol → capacidades
pub fn role_abilities(role: Role) -> &'static [Ability] {
    match role {
        Role::Admin => ADMIN_ABILITIES,
        Role::User => USER_ABILITIES,
    }
}

/// Unión de las capacidades de varios roles, sin duplicados y en orden estable
pub fn abilities_from_roles(roles: &[Role]) -> Vec<Ability> {
    let mut result: Vec<Ability> = Vec::new();
    for role in roles {
        for ability in role_abilities(*role) {
            if !result.contains(ability) {
                result.push(*ability);
            }
        }
    }
    result
}

/// Sesión autenticada: lo único que el núcleo necesita del proveedor de identidad
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub roles: Vec<Role>,
}

impl Session {
    pub fn new(user_id: Uuid, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    pub fn abilities(&self) -> Vec<Ability> {
        abilities_from_roles(&self.roles)
    }

    /// ¿Tiene el usuario la capacidad (acción, sujeto)?
    pub fn can(&self, action: Action, subject: Subject) -> bool {
        self.roles
            .iter()
            .any(|role| role_abilities(*role).contains(&Ability(action, subject)))
    }

    pub fn require(&self, action: Action, subject: Subject) -> AppResult<()> {
        if self.can(action, subject) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Missing ability {}",
                Ability(action, subject)
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abilities_from_roles_deduplicates() {
        let abilities = abilities_from_roles(&[Role::User, Role::Admin, Role::User]);
        assert_eq!(abilities.len(), ADMIN_ABILITIES.len());
        assert_eq!(abilities[0], Ability(Action::Read, Subject::MyTasks));
    }

    #[test]
    fn test_no_roles_no_abilities() {
        let session = Session::new(Uuid::new_v4(), vec![]);
        assert!(session.abilities().is_empty());
        assert!(!session.can(Action::Read, Subject::Requests));
    }

    #[test]
    fn test_user_cannot_write_requests() {
        let session = Session::new(Uuid::new_v4(), vec![Role::User]);
        assert!(session.can(Action::Read, Subject::MyTasks));
        let err = session.require(Action::Write, Subject::Requests).unwrap_err();
        assert_eq!(err.to_string(), "Forbidden: Missing ability write:requests");
    }

    #[test]
    fn test_subject_serializes_kebab_case() {
        let json = serde_json::to_string(&Subject::TaskAssignment).unwrap();
        assert_eq!(json, "\"task-assignment\"");
    }
}
