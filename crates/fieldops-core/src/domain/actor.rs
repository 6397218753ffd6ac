//! Authenticated principal acting on tenant data

use uuid::Uuid;

use super::user::Role;
use super::visit::Visit;
use crate::error::DomainError;

/// Identity extracted from an access token. Platform super admins carry no
/// tenant; everyone else is scoped to exactly one.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub role: Role,
}

impl Actor {
    /// Tenant-scoped operations require a tenant on the token.
    pub fn tenant_scope(&self) -> Result<Uuid, DomainError> {
        self.tenant_id
            .ok_or_else(|| DomainError::Forbidden("Token carries no tenant scope".to_string()))
    }

    /// Visits are mutated only by the assigned rep or a supervising role
    /// within the same tenant.
    pub fn can_manage_visit(&self, visit: &Visit) -> bool {
        self.tenant_id == Some(visit.tenant_id)
            && (self.role.is_supervising() || visit.assigned_rep_id == self.user_id)
    }

    /// Reps plan their own visits; supervisors may assign any rep.
    pub fn can_assign_other_reps(&self) -> bool {
        self.role.is_supervising()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn visit_for(tenant_id: Uuid, rep_id: Uuid) -> Visit {
        Visit::new(
            tenant_id,
            Uuid::new_v4(),
            rep_id,
            Utc::now().date_naive(),
            None,
            vec![],
            rep_id,
        )
        .unwrap()
    }

    #[test]
    fn test_assigned_rep_can_manage_own_visit() {
        let tenant_id = Uuid::new_v4();
        let rep_id = Uuid::new_v4();
        let actor = Actor {
            user_id: rep_id,
            tenant_id: Some(tenant_id),
            role: Role::SalesRep,
        };
        assert!(actor.can_manage_visit(&visit_for(tenant_id, rep_id)));
    }

    #[test]
    fn test_other_rep_cannot_manage_visit() {
        let tenant_id = Uuid::new_v4();
        let actor = Actor {
            user_id: Uuid::new_v4(),
            tenant_id: Some(tenant_id),
            role: Role::SalesRep,
        };
        assert!(!actor.can_manage_visit(&visit_for(tenant_id, Uuid::new_v4())));
    }

    #[test]
    fn test_supervisor_can_manage_any_visit_in_tenant() {
        let tenant_id = Uuid::new_v4();
        let actor = Actor {
            user_id: Uuid::new_v4(),
            tenant_id: Some(tenant_id),
            role: Role::Supervisor,
        };
        assert!(actor.can_manage_visit(&visit_for(tenant_id, Uuid::new_v4())));
    }

    #[test]
    fn test_supervisor_cannot_cross_tenants() {
        let actor = Actor {
            user_id: Uuid::new_v4(),
            tenant_id: Some(Uuid::new_v4()),
            role: Role::Supervisor,
        };
        assert!(!actor.can_manage_visit(&visit_for(Uuid::new_v4(), Uuid::new_v4())));
    }

    #[test]
    fn test_platform_admin_has_no_tenant_scope() {
        let actor = Actor {
            user_id: Uuid::new_v4(),
            tenant_id: None,
            role: Role::SuperAdmin,
        };
        assert!(actor.tenant_scope().is_err());
    }
}
