//! Authorization policy for the user resource.
//!
//! Pure predicates over `(actor, target, requested change)`; no store or
//! transport dependencies, so the policy is unit-testable in isolation.

use cantina_core::Roles;

use crate::models::{Actor, User};

/// Whether `actor` may read `target`'s account.
#[must_use]
pub fn can_view(actor: &Actor, target: &User) -> bool {
    actor.roles.admin || actor.user_id == target.id
}

/// Whether `actor` may change or delete `target`'s account.
///
/// Identity rule is the same as for viewing; the field-level role rule is
/// layered on top by [`role_change_allowed`].
#[must_use]
pub fn can_mutate(actor: &Actor, target: &User) -> bool {
    can_view(actor, target)
}

/// Whether `actor` may set `target`'s roles to `requested`.
///
/// Admins may grant or revoke freely. Everyone else may only send a value
/// that leaves the admin flag as it already is - non-admins can neither
/// grant nor revoke admin, not even on themselves.
#[must_use]
pub fn role_change_allowed(actor: &Actor, target: &User, requested: Option<Roles>) -> bool {
    match requested {
        None => true,
        Some(roles) => actor.roles.admin || roles.admin == target.roles.admin,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cantina_core::{Email, UserId};

    use super::*;

    fn user(roles: Roles) -> User {
        User {
            id: UserId::generate(),
            email: Email::parse("target@example.com").unwrap(),
            password_hash: "hash".to_owned(),
            roles,
        }
    }

    fn actor_for(user: &User) -> Actor {
        Actor {
            user_id: user.id,
            roles: user.roles,
        }
    }

    fn other_actor(roles: Roles) -> Actor {
        Actor {
            user_id: UserId::generate(),
            roles,
        }
    }

    #[test]
    fn test_self_can_view_and_mutate() {
        let target = user(Roles::default());
        let actor = actor_for(&target);
        assert!(can_view(&actor, &target));
        assert!(can_mutate(&actor, &target));
    }

    #[test]
    fn test_admin_can_view_and_mutate_anyone() {
        let target = user(Roles::default());
        let actor = other_actor(Roles::administrator());
        assert!(can_view(&actor, &target));
        assert!(can_mutate(&actor, &target));
    }

    #[test]
    fn test_stranger_cannot_view_or_mutate() {
        let target = user(Roles::default());
        let actor = other_actor(Roles::default());
        assert!(!can_view(&actor, &target));
        assert!(!can_mutate(&actor, &target));
    }

    #[test]
    fn test_non_admin_cannot_grant_admin() {
        let target = user(Roles::default());
        let actor = actor_for(&target);
        assert!(!role_change_allowed(
            &actor,
            &target,
            Some(Roles::administrator())
        ));
    }

    #[test]
    fn test_non_admin_cannot_revoke_admin() {
        let target = user(Roles::administrator());
        let actor = other_actor(Roles::default());
        assert!(!role_change_allowed(&actor, &target, Some(Roles::default())));
    }

    #[test]
    fn test_non_admin_may_restate_current_roles() {
        let target = user(Roles::default());
        let actor = actor_for(&target);
        assert!(role_change_allowed(&actor, &target, Some(Roles::default())));
    }

    #[test]
    fn test_admin_may_grant_and_revoke() {
        let target = user(Roles::default());
        let actor = other_actor(Roles::administrator());
        assert!(role_change_allowed(
            &actor,
            &target,
            Some(Roles::administrator())
        ));

        let admin_target = user(Roles::administrator());
        assert!(role_change_allowed(
            &actor,
            &admin_target,
            Some(Roles::default())
        ));
    }

    #[test]
    fn test_absent_roles_field_is_always_allowed() {
        let target = user(Roles::administrator());
        let actor = other_actor(Roles::default());
        assert!(role_change_allowed(&actor, &target, None));
    }
}
