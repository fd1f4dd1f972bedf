//! Role policy: pure authorization decisions for the account resource.
//!
//! Every function here is a side-effect-free predicate over the actor, the
//! requested action and (for deletion) the target account. Callers decide how
//! a denial is signalled: the coarse permission gate maps denials to 403 and
//! the field-level validation maps them to 400 on the offending field. The
//! two layers deliberately overlap and must stay independent.

use super::account::{Account, Role};

/// Actions a request can perform on the account resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountAction {
    /// Enumerate accounts.
    List,
    /// Fetch a single account.
    Retrieve,
    /// Create an account.
    Create,
    /// Replace an account (full update).
    Update,
    /// Modify part of an account.
    PartialUpdate,
    /// Remove an account.
    Destroy,
}

impl AccountAction {
    /// Whether the action mutates stored state.
    pub fn is_write(self) -> bool {
        matches!(
            self,
            Self::Create | Self::Update | Self::PartialUpdate | Self::Destroy
        )
    }
}

/// May `actor` assign `requested` to any account?
///
/// Only a superuser may hand out the admin role; every other role is
/// assignable by anyone who got past the coarse gate. The check runs on the
/// submitted value alone, on creation and update alike, even when the update
/// re-submits a target's current role unchanged.
pub fn can_assign_role(actor: &Account, requested: Role) -> bool {
    requested != Role::Admin || actor.is_superuser()
}

/// May `actor` perform `action` on the account resource at all?
///
/// Write actions require the admin role or the superuser flag; reads are open
/// to any authenticated actor.
pub fn can_perform_account_action(actor: &Account, action: AccountAction) -> bool {
    if action.is_write() {
        actor.is_admin() || actor.is_superuser()
    } else {
        true
    }
}

/// May `actor` delete `target`?
///
/// Requires the coarse destroy capability, and additionally the superuser
/// flag when the target is itself an administrator.
pub fn can_delete_account(actor: &Account, target: &Account) -> bool {
    can_perform_account_action(actor, AccountAction::Destroy)
        && (!target.is_admin() || actor.is_superuser())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{EmailAddress, NewAccount, SuperuserFlagOverrides};
    use chrono::Utc;
    use rstest::rstest;

    fn actor(role: Option<Role>) -> Account {
        let mut details = NewAccount::new(
            EmailAddress::new("actor@example.com").expect("valid email"),
            "Test",
            "Actor",
        );
        details.role = role;
        Account::create(details, Utc::now()).expect("valid account")
    }

    fn superuser() -> Account {
        Account::create_superuser(
            NewAccount::new(
                EmailAddress::new("root@example.com").expect("valid email"),
                "Root",
                "Actor",
            ),
            SuperuserFlagOverrides::default(),
            Utc::now(),
        )
        .expect("valid superuser")
    }

    #[rstest]
    #[case(Some(Role::Admin))]
    #[case(Some(Role::Veterinarian))]
    #[case(Some(Role::Secretary))]
    #[case(None)]
    fn anyone_may_assign_non_admin_roles(#[case] actor_role: Option<Role>) {
        let actor = actor(actor_role);
        assert!(can_assign_role(&actor, Role::Veterinarian));
        assert!(can_assign_role(&actor, Role::Secretary));
    }

    #[rstest]
    #[case(Some(Role::Admin))]
    #[case(Some(Role::Veterinarian))]
    #[case(Some(Role::Secretary))]
    #[case(None)]
    fn only_superuser_may_assign_admin(#[case] actor_role: Option<Role>) {
        assert!(!can_assign_role(&actor(actor_role), Role::Admin));
        assert!(can_assign_role(&superuser(), Role::Admin));
    }

    #[rstest]
    #[case(AccountAction::Create)]
    #[case(AccountAction::Update)]
    #[case(AccountAction::PartialUpdate)]
    #[case(AccountAction::Destroy)]
    fn write_actions_require_admin_or_superuser(#[case] action: AccountAction) {
        assert!(can_perform_account_action(&actor(Some(Role::Admin)), action));
        assert!(can_perform_account_action(&superuser(), action));
        assert!(!can_perform_account_action(
            &actor(Some(Role::Veterinarian)),
            action
        ));
        assert!(!can_perform_account_action(
            &actor(Some(Role::Secretary)),
            action
        ));
        assert!(!can_perform_account_action(&actor(None), action));
    }

    #[rstest]
    #[case(AccountAction::List)]
    #[case(AccountAction::Retrieve)]
    fn read_actions_are_open_to_authenticated_actors(#[case] action: AccountAction) {
        for role in [
            Some(Role::Admin),
            Some(Role::Veterinarian),
            Some(Role::Secretary),
            None,
        ] {
            assert!(can_perform_account_action(&actor(role), action));
        }
    }

    #[test]
    fn admin_may_not_delete_another_admin() {
        assert!(!can_delete_account(
            &actor(Some(Role::Admin)),
            &actor(Some(Role::Admin))
        ));
    }

    #[test]
    fn admin_may_delete_non_admin_targets() {
        let admin = actor(Some(Role::Admin));
        assert!(can_delete_account(&admin, &actor(Some(Role::Veterinarian))));
        assert!(can_delete_account(&admin, &actor(Some(Role::Secretary))));
        assert!(can_delete_account(&admin, &actor(None)));
    }

    #[test]
    fn superuser_may_delete_any_target() {
        let root = superuser();
        for target in [
            actor(Some(Role::Admin)),
            actor(Some(Role::Veterinarian)),
            actor(Some(Role::Secretary)),
            actor(None),
        ] {
            assert!(can_delete_account(&root, &target));
        }
    }

    #[test]
    fn non_admin_actors_may_not_delete_at_all() {
        let vet = actor(Some(Role::Veterinarian));
        assert!(!can_delete_account(&vet, &actor(Some(Role::Secretary))));
    }
}
