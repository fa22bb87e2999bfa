//! crates/portal_core/src/eligibility.rs
//!
//! The access-control decision for membership-only routes. Pure over its
//! inputs; showing the redirect notice is the caller's side effect.

use crate::domain::{EligibilityVerdict, UserSnapshot};

/// Evaluates whether a protected route may render for the current session.
///
/// Decision order, first matching rule wins:
/// 1. Session still resolving → `Loading`.
/// 2. Not logged in → `Allow` (guest access is permitted).
/// 3. Administrator role → `Allow`, bypassing membership checks.
/// 4. No membership on file → `RedirectHome` without notice.
/// 5. Membership present: allow only when there is at least one student and
///    every student has a non-blank identification number; otherwise
///    `RedirectHome` with the incomplete-enrollment notice.
///
/// A member with zero students is treated identically to one with
/// incomplete identification data: both redirect with the notice.
pub fn evaluate(
    loading: bool,
    logged_in: bool,
    user: Option<&UserSnapshot>,
) -> EligibilityVerdict {
    if loading {
        return EligibilityVerdict::Loading;
    }

    if !logged_in {
        return EligibilityVerdict::Allow;
    }

    let Some(user) = user else {
        // Logged in but the snapshot is missing: degrade like a user
        // without membership rather than failing.
        return EligibilityVerdict::RedirectHome { notice: false };
    };

    if user.is_admin() {
        return EligibilityVerdict::Allow;
    }

    let Some(member) = user.member.as_ref() else {
        return EligibilityVerdict::RedirectHome { notice: false };
    };

    let all_complete =
        !member.students.is_empty() && member.students.iter().all(|s| s.has_complete_ci());

    if all_complete {
        EligibilityVerdict::Allow
    } else {
        EligibilityVerdict::RedirectHome { notice: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Membership, RoleName, Student};
    use uuid::Uuid;

    fn student(ci: &str) -> Student {
        Student {
            full_name: "Ana Pérez".to_string(),
            ci: ci.to_string(),
        }
    }

    fn member_with(students: Vec<Student>) -> UserSnapshot {
        UserSnapshot {
            id: Uuid::new_v4(),
            member: Some(Membership {
                status: "active".to_string(),
                students,
            }),
            roles: vec![RoleName::Member],
        }
    }

    #[test]
    fn loading_suspends_everything_else() {
        let user = member_with(vec![student("123")]);
        assert_eq!(
            evaluate(true, true, Some(&user)),
            EligibilityVerdict::Loading
        );
    }

    #[test]
    fn guests_are_allowed() {
        assert_eq!(evaluate(false, false, None), EligibilityVerdict::Allow);
    }

    #[test]
    fn admins_bypass_membership_checks() {
        // Admin verdict holds regardless of member/student data.
        for roles in [vec![RoleName::Admin], vec![RoleName::Administrador]] {
            let user = UserSnapshot {
                id: Uuid::new_v4(),
                member: None,
                roles,
            };
            assert_eq!(
                evaluate(false, true, Some(&user)),
                EligibilityVerdict::Allow
            );
        }
    }

    #[test]
    fn logged_in_without_membership_redirects_silently() {
        let user = UserSnapshot {
            id: Uuid::new_v4(),
            member: None,
            roles: vec![RoleName::Member],
        };
        assert_eq!(
            evaluate(false, true, Some(&user)),
            EligibilityVerdict::RedirectHome { notice: false }
        );
    }

    #[test]
    fn missing_snapshot_degrades_to_silent_redirect() {
        assert_eq!(
            evaluate(false, true, None),
            EligibilityVerdict::RedirectHome { notice: false }
        );
    }

    #[test]
    fn complete_students_are_allowed() {
        let user = member_with(vec![student("123"), student("456")]);
        assert_eq!(evaluate(false, true, Some(&user)), EligibilityVerdict::Allow);
    }

    #[test]
    fn one_incomplete_student_blocks_access() {
        let user = member_with(vec![student("123"), student("")]);
        assert_eq!(
            evaluate(false, true, Some(&user)),
            EligibilityVerdict::RedirectHome { notice: true }
        );
    }

    #[test]
    fn blank_ci_counts_as_incomplete() {
        let user = member_with(vec![student("   ")]);
        assert_eq!(
            evaluate(false, true, Some(&user)),
            EligibilityVerdict::RedirectHome { notice: true }
        );
    }

    // Intentional per the current gate rule: an empty student list produces
    // the same redirect-with-notice as incomplete identification data.
    #[test]
    fn zero_students_matches_incomplete_data_outcome() {
        let empty = member_with(vec![]);
        let incomplete = member_with(vec![student("")]);
        assert_eq!(
            evaluate(false, true, Some(&empty)),
            EligibilityVerdict::RedirectHome { notice: true }
        );
        assert_eq!(
            evaluate(false, true, Some(&empty)),
            evaluate(false, true, Some(&incomplete))
        );
    }

    #[test]
    fn unknown_roles_carry_no_privilege() {
        let user = UserSnapshot {
            id: Uuid::new_v4(),
            member: None,
            roles: vec![RoleName::Unknown],
        };
        assert_eq!(
            evaluate(false, true, Some(&user)),
            EligibilityVerdict::RedirectHome { notice: false }
        );
    }
}
