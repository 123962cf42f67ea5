use super::*;

#[test]
fn admin_sees_every_view() {
    let caps = Role::Admin.capabilities();
    for view in ALL_VIEWS {
        assert!(caps.can_view(*view), "admin should see {:?}", view);
    }
    for action in ALL_ACTIONS {
        assert!(caps.can(*action), "admin should be allowed {:?}", action);
    }
}

#[test]
fn researcher_cannot_manage_users() {
    let caps = Role::Researcher.capabilities();
    assert!(!caps.can_view(View::Users));
    assert!(!caps.can(Action::ManageUsers));
    assert!(!caps.can(Action::Delete));
    assert!(caps.can_view(View::Review));
    assert!(caps.can(Action::Review));
}

#[test]
fn contributor_is_scoped_to_own_work() {
    let caps = Role::Contributor.capabilities();
    assert!(caps.can_view(View::MySubmissions));
    assert!(!caps.can_view(View::Analytics));
    assert!(!caps.can_view(View::Review));
    assert!(caps.can_edit("alice", Some("alice")));
    assert!(!caps.can_edit("alice", Some("bob")));
    assert!(!caps.can_edit("alice", None));
}

#[test]
fn edit_any_overrides_ownership() {
    let caps = Role::Researcher.capabilities();
    assert!(caps.can_edit("alice", Some("bob")));
    assert!(caps.can_edit("alice", None));
}

#[test]
fn views_keep_navigation_order() {
    let views = Role::Contributor.capabilities().views();
    assert_eq!(views.first(), Some(&View::Overview));
    assert_eq!(views.last(), Some(&View::Settings));
}

#[test]
fn role_aliases_parse() {
    let cases = [
        ("admin", Role::Admin),
        ("Administrator", Role::Admin),
        ("RESEARCHER", Role::Researcher),
        ("user", Role::Contributor),
        ("contributor", Role::Contributor),
    ];
    for (input, expected) in cases {
        assert_eq!(input.parse::<Role>().unwrap(), expected, "alias '{}'", input);
    }
    assert!("guest".parse::<Role>().is_err());
}

#[test]
fn trusted_roles_skip_review() {
    assert!(Role::Admin.is_trusted());
    assert!(Role::Researcher.is_trusted());
    assert!(!Role::Contributor.is_trusted());
}
