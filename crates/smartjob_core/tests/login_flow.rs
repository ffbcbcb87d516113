use std::sync::Once;

use smartjob_core::{
    update, AppState, Credential, CredentialStore, Effect, MemoryCredentialStore, Msg, Password,
    ServiceFailure,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(smartjob_logging::initialize_for_tests);
}

fn submit_login(state: AppState, username: &str, password: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::LoginSubmitted {
            username: username.to_string(),
            password: Password::new(password),
        },
    )
}

fn unauthorized() -> ServiceFailure {
    ServiceFailure::rejected(401, "Unauthorized", Some("Invalid credentials".into()))
}

#[test]
fn restored_credential_authenticates_without_network() {
    init_logging();
    let mut store = MemoryCredentialStore::new();
    store.save(&Credential::derive("alice", "pw"));

    let (mut state, effects) = update(AppState::new(), Msg::CredentialRestored(store.load()));

    assert!(effects.is_empty());
    assert!(state.view().authenticated);
    assert!(state.consume_dirty());

    let (state, _) = update(state, Msg::CredentialRestored(None));
    assert!(!state.view().authenticated);
}

#[test]
fn login_starts_with_probe_of_derived_credential() {
    init_logging();
    let (state, effects) = submit_login(AppState::new(), "alice", "s3cret");

    assert_eq!(
        effects,
        vec![Effect::ProbeCredential {
            credential: Credential::derive("alice", "s3cret"),
        }]
    );
    assert!(state.view().login.in_progress);
    assert!(!state.view().authenticated);
}

#[test]
fn existing_account_logs_in_without_account_creation() {
    init_logging();
    let (state, _) = submit_login(AppState::new(), "alice", "s3cret");
    let (state, effects) = update(state, Msg::ProbeFinished(Ok(())));

    assert_eq!(
        effects,
        vec![Effect::PersistCredential(Credential::derive(
            "alice", "s3cret"
        ))]
    );
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::CreateAccount { .. })));
    let view = state.view();
    assert!(view.authenticated);
    assert!(!view.login.in_progress);
    assert_eq!(view.login.error, None);
}

#[test]
fn unknown_account_is_created_then_authenticated() {
    init_logging();
    let (state, _) = submit_login(AppState::new(), "bob", "hunter2");
    let (state, effects) = update(state, Msg::ProbeFinished(Err(unauthorized())));

    assert_eq!(
        effects,
        vec![Effect::CreateAccount {
            username: "bob".to_string(),
            password: Password::new("hunter2"),
        }]
    );
    assert!(state.view().login.in_progress);
    assert!(!state.view().authenticated);

    let (state, effects) = update(state, Msg::AccountCreationFinished(Ok(())));
    assert_eq!(
        effects,
        vec![Effect::PersistCredential(Credential::derive("bob", "hunter2"))]
    );
    assert!(state.view().authenticated);
}

#[test]
fn wrong_password_for_existing_account_fails_at_account_creation() {
    init_logging();
    let (state, _) = submit_login(AppState::new(), "alice", "wrong");
    let (state, effects) = update(state, Msg::ProbeFinished(Err(unauthorized())));
    assert!(matches!(effects.as_slice(), [Effect::CreateAccount { .. }]));

    let (state, effects) = update(
        state,
        Msg::AccountCreationFinished(Err(ServiceFailure::rejected(
            400,
            "Bad Request",
            Some("Username already registered".into()),
        ))),
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.authenticated);
    assert!(!view.login.in_progress);
    assert_eq!(view.login.error.as_deref(), Some("Username already registered"));
}

#[test]
fn account_creation_failure_without_detail_uses_generic_message() {
    init_logging();
    let (state, _) = submit_login(AppState::new(), "carol", "pw");
    let (state, _) = update(state, Msg::ProbeFinished(Err(unauthorized())));
    let (state, _) = update(
        state,
        Msg::AccountCreationFinished(Err(ServiceFailure::rejected(500, "Internal Server Error", None))),
    );

    assert_eq!(
        state.view().login.error.as_deref(),
        Some("Account creation failed.")
    );
}

#[test]
fn probe_failure_other_than_unauthorized_is_login_error() {
    init_logging();
    let (state, _) = submit_login(AppState::new(), "dave", "pw");
    let (state, effects) = update(
        state,
        Msg::ProbeFinished(Err(ServiceFailure::rejected(
            403,
            "Forbidden",
            Some("Only admin can view all users".into()),
        ))),
    );

    assert!(effects.is_empty());
    assert!(!state.view().authenticated);
    assert_eq!(
        state.view().login.error.as_deref(),
        Some("Only admin can view all users")
    );

    let (state, _) = submit_login(state, "dave", "pw");
    let (state, _) = update(
        state,
        Msg::ProbeFinished(Err(ServiceFailure::rejected(503, "Service Unavailable", None))),
    );
    assert_eq!(state.view().login.error.as_deref(), Some("Login failed."));
}

#[test]
fn probe_transport_failure_is_reported() {
    init_logging();
    let (state, _) = submit_login(AppState::new(), "erin", "pw");
    let (state, _) = update(
        state,
        Msg::ProbeFinished(Err(ServiceFailure::Transport("connection refused".into()))),
    );

    assert_eq!(
        state.view().login.error.as_deref(),
        Some("An unexpected error occurred: connection refused")
    );
}

#[test]
fn second_login_while_probing_is_ignored() {
    init_logging();
    let (state, _) = submit_login(AppState::new(), "alice", "pw");
    let (state, effects) = submit_login(state, "mallory", "pw");

    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::ProbeFinished(Ok(())));
    assert_eq!(
        effects,
        vec![Effect::PersistCredential(Credential::derive("alice", "pw"))]
    );
    assert!(state.view().authenticated);
}

#[test]
fn stray_probe_result_is_ignored() {
    init_logging();
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::ProbeFinished(Ok(())));

    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn logout_clears_session_and_store() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::CredentialRestored(Some(Credential::from_token("abc"))),
    );
    let (state, effects) = update(state, Msg::LogoutClicked);

    assert_eq!(effects, vec![Effect::ClearCredential]);
    assert!(!state.view().authenticated);

    let (_, effects) = update(state, Msg::LogoutClicked);
    assert!(effects.is_empty());
}
