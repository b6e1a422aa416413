use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use parking_lot::Mutex;
use tvshows_client::{
    api::{AuthApi, AuthToken, UserCredentials},
    assets::{checkbox, password},
    content::Intent,
    login::{ALERT_MESSAGE, ALERT_TITLE, Effect, LoginOutcome, LoginViewModel},
    provider::ProviderError,
    store::{ACCESS_TOKEN_KEY, KeyValueStore, MemoryStore, StoreError, USER_CREDENTIALS_KEY},
};

/// Answers every login with a fixed token, or with a decoding failure.
struct FakeApi {
    token: Option<&'static str>,
    calls: Arc<Mutex<Vec<UserCredentials>>>,
}

impl FakeApi {
    fn succeeding(token: &'static str) -> Self {
        Self {
            token: Some(token),
            calls: Arc::default(),
        }
    }

    fn failing() -> Self {
        Self {
            token: None,
            calls: Arc::default(),
        }
    }
}

impl AuthApi for FakeApi {
    async fn login(&self, credentials: &UserCredentials) -> Result<AuthToken, ProviderError> {
        self.calls.lock().push(credentials.clone());
        match self.token {
            Some(token) => Ok(AuthToken::new(token)),
            None => Err(serde_json::from_str::<u8>("\"nope\"")
                .unwrap_err()
                .into()),
        }
    }
}

fn credentials(email: &str, password: &str) -> UserCredentials {
    UserCredentials {
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn fill(view_model: &mut LoginViewModel<FakeApi, MemoryStore>, email: &str, password: &str) {
    view_model.handle(Intent::EmailChanged(email.to_string()));
    view_model.handle(Intent::PasswordChanged(password.to_string()));
}

#[tokio::test]
async fn empty_fields_are_rejected_without_network() {
    for (email, pass, email_err, pass_err) in [
        ("", "", true, true),
        ("a@b.com", "", false, true),
        ("", "p", true, false),
    ] {
        let api = FakeApi::succeeding("t");
        let calls = Arc::clone(&api.calls);
        let mut view_model = LoginViewModel::new(api, Arc::new(MemoryStore::new()));
        fill(&mut view_model, email, pass);

        assert_eq!(view_model.login().await, LoginOutcome::Rejected);
        assert!(calls.lock().is_empty());
        assert_eq!(view_model.state().email_error, email_err);
        assert_eq!(view_model.state().password_error, pass_err);
        assert_eq!(view_model.email_field().get().unwrap().has_error, email_err);
        assert_eq!(view_model.password_field().get().unwrap().has_error, pass_err);
        assert!(!view_model.state().is_loading);
    }
}

#[tokio::test]
async fn untouched_form_is_rejected() {
    let api = FakeApi::succeeding("t");
    let calls = Arc::clone(&api.calls);
    let mut view_model = LoginViewModel::new(api, Arc::new(MemoryStore::new()));
    assert!(!view_model.login_button().get().unwrap().is_enabled);
    assert_eq!(view_model.login().await, LoginOutcome::Rejected);
    assert!(calls.lock().is_empty());
}

#[tokio::test]
async fn editing_a_field_clears_its_error() {
    let mut view_model =
        LoginViewModel::new(FakeApi::succeeding("t"), Arc::new(MemoryStore::new()));
    view_model.login().await;
    assert!(view_model.state().email_error);

    view_model.handle(Intent::EmailChanged("a@b.com".into()));
    assert!(!view_model.state().email_error);
    assert!(!view_model.email_field().get().unwrap().has_error);
    assert!(view_model.state().password_error);
}

#[tokio::test]
async fn successful_login_stores_token_and_calls_back() {
    let store = Arc::new(MemoryStore::new());
    let api = FakeApi::succeeding("T");
    let calls = Arc::clone(&api.calls);
    let mut view_model = LoginViewModel::new(api, Arc::clone(&store));
    let logged_in = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&logged_in);
    view_model.on_did_login(move |token| {
        assert_eq!(token.expose(), "T");
        counter.fetch_add(1, Ordering::SeqCst);
    });
    view_model.on_show_alert(|_| panic!("no alert expected"));
    fill(&mut view_model, "a@b.com", "p");

    let outcome = view_model.login().await;

    assert_eq!(outcome, LoginOutcome::LoggedIn(AuthToken::new("T")));
    assert_eq!(*calls.lock(), vec![credentials("a@b.com", "p")]);
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("T"));
    assert_eq!(logged_in.load(Ordering::SeqCst), 1);
    assert!(!view_model.state().is_loading);
    assert!(view_model.login_button().get().unwrap().is_enabled);
}

#[tokio::test]
async fn remember_saves_credentials() {
    let store = Arc::new(MemoryStore::new());
    let mut view_model = LoginViewModel::new(FakeApi::succeeding("T"), Arc::clone(&store));
    fill(&mut view_model, "a@b.com", "p");
    view_model.handle(Intent::ToggleRememberCredentials);

    view_model.login().await;

    assert_eq!(
        store.get_json::<UserCredentials>(USER_CREDENTIALS_KEY).unwrap(),
        Some(credentials("a@b.com", "p"))
    );
}

#[tokio::test]
async fn not_remembering_deletes_saved_credentials() {
    let store = Arc::new(MemoryStore::new());
    store
        .save_json(USER_CREDENTIALS_KEY, &credentials("old@b.com", "old"))
        .unwrap();
    let mut view_model = LoginViewModel::new(FakeApi::succeeding("T"), Arc::clone(&store));
    assert!(view_model.state().remember_credentials);
    view_model.handle(Intent::ToggleRememberCredentials);
    fill(&mut view_model, "a@b.com", "p");

    view_model.login().await;

    assert_eq!(store.get(USER_CREDENTIALS_KEY).unwrap(), None);
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("T"));
}

#[tokio::test]
async fn failure_shows_one_generic_alert_and_keeps_input() {
    let store = Arc::new(MemoryStore::new());
    let mut view_model = LoginViewModel::new(FakeApi::failing(), Arc::clone(&store));
    let alerts = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&alerts);
    view_model.on_show_alert(move |alert| sink.lock().push(alert.clone()));
    view_model.on_did_login(|_| panic!("login must not complete"));
    fill(&mut view_model, "a@b.com", "p");

    assert_eq!(view_model.login().await, LoginOutcome::Failed);

    let alerts = alerts.lock();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].title, ALERT_TITLE);
    assert_eq!(alerts[0].message, ALERT_MESSAGE);
    assert!(!view_model.state().is_loading);
    assert_eq!(view_model.state().email.as_deref(), Some("a@b.com"));
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn button_reports_loading_while_request_is_in_flight() {
    let mut view_model =
        LoginViewModel::new(FakeApi::succeeding("T"), Arc::new(MemoryStore::new()));
    let states = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&states);
    view_model.login_button().subscribe(move |button| {
        let button = button.expect("button content is always published");
        sink.lock().push((button.is_loading, button.is_enabled));
    });
    fill(&mut view_model, "a@b.com", "p");
    states.lock().clear();

    view_model.login().await;

    assert_eq!(*states.lock(), vec![(true, false), (false, true)]);
}

#[test]
fn toggling_visibility_keeps_secure_flag_and_icon_in_step() {
    let mut view_model = LoginViewModel::new(FakeApi::failing(), Arc::new(MemoryStore::new()));

    let field = view_model.password_field().get().unwrap();
    let right = field.right_view.unwrap();
    assert!(field.is_secure);
    assert!(!right.is_selected);
    assert_eq!(right.image, password::SHOW);
    assert_eq!(right.on_tap, Intent::TogglePasswordVisibility);

    assert_eq!(view_model.handle(right.on_tap), Effect::None);
    let field = view_model.password_field().get().unwrap();
    assert!(!field.is_secure);
    assert!(field.right_view.unwrap().is_selected);
    assert!(!view_model.state().is_password_hidden);

    view_model.handle(Intent::TogglePasswordVisibility);
    let field = view_model.password_field().get().unwrap();
    assert!(field.is_secure);
    assert!(!field.right_view.unwrap().is_selected);
}

#[test]
fn remember_checkbox_tracks_state() {
    let mut view_model = LoginViewModel::new(FakeApi::failing(), Arc::new(MemoryStore::new()));
    let unchecked = view_model.remember_checkbox().get().unwrap();
    assert!(!unchecked.is_checked);
    assert_eq!(unchecked.image, checkbox::UNCHECKED);

    view_model.handle(unchecked.on_tap);
    let checked = view_model.remember_checkbox().get().unwrap();
    assert!(checked.is_checked);
    assert_eq!(checked.image, checkbox::CHECKED);
}

#[test]
fn edits_republish_field_content() {
    let mut view_model = LoginViewModel::new(FakeApi::failing(), Arc::new(MemoryStore::new()));
    let email_field = view_model.email_field().get().unwrap();
    assert_eq!(view_model.handle(email_field.on_change("x@y.z")), Effect::None);

    assert_eq!(view_model.email_field().get().unwrap().text, "x@y.z");
    assert!(!view_model.login_button().get().unwrap().is_enabled);

    view_model.handle(Intent::PasswordChanged("secret".into()));
    assert!(view_model.login_button().get().unwrap().is_enabled);
    assert_eq!(view_model.handle(Intent::Login), Effect::Login);
}

#[test]
fn saved_credentials_prefill_the_form_without_network() {
    let store = Arc::new(MemoryStore::new());
    store
        .save_json(USER_CREDENTIALS_KEY, &credentials("a@b.com", "p"))
        .unwrap();
    let api = FakeApi::succeeding("T");
    let calls = Arc::clone(&api.calls);

    let view_model = LoginViewModel::new(api, store);

    assert_eq!(view_model.email_field().get().unwrap().text, "a@b.com");
    assert_eq!(view_model.password_field().get().unwrap().text, "p");
    assert!(view_model.state().remember_credentials);
    assert!(view_model.remember_checkbox().get().unwrap().is_checked);
    assert!(view_model.login_button().get().unwrap().is_enabled);
    assert!(calls.lock().is_empty());
}

#[test]
fn unreadable_saved_credentials_are_ignored() {
    let store = Arc::new(MemoryStore::new());
    store.save(USER_CREDENTIALS_KEY, "{broken").unwrap();

    let view_model = LoginViewModel::new(FakeApi::failing(), store);

    assert_eq!(view_model.state().email, None);
    assert!(!view_model.state().remember_credentials);
}

/// Reads as empty, refuses every write.
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn save(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io {
            path: "store.json".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        })
    }

    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn failing_to_persist_token_fails_the_login() {
    let mut view_model = LoginViewModel::new(FakeApi::succeeding("T"), Arc::new(ReadOnlyStore));
    let alerts = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&alerts);
    view_model.on_show_alert(move |alert| sink.lock().push(alert.clone()));
    let logged_in = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&logged_in);
    view_model.on_did_login(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    view_model.handle(Intent::EmailChanged("a@b.com".into()));
    view_model.handle(Intent::PasswordChanged("p".into()));

    assert_eq!(view_model.login().await, LoginOutcome::Failed);

    let alerts = alerts.lock();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].title, ALERT_TITLE);
    assert_eq!(alerts[0].message, ALERT_MESSAGE);
    assert_eq!(logged_in.load(Ordering::SeqCst), 0);
    assert!(!view_model.state().is_loading);
    assert!(!view_model.login_button().get().unwrap().is_loading);
}
