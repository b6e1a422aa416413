//! View-model behind the login screen.
//!
//! Holds the form state, republishes content for each control whenever that
//! state changes, and drives the login call. The view feeds user actions back
//! through [`LoginViewModel::handle`] and runs [`LoginViewModel::login`] when
//! asked to by the returned [`Effect`].

use std::sync::Arc;

use derive_more::Debug;

use crate::{
    api::{AuthApi, AuthToken, UserCredentials},
    assets::{checkbox, password},
    content::{
        Alert, ButtonContent, CheckboxContent, Field, Intent, RightViewContent, TextFieldContent,
    },
    observable::Observable,
    provider::ProviderError,
    store::{ACCESS_TOKEN_KEY, KeyValueStore, StoreError, USER_CREDENTIALS_KEY},
};

const EMAIL_TITLE: &str = "Email";
const PASSWORD_TITLE: &str = "Password";
const REMEMBER_TITLE: &str = "Remember me";
const LOGIN_TITLE: &str = "Log in";

pub const ALERT_TITLE: &str = "Login failed";
pub const ALERT_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginFormState {
    pub email: Option<String>,
    #[debug(skip)]
    pub password: Option<String>,
    pub remember_credentials: bool,
    pub is_password_hidden: bool,
    pub is_loading: bool,
    pub email_error: bool,
    pub password_error: bool,
}

impl Default for LoginFormState {
    fn default() -> Self {
        Self {
            email: None,
            password: None,
            remember_credentials: false,
            is_password_hidden: true,
            is_loading: false,
            email_error: false,
            password_error: false,
        }
    }
}

impl LoginFormState {
    fn email(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }

    fn password(&self) -> &str {
        self.password.as_deref().unwrap_or_default()
    }

    pub fn can_submit(&self) -> bool {
        !self.email().is_empty() && !self.password().is_empty()
    }
}

/// Work the caller must perform after handling an intent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Login,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A required field was empty; nothing was sent.
    Rejected,
    LoggedIn(AuthToken),
    /// The alert has been shown.
    Failed,
}

#[derive(Debug, thiserror::Error)]
enum LoginError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("persisting session: {0}")]
    Store(#[from] StoreError),
}

type DidLoginHandler = Box<dyn Fn(&AuthToken) + Send + Sync>;
type ShowAlertHandler = Box<dyn Fn(&Alert) + Send + Sync>;

pub struct LoginViewModel<A, S> {
    api: A,
    store: Arc<S>,
    state: LoginFormState,
    email_field: Observable<TextFieldContent>,
    password_field: Observable<TextFieldContent>,
    remember_checkbox: Observable<CheckboxContent>,
    login_button: Observable<ButtonContent>,
    did_login: Option<DidLoginHandler>,
    show_alert: Option<ShowAlertHandler>,
}

impl<A: AuthApi, S: KeyValueStore> LoginViewModel<A, S> {
    /// Build the view-model, pre-filling the form from remembered credentials.
    pub fn new(api: A, store: Arc<S>) -> Self {
        let mut state = LoginFormState::default();
        match store.get_json::<UserCredentials>(USER_CREDENTIALS_KEY) {
            Ok(Some(credentials)) => {
                tracing::debug!("Restoring saved credentials for {}", credentials.email);
                state.email = Some(credentials.email);
                state.password = Some(credentials.password);
                state.remember_credentials = true;
            }
            Ok(None) => {}
            Err(err) => tracing::warn!("Ignoring saved credentials: {err}"),
        }

        let view_model = Self {
            api,
            store,
            state,
            email_field: Observable::new(),
            password_field: Observable::new(),
            remember_checkbox: Observable::new(),
            login_button: Observable::new(),
            did_login: None,
            show_alert: None,
        };
        view_model.publish_email();
        view_model.publish_password();
        view_model.publish_remember();
        view_model.publish_button();
        view_model
    }

    pub fn on_did_login<F>(&mut self, handler: F)
    where
        F: Fn(&AuthToken) + Send + Sync + 'static,
    {
        self.did_login = Some(Box::new(handler));
    }

    pub fn on_show_alert<F>(&mut self, handler: F)
    where
        F: Fn(&Alert) + Send + Sync + 'static,
    {
        self.show_alert = Some(Box::new(handler));
    }

    pub fn state(&self) -> &LoginFormState {
        &self.state
    }

    pub fn email_field(&self) -> &Observable<TextFieldContent> {
        &self.email_field
    }

    pub fn password_field(&self) -> &Observable<TextFieldContent> {
        &self.password_field
    }

    pub fn remember_checkbox(&self) -> &Observable<CheckboxContent> {
        &self.remember_checkbox
    }

    pub fn login_button(&self) -> &Observable<ButtonContent> {
        &self.login_button
    }

    pub fn handle(&mut self, intent: Intent) -> Effect {
        match intent {
            Intent::EmailChanged(text) => {
                self.state.email_error &= text.is_empty();
                self.state.email = Some(text);
                self.publish_email();
                self.publish_button();
            }
            Intent::PasswordChanged(text) => {
                self.state.password_error &= text.is_empty();
                self.state.password = Some(text);
                self.publish_password();
                self.publish_button();
            }
            Intent::TogglePasswordVisibility => {
                self.state.is_password_hidden = !self.state.is_password_hidden;
                self.publish_password();
            }
            Intent::ToggleRememberCredentials => {
                self.state.remember_credentials = !self.state.remember_credentials;
                self.publish_remember();
            }
            Intent::Login => return Effect::Login,
        }
        Effect::None
    }

    /// Validate the form and, if it is complete, log in.
    ///
    /// `is_loading` is back to `false` by the time this returns, whatever the
    /// outcome.
    pub async fn login(&mut self) -> LoginOutcome {
        self.state.email_error = self.state.email().is_empty();
        self.state.password_error = self.state.password().is_empty();
        if self.state.email_error || self.state.password_error {
            tracing::debug!("Login rejected, form incomplete");
            self.publish_email();
            self.publish_password();
            return LoginOutcome::Rejected;
        }

        let credentials = UserCredentials {
            email: self.state.email().to_string(),
            password: self.state.password().to_string(),
        };

        self.state.is_loading = true;
        self.publish_button();
        let result = self.api.login(&credentials).await;
        self.state.is_loading = false;
        self.publish_button();

        match result
            .map_err(LoginError::from)
            .and_then(|token| self.persist(&credentials, &token).map(|()| token))
        {
            Ok(token) => {
                tracing::info!("Logged in as {}", credentials.email);
                if let Some(handler) = &self.did_login {
                    handler(&token);
                }
                LoginOutcome::LoggedIn(token)
            }
            Err(err) => {
                tracing::warn!("Login failed: {err}");
                let alert = Alert {
                    title: ALERT_TITLE.to_string(),
                    message: ALERT_MESSAGE.to_string(),
                };
                if let Some(handler) = &self.show_alert {
                    handler(&alert);
                }
                LoginOutcome::Failed
            }
        }
    }

    fn persist(&self, credentials: &UserCredentials, token: &AuthToken) -> Result<(), LoginError> {
        self.store.save(ACCESS_TOKEN_KEY, token.expose())?;
        if self.state.remember_credentials {
            self.store.save_json(USER_CREDENTIALS_KEY, credentials)?;
        } else {
            self.store.remove(USER_CREDENTIALS_KEY)?;
        }
        Ok(())
    }

    fn publish_email(&self) {
        self.email_field.set(Some(TextFieldContent {
            field: Field::Email,
            title: EMAIL_TITLE.to_string(),
            text: self.state.email().to_string(),
            is_secure: false,
            has_error: self.state.email_error,
            right_view: None,
        }));
    }

    fn publish_password(&self) {
        self.password_field.set(Some(TextFieldContent {
            field: Field::Password,
            title: PASSWORD_TITLE.to_string(),
            text: self.state.password().to_string(),
            is_secure: self.state.is_password_hidden,
            has_error: self.state.password_error,
            right_view: Some(RightViewContent {
                image: password::SHOW,
                selected_image: password::HIDE,
                is_selected: !self.state.is_password_hidden,
                on_tap: Intent::TogglePasswordVisibility,
            }),
        }));
    }

    fn publish_remember(&self) {
        let checked = self.state.remember_credentials;
        self.remember_checkbox.set(Some(CheckboxContent {
            title: REMEMBER_TITLE.to_string(),
            image: if checked {
                checkbox::CHECKED
            } else {
                checkbox::UNCHECKED
            },
            is_checked: checked,
            on_tap: Intent::ToggleRememberCredentials,
        }));
    }

    fn publish_button(&self) {
        self.login_button.set(Some(ButtonContent {
            title: LOGIN_TITLE.to_string(),
            is_enabled: self.state.can_submit() && !self.state.is_loading,
            is_loading: self.state.is_loading,
            on_tap: Intent::Login,
        }));
    }
}
