//! Render-ready descriptions of the login screen controls.
//!
//! User actions are carried as [`Intent`] values which the view hands back to
//! the view-model, so content never holds a reference to its owner.

use crate::assets::AssetName;

/// Something the user did on the login screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    EmailChanged(String),
    PasswordChanged(String),
    TogglePasswordVisibility,
    ToggleRememberCredentials,
    Login,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonContent {
    pub title: String,
    pub is_enabled: bool,
    pub is_loading: bool,
    pub on_tap: Intent,
}

/// Toggle icon shown at the trailing edge of a text field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RightViewContent {
    pub image: AssetName,
    pub selected_image: AssetName,
    pub is_selected: bool,
    pub on_tap: Intent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextFieldContent {
    pub field: Field,
    pub title: String,
    pub text: String,
    pub is_secure: bool,
    pub has_error: bool,
    pub right_view: Option<RightViewContent>,
}

impl TextFieldContent {
    /// Intent to emit when the user edits this field.
    pub fn on_change(&self, text: impl Into<String>) -> Intent {
        match self.field {
            Field::Email => Intent::EmailChanged(text.into()),
            Field::Password => Intent::PasswordChanged(text.into()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckboxContent {
    pub title: String,
    pub image: AssetName,
    pub is_checked: bool,
    pub on_tap: Intent,
}

/// Blocking message the view should present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}
