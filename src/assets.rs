//! Named image assets used by the login screen and navigation.
//!
//! Names are grouped by category and addressed as `category.item`.

use derive_more::{Debug, Display};

#[derive(Copy, Clone, Display, Debug, PartialEq, Eq, Hash)]
#[display("{category}.{item}")]
#[debug("{category}.{item}")]
pub struct AssetName {
    category: &'static str,
    item: &'static str,
    resource: &'static str,
}

impl AssetName {
    const fn new(category: &'static str, item: &'static str, resource: &'static str) -> Self {
        Self {
            category,
            item,
            resource,
        }
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    pub fn item(&self) -> &'static str {
        self.item
    }

    /// Identifier of the image in the platform resource catalog.
    pub fn resource(&self) -> &'static str {
        self.resource
    }
}

pub mod password {
    use super::AssetName;

    pub const HIDE: AssetName = AssetName::new("password", "hide", "ic_password_hide");
    pub const SHOW: AssetName = AssetName::new("password", "show", "ic_password_show");
}

pub mod checkbox {
    use super::AssetName;

    pub const CHECKED: AssetName = AssetName::new("checkbox", "checked", "ic_checkbox_checked");
    pub const UNCHECKED: AssetName =
        AssetName::new("checkbox", "unchecked", "ic_checkbox_unchecked");
}

pub mod navigation {
    use super::AssetName;

    pub const BACK: AssetName = AssetName::new("navigation", "back", "ic_navigation_back");
}

pub mod logo {
    use super::AssetName;

    pub const LOGIN: AssetName = AssetName::new("logo", "login", "img_login_logo");
}

const ALL: &[AssetName] = &[
    password::HIDE,
    password::SHOW,
    checkbox::CHECKED,
    checkbox::UNCHECKED,
    navigation::BACK,
    logo::LOGIN,
];

/// Every registered asset, in category order.
pub fn all() -> &'static [AssetName] {
    ALL
}

/// Resolve a dotted name such as `password.hide`.
pub fn lookup(name: &str) -> Option<AssetName> {
    let (category, item) = name.trim().split_once('.')?;
    ALL.iter()
        .copied()
        .find(|asset| asset.category == category && asset.item == item)
}
