//! Pages and redirect decisions.
//!
//! Store actions only report where the user should go next. Whoever owns
//! the stores decides whether to follow that through a [`Navigator`].

use std::fmt;

/// One of the application's entry pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    SignIn,
    SignUp,
    Design,
    Template,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::SignIn,
        Page::SignUp,
        Page::Design,
        Page::Template,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/index",
            Page::SignIn => "/signin",
            Page::SignUp => "/signup",
            Page::Design => "/design",
            Page::Template => "/template",
        }
    }

    /// Pages that only make sense with a signed-in user.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Page::Design | Page::Template)
    }

    /// Parse a page from its path (`/design`) or bare name (`design`).
    pub fn from_path(s: &str) -> Option<Self> {
        let name = s.trim().trim_start_matches('/').to_lowercase();
        match name.as_str() {
            "" | "index" | "home" | "dashboard" => Some(Page::Home),
            "signin" => Some(Page::SignIn),
            "signup" => Some(Page::SignUp),
            "design" => Some(Page::Design),
            "template" => Some(Page::Template),
            _ => None,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Stay,
    Redirect(Page),
}

impl Access {
    pub fn is_redirect(&self) -> bool {
        matches!(self, Access::Redirect(_))
    }

    pub fn target(&self) -> Option<Page> {
        match self {
            Access::Stay => None,
            Access::Redirect(page) => Some(*page),
        }
    }
}

/// Performs a full page load.
pub trait Navigator {
    fn navigate(&self, page: Page);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_roundtrip() {
        for page in Page::ALL {
            assert_eq!(Page::from_path(page.path()), Some(page));
        }
    }

    #[test]
    fn test_from_path_aliases() {
        assert_eq!(Page::from_path("dashboard"), Some(Page::Home));
        assert_eq!(Page::from_path("/"), Some(Page::Home));
        assert_eq!(Page::from_path("Design"), Some(Page::Design));
        assert_eq!(Page::from_path("/admin"), None);
    }

    #[test]
    fn test_requires_auth() {
        assert!(Page::Design.requires_auth());
        assert!(Page::Template.requires_auth());
        assert!(!Page::SignIn.requires_auth());
        assert!(!Page::Home.requires_auth());
    }

    #[test]
    fn test_access_target() {
        assert_eq!(Access::Stay.target(), None);
        assert!(!Access::Stay.is_redirect());
        assert_eq!(Access::Redirect(Page::SignIn).target(), Some(Page::SignIn));
    }
}
