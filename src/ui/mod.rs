//! Terminal rendition of the web front-end: a landing page and a login form.

pub mod landing;
pub mod login_form;

pub use login_form::{LoginForm, Navigation};

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" | "" => Some(Route::Landing),
            "/login" | "/login/" => Some(Route::Login),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Landing.path(), "/");
        assert_eq!(Route::Login.path(), "/login");
    }

    #[test]
    fn test_route_from_path() {
        assert_eq!(Route::from_path("/"), Some(Route::Landing));
        assert_eq!(Route::from_path("/login"), Some(Route::Login));
        assert_eq!(Route::from_path("/appointments"), None);
    }
}
