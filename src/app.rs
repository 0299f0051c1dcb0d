//! One page load: fresh stores wired together plus the page's auth guard.
//!
//! Every entry page boots its own `App`, so nothing carries over between
//! pages except what the stores persisted.

use crate::auth::{AuthStore, LoginCredentials, Registration};
use crate::cards::CardStore;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::AuthError;
use crate::navigation::{Access, Navigator, Page};
use crate::storage::KeyValueStorage;
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;

pub struct App {
    page: Page,
    auth: Rc<RefCell<AuthStore>>,
    cards: CardStore,
    navigator: Box<dyn Navigator>,
    access: Access,
}

impl App {
    /// Boot `page`: restore the session, bind the card store to the current
    /// user and apply the page guard.
    ///
    /// Protected pages send anonymous users to sign-in; the sign-in and
    /// sign-up pages send signed-in users on to the design page.
    pub fn bootstrap(
        page: Page,
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        navigator: Box<dyn Navigator>,
        config: &Config,
    ) -> Self {
        let auth = AuthStore::new(storage.clone(), clock.clone())
            .with_min_password_length(config.min_password_length);
        let auth = Rc::new(RefCell::new(auth));

        let auth_for_cards = Rc::clone(&auth);
        let cards = CardStore::new(
            storage,
            clock,
            Box::new(move || auth_for_cards.borrow().user_id()),
        )
        .with_default_colors(config.default_colors.clone());

        let access = {
            let auth = auth.borrow();
            match page {
                Page::Design | Page::Template => auth.require_auth(),
                Page::SignIn | Page::SignUp => auth.check_auth_and_redirect(),
                Page::Home => Access::Stay,
            }
        };

        let mut app = Self {
            page,
            auth,
            cards,
            navigator,
            access,
        };

        match access {
            Access::Redirect(target) => {
                tracing::debug!(page = %page, target_page = %target, "entry guard redirect");
                app.navigator.navigate(target);
            }
            Access::Stay if page.requires_auth() => {
                // Load errors are kept in card_error for the view to show.
                let _ = app.cards.load_user_cards(false);
            }
            Access::Stay => {}
        }
        app
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// What the entry guard decided for this page load.
    pub fn access(&self) -> Access {
        self.access
    }

    pub fn auth(&self) -> Ref<'_, AuthStore> {
        self.auth.borrow()
    }

    pub fn cards(&self) -> &CardStore {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut CardStore {
        &mut self.cards
    }

    fn signed_in(&mut self, result: Result<Page, AuthError>) -> Result<Page, AuthError> {
        let page = result?;
        // Replaces the previous user's cards without saving them anywhere.
        let _ = self.cards.load_user_cards(true);
        self.navigator.navigate(page);
        Ok(page)
    }

    pub fn login(&mut self, credentials: &LoginCredentials) -> Result<Page, AuthError> {
        let result = self.auth.borrow_mut().login(credentials);
        self.signed_in(result)
    }

    pub fn register(&mut self, registration: &Registration) -> Result<Page, AuthError> {
        let result = self.auth.borrow_mut().register(registration);
        self.signed_in(result)
    }

    pub fn logout(&mut self) -> Page {
        let page = self.auth.borrow_mut().logout();
        // No user any more, so this only drops the in-memory cards.
        let _ = self.cards.clear_cards();
        self.navigator.navigate(page);
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDraft;
    use crate::storage::{cards_key, MemoryStorage};
    use crate::test_utils::{ManualClock, RecordingNavigator};

    struct Harness {
        storage: Arc<MemoryStorage>,
        clock: Arc<ManualClock>,
        config: Config,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                storage: Arc::new(MemoryStorage::new()),
                clock: Arc::new(ManualClock::new()),
                config: Config::default(),
            }
        }

        fn boot(&self, page: Page) -> (App, RecordingNavigator) {
            let nav = RecordingNavigator::new();
            let app = App::bootstrap(
                page,
                self.storage.clone(),
                self.clock.clone(),
                Box::new(nav.clone()),
                &self.config,
            );
            (app, nav)
        }
    }

    #[test]
    fn test_protected_page_redirects_anonymous() {
        let h = Harness::new();
        for page in [Page::Design, Page::Template] {
            let (app, nav) = h.boot(page);
            assert_eq!(app.access(), Access::Redirect(Page::SignIn));
            assert_eq!(nav.pages(), vec![Page::SignIn]);
            assert!(!app.cards().is_loaded());
        }
    }

    #[test]
    fn test_public_pages_stay_when_anonymous() {
        let h = Harness::new();
        for page in [Page::Home, Page::SignIn, Page::SignUp] {
            let (app, nav) = h.boot(page);
            assert_eq!(app.access(), Access::Stay);
            assert!(nav.pages().is_empty());
        }
    }

    #[test]
    fn test_sign_in_flow_across_pages() {
        let h = Harness::new();

        let (mut signin, nav) = h.boot(Page::SignIn);
        let page = signin
            .login(&LoginCredentials::new("alice", "password1"))
            .unwrap();
        assert_eq!(page, Page::Design);
        assert_eq!(nav.last(), Some(Page::Design));

        // Design page load: guard passes and cards load for the user
        let (mut design, nav) = h.boot(Page::Design);
        assert_eq!(design.access(), Access::Stay);
        assert!(nav.pages().is_empty());
        assert!(design.cards().is_loaded());
        let card = design
            .cards_mut()
            .create_card(&CardDraft::new("A", "B"))
            .unwrap();

        let user_id = design.auth().user_id().unwrap();
        assert!(h.storage.contains_key(&cards_key(user_id)));

        // Signed-in users skip the sign-in page
        let (signin, nav) = h.boot(Page::SignIn);
        assert_eq!(signin.access(), Access::Redirect(Page::Design));
        assert_eq!(nav.pages(), vec![Page::Design]);

        let (design, _nav) = h.boot(Page::Design);
        assert_eq!(design.cards().cards(), std::slice::from_ref(&card));
    }

    #[test]
    fn test_failed_login_does_not_navigate() {
        let h = Harness::new();
        let (mut signin, nav) = h.boot(Page::SignIn);
        assert!(signin.login(&LoginCredentials::new("alice", "short")).is_err());
        assert!(nav.pages().is_empty());
        assert_eq!(signin.auth().auth_error(), "Invalid username or password");
    }

    #[test]
    fn test_register_then_logout() {
        let h = Harness::new();
        let (mut signup, nav) = h.boot(Page::SignUp);
        signup
            .register(&Registration {
                username: "bob".into(),
                email: "bob@example.org".into(),
                password: "password123".into(),
            })
            .unwrap();
        assert_eq!(nav.last(), Some(Page::Design));

        let (mut design, nav) = h.boot(Page::Design);
        design
            .cards_mut()
            .create_card(&CardDraft::new("A", "B"))
            .unwrap();
        assert_eq!(design.logout(), Page::Home);
        assert_eq!(nav.last(), Some(Page::Home));
        assert_eq!(design.cards().card_count(), 0);

        // Cards stay persisted for the next sign-in of that user id
        assert_eq!(h.storage.len(), 1);

        let (design, nav) = h.boot(Page::Design);
        assert!(!design.auth().is_authenticated());
        assert_eq!(nav.pages(), vec![Page::SignIn]);
    }

    #[test]
    fn test_switching_user_drops_previous_cards() {
        let h = Harness::new();
        let (mut signin, _nav) = h.boot(Page::SignIn);
        signin
            .login(&LoginCredentials::new("alice", "password1"))
            .unwrap();

        let (mut design, _nav) = h.boot(Page::Design);
        let alice_id = design.auth().user_id().unwrap();
        let secret = design
            .cards_mut()
            .create_card(&CardDraft::new("alice secret", "B"))
            .unwrap();

        h.clock.advance(1_000);
        design
            .login(&LoginCredentials::new("bob", "password2"))
            .unwrap();
        let bob_id = design.auth().user_id().unwrap();
        assert_ne!(alice_id, bob_id);

        assert!(design.cards().is_loaded());
        assert_eq!(design.cards().card_count(), 0);
        assert!(design.cards().get_card_by_id(&secret.id).is_none());
        assert!(design.cards_mut().duplicate_card(&secret.id).is_err());
        assert!(design.cards_mut().update_card(&secret.id, &CardDraft::new("x", "y")).is_err());
        assert!(design.cards_mut().delete_card(&secret.id).is_err());

        design
            .cards_mut()
            .create_card(&CardDraft::new("bob card", "C"))
            .unwrap();
        let bob_json = h.storage.get(&cards_key(bob_id)).unwrap().unwrap();
        assert!(!bob_json.contains("alice secret"));
        let alice_json = h.storage.get(&cards_key(alice_id)).unwrap().unwrap();
        assert!(alice_json.contains("alice secret"));
    }

    #[test]
    fn test_config_applies_to_stores() {
        let mut h = Harness::new();
        h.config.min_password_length = 12;
        h.config.default_colors.background = "#abcdef".into();

        let (mut signin, _nav) = h.boot(Page::SignIn);
        assert!(signin
            .login(&LoginCredentials::new("alice", "password1"))
            .is_err());
        signin
            .login(&LoginCredentials::new("alice", "password1234"))
            .unwrap();

        let (mut design, _nav) = h.boot(Page::Design);
        let card = design
            .cards_mut()
            .create_card(&CardDraft::new("A", "B"))
            .unwrap();
        assert_eq!(card.colors.background, "#abcdef");
    }
}
