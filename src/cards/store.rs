//! Card store: the signed-in user's ordered card sequence.
//!
//! The whole sequence lives in memory and is written back in full under the
//! user's key after every mutation. Without a current user the store still
//! works in memory but nothing is persisted.

use super::templates::{self, TemplateCard};
use super::{Card, CardColors, CardDraft, CardId};
use crate::clock::{Clock, IdGenerator};
use crate::error::{CardError, StorageError};
use crate::storage::{cards_key, KeyValueStorage};
use std::sync::Arc;

/// Yields the id of the signed-in user, if any.
pub type UserIdProvider = Box<dyn Fn() -> Option<u64>>;

pub struct CardStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    current_user: UserIdProvider,
    ids: IdGenerator,
    default_colors: CardColors,
    cards: Vec<Card>,
    loaded: bool,
    card_error: String,
}

impl CardStore {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        current_user: UserIdProvider,
    ) -> Self {
        Self {
            storage,
            clock,
            current_user,
            ids: IdGenerator::new(),
            default_colors: CardColors::default(),
            cards: Vec::new(),
            loaded: false,
            card_error: String::new(),
        }
    }

    /// Colors used for channels a draft leaves out.
    pub fn with_default_colors(mut self, colors: CardColors) -> Self {
        self.default_colors = colors;
        self
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn card_error(&self) -> &str {
        &self.card_error
    }

    pub fn default_colors(&self) -> &CardColors {
        &self.default_colors
    }

    pub fn clear_error(&mut self) {
        self.card_error.clear();
    }

    /// Forget that cards were loaded so the next access reads storage again.
    pub fn clear_loaded_state(&mut self) {
        self.loaded = false;
    }

    fn storage_key(&self) -> Option<String> {
        (self.current_user)().map(cards_key)
    }

    fn fail<T>(&mut self, err: CardError) -> Result<T, CardError> {
        tracing::warn!(error = %err, "card action failed");
        self.card_error = err.to_string();
        Err(err)
    }

    /// Read the user's cards from storage.
    ///
    /// Does nothing if already loaded unless `force_reload` is set. Missing
    /// or unreadable data leaves an empty sequence; either way the store
    /// counts as loaded afterwards.
    pub fn load_user_cards(&mut self, force_reload: bool) -> Result<(), CardError> {
        if self.loaded && !force_reload {
            return Ok(());
        }
        self.card_error.clear();
        self.loaded = true;

        let Some(key) = self.storage_key() else {
            self.cards.clear();
            return Ok(());
        };

        let parsed = self.storage.get(&key).and_then(|stored| match stored {
            Some(json) => serde_json::from_str::<Vec<Card>>(&json).map_err(StorageError::Corrupt),
            None => Ok(Vec::new()),
        });

        match parsed {
            Ok(cards) => {
                for card in &cards {
                    if let CardId::Timestamp(id) = card.id {
                        self.ids.observe(id);
                    }
                }
                tracing::debug!(key = %key, count = cards.len(), "cards loaded");
                self.cards = cards;
                Ok(())
            }
            Err(e) => {
                tracing::error!(key = %key, error = %e, "error loading cards");
                self.cards.clear();
                self.fail(CardError::LoadFailed(e))
            }
        }
    }

    /// Write the full sequence. `Ok(false)` means there was no user to save for.
    fn save_cards_to_storage(&self) -> Result<bool, StorageError> {
        let Some(key) = self.storage_key() else {
            return Ok(false);
        };
        let json = serde_json::to_string(&self.cards).map_err(StorageError::Encode)?;
        self.storage.set(&key, &json)?;
        tracing::debug!(key = %key, count = self.cards.len(), "cards saved");
        Ok(true)
    }

    /// Persist, or restore `previous` if the write fails.
    fn commit(&mut self, previous: Vec<Card>) -> Result<(), CardError> {
        match self.save_cards_to_storage() {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, "error saving cards");
                self.cards = previous;
                self.fail(CardError::SaveFailed(e))
            }
        }
    }

    fn position(&self, id: &CardId) -> Option<usize> {
        self.cards.iter().position(|card| &card.id == id)
    }

    pub fn create_card(&mut self, draft: &CardDraft) -> Result<Card, CardError> {
        self.card_error.clear();

        if !self.loaded {
            // Load failures are recorded in card_error; creating still proceeds.
            let _ = self.load_user_cards(false);
        }

        let Some((title, content)) = draft.validated() else {
            return self.fail(CardError::MissingFields);
        };

        let now = self.clock.now();
        let colors = draft
            .colors
            .as_ref()
            .map(|c| c.resolve(&self.default_colors))
            .unwrap_or_else(|| self.default_colors.clone());
        let card = Card {
            id: CardId::Timestamp(self.ids.next_id(now)),
            title,
            content,
            created_at: now,
            updated_at: now,
            colors,
            is_template: None,
        };

        let previous = self.cards.clone();
        self.cards.push(card.clone());
        self.commit(previous)?;

        tracing::info!(id = %card.id, "card created");
        Ok(card)
    }

    pub fn update_card(&mut self, id: &CardId, draft: &CardDraft) -> Result<Card, CardError> {
        self.card_error.clear();

        let Some((title, content)) = draft.validated() else {
            return self.fail(CardError::MissingFields);
        };
        let Some(index) = self.position(id) else {
            return self.fail(CardError::NotFound);
        };

        let previous = self.cards.clone();
        let now = self.clock.now();
        let card = &mut self.cards[index];
        card.title = title;
        card.content = content;
        card.updated_at = now;
        if let Some(over) = &draft.colors {
            card.colors = over.resolve(&card.colors);
        }
        let updated = card.clone();
        self.commit(previous)?;

        tracing::info!(id = %updated.id, "card updated");
        Ok(updated)
    }

    pub fn delete_card(&mut self, id: &CardId) -> Result<(), CardError> {
        self.card_error.clear();

        let Some(index) = self.position(id) else {
            return self.fail(CardError::NotFound);
        };

        let previous = self.cards.clone();
        self.cards.remove(index);
        self.commit(previous)?;

        tracing::info!(id = %id, "card deleted");
        Ok(())
    }

    pub fn get_card_by_id(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|card| &card.id == id)
    }

    /// Append a copy of a card with a fresh id and timestamps.
    pub fn duplicate_card(&mut self, id: &CardId) -> Result<Card, CardError> {
        self.card_error.clear();

        let Some(original) = self.get_card_by_id(id).cloned() else {
            return self.fail(CardError::NotFound);
        };

        let now = self.clock.now();
        let copy = Card {
            id: CardId::Timestamp(self.ids.next_id(now)),
            title: format!("{} (Copy)", original.title),
            created_at: now,
            updated_at: now,
            ..original
        };

        let previous = self.cards.clone();
        self.cards.push(copy.clone());
        self.commit(previous)?;

        tracing::info!(source = %id, id = %copy.id, "card duplicated");
        Ok(copy)
    }

    /// Empty the sequence and write the empty list.
    pub fn clear_cards(&mut self) -> Result<(), CardError> {
        self.card_error.clear();

        let previous = std::mem::take(&mut self.cards);
        let was_loaded = self.loaded;
        self.loaded = false;
        if let Err(e) = self.commit(previous) {
            self.loaded = was_loaded;
            return Err(e);
        }
        Ok(())
    }

    pub fn get_template_cards(&self) -> Vec<TemplateCard> {
        templates::template_cards()
    }

    /// Create a new independent card from a catalog entry.
    pub fn create_from_template(&mut self, template: &TemplateCard) -> Result<Card, CardError> {
        let draft = template.to_draft(&self.default_colors);
        self.create_card(&draft)
    }
}
