//! Non-repeating random selection of (image, message) pairs.
//!
//! A [`SelectionSession`] remembers which ids it has already shown and draws
//! from the unseen part of each pool first. Once a pool is exhausted the next
//! draw comes from the whole pool and the seen set restarts from that single
//! pick. Messages are mandatory: with no messages nothing is shown at all.
//! Images are optional.
//!
//! [`Presenter`] wraps a session with the reveal behaviour of the landing
//! page: clear the current pair, show a loading state for a fixed delay, then
//! draw.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::time::Duration;

use crate::models::{Image, Message};

/// Delay before a pair is revealed
pub const REVEAL_DELAY: Duration = Duration::from_millis(1500);
/// Delay used while the image pool has not been loaded yet
pub const COLD_REVEAL_DELAY: Duration = Duration::from_secs(3);

/// Anything with a stable numeric id
pub trait Identified {
    fn id(&self) -> i64;
}

impl Identified for Image {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Message {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Draw one item, preferring ids not yet in `shown`.
pub fn draw<'a, T, R>(pool: &'a [T], shown: &mut HashSet<i64>, rng: &mut R) -> Option<&'a T>
where
    T: Identified,
    R: Rng + ?Sized,
{
    let remaining: Vec<&T> = pool.iter().filter(|item| !shown.contains(&item.id())).collect();

    if let Some(item) = remaining.choose(rng) {
        shown.insert(item.id());
        return Some(*item);
    }

    // Pool exhausted: start a new round with this pick
    let item = pool.choose(rng)?;
    shown.clear();
    shown.insert(item.id());
    Some(item)
}

/// A displayed pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub image: Option<Image>,
    pub message: Message,
}

/// Per-session record of what has been shown. Not persisted, not shared.
#[derive(Debug, Default)]
pub struct SelectionSession {
    shown_image_ids: HashSet<i64>,
    shown_message_ids: HashSet<i64>,
    images_present: bool,
    messages_present: bool,
}

impl SelectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown_image_ids(&self) -> &HashSet<i64> {
        &self.shown_image_ids
    }

    pub fn shown_message_ids(&self) -> &HashSet<i64> {
        &self.shown_message_ids
    }

    /// Record the current pools. A pool going from empty to non-empty clears its seen set.
    pub fn observe(&mut self, images: &[Image], messages: &[Message]) {
        observe_pool(!images.is_empty(), &mut self.images_present, &mut self.shown_image_ids);
        observe_pool(!messages.is_empty(), &mut self.messages_present, &mut self.shown_message_ids);
    }

    /// Choose the next pair, or `None` when there are no messages
    pub fn next_pair<R: Rng + ?Sized>(
        &mut self,
        images: &[Image],
        messages: &[Message],
        rng: &mut R,
    ) -> Option<Pair> {
        self.observe(images, messages);

        let message = draw(messages, &mut self.shown_message_ids, rng)?.clone();
        let image = draw(images, &mut self.shown_image_ids, rng).cloned();

        Some(Pair { image, message })
    }
}

fn observe_pool(present: bool, was_present: &mut bool, shown: &mut HashSet<i64>) {
    if present && !*was_present {
        shown.clear();
    }
    *was_present = present;
}

/// Reveal delay for the current load state of the image pool
pub fn reveal_delay(images_loaded: bool) -> Duration {
    if images_loaded {
        REVEAL_DELAY
    } else {
        COLD_REVEAL_DELAY
    }
}

/// Clears the loading flag on every exit path, including cancellation
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn enter(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Drives the generate / show-another triggers of the landing page
pub struct Presenter<R> {
    session: SelectionSession,
    rng: R,
    current: Option<Pair>,
    loading: bool,
    visible: bool,
}

impl<R: Rng> Presenter<R> {
    pub fn new(rng: R) -> Self {
        Self {
            session: SelectionSession::new(),
            rng,
            current: None,
            loading: false,
            visible: false,
        }
    }

    pub fn session(&self) -> &SelectionSession {
        &self.session
    }

    pub fn current(&self) -> Option<&Pair> {
        self.current.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// First reveal: makes the content area visible, then reveals a pair.
    /// `images` is `None` while the image pool is still loading.
    pub async fn generate(&mut self, images: Option<&[Image]>, messages: &[Message]) -> Option<&Pair> {
        self.visible = true;
        self.reveal(images, messages).await
    }

    /// Replace the current pair with a fresh one
    pub async fn show_another(&mut self, images: Option<&[Image]>, messages: &[Message]) -> Option<&Pair> {
        self.reveal(images, messages).await
    }

    async fn reveal(&mut self, images: Option<&[Image]>, messages: &[Message]) -> Option<&Pair> {
        self.current = None;
        {
            let _loading = LoadingGuard::enter(&mut self.loading);
            tokio::time::sleep(reveal_delay(images.is_some())).await;
            self.current = self
                .session
                .next_pair(images.unwrap_or(&[]), messages, &mut self.rng);
        }
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn images(ids: &[i64]) -> Vec<Image> {
        ids.iter()
            .map(|&id| Image {
                id,
                filename: format!("{}.png", id),
                data: String::new(),
            })
            .collect()
    }

    fn messages(ids: &[i64]) -> Vec<Message> {
        ids.iter()
            .map(|&id| Message {
                id,
                text: format!("message {}", id),
            })
            .collect()
    }

    #[test]
    fn full_round_visits_every_id_once() {
        let pool = images(&[1, 2, 3, 4, 5, 6, 7]);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut shown = HashSet::new();
            let mut seen = Vec::new();
            for _ in 0..pool.len() {
                seen.push(draw(&pool, &mut shown, &mut rng).unwrap().id);
            }
            seen.sort_unstable();
            assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 7], "seed {}", seed);
        }
    }

    #[test]
    fn exhausted_pool_resets_to_the_fresh_pick() {
        let pool = images(&[1, 2, 3]);
        let mut rng = StdRng::seed_from_u64(7);
        let mut shown = HashSet::from([1, 2, 3]);

        let picked = draw(&pool, &mut shown, &mut rng).unwrap().id;

        assert!([1, 2, 3].contains(&picked));
        assert_eq!(shown, HashSet::from([picked]));
    }

    #[test]
    fn empty_pool_yields_nothing() {
        let pool: Vec<Image> = Vec::new();
        let mut shown = HashSet::new();
        assert!(draw(&pool, &mut shown, &mut StdRng::seed_from_u64(1)).is_none());
        assert!(shown.is_empty());
    }

    #[test]
    fn missing_messages_suppress_the_whole_pair() {
        let mut session = SelectionSession::new();
        let mut rng = StdRng::seed_from_u64(3);

        let pair = session.next_pair(&images(&[1, 2]), &[], &mut rng);

        assert!(pair.is_none());
        assert!(session.shown_image_ids().is_empty());
    }

    #[test]
    fn missing_images_still_show_a_message() {
        let mut session = SelectionSession::new();
        let mut rng = StdRng::seed_from_u64(3);

        let pair = session.next_pair(&[], &messages(&[9]), &mut rng).unwrap();

        assert!(pair.image.is_none());
        assert_eq!(pair.message.id, 9);
    }

    #[test]
    fn pools_are_tracked_independently() {
        let mut session = SelectionSession::new();
        let mut rng = StdRng::seed_from_u64(11);
        let imgs = images(&[1, 2]);
        let msgs = messages(&[10, 20, 30]);

        for _ in 0..3 {
            session.next_pair(&imgs, &msgs, &mut rng).unwrap();
        }

        // Three messages fit in one round; two images needed a reset on the third draw
        assert_eq!(session.shown_message_ids().len(), 3);
        assert_eq!(session.shown_image_ids().len(), 1);
    }

    #[test]
    fn refilled_pool_starts_a_fresh_history() {
        let mut session = SelectionSession::new();
        let mut rng = StdRng::seed_from_u64(5);
        let msgs = messages(&[1]);

        session.next_pair(&images(&[1, 2, 3]), &msgs, &mut rng).unwrap();
        assert_eq!(session.shown_image_ids().len(), 1);

        session.observe(&[], &msgs);
        session.observe(&images(&[4]), &msgs);
        assert!(session.shown_image_ids().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_waits_then_shows_a_pair() {
        let mut presenter = Presenter::new(StdRng::seed_from_u64(1));
        let imgs = images(&[1, 2]);
        let msgs = messages(&[1]);

        let start = tokio::time::Instant::now();
        let pair = presenter.generate(Some(imgs.as_slice()), &msgs).await.cloned();
        let elapsed = start.elapsed();

        assert!(elapsed >= REVEAL_DELAY && elapsed < COLD_REVEAL_DELAY);
        assert!(pair.unwrap().image.is_some());
        assert!(presenter.is_visible());
        assert!(!presenter.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn unloaded_images_use_the_longer_delay() {
        let mut presenter = Presenter::new(StdRng::seed_from_u64(2));
        let msgs = messages(&[1]);

        let start = tokio::time::Instant::now();
        let pair = presenter.show_another(None, &msgs).await.cloned().unwrap();

        assert!(start.elapsed() >= COLD_REVEAL_DELAY);
        assert!(pair.image.is_none());
        assert!(!presenter.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_reveal_clears_loading() {
        let mut presenter = Presenter::new(StdRng::seed_from_u64(3));
        let no_images: Vec<Image> = Vec::new();
        let msgs = messages(&[1, 2]);

        presenter.show_another(Some(no_images.as_slice()), &msgs).await;
        assert!(presenter.current().is_some());

        let cancelled = tokio::time::timeout(
            Duration::from_millis(100),
            presenter.show_another(Some(no_images.as_slice()), &msgs),
        )
        .await;

        assert!(cancelled.is_err());
        assert!(!presenter.is_loading());
        assert!(presenter.current().is_none());
    }
}
