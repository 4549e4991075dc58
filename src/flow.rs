use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;

use crate::catalog::{self, BookKey};
use crate::gate::{AdFinished, GateSession, GateState, resolve_ad};
use crate::model::{Book, ContentPart};
use crate::persist::SettingsStorage;
use crate::store::SettingsStore;
use crate::viewer::BookViewer;

/// Lets the reader choose which part of a multi-part book to unlock.
#[derive(Debug, Clone)]
pub struct PartPicker {
    pub key: BookKey,
    pub book: Book,
}

impl PartPicker {
    pub fn parts(&self) -> &[ContentPart] {
        &self.book.parts
    }
}

#[derive(Debug)]
pub struct GatedPart {
    pub book: Book,
    pub part: ContentPart,
    pub session: GateSession,
}

#[derive(Debug)]
pub enum Screen {
    Browsing,
    PickingPart(PartPicker),
    Gated(Box<GatedPart>),
    Reading(BookViewer),
}

/// Book selection → optional part picker → ad gate → viewer.
pub struct ReaderFlow {
    store: Arc<SettingsStore>,
    storage: Arc<dyn SettingsStorage>,
    tick_period: Duration,
    screen: Screen,
}

impl ReaderFlow {
    pub fn new(
        store: Arc<SettingsStore>,
        storage: Arc<dyn SettingsStorage>,
        tick_period: Duration,
    ) -> Self {
        Self {
            store,
            storage,
            tick_period,
            screen: Screen::Browsing,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Counts the view, persists it, then routes by the number of parts.
    pub async fn select_book(&mut self, key: &BookKey) -> anyhow::Result<&Screen> {
        let current = self.store.get();
        if catalog::find_book(&current.categories, key).is_none() {
            anyhow::bail!("book not found: {}/{}", key.category_id, key.book_id);
        }

        let next = catalog::record_selection(&current, key);
        let book = catalog::find_book(&next.categories, key)
            .cloned()
            .context("selected book vanished after view count update")?;
        self.storage
            .save(&next)
            .await
            .context("persist view count")?;
        self.store.replace(next);

        tracing::info!(
            category = %key.category_id,
            book = %key.book_id,
            views = book.click_count,
            parts = book.parts.len(),
            "book selected"
        );

        self.screen = match book.parts.len() {
            0 => {
                tracing::debug!(book = %key.book_id, "book has no parts; nothing to open");
                Screen::Browsing
            }
            1 => {
                let part = book.parts[0].clone();
                self.gate(book, part)
            }
            _ => Screen::PickingPart(PartPicker {
                key: key.clone(),
                book,
            }),
        };
        Ok(&self.screen)
    }

    pub fn choose_part(&mut self, part_id: &str) -> anyhow::Result<&Screen> {
        let Screen::PickingPart(picker) = &self.screen else {
            anyhow::bail!("no content picker is open");
        };
        let part = picker
            .parts()
            .iter()
            .find(|part| part.id == part_id)
            .cloned()
            .with_context(|| format!("unknown part {part_id:?} in book {}", picker.book.id))?;
        let book = picker.book.clone();

        self.screen = self.gate(book, part);
        Ok(&self.screen)
    }

    pub fn watch(&mut self) -> anyhow::Result<String> {
        let watch_url = self.gated_mut()?.session.watch()?;
        tracing::info!(url = %watch_url, "opened watch-first video");
        Ok(watch_url)
    }

    pub async fn tick(&mut self) -> anyhow::Result<GateState> {
        let state = self.gated_mut()?.session.tick().await?;
        Ok(state.clone())
    }

    pub async fn wait_until_unlocked(&mut self) -> anyhow::Result<()> {
        self.gated_mut()?.session.wait_until_unlocked().await
    }

    /// Follows the unlocked ad link and opens the viewer for the gated part.
    pub fn activate_ad_link(&mut self) -> anyhow::Result<AdFinished> {
        let gated = self.gated_mut()?;
        let finished = gated.session.activate_link()?;
        let viewer = BookViewer::open(&gated.book, &gated.part);
        tracing::info!(ad_url = ?finished.ad_url, "ad finished");

        self.screen = Screen::Reading(viewer);
        Ok(finished)
    }

    /// Closes whatever is open. A discarded gate cancels its pending tick.
    pub fn close(&mut self) {
        self.screen = Screen::Browsing;
    }

    fn gate(&self, book: Book, part: ContentPart) -> Screen {
        let settings = self.store.get();
        let resolved = resolve_ad(&part, &settings.ad, &mut rand::rng());
        tracing::debug!(part = %part.id, ?resolved, "ad gate started");
        Screen::Gated(Box::new(GatedPart {
            book,
            part,
            session: GateSession::new(resolved, self.tick_period),
        }))
    }

    fn gated_mut(&mut self) -> anyhow::Result<&mut GatedPart> {
        match &mut self.screen {
            Screen::Gated(gated) => Ok(gated),
            _ => anyhow::bail!("no ad gate is open"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_settings;
    use crate::persist::MemoryStorage;

    fn flow() -> (ReaderFlow, Arc<SettingsStore>, Arc<MemoryStorage>) {
        let store = Arc::new(SettingsStore::new(default_settings()));
        let storage = Arc::new(MemoryStorage::new());
        let flow = ReaderFlow::new(
            Arc::clone(&store),
            Arc::clone(&storage) as Arc<dyn SettingsStorage>,
            Duration::from_secs(1),
        );
        (flow, store, storage)
    }

    fn key(category_id: &str, book_id: &str) -> BookKey {
        BookKey {
            category_id: category_id.to_owned(),
            book_id: book_id.to_owned(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn granada_scenario_end_to_end() -> anyhow::Result<()> {
        let (mut flow, store, storage) = flow();
        let settings = store.get();
        let found = catalog::filter(&settings.categories, "غرناطة");
        assert_eq!(found.len(), 1);
        let granada = key(&found[0].id, &found[0].books[0].id);

        let Screen::PickingPart(picker) = flow.select_book(&granada).await? else {
            panic!("expected the content picker");
        };
        assert_eq!(picker.parts().len(), 3);

        let Screen::Gated(gated) = flow.choose_part("ar1p1")? else {
            panic!("expected the ad gate");
        };
        assert_eq!(gated.part.id, "ar1p1");
        assert!(matches!(
            gated.session.state(),
            GateState::AwaitingWatch { queued: 20, .. }
        ));

        flow.watch()?;
        assert_eq!(flow.tick().await?, GateState::CountingDown { remaining: 19 });
        flow.wait_until_unlocked().await?;

        let finished = flow.activate_ad_link()?;
        assert_eq!(
            finished.ad_url.as_deref(),
            Some("https://example.com/ad-granada")
        );
        let Screen::Reading(viewer) = flow.screen() else {
            panic!("expected the book viewer");
        };
        assert_eq!(viewer.content, "محتوى الجزء الأول من رواية ثلاثية غرناطة...");

        let views = |s: &crate::model::AppSettings| {
            catalog::find_book(&s.categories, &granada).unwrap().click_count
        };
        assert_eq!(views(&store.get()), 1);
        assert_eq!(views(&storage.load().await?.unwrap()), 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn single_part_book_goes_straight_to_the_gate() -> anyhow::Result<()> {
        let (mut flow, store, _storage) = flow();
        let Screen::Gated(gated) = flow.select_book(&key("c2", "en1")).await? else {
            panic!("expected the ad gate");
        };
        assert_eq!(gated.session.state(), &GateState::CountingDown { remaining: 20 });
        assert_eq!(gated.session.gate().ad_url(), Some("https://google.com"));

        flow.wait_until_unlocked().await?;
        flow.activate_ad_link()?;
        assert!(flow.activate_ad_link().is_err());

        let settings = store.get();
        for category in &settings.categories {
            for book in &category.books {
                let expected = u64::from(book.id == "en1");
                assert_eq!(book.click_count, expected, "book {}", book.id);
            }
        }
        Ok(())
    }

    #[tokio::test]
    async fn picker_only_gates_the_chosen_part() -> anyhow::Result<()> {
        let (mut flow, _store, _storage) = flow();
        flow.select_book(&key("c1", "ar1")).await?;

        assert!(flow.choose_part("missing").is_err());
        assert!(matches!(flow.screen(), Screen::PickingPart(_)));

        let Screen::Gated(gated) = flow.choose_part("ar1p2")? else {
            panic!("expected the ad gate");
        };
        assert_eq!(gated.part.id, "ar1p2");
        assert_eq!(gated.session.state(), &GateState::CountingDown { remaining: 20 });

        flow.close();
        assert!(matches!(flow.screen(), Screen::Browsing));
        assert!(flow.watch().is_err());
        Ok(())
    }

    struct RejectingStorage;

    #[async_trait::async_trait]
    impl SettingsStorage for RejectingStorage {
        async fn load(&self) -> anyhow::Result<Option<crate::model::AppSettings>> {
            Ok(None)
        }

        async fn save(&self, _settings: &crate::model::AppSettings) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }

        async fn clear(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn failed_save_leaves_view_count_unpublished() {
        let store = Arc::new(SettingsStore::new(default_settings()));
        let mut flow = ReaderFlow::new(
            Arc::clone(&store),
            Arc::new(RejectingStorage),
            Duration::from_secs(1),
        );
        let en1 = key("c2", "en1");

        let err = flow.select_book(&en1).await.unwrap_err();
        assert!(format!("{err:#}").contains("persist view count: disk full"));
        assert!(matches!(flow.screen(), Screen::Browsing));
        let book = catalog::find_book(&store.get().categories, &en1).cloned().unwrap();
        assert_eq!(book.click_count, 0);
    }

    #[tokio::test]
    async fn empty_book_degrades_silently() -> anyhow::Result<()> {
        let mut settings = default_settings();
        settings.categories[0].books[1].parts.clear();
        let store = Arc::new(SettingsStore::new(settings));
        let storage: Arc<dyn SettingsStorage> = Arc::new(MemoryStorage::new());
        let mut flow = ReaderFlow::new(Arc::clone(&store), storage, Duration::from_secs(1));

        let screen = flow.select_book(&key("c1", "ar2")).await?;
        assert!(matches!(screen, Screen::Browsing));
        assert_eq!(store.get().categories[0].books[1].click_count, 1);

        assert!(flow.select_book(&key("c1", "nope")).await.is_err());
        Ok(())
    }
}
