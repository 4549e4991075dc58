use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;

use crate::catalog;
use crate::cli::{ListArgs, ReadArgs};
use crate::flow::{ReaderFlow, Screen};
use crate::gate::GateState;
use crate::persist::{LocalFsStorage, SettingsStorage};
use crate::store::SettingsStore;

pub async fn list(data_dir: &Path, args: ListArgs) -> anyhow::Result<()> {
    let (store, _storage) = open(data_dir).await?;
    let settings = store.get();
    let query = args.query.unwrap_or_default();
    let categories = catalog::filter(&settings.categories, &query);

    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "{} ({} books)",
        settings.site_name,
        catalog::total_books(&settings.categories)
    )?;
    if categories.is_empty() {
        writeln!(out, "no results for {query:?}")?;
        return Ok(());
    }
    for category in categories.iter() {
        writeln!(out)?;
        writeln!(out, "{} {} [{}]", category.emoji, category.title, category.id)?;
        for book in &category.books {
            writeln!(
                out,
                "  {}  {} / {}  (parts: {}, views: {})",
                book.id,
                book.title,
                book.author,
                book.parts.len(),
                book.click_count
            )?;
        }
    }
    Ok(())
}

pub async fn read(data_dir: &Path, args: ReadArgs) -> anyhow::Result<()> {
    let (store, storage) = open(data_dir).await?;
    let key = catalog::locate_book(
        &store.get().categories,
        &args.book,
        args.category.as_deref(),
    )
    .with_context(|| format!("book not found: {}", args.book))?;

    let mut flow = ReaderFlow::new(store, storage, Duration::from_millis(args.tick_ms));
    flow.select_book(&key).await?;

    if let Screen::PickingPart(picker) = flow.screen() {
        let Some(part_id) = args.part.as_deref() else {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{} has {} parts:", picker.book.title, picker.parts().len())?;
            for part in picker.parts() {
                writeln!(out, "  {}  {}", part.id, part.title)?;
            }
            return Ok(());
        };
        flow.choose_part(part_id)?;
    }

    let Screen::Gated(gated) = flow.screen() else {
        anyhow::bail!("book {} has no readable content", key.book_id);
    };
    if matches!(gated.session.state(), GateState::AwaitingWatch { .. }) {
        let watch_url = flow.watch()?;
        eprintln!("watch first: {watch_url}");
    }
    loop {
        let state = flow.tick().await?;
        match state {
            GateState::CountingDown { remaining } => {
                tracing::info!(remaining, "ad unlocks soon");
            }
            GateState::Unlocked => break,
            GateState::AwaitingWatch { .. } => anyhow::bail!("ad gate is still waiting for watch"),
        }
    }

    let finished = flow.activate_ad_link()?;
    match &finished.ad_url {
        Some(url) => eprintln!("ad: {url}"),
        None => tracing::warn!("no ad destination is configured"),
    }

    let Screen::Reading(viewer) = flow.screen() else {
        anyhow::bail!("book viewer did not open");
    };
    match args.download {
        Some(dir) => {
            let path = viewer.download(&PathBuf::from(dir)).await?;
            println!("{}", path.display());
        }
        None => viewer.print(&mut std::io::stdout().lock())?,
    }
    Ok(())
}

pub async fn promotions(data_dir: &Path) -> anyhow::Result<()> {
    let (store, _storage) = open(data_dir).await?;
    let settings = store.get();

    let mut out = std::io::stdout().lock();
    if settings.promotional_ads.is_empty() {
        writeln!(out, "no promotions right now")?;
        return Ok(());
    }
    for ad in &settings.promotional_ads {
        writeln!(out, "{}  {}", ad.id, ad.title)?;
        writeln!(out, "  {}", ad.description)?;
        writeln!(out, "  image: {}", ad.image_url)?;
        writeln!(out, "  link: {}", ad.link_url)?;
    }
    Ok(())
}

pub async fn about(data_dir: &Path) -> anyhow::Result<()> {
    let (store, _storage) = open(data_dir).await?;
    let settings = store.get();

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", settings.about.title)?;
    writeln!(out)?;
    writeln!(out, "{}", settings.about.content)?;
    writeln!(out)?;
    writeln!(out, "{}", settings.site_name)?;
    writeln!(
        out,
        "{} <{}>",
        settings.developer.name, settings.developer.email
    )?;
    writeln!(out, "{}", settings.developer.copyright)?;
    Ok(())
}

pub(crate) async fn open(
    data_dir: &Path,
) -> anyhow::Result<(Arc<SettingsStore>, Arc<dyn SettingsStorage>)> {
    let storage: Arc<dyn SettingsStorage> = Arc::new(LocalFsStorage::new(data_dir));
    let store = SettingsStore::open(storage.as_ref())
        .await
        .with_context(|| format!("open settings in {}", data_dir.display()))?;
    Ok((Arc::new(store), storage))
}
