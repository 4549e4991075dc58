use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom as _;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::model::{AdSettings, ContentPart};

/// Ad parameters for one content part after applying overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAd {
    pub ad_url: Option<String>,
    pub watch_url: Option<String>,
    pub duration: u32,
}

/// Part-level value first, then a random pick from the settings-level list,
/// then the single settings-level default. Empty strings count as unset.
pub fn resolve_ad<R: Rng + ?Sized>(part: &ContentPart, ad: &AdSettings, rng: &mut R) -> ResolvedAd {
    let ad_url = non_empty(part.ad_url.as_deref())
        .or_else(|| pick(&ad.alternate_urls, rng))
        .or_else(|| non_empty(Some(ad.url.as_str())));
    let watch_url = non_empty(part.watch_url.as_deref()).or_else(|| pick(&ad.watch_urls, rng));
    let duration = part.duration.unwrap_or(ad.duration);

    ResolvedAd {
        ad_url,
        watch_url,
        duration,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn pick<R: Rng + ?Sized>(candidates: &[String], rng: &mut R) -> Option<String> {
    let usable: Vec<&String> = candidates.iter().filter(|c| !c.trim().is_empty()).collect();
    usable.choose(rng).map(|url| url.trim().to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    AwaitingWatch { watch_url: String, queued: u32 },
    CountingDown { remaining: u32 },
    Unlocked,
}

/// Signal emitted once when the unlocked ad link is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdFinished {
    pub ad_url: Option<String>,
}

/// Pure state machine; time is fed in through [`AdGate::tick`].
#[derive(Debug, Clone)]
pub struct AdGate {
    state: GateState,
    ad_url: Option<String>,
    finished: bool,
}

impl AdGate {
    pub fn start(resolved: ResolvedAd) -> Self {
        let state = match resolved.watch_url {
            Some(watch_url) => GateState::AwaitingWatch {
                watch_url,
                queued: resolved.duration,
            },
            None => counting_down(resolved.duration),
        };
        Self {
            state,
            ad_url: resolved.ad_url,
            finished: false,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn ad_url(&self) -> Option<&str> {
        self.ad_url.as_deref()
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Unlocked
    }

    /// Opens the watch-first video, returning its URL, and starts the countdown.
    pub fn watch(&mut self) -> anyhow::Result<String> {
        let GateState::AwaitingWatch { watch_url, queued } = &self.state else {
            anyhow::bail!("ad gate is not waiting for a watch action");
        };
        let watch_url = watch_url.clone();
        self.state = counting_down(*queued);
        Ok(watch_url)
    }

    pub fn tick(&mut self) -> &GateState {
        if let GateState::CountingDown { remaining } = self.state {
            self.state = counting_down(remaining.saturating_sub(1));
        }
        &self.state
    }

    pub fn activate_link(&mut self) -> anyhow::Result<AdFinished> {
        if !self.is_unlocked() {
            anyhow::bail!("ad link is locked until the countdown finishes");
        }
        if self.finished {
            anyhow::bail!("ad link was already activated");
        }
        self.finished = true;
        Ok(AdFinished {
            ad_url: self.ad_url.clone(),
        })
    }
}

fn counting_down(remaining: u32) -> GateState {
    if remaining == 0 {
        GateState::Unlocked
    } else {
        GateState::CountingDown { remaining }
    }
}

/// One-shot tick timer, re-armed by the caller after every tick.
///
/// Dropping the countdown cancels any pending tick.
#[derive(Debug)]
pub struct Countdown {
    period: Duration,
    token: CancellationToken,
    tx: mpsc::UnboundedSender<()>,
    rx: mpsc::UnboundedReceiver<()>,
    armed: bool,
}

impl Countdown {
    pub fn new(period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            period,
            token: CancellationToken::new(),
            tx,
            rx,
            armed: false,
        }
    }

    fn arm(&mut self) {
        if self.armed {
            return;
        }
        let token = self.token.clone();
        let tx = self.tx.clone();
        let period = self.period;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(period) => {
                    let _ = tx.send(());
                }
            }
        });
        self.armed = true;
    }

    /// Waits for the next tick, scheduling it first if none is pending.
    pub async fn next_tick(&mut self) -> anyhow::Result<()> {
        self.arm();
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("countdown timer channel closed"))?;
        self.armed = false;
        Ok(())
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// An [`AdGate`] bound to the timer that drives it.
#[derive(Debug)]
pub struct GateSession {
    gate: AdGate,
    countdown: Countdown,
}

impl GateSession {
    pub fn new(resolved: ResolvedAd, tick_period: Duration) -> Self {
        Self {
            gate: AdGate::start(resolved),
            countdown: Countdown::new(tick_period),
        }
    }

    pub fn gate(&self) -> &AdGate {
        &self.gate
    }

    pub fn state(&self) -> &GateState {
        self.gate.state()
    }

    pub fn watch(&mut self) -> anyhow::Result<String> {
        self.gate.watch()
    }

    /// Advances the countdown by one scheduled tick.
    pub async fn tick(&mut self) -> anyhow::Result<&GateState> {
        if matches!(self.gate.state(), GateState::AwaitingWatch { .. }) {
            anyhow::bail!("countdown starts after the watch-first video is opened");
        }
        if !self.gate.is_unlocked() {
            self.countdown.next_tick().await?;
            let state = self.gate.tick();
            tracing::debug!(?state, "ad gate tick");
        }
        Ok(self.gate.state())
    }

    pub async fn wait_until_unlocked(&mut self) -> anyhow::Result<()> {
        while !self.gate.is_unlocked() {
            self.tick().await?;
        }
        Ok(())
    }

    pub fn activate_link(&mut self) -> anyhow::Result<AdFinished> {
        self.gate.activate_link()
    }
}
