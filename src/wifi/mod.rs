//! 802.11 reconnaissance engine. Owns the capture device, the station
//! registry, per-address traffic counters and the AP/client filters.

pub mod classify;
pub mod deauth;
pub mod show;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use pcap::{Activated, Capture};
use pnet::util::MacAddr;
use tokio::task::JoinHandle;

use crate::config::ReconConfig;
use crate::error::{ReconError, Result};
use crate::network::Interface;
use crate::network::alias::AliasStore;
use crate::network::endpoint::Endpoint;
use crate::network::registry::{EndpointCallback, Registry, WiFi};
use crate::network::sorting::SortBy;
use crate::network::stats::TrafficStats;
use crate::packet::CapturedFrame;
use crate::packet::forge::{Dot11Forger, FrameForger};
use crate::pcap::{CaptureHandle, FrameInjector};

use classify::{discover_access_point, discover_client, update_stats};
use deauth::{BurstStats, send_deauth_burst};
use show::ShowContext;

/// Set once a capture run has been asked to stop. Each run owns its own token.
type StopToken = Arc<AtomicBool>;

/// State touched by both the capture loop and the control plane.
struct Shared {
    wifi: Registry<WiFi>,
    stats: TrafficStats,
    access_point: Mutex<Option<MacAddr>>,
    client: Mutex<Option<MacAddr>>,
    /// Token of the active run, `None` while idle.
    current_run: Mutex<Option<StopToken>>,
}

impl Shared {
    fn process(&self, data: &[u8]) {
        let frame = CapturedFrame::decode(data);
        update_stats(&frame, &self.stats);

        // Held through classification so a filter change cannot land mid-frame.
        let access_point = self.access_point.lock();
        match *access_point {
            None => {
                discover_access_point(&frame, &self.wifi);
            }
            Some(bss) => {
                discover_client(bss, &frame, &self.wifi);
            }
        }
    }

    /// Retire `token`, clearing the active run only if it is still this one.
    fn finish_run(&self, token: &StopToken) {
        token.store(true, Ordering::SeqCst);
        let mut current = self.current_run.lock();
        if current
            .as_ref()
            .is_some_and(|active| Arc::ptr_eq(active, token))
        {
            *current = None;
        }
    }
}

fn capture_loop<T: Activated + ?Sized>(mut capture: Capture<T>, shared: &Shared, stop: &StopToken) {
    let mut frames: u64 = 0;

    while !stop.load(Ordering::SeqCst) {
        match capture.next_packet() {
            Ok(packet) => {
                // A read that outlived its run must not count.
                if stop.load(Ordering::SeqCst) {
                    break;
                }
                frames += 1;
                shared.process(packet.data);
            }
            Err(pcap::Error::TimeoutExpired) => continue,
            Err(pcap::Error::NoMorePackets) => {
                tracing::info!("End of capture reached after {} frames", frames);
                break;
            }
            Err(e) => {
                tracing::error!("Capture read failed after {} frames: {}", frames, e);
                break;
            }
        }
    }

    shared.finish_run(stop);
    tracing::debug!("Capture loop exited");
}

fn log_new(endpoint: &Endpoint) {
    match endpoint.name.as_deref() {
        Some(name) => tracing::info!(
            "[wifi] new station {} ({}) on channel {}",
            endpoint.hw_address,
            name,
            endpoint.channel.unwrap_or(0)
        ),
        None => tracing::info!(
            "[wifi] new station {} on channel {}",
            endpoint.hw_address,
            endpoint.channel.unwrap_or(0)
        ),
    }
}

fn log_lost(endpoint: &Endpoint) {
    tracing::info!("[wifi] lost station {}", endpoint.hw_address);
}

pub struct WiFiRecon {
    config: ReconConfig,
    shared: Arc<Shared>,
    forger: Box<dyn FrameForger>,
    injector: Mutex<Option<Box<dyn FrameInjector>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    started_at: DateTime<Utc>,
}

impl WiFiRecon {
    /// Build an idle engine. Aliases are loaded from `config.alias_file` when set.
    pub fn new(config: ReconConfig) -> Result<Self> {
        let aliases = match &config.alias_file {
            Some(path) => AliasStore::load(path)?,
            None => AliasStore::new(),
        };
        let on_new: EndpointCallback = Arc::new(log_new);
        let on_lost: EndpointCallback = Arc::new(log_lost);
        Ok(Self::with_callbacks(config, aliases, on_new, on_lost))
    }

    pub fn with_callbacks(
        config: ReconConfig,
        aliases: AliasStore,
        on_new: EndpointCallback,
        on_lost: EndpointCallback,
    ) -> Self {
        let iface = Interface::find(&config.interface);
        let wifi = Registry::<WiFi>::new(iface, aliases, on_new, on_lost)
            .with_missed_after(config.liveness.missed_after);

        Self {
            config,
            shared: Arc::new(Shared {
                wifi,
                stats: TrafficStats::new(),
                access_point: Mutex::new(None),
                client: Mutex::new(None),
                current_run: Mutex::new(None),
            }),
            forger: Box::new(Dot11Forger),
            injector: Mutex::new(None),
            workers: Mutex::new(Vec::new()),
            started_at: Utc::now(),
        }
    }

    /// Replace the frame encoder used by deauth bursts.
    pub fn with_forger(mut self, forger: Box<dyn FrameForger>) -> Self {
        self.forger = forger;
        self
    }

    /// Install a write path without opening a live device.
    pub fn set_injector(&self, injector: Box<dyn FrameInjector>) {
        *self.injector.lock() = Some(injector);
    }

    pub fn config(&self) -> &ReconConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry<WiFi> {
        &self.shared.wifi
    }

    pub fn stats(&self) -> &TrafficStats {
        &self.shared.stats
    }

    pub fn is_running(&self) -> bool {
        self.shared.current_run.lock().is_some()
    }

    pub fn access_point(&self) -> Option<MacAddr> {
        *self.shared.access_point.lock()
    }

    pub fn client(&self) -> Option<MacAddr> {
        *self.shared.client.lock()
    }

    /// Open the frame source. Nothing is kept if any step fails.
    pub fn configure(&self) -> Result<(CaptureHandle, Option<Box<dyn FrameInjector>>)> {
        crate::pcap::open(&self.config)
    }

    /// Open the capture source and run the read loop on a blocking worker.
    ///
    /// A loop from a previous run that is still parked in a read keeps its own
    /// stop token, so it exits on its next frame instead of resuming.
    pub fn start(&self) -> Result<()> {
        let mut current = self.shared.current_run.lock();
        if current.is_some() {
            return Err(ReconError::AlreadyRunning);
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(std::io::Error::other)?;

        let (handle, injector) = self.configure()?;
        if let Some(injector) = injector {
            *self.injector.lock() = Some(injector);
        }

        let stop: StopToken = Arc::new(AtomicBool::new(false));
        *current = Some(stop.clone());
        drop(current);

        let shared = self.shared.clone();
        let worker = runtime.spawn_blocking(move || match handle {
            CaptureHandle::Live(capture) => capture_loop(capture, &shared, &stop),
            CaptureHandle::Replay(capture) => capture_loop(capture, &shared, &stop),
        });

        let mut workers = self.workers.lock();
        workers.retain(|worker| !worker.is_finished());
        workers.push(worker);

        tracing::info!("wifi.recon started on {}", self.config.interface);
        Ok(())
    }

    /// Ask the capture loop to exit. It notices on its next iteration.
    pub fn stop(&self) -> Result<()> {
        let token = self
            .shared
            .current_run
            .lock()
            .take()
            .ok_or(ReconError::NotRunning)?;
        token.store(true, Ordering::SeqCst);
        self.injector.lock().take();
        tracing::info!("wifi.recon stopping");
        Ok(())
    }

    /// Wait for every capture worker started so far to finish.
    pub async fn join(&self) {
        let workers = std::mem::take(&mut *self.workers.lock());
        for worker in workers {
            if let Err(e) = worker.await {
                tracing::error!("Capture worker failed: {}", e);
            }
        }
    }

    /// Target one access point. Stations and aliases of the previous target are dropped.
    pub fn set_ap_filter(&self, bssid: MacAddr) {
        let mut access_point = self.shared.access_point.lock();
        *access_point = Some(bssid);
        self.reset_stations();
        drop(access_point);
        tracing::info!("Base station filter set to {}", bssid);
    }

    pub fn clear_ap_filter(&self) {
        let mut access_point = self.shared.access_point.lock();
        *access_point = None;
        self.reset_stations();
        drop(access_point);
        tracing::info!("Base station filter cleared");
    }

    pub fn set_client_filter(&self, client: MacAddr) {
        *self.shared.client.lock() = Some(client);
        tracing::info!("Client filter set to {}", client);
    }

    pub fn clear_client_filter(&self) {
        *self.shared.client.lock() = None;
        tracing::info!("Client filter cleared");
    }

    fn reset_stations(&self) {
        self.shared.wifi.clear();
        self.shared.wifi.aliases().clear();
    }

    /// Deauthenticate the targeted client, or every known station of the targeted AP.
    pub fn start_deauth(&self) -> Result<BurstStats> {
        let ap = self.access_point().ok_or(ReconError::NoTarget)?;

        let clients: Vec<MacAddr> = match self.client() {
            Some(client) => vec![client],
            None => self
                .shared
                .wifi
                .list()
                .iter()
                .filter_map(Endpoint::hw)
                .filter(|station| *station != ap)
                .collect(),
        };

        let mut guard = self.injector.lock();
        let injector = guard.as_mut().ok_or(ReconError::NotRunning)?;

        let mut total = BurstStats::default();
        for client in clients {
            tracing::info!("Deauthenticating {} from {}", client, ap);
            let stats = send_deauth_burst(
                &mut **injector,
                &*self.forger,
                ap,
                client,
                self.config.deauth_delay,
            );
            total.merge(&stats);
        }
        Ok(total)
    }

    pub fn set_alias(&self, hw_address: &str, label: &str) -> bool {
        self.shared.wifi.set_alias_for(hw_address, label)
    }

    /// Current stations. Any that just crossed the missed threshold fire `on_lost`.
    fn observed_stations(&self) -> Vec<Endpoint> {
        let stations = self.shared.wifi.list();
        for station in &stations {
            self.shared.wifi.was_missed(&station.hw_address);
        }
        stations
    }

    pub fn show(&self, by: SortBy) -> String {
        let context = ShowContext {
            stats: &self.shared.stats,
            aliases: self.shared.wifi.aliases(),
            liveness: &self.config.liveness,
            started_at: self.started_at,
        };
        context.render(self.observed_stations(), by)
    }

    pub fn json(&self) -> Result<String> {
        self.observed_stations();
        let bytes = self.shared.wifi.marshal_json()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
