use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::{mpsc, oneshot, Semaphore};

use crate::domain::opportunity::{Action, MarketOpportunity};
use crate::services::data_coordinator::DataCoordinator;

const SET_RESET_LEN: usize = 10_000;

/// Services people need urgently, worth a dedicated site each.
pub const MONEY_SERVICES: [&str; 10] = [
    "plumber",
    "electrician",
    "hvac",
    "ac repair",
    "heating repair",
    "locksmith",
    "garage door repair",
    "water heater",
    "sewer repair",
    "appliance repair",
];

/// Urgency modifiers that turn a service keyword into a money keyword.
pub const MONEY_MODIFIERS: [&str; 5] = ["emergency", "24 hour", "same day", "urgent", "weekend"];

#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub keyword: String,
    pub location: String,
}

type ScanJob = (ScanRequest, oneshot::Sender<MarketOpportunity>);

/// Fans keyword analyses out over a bounded pool of concurrent scans.
/// Each submission gets a completion future; duplicate submissions are
/// dropped and their future resolves as cancelled.
pub struct KeywordScanner {
    sender: UnboundedSender<ScanJob>,
}

impl KeywordScanner {
    pub fn new(coordinator: Arc<DataCoordinator>, max_concurrent_scans: usize) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel::<ScanJob>();
        tokio::spawn(scan_handler(coordinator, receiver, max_concurrent_scans));

        KeywordScanner { sender }
    }

    pub fn submit(&self, request: ScanRequest) -> oneshot::Receiver<MarketOpportunity> {
        let (result_sender, result_receiver) = oneshot::channel();

        if let Err(e) = self.sender.send((request, result_sender)) {
            log::error!("Scan handler is gone, dropping request: {:?}", e);
        }

        result_receiver
    }

    /// Scans every urgency modifier x service combination for a location
    /// and returns the build-worthy opportunities, fastest profit first.
    pub async fn find_money_keywords(&self, location: &str) -> Vec<MarketOpportunity> {
        let mut pending = vec![];

        for service in MONEY_SERVICES {
            for modifier in MONEY_MODIFIERS {
                let request = ScanRequest {
                    keyword: format!("{} {}", modifier, service),
                    location: location.to_string(),
                };
                pending.push(self.submit(request));
            }
        }

        let mut opportunities = vec![];
        for receiver in pending {
            if let Ok(opportunity) = receiver.await {
                if opportunity.action == Action::BuildNow {
                    log::info!(
                        "Found: {} - ${}/mo",
                        opportunity.keyword,
                        opportunity.monthly_revenue
                    );
                    opportunities.push(opportunity);
                }
            }
        }

        opportunities.sort_by(|a, b| {
            a.days_to_rank.cmp(&b.days_to_rank).then(
                b.monthly_revenue
                    .partial_cmp(&a.monthly_revenue)
                    .unwrap_or(Ordering::Equal),
            )
        });
        opportunities
    }
}

async fn scan_handler(
    coordinator: Arc<DataCoordinator>,
    mut receiver: UnboundedReceiver<ScanJob>,
    max_concurrent_scans: usize,
) {
    log::info!("Started keyword scan handler");
    let semaphore = Arc::new(Semaphore::new(max_concurrent_scans.max(1)));
    let mut seen_queries = HashSet::new();

    while let Some((request, result_sender)) = receiver.recv().await {
        let query = format!("{} {}", request.keyword, request.location);

        match seen_queries.contains(&query) {
            true => {}
            false => {
                if seen_queries.len() > SET_RESET_LEN {
                    seen_queries.clear();
                }
                seen_queries.insert(query);

                let permit = semaphore.clone().acquire_owned().await.unwrap();
                let coordinator = coordinator.clone();
                tokio::spawn(async move {
                    let opportunity = coordinator
                        .analyze_opportunity(&request.keyword, &request.location)
                        .await;
                    drop(permit);

                    // Receiver may have stopped waiting; partial results
                    // are still valid for everyone else.
                    _ = result_sender.send(opportunity);
                });
            }
        }
    }
}
