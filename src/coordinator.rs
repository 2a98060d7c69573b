//! Bid submission coordination.
//!
//! One exclusive critical section per auction item: submissions against
//! the same item serialize, unrelated items run in parallel. Inside the
//! critical section a submission snapshots state, resolves, and commits
//! the item update together with the ledger append in one transaction.

use crate::auction::{
    AuctionItem, BidDraft, BidError, BidOutcome, ItemId, ItemIdRef, SubmitBidRequest,
};
use crate::config::Config;
use crate::ledger::BidLedger;
use crate::notify;
use crate::persistence::{Connection, Persistence, Transaction};
use crate::resolver;
use crate::store::{SharedBidStore, SharedItemStore};
use parking_lot::{Mutex, RawMutex};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// One lock per auction item, created on first use.
pub struct ItemLocks(Mutex<HashMap<ItemId, Arc<Mutex<()>>>>);

pub type ItemGuard = parking_lot::lock_api::ArcMutexGuard<RawMutex, ()>;

impl ItemLocks {
    pub fn new() -> Self {
        Self(Mutex::new(HashMap::new()))
    }

    /// Bounded wait for an item's critical section. `None` means the
    /// wait timed out; giving up while waiting has no effect on the
    /// item.
    pub fn acquire(&self, item_id: ItemIdRef, wait: Duration) -> Option<ItemGuard> {
        let lock = self
            .0
            .lock()
            .entry(item_id.to_owned())
            .or_default()
            .clone();
        lock.try_lock_arc_for(wait)
    }
}

impl Default for ItemLocks {
    fn default() -> Self {
        Self::new()
    }
}

enum AttemptError {
    /// Definitive for this request; never retried.
    Rejected(BidError),
    /// Storage-layer trouble; the whole attempt may be re-run.
    Storage(anyhow::Error),
}

pub struct BidSubmissionCoordinator<P: Persistence> {
    persistence: P,
    items: SharedItemStore<P>,
    ledger: BidLedger<P>,
    locks: ItemLocks,
    config: Config,
}

impl<P: Persistence> BidSubmissionCoordinator<P> {
    pub fn new(
        persistence: P,
        items: SharedItemStore<P>,
        bids: SharedBidStore<P>,
        config: Config,
    ) -> Self {
        Self {
            persistence,
            items,
            ledger: BidLedger::new(bids),
            locks: ItemLocks::new(),
            config,
        }
    }

    /// Submit a bid and resolve it against the item's current state.
    ///
    /// Rejections from resolution are definitive and surface verbatim.
    /// Transient storage failures re-snapshot and re-resolve from
    /// scratch up to the configured retry budget; past that the caller
    /// gets [`BidError::Contention`], as it does when the critical
    /// section cannot be acquired within the configured wait.
    pub fn submit(&self, request: &SubmitBidRequest) -> Result<BidOutcome, BidError> {
        let _guard = self
            .locks
            .acquire(&request.item, self.config.lock_wait)
            .ok_or(BidError::Contention)?;

        let mut attempts = 0;
        loop {
            match self.resolve_and_commit(request) {
                Ok(outcome) => return Ok(outcome),
                Err(AttemptError::Rejected(err)) => {
                    debug!(item = %request.item, bidder = %request.bidder, %err, "bid rejected");
                    return Err(err);
                }
                Err(AttemptError::Storage(err)) => {
                    if attempts >= self.config.commit_retries {
                        warn!(item = %request.item, error = ?err, "commit retries exhausted");
                        return Err(BidError::Contention);
                    }
                    attempts += 1;
                    warn!(
                        item = %request.item,
                        error = ?err,
                        attempt = attempts,
                        "storage failure, re-resolving from a fresh snapshot"
                    );
                }
            }
        }
    }

    /// One full attempt: snapshot, resolve, commit. Caller holds the
    /// item's critical section.
    fn resolve_and_commit(&self, request: &SubmitBidRequest) -> Result<BidOutcome, AttemptError> {
        use AttemptError::*;

        let mut connection = self.persistence.get_connection().map_err(Storage)?;
        let mut tr = connection.start_transaction().map_err(Storage)?;

        let item = self
            .items
            .load(&mut tr, &request.item)
            .map_err(Storage)?
            .ok_or_else(|| Rejected(BidError::UnknownItem(request.item.clone())))?;
        let leader_ceiling = self
            .ledger
            .leader_ceiling(&mut tr, &request.item)
            .map_err(Storage)?;

        let resolution = resolver::resolve(&item, leader_ceiling, request, self.config.bid_increment)
            .map_err(Rejected)?;

        let updated = AuctionItem {
            current_bid: resolution.new_current_bid,
            reserve_price_met: resolution.reserve_price_met,
            ..item
        };
        self.items.save(&mut tr, &updated).map_err(Storage)?;
        let bid = self
            .ledger
            .append_if_leading(
                &mut tr,
                BidDraft {
                    item: request.item.clone(),
                    bidder: request.bidder.clone(),
                    max_auto_bid: request.max_auto_bid,
                    visible_amount: resolution.new_current_bid,
                },
            )
            .map_err(Storage)?;
        tr.commit().map_err(Storage)?;
        self.ledger.confirm_append(&bid);

        debug!(
            item = %bid.item,
            bidder = %bid.bidder,
            seq = bid.seq,
            current_bid = %bid.visible_amount,
            "bid committed"
        );

        Ok(BidOutcome {
            new_current_bid: resolution.new_current_bid,
            is_requester_leading: true,
            message: notify::highest_bidder(resolution.new_current_bid),
        })
    }
}
