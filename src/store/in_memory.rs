//! In-memory store implementations, for tests and demos.

use super::*;
use crate::auction::ItemId;
use crate::persistence::{InMemoryPersistence, InMemoryTransaction};
use parking_lot::Mutex;
use std::collections::BTreeMap;

pub struct InMemoryItemStore {
    items: Arc<Mutex<BTreeMap<ItemId, AuctionItem>>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    pub fn new_shared() -> SharedItemStore<InMemoryPersistence> {
        Arc::new(Self::new())
    }

    /// Seed an item outside any transaction, the way the auction
    /// lifecycle (not the bidding core) would list it.
    pub fn insert(&self, item: AuctionItem) {
        self.items.lock().insert(item.id.clone(), item);
    }

    /// Committed state of an item, for inspection.
    pub fn get(&self, item_id: ItemIdRef) -> Option<AuctionItem> {
        self.items.lock().get(item_id).cloned()
    }
}

impl Default for InMemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStore for InMemoryItemStore {
    type Persistence = InMemoryPersistence;

    fn load<'a>(
        &self,
        _tr: &mut InMemoryTransaction<'a>,
        item_id: ItemIdRef,
    ) -> Result<Option<AuctionItem>> {
        Ok(self.items.lock().get(item_id).cloned())
    }

    fn save<'a>(
        &self,
        tr: &mut InMemoryTransaction<'a>,
        item: &AuctionItem,
    ) -> Result<()> {
        let items = self.items.clone();
        let item = item.clone();
        tr.defer(move || {
            items.lock().insert(item.id.clone(), item);
        });
        Ok(())
    }
}

pub struct InMemoryBidStore {
    bids: Arc<Mutex<BTreeMap<ItemId, Vec<Bid>>>>,
}

impl InMemoryBidStore {
    pub fn new() -> Self {
        Self {
            bids: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    pub fn new_shared() -> SharedBidStore<InMemoryPersistence> {
        Arc::new(Self::new())
    }

    /// Committed bid history for an item, in ledger order.
    pub fn history(&self, item_id: ItemIdRef) -> Vec<Bid> {
        self.bids.lock().get(item_id).cloned().unwrap_or_default()
    }
}

impl Default for InMemoryBidStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BidStore for InMemoryBidStore {
    type Persistence = InMemoryPersistence;

    fn save<'a>(
        &self,
        tr: &mut InMemoryTransaction<'a>,
        draft: BidDraft,
    ) -> Result<Bid> {
        // safe to read the committed length here: the transaction holds
        // the persistence-wide write lock
        let seq = self
            .bids
            .lock()
            .get(&draft.item)
            .map_or(0, |history| history.len() as u64)
            + 1;
        let bid = Bid {
            item: draft.item,
            bidder: draft.bidder,
            max_auto_bid: draft.max_auto_bid,
            visible_amount: draft.visible_amount,
            seq,
        };

        let bids = self.bids.clone();
        let recorded = bid.clone();
        tr.defer(move || {
            bids.lock()
                .entry(recorded.item.clone())
                .or_default()
                .push(recorded);
        });
        Ok(bid)
    }

    fn find_leader_ceiling<'a>(
        &self,
        _tr: &mut InMemoryTransaction<'a>,
        item_id: ItemIdRef,
    ) -> Result<Option<Amount>> {
        Ok(self
            .bids
            .lock()
            .get(item_id)
            .and_then(|history| history.last())
            .map(|bid| bid.max_auto_bid))
    }
}
