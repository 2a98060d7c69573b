//! Per-item bid ledger.
//!
//! Thin facade over the bid store that keeps the standing leader's
//! ceiling cached per item, so resolution does not rescan bid history.
//! The cache is only touched while the item's critical section is held
//! (see the coordinator), which is what keeps it consistent with the
//! store.

use crate::auction::{Amount, Bid, BidDraft, ItemId, ItemIdRef};
use crate::persistence::{Persistence, TransactionOf};
use crate::store::SharedBidStore;
use anyhow::{bail, Result};
use parking_lot::Mutex;
use std::collections::HashMap;

pub struct BidLedger<P: Persistence> {
    store: SharedBidStore<P>,
    ceilings: Mutex<HashMap<ItemId, Amount>>,
}

impl<P: Persistence> BidLedger<P> {
    pub fn new(store: SharedBidStore<P>) -> Self {
        Self {
            store,
            ceilings: Mutex::new(HashMap::new()),
        }
    }

    /// The standing leader's ceiling for an item, O(1) once cached.
    ///
    /// An item with no bids yet is not cached, so the store is asked
    /// again until the first append.
    pub fn leader_ceiling<'a>(
        &self,
        tr: &mut TransactionOf<'a, P>,
        item_id: ItemIdRef,
    ) -> Result<Option<Amount>> {
        if let Some(ceiling) = self.ceilings.lock().get(item_id).copied() {
            return Ok(Some(ceiling));
        }

        let ceiling = self.store.find_leader_ceiling(tr, item_id)?;
        if let Some(ceiling) = ceiling {
            self.ceilings.lock().insert(item_id.to_owned(), ceiling);
        }
        Ok(ceiling)
    }

    /// Record a bid that takes the lead. The write belongs to the
    /// caller's transaction; call [`BidLedger::confirm_append`] once
    /// that transaction has committed.
    pub fn append_if_leading<'a>(
        &self,
        tr: &mut TransactionOf<'a, P>,
        draft: BidDraft,
    ) -> Result<Bid> {
        if let Some(ceiling) = self.ceilings.lock().get(&draft.item).copied() {
            if ceiling >= draft.max_auto_bid {
                bail!(
                    "bid ceiling {} does not beat the standing ceiling {} for item {}",
                    draft.max_auto_bid,
                    ceiling,
                    draft.item
                );
            }
        }
        self.store.save(tr, draft)
    }

    /// Move the cached ceiling forward after a committed append.
    pub fn confirm_append(&self, bid: &Bid) {
        self.ceilings
            .lock()
            .insert(bid.item.clone(), bid.max_auto_bid);
    }
}
