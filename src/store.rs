//! Collaborator stores.
//!
//! The item and bid stores are external collaborators as far as the
//! bidding logic is concerned: the coordinator only needs the handful
//! of operations below, always inside a transaction it controls.

pub mod in_memory;
pub mod postgres;

use crate::auction::{Amount, AuctionItem, Bid, BidDraft, ItemIdRef};
use crate::persistence::{Persistence, TransactionOf};
use anyhow::Result;
use std::sync::Arc;

/// Storage for auction items.
///
/// `load` must return a point-in-time consistent snapshot.
pub trait ItemStore {
    type Persistence: Persistence;

    fn load<'a>(
        &self,
        tr: &mut TransactionOf<'a, Self::Persistence>,
        item_id: ItemIdRef,
    ) -> Result<Option<AuctionItem>>;

    fn save<'a>(
        &self,
        tr: &mut TransactionOf<'a, Self::Persistence>,
        item: &AuctionItem,
    ) -> Result<()>;
}

pub type SharedItemStore<P> = Arc<dyn ItemStore<Persistence = P> + Send + Sync>;

/// Append-only storage for recorded bids.
pub trait BidStore {
    type Persistence: Persistence;

    /// Record a bid, assigning the next per-item sequence number.
    fn save<'a>(
        &self,
        tr: &mut TransactionOf<'a, Self::Persistence>,
        draft: BidDraft,
    ) -> Result<Bid>;

    /// The standing leader's registered ceiling, if any bid exists.
    fn find_leader_ceiling<'a>(
        &self,
        tr: &mut TransactionOf<'a, Self::Persistence>,
        item_id: ItemIdRef,
    ) -> Result<Option<Amount>>;
}

pub type SharedBidStore<P> = Arc<dyn BidStore<Persistence = P> + Send + Sync>;
