//! Auction domain types.
//!
//! Everything here is plain data: the mutable state lives behind the
//! stores, and all mutation goes through the submission coordinator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ItemId = String;
pub type ItemIdRef<'s> = &'s str;
pub type BidderId = String;

/// Monetary amount. Exact decimal arithmetic, never binary floats.
pub type Amount = Decimal;

/// Why a bid submission was turned down.
///
/// Every variant except [`BidError::Contention`] is definitive for the
/// request that triggered it; `Contention` is transient and the caller
/// may retry the whole submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BidError {
    #[error("auction already closed")]
    AuctionClosed,
    #[error("maximum bid must exceed the current bid of {current_bid}")]
    InvalidBidAmount { current_bid: Amount },
    #[error("outbid by another bidder's standing maximum bid")]
    Outbid,
    #[error("bid does not meet the reserve price of {reserve_price}")]
    ReserveNotMet { reserve_price: Amount },
    #[error("unknown auction item: {0}")]
    UnknownItem(ItemId),
    #[error("item is busy handling other bids, try again")]
    Contention,
}

/// Point-in-time snapshot of an auction item.
///
/// `reserve_price` is fixed at creation; `reserve_price_met` and
/// `closed` only ever go from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionItem {
    pub id: ItemId,
    pub current_bid: Amount,
    pub reserve_price: Amount,
    pub reserve_price_met: bool,
    pub closed: bool,
}

impl AuctionItem {
    /// A freshly listed item with no bids against it.
    pub fn open(id: impl Into<ItemId>, reserve_price: Amount) -> Self {
        Self {
            id: id.into(),
            current_bid: Amount::ZERO,
            reserve_price,
            reserve_price_met: false,
            closed: false,
        }
    }
}

/// A bid as it goes into the ledger, before a sequence number has been
/// assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidDraft {
    pub item: ItemId,
    pub bidder: BidderId,
    /// The bidder's private ceiling.
    pub max_auto_bid: Amount,
    /// The publicly shown amount, always `<= max_auto_bid`.
    pub visible_amount: Amount,
}

/// A recorded bid. Immutable once committed; the ledger is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub item: ItemId,
    pub bidder: BidderId,
    pub max_auto_bid: Amount,
    pub visible_amount: Amount,
    /// Per-item, monotonically increasing. Ledger order and tie-break.
    pub seq: u64,
}

/// What a caller sends in. Transient; becomes a [`Bid`] only on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitBidRequest {
    pub item: ItemId,
    pub bidder: BidderId,
    pub max_auto_bid: Amount,
}

/// The authoritative result of a successful submission. Derived, never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BidOutcome {
    pub new_current_bid: Amount,
    pub is_requester_leading: bool,
    pub message: String,
}
