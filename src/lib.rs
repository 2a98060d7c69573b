//! gavel — auction bid submission and proxy-bidding resolution.
//!
//! Given a stream of bid requests, the crate decides which bids stand,
//! how far the publicly visible bid moves, and whether the seller's
//! reserve has been met. Each bidder registers a hidden maximum and the
//! visible bid only rises as far as needed to beat the previous leader.
//! Submissions against one item are strictly serialized; unrelated
//! items proceed in parallel.

pub mod auction;
pub mod config;
pub mod coordinator;
pub mod ledger;
pub mod notify;
pub mod persistence;
pub mod resolver;
pub mod store;

pub use auction::{Amount, AuctionItem, Bid, BidError, BidOutcome, SubmitBidRequest};
pub use config::Config;
pub use coordinator::BidSubmissionCoordinator;

#[cfg(test)]
mod tests;
